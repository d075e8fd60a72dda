//! Stream classification for the card shoe's serial output.
//!
//! The shoe writes loosely structured ASCII tokens; this crate turns the
//! accumulated text into [`ShoeEvent`]s and maps dealt cards to the
//! [`CanonicalCard`] codes expected by the card server.

pub mod card;
pub mod classifier;
pub mod event;
pub mod scanner;

pub use card::CanonicalCard;
pub use classifier::{StreamClassifier, classify, decode_lenient};
pub use event::ShoeEvent;
