//! Network layer for the card shoe monitor
//!
//! This crate relays dealt cards to the card server over HTTP. It owns the
//! URL and payload format and the best-effort delivery policy.
//!
//! # Components
//!
//! - **HttpDispatcher**: `reqwest`-backed [`CardDispatcher`]
//! - **endpoint_url / timestamp_now**: request helpers shared with tests and
//!   the CLI

mod dispatcher;

pub use dispatcher::{
    CardDispatcher, CardPayload, DispatchError, HttpDispatcher, Result, endpoint_url,
    timestamp_now,
};
