//! Events recognized in the shoe's text stream.

use crate::card::CanonicalCard;
use shoe_core::{Rank, Suit};
use std::fmt;

/// A semantic event extracted from the device stream.
///
/// Events are produced by the classifier and consumed immediately by the
/// link manager; nothing in the core keeps them afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShoeEvent {
    /// A card was dealt and read.
    CardRead { rank: Rank, suit: Suit },

    /// A card passed the reader but could not be identified.
    ///
    /// `reason` is `"Unreadable"` for a bare failed-read token, or the
    /// alarm text when the failure was reported through an alarm.
    ReadFailed { reason: String },

    /// Hardware alarm with free-text message.
    Alarm { message: String },

    /// Hexadecimal warning code such as `W0x01`.
    Warning { code: String },
}

impl ShoeEvent {
    /// Canonical card for `CardRead` events.
    pub fn card(&self) -> Option<CanonicalCard> {
        match self {
            Self::CardRead { rank, suit } => Some(CanonicalCard::new(*rank, *suit)),
            _ => None,
        }
    }

    /// Check if this event is a successfully read card.
    pub fn is_card(&self) -> bool {
        matches!(self, Self::CardRead { .. })
    }
}

impl fmt::Display for ShoeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardRead { rank, suit } => write!(f, "card {}{}", suit, rank),
            Self::ReadFailed { reason } => write!(f, "read failed: {}", reason),
            Self::Alarm { message } => write!(f, "alarm: {}", message),
            Self::Warning { code } => write!(f, "warning: {}", code),
        }
    }
}
