//! Canonical card codes sent to the card server.
//!
//! The server expects a two-character code with the suit first and the
//! rank second, ten always written as `T`:
//!
//! | Shoe token | Canonical |
//! |------------|-----------|
//! | `<Card:4S>` | `S4` |
//! | `<Card:10H>` | `HT` |
//! | `<Card:kc>` | `CK` |

use serde::{Serialize, Serializer};
use shoe_core::{Rank, Result, Suit};
use std::fmt;

/// A card in the server's `suit + rank` wire format.
///
/// # Example
///
/// ```
/// use shoe_core::{Rank, Suit};
/// use shoe_protocol::CanonicalCard;
///
/// let card = CanonicalCard::new(Rank::Ten, Suit::Hearts);
/// assert_eq!(card.code(), "HT");
///
/// let card = CanonicalCard::from_tokens("10", "h").unwrap();
/// assert_eq!(card.to_string(), "HT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalCard {
    rank: Rank,
    suit: Suit,
}

impl CanonicalCard {
    /// Normalize a rank and suit into a canonical card.
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Normalize raw rank and suit tokens as written by the shoe.
    ///
    /// # Errors
    /// Returns `Error::InvalidRank` or `Error::InvalidSuit` for tokens
    /// outside the shoe's card grammar.
    pub fn from_tokens(rank: &str, suit: &str) -> Result<Self> {
        Ok(Self::new(rank.parse()?, suit.parse()?))
    }

    /// Card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Two-character wire code, suit first.
    #[must_use]
    pub fn code(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CanonicalCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.suit.to_char(), self.rank.to_char())
    }
}

impl Serialize for CanonicalCard {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
