use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card rank as reported by the shoe.
///
/// The shoe writes ten either as `T` or as the literal `10`; both collapse
/// to [`Rank::Ten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Parse a rank from a single character (case-insensitive).
    ///
    /// # Errors
    /// Returns `Error::InvalidRank` for characters outside `2-9TJQKA`.
    pub fn from_char(c: char) -> Result<Self> {
        let rank = match c.to_ascii_uppercase() {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            other => return Err(Error::InvalidRank(other.to_string())),
        };
        Ok(rank)
    }

    /// Parse a rank token, accepting the literal `10` as ten.
    ///
    /// # Errors
    /// Returns `Error::InvalidRank` if the token is not a single rank
    /// character or `10`.
    pub fn from_token(token: &str) -> Result<Self> {
        if token == "10" {
            return Ok(Rank::Ten);
        }
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(Error::InvalidRank(token.to_string())),
        }
    }

    /// Canonical single-character form (`T` for ten).
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::str::FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rank::from_token(s)
    }
}

/// Card suit as reported by the shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All suits in protocol order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Parse a suit from its letter (case-insensitive).
    ///
    /// # Errors
    /// Returns `Error::InvalidSuit` for characters outside `CDHS`.
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'C' => Ok(Suit::Clubs),
            'D' => Ok(Suit::Diamonds),
            'H' => Ok(Suit::Hearts),
            'S' => Ok(Suit::Spades),
            other => Err(Error::InvalidSuit(other.to_string())),
        }
    }

    /// Uppercase suit letter.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::str::FromStr for Suit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Suit::from_char(c),
            _ => Err(Error::InvalidSuit(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2", Rank::Two)]
    #[case("9", Rank::Nine)]
    #[case("T", Rank::Ten)]
    #[case("t", Rank::Ten)]
    #[case("10", Rank::Ten)]
    #[case("j", Rank::Jack)]
    #[case("Q", Rank::Queen)]
    #[case("K", Rank::King)]
    #[case("a", Rank::Ace)]
    fn test_rank_valid(#[case] input: &str, #[case] expected: Rank) {
        let rank: Rank = input.parse().unwrap();
        assert_eq!(rank, expected);
    }

    #[rstest]
    #[case("1")]
    #[case("0")]
    #[case("11")]
    #[case("X")]
    #[case("")]
    fn test_rank_invalid(#[case] input: &str) {
        let result: Result<Rank> = input.parse();
        assert!(result.is_err());
    }

    #[rstest]
    #[case('c', Suit::Clubs)]
    #[case('D', Suit::Diamonds)]
    #[case('h', Suit::Hearts)]
    #[case('S', Suit::Spades)]
    fn test_suit_valid(#[case] input: char, #[case] expected: Suit) {
        assert_eq!(Suit::from_char(input).unwrap(), expected);
    }

    #[test]
    fn test_suit_invalid() {
        assert!(Suit::from_char('X').is_err());
        assert!("SH".parse::<Suit>().is_err());
    }

    #[test]
    fn test_rank_display_collapses_ten() {
        assert_eq!(Rank::Ten.to_string(), "T");
        assert_eq!(Rank::from_token("10").unwrap().to_string(), "T");
    }

    #[test]
    fn test_all_ranks_roundtrip_through_char() {
        for rank in Rank::ALL {
            assert_eq!(Rank::from_char(rank.to_char()).unwrap(), rank);
        }
        for suit in Suit::ALL {
            assert_eq!(Suit::from_char(suit.to_char()).unwrap(), suit);
        }
    }
}
