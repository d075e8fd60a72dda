//! Token scanners for the shoe's text stream.
//!
//! Each scanner walks the buffer left to right and reports every
//! non-overlapping token it recognizes, in order. Matching is ASCII
//! case-insensitive, mirroring how the shoe firmware is inconsistent about
//! capitalization across versions.
//!
//! # Separators
//!
//! Tag-wrapped tokens are delimited by a single space on each side:
//!
//! ```text
//!  [Game]<Card:4S> [Game]<Card:KH>
//! ^               ^               ^
//! lead            shared          trail
//! ```
//!
//! The shoe writes only one space between consecutive tokens, so that space
//! is both the trailing separator of one token and the leading separator of
//! the next. Scanning therefore resumes *on* the trailing separator of the
//! previous match rather than after it.

use shoe_core::constants::{TAG_GAME, TAG_GAME_ALARM, TAG_MANUAL_BURN, TOKEN_SEPARATOR};
use shoe_core::{Rank, Suit};

/// Context tags accepted in front of a card or failed-read payload.
const PLAY_TAGS: [&str; 2] = [TAG_GAME, TAG_MANUAL_BURN];

/// Context tags accepted in front of an alarm payload.
const ALARM_TAGS: [&str; 3] = [TAG_GAME, TAG_GAME_ALARM, TAG_MANUAL_BURN];

/// A recognized token and its byte span in the scanned text.
///
/// For tag-wrapped tokens `start` is the leading separator and `end` is one
/// past the trailing separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch<T> {
    /// Byte offset where the token starts.
    pub start: usize,

    /// Byte offset one past the end of the token.
    pub end: usize,

    /// Decoded payload.
    pub payload: T,
}

/// Find ` [Game|GameAlarm|Manual Burn Cards]<Alarm:TEXT> ` tokens.
///
/// `TEXT` is one or more characters other than `>`.
pub fn find_alarms(text: &str) -> Vec<TokenMatch<&str>> {
    scan_tagged(text, &ALARM_TAGS, move |bytes, pos| {
        let body = eat_ignore_case(bytes, pos, "Alarm:")?;
        let close = body + bytes[body..].iter().position(|&b| b == b'>')?;
        if close == body {
            return None;
        }
        Some((&text[body..close], close + 1))
    })
}

/// Find ` [Game|Manual Burn Cards]<Game> ` tokens.
pub fn find_failed_reads(text: &str) -> Vec<TokenMatch<()>> {
    scan_tagged(text, &PLAY_TAGS, |bytes, pos| {
        let after = eat_ignore_case(bytes, pos, "Game>")?;
        Some(((), after))
    })
}

/// Find ` [Game|Manual Burn Cards]<Card:RS> ` tokens.
///
/// `R` is one of `2-9TJQKA` or the literal `10`; `S` is one of `CDHS`.
pub fn find_cards(text: &str) -> Vec<TokenMatch<(Rank, Suit)>> {
    scan_tagged(text, &PLAY_TAGS, |bytes, pos| {
        let mut pos = eat_ignore_case(bytes, pos, "Card:")?;

        let rank = if bytes.get(pos..pos + 2) == Some(b"10".as_slice()) {
            pos += 2;
            Rank::Ten
        } else {
            let c = char::from(*bytes.get(pos)?);
            pos += 1;
            Rank::from_char(c).ok()?
        };

        let suit = Suit::from_char(char::from(*bytes.get(pos)?)).ok()?;
        pos += 1;

        let after = eat_ignore_case(bytes, pos, ">")?;
        Some(((rank, suit), after))
    })
}

/// Find `<W0xHEX>` warning tokens anywhere in the text.
///
/// The payload is the code between the angle brackets, as received.
pub fn find_warnings(text: &str) -> Vec<TokenMatch<&str>> {
    let bytes = text.as_bytes();
    let mut matches = Vec::new();
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
        let open = pos + offset;
        pos = open + 1;

        let Some(digits) = eat_ignore_case(bytes, pos, "W0x") else {
            continue;
        };
        let hex_len = bytes[digits..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        let close = digits + hex_len;
        if hex_len == 0 || bytes.get(close) != Some(&b'>') {
            continue;
        }

        matches.push(TokenMatch {
            start: open,
            end: close + 1,
            payload: &text[open + 1..close],
        });
        pos = close + 1;
    }

    matches
}

/// Scan for ` [TAG]<BODY> ` tokens.
///
/// `body` receives the position just after `<` and returns the decoded
/// payload plus the position just after the closing `>`.
fn scan_tagged<'a, T>(
    text: &'a str,
    tags: &[&str],
    body: impl Fn(&'a [u8], usize) -> Option<(T, usize)>,
) -> Vec<TokenMatch<T>> {
    let bytes = text.as_bytes();
    let mut matches = Vec::new();
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == TOKEN_SEPARATOR) {
        let start = pos + offset;

        let matched = match_tag(bytes, start + 1, tags)
            .and_then(|after_tag| body(bytes, after_tag))
            .filter(|&(_, after)| bytes.get(after) == Some(&TOKEN_SEPARATOR));

        match matched {
            Some((payload, after)) => {
                matches.push(TokenMatch {
                    start,
                    end: after + 1,
                    payload,
                });
                // Resume on the trailing separator so it can lead the next token.
                pos = after;
            }
            None => pos = start + 1,
        }
    }

    matches
}

/// Match `[TAG]<` for any of `tags`, returning the position after `<`.
fn match_tag(bytes: &[u8], pos: usize, tags: &[&str]) -> Option<usize> {
    let pos = eat_ignore_case(bytes, pos, "[")?;
    tags.iter().find_map(|tag| {
        let after = eat_ignore_case(bytes, pos, tag)?;
        eat_ignore_case(bytes, after, "]<")
    })
}

/// Consume `literal` at `pos` (ASCII case-insensitive).
fn eat_ignore_case(bytes: &[u8], pos: usize, literal: &str) -> Option<usize> {
    let end = pos.checked_add(literal.len())?;
    let candidate = bytes.get(pos..end)?;
    candidate
        .eq_ignore_ascii_case(literal.as_bytes())
        .then_some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_single_card() {
        let text = " [Game]<Card:4S> ";
        let matches = find_cards(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[0].end, text.len());
        assert_eq!(matches[0].payload, (Rank::Four, Suit::Spades));
    }

    #[test]
    fn test_adjacent_cards_share_separator() {
        let text = " [Game]<Card:4S> [Game]<Card:KH> ";
        let matches = find_cards(text);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].end - 1, matches[1].start);
        assert_eq!(matches[1].payload, (Rank::King, Suit::Hearts));
    }

    #[test]
    fn test_card_ten_literal_and_lowercase() {
        let matches = find_cards(" [manual burn cards]<card:10h> ");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].payload, (Rank::Ten, Suit::Hearts));
    }

    #[test]
    fn test_card_requires_separators() {
        assert!(find_cards("[Game]<Card:4S> ").is_empty());
        assert!(find_cards(" [Game]<Card:4S>").is_empty());
        assert!(find_cards(" [Game]<Card:4S>x ").is_empty());
    }

    #[test]
    fn test_card_rejects_bad_payload() {
        assert!(find_cards(" [Game]<Card:1S> ").is_empty());
        assert!(find_cards(" [Game]<Card:4X> ").is_empty());
        assert!(find_cards(" [Game]<Card:4SS> ").is_empty());
        assert!(find_cards(" [Other]<Card:4S> ").is_empty());
        assert!(find_cards(" [GameAlarm]<Card:4S> ").is_empty());
    }

    #[test]
    fn test_find_alarms_all_tags() {
        let text = " [Game]<Alarm:E3 Card Not Read> [GameAlarm]<Alarm:Door open> [Manual Burn Cards]<Alarm:Jam> ";
        let alarms: Vec<_> = find_alarms(text).into_iter().map(|m| m.payload).collect();
        assert_eq!(alarms, vec!["E3 Card Not Read", "Door open", "Jam"]);
    }

    #[test]
    fn test_alarm_requires_text() {
        assert!(find_alarms(" [Game]<Alarm:> ").is_empty());
    }

    #[test]
    fn test_alarm_text_stops_at_first_close() {
        // The first `>` must be followed by the separator.
        assert!(find_alarms(" [Game]<Alarm:a>b> ").is_empty());
    }

    #[test]
    fn test_find_failed_reads() {
        let text = " [Game]<Game> [MANUAL BURN CARDS]<game> ";
        assert_eq!(find_failed_reads(text).len(), 2);
        assert!(find_failed_reads(" [GameAlarm]<Game> ").is_empty());
    }

    #[test]
    fn test_find_warnings() {
        let text = "xx<W0x01>yy<w0XaF><W0x><W0x1G>";
        let matches = find_warnings(text);
        let codes: Vec<_> = matches.iter().map(|m| m.payload).collect();
        assert_eq!(codes, vec!["W0x01", "w0XaF"]);
        assert_eq!(matches[0].start, 2);
        assert_eq!(matches[0].end, 9);
    }

    #[test]
    fn test_partial_tokens_do_not_match() {
        assert!(find_cards(" [Game]<Ca").is_empty());
        assert!(find_alarms(" [GameAlarm]<Alarm:E3 Ca").is_empty());
        assert!(find_warnings("<W0x0").is_empty());
    }
}
