//! Stream classifier for the shoe's serial output.
//!
//! This module provides a stateful classifier that accumulates text read
//! from the serial link and extracts semantic events from it. The shoe
//! writes tokens at arbitrary byte boundaries, so a single read may carry a
//! partial token, several tokens, or tokens of different kinds interleaved.
//!
//! # Priority Passes
//!
//! Each call runs four passes over the buffer, every pass operating on the
//! buffer left by the previous one:
//!
//! ```text
//! ┌─────────┐   ┌─────────┐   ┌─────────────┐   ┌──────────┐   ┌──────────┐
//! │ 1 Alarm │──>│2 Warning│──>│3 Failed read│──>│ 4 Card   │──>│ size cap │
//! └─────────┘   └─────────┘   └─────────────┘   └──────────┘   └──────────┘
//!  remove spans  remove spans   remove spans     keep tail only   > 2000 chars:
//!                                                after last card  keep last 1000
//! ```
//!
//! Alarms and warnings can arrive glued to card tokens; stripping them first
//! keeps them from corrupting a rank/suit match or being swallowed by the
//! coarser card trim.
//!
//! # Usage
//!
//! ```
//! use shoe_protocol::{ShoeEvent, StreamClassifier};
//!
//! let mut classifier = StreamClassifier::new();
//!
//! // Token split across two reads
//! assert!(classifier.feed(b" [Game]<Card:4").is_empty());
//! let events = classifier.feed(b"S> ");
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].card().unwrap().code(), "S4");
//! assert!(classifier.buffer().is_empty());
//! ```

use crate::event::ShoeEvent;
use crate::scanner::{self, TokenMatch};
use shoe_core::constants::{
    ALARM_READ_FAILURE_MARKERS, MAX_BUFFER_CHARS, RETAINED_BUFFER_CHARS, TOKEN_SEPARATOR,
    UNREADABLE_REASON,
};
use tracing::{debug, trace};

/// Initial buffer capacity, sized for the eviction threshold.
const INITIAL_BUFFER_CAPACITY: usize = MAX_BUFFER_CHARS;

/// Stateful classifier for the shoe text stream.
///
/// Owns the accumulation buffer between reads. Unmatched text is never an
/// error: it stays in the buffer until it completes a token or is evicted
/// by the size cap.
#[derive(Debug, Clone)]
pub struct StreamClassifier {
    /// Decoded text not yet consumed by a card match.
    buffer: String,

    /// The last card trim consumed a trailing separator at the very end of
    /// the buffer, so the next read starts on a token boundary.
    at_boundary: bool,
}

impl StreamClassifier {
    /// Create an empty classifier.
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(INITIAL_BUFFER_CAPACITY),
            at_boundary: false,
        }
    }

    /// Append raw bytes from the link and extract events.
    ///
    /// Bytes outside 7-bit ASCII are dropped during decoding. Returned
    /// events are ordered by priority class, then by position.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<ShoeEvent> {
        let mut decoded = decode_lenient(bytes).peekable();
        let Some(&first) = decoded.peek() else {
            return Vec::new();
        };

        // Restore the separator shared with a card consumed by the last trim.
        if self.at_boundary && first != char::from(TOKEN_SEPARATOR) {
            self.buffer.push(char::from(TOKEN_SEPARATOR));
        }
        self.buffer.extend(decoded);

        trace!(len = self.buffer.len(), "Classifying buffer");
        let events = classify(&mut self.buffer);
        self.at_boundary = self.buffer.is_empty() && events.iter().any(ShoeEvent::is_card);
        events
    }

    /// Current buffer content.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Number of characters buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard everything buffered.
    ///
    /// Called when a new link session starts so text from a previous
    /// connection cannot complete a token.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.at_boundary = false;
    }
}

impl Default for StreamClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode device bytes, dropping anything outside 7-bit ASCII.
pub fn decode_lenient(bytes: &[u8]) -> impl Iterator<Item = char> + '_ {
    bytes.iter().filter(|b| b.is_ascii()).map(|&b| char::from(b))
}

/// Run all classification passes over `buffer`, trimming it in place.
///
/// # Example
///
/// ```
/// use shoe_protocol::{ShoeEvent, classify};
///
/// let mut buffer = String::from(" [Game]<Alarm:E3 Card Not Read> ");
/// let events = classify(&mut buffer);
///
/// assert!(matches!(events[0], ShoeEvent::Alarm { .. }));
/// assert!(matches!(events[1], ShoeEvent::ReadFailed { .. }));
/// assert!(!buffer.contains("Alarm"));
/// ```
pub fn classify(buffer: &mut String) -> Vec<ShoeEvent> {
    let mut events = Vec::new();

    extract_alarms(buffer, &mut events);
    extract_warnings(buffer, &mut events);
    extract_failed_reads(buffer, &mut events);
    extract_cards(buffer, &mut events);
    enforce_size_cap(buffer);

    events
}

/// Pass 1: alarms, plus a read failure for alarms that report a missed card.
fn extract_alarms(buffer: &mut String, events: &mut Vec<ShoeEvent>) {
    let matches = scanner::find_alarms(buffer);
    if matches.is_empty() {
        return;
    }

    for m in &matches {
        let message = m.payload.to_string();
        let lowered = message.to_lowercase();
        let read_failure = ALARM_READ_FAILURE_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker));

        events.push(ShoeEvent::Alarm {
            message: message.clone(),
        });
        if read_failure {
            events.push(ShoeEvent::ReadFailed { reason: message });
        }
    }

    let spans = tagged_spans(&matches);
    remove_spans(buffer, &spans);
}

/// Pass 2: warning codes.
fn extract_warnings(buffer: &mut String, events: &mut Vec<ShoeEvent>) {
    let matches = scanner::find_warnings(buffer);
    if matches.is_empty() {
        return;
    }

    events.extend(matches.iter().map(|m| ShoeEvent::Warning {
        code: m.payload.to_string(),
    }));

    let spans: Vec<_> = matches.iter().map(|m| (m.start, m.end)).collect();
    remove_spans(buffer, &spans);
}

/// Pass 3: failed reads without alarm text.
fn extract_failed_reads(buffer: &mut String, events: &mut Vec<ShoeEvent>) {
    let matches = scanner::find_failed_reads(buffer);
    if matches.is_empty() {
        return;
    }

    events.extend(matches.iter().map(|_| ShoeEvent::ReadFailed {
        reason: UNREADABLE_REASON.to_string(),
    }));

    let spans = tagged_spans(&matches);
    remove_spans(buffer, &spans);
}

/// Pass 4: cards. Keeps only the text after the last card.
///
/// Anything before the final card boundary is discarded, including
/// unmatched text between two cards of the same read. When text follows
/// the last card, its trailing separator is kept to lead that text.
fn extract_cards(buffer: &mut String, events: &mut Vec<ShoeEvent>) {
    let matches = scanner::find_cards(buffer);
    let Some(last_end) = matches.last().map(|m| m.end) else {
        return;
    };

    events.extend(matches.iter().map(|m| {
        let (rank, suit) = m.payload;
        ShoeEvent::CardRead { rank, suit }
    }));

    let cut = if last_end < buffer.len() {
        last_end - 1
    } else {
        last_end
    };
    buffer.drain(..cut);
}

/// Evict stale text once the buffer grows past [`MAX_BUFFER_CHARS`].
fn enforce_size_cap(buffer: &mut String) {
    let chars = buffer.chars().count();
    if chars <= MAX_BUFFER_CHARS {
        return;
    }

    let skip = chars - RETAINED_BUFFER_CHARS;
    let cut = buffer
        .char_indices()
        .nth(skip)
        .map_or(buffer.len(), |(idx, _)| idx);
    buffer.drain(..cut);

    debug!(
        evicted = skip,
        retained = RETAINED_BUFFER_CHARS,
        "Buffer exceeded {} chars without a recognizable token",
        MAX_BUFFER_CHARS
    );
}

/// Removal spans for tag-wrapped tokens.
///
/// The leading separator stays in the buffer so the neighbouring tokens
/// keep their delimiters once the token is gone.
fn tagged_spans<T>(matches: &[TokenMatch<T>]) -> Vec<(usize, usize)> {
    matches.iter().map(|m| (m.start + 1, m.end)).collect()
}

/// Remove sorted, non-overlapping byte spans from `buffer`.
fn remove_spans(buffer: &mut String, spans: &[(usize, usize)]) {
    let mut kept = String::with_capacity(buffer.len());
    let mut cursor = 0;

    for &(start, end) in spans {
        kept.push_str(&buffer[cursor..start]);
        cursor = end;
    }
    kept.push_str(&buffer[cursor..]);

    *buffer = kept;
}
