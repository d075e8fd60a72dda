//! Common test utilities for classifier integration tests.
//!
//! Helpers here build device tokens exactly as the shoe writes them, so
//! tests read as streams rather than string literals.

#![allow(dead_code)]

use shoe_protocol::{ShoeEvent, StreamClassifier};

/// Card token for the `[Game]` context, e.g. ` [Game]<Card:4S> `.
pub fn card_token(rank: &str, suit: &str) -> String {
    format!(" [Game]<Card:{rank}{suit}> ")
}

/// Card token for the `[Manual Burn Cards]` context.
pub fn burn_token(rank: &str, suit: &str) -> String {
    format!(" [Manual Burn Cards]<Card:{rank}{suit}> ")
}

/// Failed-read token, ` [Game]<Game> `.
pub fn failed_token() -> String {
    " [Game]<Game> ".to_string()
}

/// Alarm token with the `[GameAlarm]` context.
pub fn alarm_token(text: &str) -> String {
    format!(" [GameAlarm]<Alarm:{text}> ")
}

/// Warning token, e.g. `<W0x01>`.
pub fn warning_token(code: u8) -> String {
    format!("<W0x{code:02X}>")
}

/// Feed `stream` to a fresh classifier in chunks of `chunk_size` bytes.
///
/// Returns every event in emission order and the classifier so callers
/// can inspect what was left buffered.
pub fn feed_in_chunks(stream: &str, chunk_size: usize) -> (Vec<ShoeEvent>, StreamClassifier) {
    let mut classifier = StreamClassifier::new();
    let mut events = Vec::new();
    for chunk in stream.as_bytes().chunks(chunk_size) {
        events.extend(classifier.feed(chunk));
    }
    (events, classifier)
}

/// Canonical codes of all card events, in order.
pub fn card_codes(events: &[ShoeEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(ShoeEvent::card)
        .map(|card| card.code())
        .collect()
}
