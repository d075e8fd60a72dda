//! Core constants for the card shoe monitor.
//!
//! This module centralizes the timing, buffer and default configuration
//! values used across the workspace. Components take these as defaults for
//! their configuration structs rather than reading them directly, so tests
//! and deployments can override them per session.
//!
//! # Device Stream Grammar
//!
//! The shoe writes ASCII tokens separated by single spaces:
//!
//! ```text
//!  [Game]<Card:4S>              card dealt (rank + suit)
//!  [Manual Burn Cards]<Card:10H> burn card dealt
//!  [Game]<Game>                 card passed but could not be read
//!  [GameAlarm]<Alarm:E3 ...>    hardware alarm with free text
//!  <W0x01>                      warning code (no context tag)
//! ```
//!
//! # Usage
//!
//! ```
//! use shoe_core::constants::*;
//! use std::time::Duration;
//!
//! let retry = Duration::from_millis(RETRY_DELAY_MS);
//! assert_eq!(retry.as_secs_f32(), 2.5);
//! assert!(RETAINED_BUFFER_CHARS < MAX_BUFFER_CHARS);
//! ```

// ============================================================================
// Device Stream Tokens
// ============================================================================

/// Context tag for cards dealt during normal play.
pub const TAG_GAME: &str = "Game";

/// Context tag for cards burned manually by the dealer.
pub const TAG_MANUAL_BURN: &str = "Manual Burn Cards";

/// Context tag used by the shoe for standalone alarm reports.
pub const TAG_GAME_ALARM: &str = "GameAlarm";

/// Separator the shoe writes around every tag-wrapped token.
pub const TOKEN_SEPARATOR: u8 = b' ';

/// Reason attached to a read failure reported without alarm text.
pub const UNREADABLE_REASON: &str = "Unreadable";

/// Alarm text fragments (lowercase) that also mean a card was not read.
pub const ALARM_READ_FAILURE_MARKERS: [&str; 2] = ["card not read", "e3"];

// ============================================================================
// Buffer Limits
// ============================================================================

/// Buffer length (in characters) above which stale content is evicted.
///
/// Protects against unbounded growth when the shoe emits text that never
/// forms a recognizable token.
pub const MAX_BUFFER_CHARS: usize = 2000;

/// Number of trailing characters kept when [`MAX_BUFFER_CHARS`] is exceeded.
pub const RETAINED_BUFFER_CHARS: usize = 1000;

// ============================================================================
// Timing
// ============================================================================

/// Delay before reopening the serial link after an open or read failure (ms).
///
/// Fixed on purpose: the monitor runs unattended for whole gaming sessions,
/// so there is no backoff growth and no retry limit.
pub const RETRY_DELAY_MS: u64 = 2500;

/// Sleep between checks for waiting bytes while connected (ms).
pub const POLL_INTERVAL_MS: u64 = 50;

/// Upper bound for a single card notification round trip (ms).
pub const HTTP_TIMEOUT_MS: u64 = 3000;

/// Serial read timeout passed to the driver (ms).
pub const SERIAL_TIMEOUT_MS: u64 = 2000;

// ============================================================================
// Serial Defaults
// ============================================================================

/// Default serial device for a USB-attached shoe on Linux.
pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyUSB0";

/// Default baud rate of the shoe.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default card server host.
pub const DEFAULT_SERVER_HOST: &str = "192.168.1.140";

/// Default card server port.
pub const DEFAULT_SERVER_PORT: u16 = 9000;

/// Default card endpoint path (without leading slash).
pub const DEFAULT_SERVER_PATH: &str = "api/holdem/beetek/card";

/// Default file name of the persisted server configuration.
pub const DEFAULT_CONFIG_FILE: &str = "shoe.json";
