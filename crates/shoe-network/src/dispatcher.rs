//! HTTP dispatcher for dealt cards.
//!
//! Each card read by the shoe is relayed to the card server as a single
//! JSON `POST`. Delivery is best effort: one attempt, bounded by a timeout,
//! and failures are logged rather than propagated so the serial read loop
//! never stalls on the network.
//!
//! # Wire format
//!
//! ```text
//! POST http://{host}:{port}/{path}
//! Content-Type: application/json
//!
//! {"card": "S4", "timestamp": "2025-10-16T14:30:00.123456-03:00"}
//! ```
//!
//! # Example
//!
//! ```no_run
//! use shoe_core::{Rank, ServerConfig, Suit};
//! use shoe_network::{CardDispatcher, HttpDispatcher, timestamp_now};
//! use shoe_protocol::CanonicalCard;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = HttpDispatcher::new()?;
//! let server = ServerConfig::default();
//! let card = CanonicalCard::new(Rank::Four, Suit::Spades);
//!
//! let delivered = dispatcher.send(&server, card, &timestamp_now()).await;
//! println!("delivered: {delivered}");
//! # Ok(())
//! # }
//! ```

use chrono::{Local, SecondsFormat};
use reqwest::Client;
use serde::Serialize;
use shoe_core::ServerConfig;
use shoe_core::constants::HTTP_TIMEOUT_MS;
use shoe_protocol::CanonicalCard;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur while dispatching a card
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Server did not answer within the timeout
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Connection refused, reset, DNS failure and other transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered outside the 2xx range
    #[error("Server returned HTTP {0}")]
    Status(u16),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Request body sent for each card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardPayload {
    /// Canonical `suit + rank` code
    pub card: CanonicalCard,

    /// Local time the card was read, RFC 3339 with offset
    pub timestamp: String,
}

/// Something that can relay a card to the card server.
///
/// The link manager is generic over this trait so tests can record
/// dispatches without a network.
pub trait CardDispatcher: Send + Sync {
    /// Relay one card. Returns `true` only for a 2xx response.
    ///
    /// Never fails: every error is logged and reported as `false`.
    fn send(
        &self,
        server: &ServerConfig,
        card: CanonicalCard,
        timestamp: &str,
    ) -> impl Future<Output = bool> + Send;
}

/// Join the server address and path with exactly one `/`.
///
/// # Example
///
/// ```
/// use shoe_core::ServerConfig;
/// use shoe_network::endpoint_url;
///
/// let server = ServerConfig::new("10.0.0.5", 8080, "//cards/in").unwrap();
/// assert_eq!(endpoint_url(&server), "http://10.0.0.5:8080/cards/in");
/// ```
pub fn endpoint_url(server: &ServerConfig) -> String {
    format!(
        "http://{}:{}/{}",
        server.host,
        server.port,
        server.path.trim_start_matches('/')
    )
}

/// Current local time as RFC 3339 with offset and microseconds.
pub fn timestamp_now() -> String {
    Local::now()
        .fixed_offset()
        .to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// [`CardDispatcher`] backed by a `reqwest` client.
///
/// The client is built once and reused so connections to the card server
/// can be pooled across cards.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    timeout: Duration,
}

impl HttpDispatcher {
    /// Create a dispatcher with the default 3 s timeout.
    ///
    /// # Errors
    /// Returns `DispatchError::ClientBuild` if the TLS backend or resolver
    /// cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_millis(HTTP_TIMEOUT_MS))
    }

    /// Create a dispatcher with a custom request timeout.
    ///
    /// # Errors
    /// Returns `DispatchError::ClientBuild` if the client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::ClientBuild(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    /// Request timeout applied to every dispatch
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Post one card and report the typed outcome.
    ///
    /// # Errors
    /// Returns `Timeout` or `Transport` when no response arrives, and
    /// `Status` for a response outside the 2xx range.
    pub async fn try_send(
        &self,
        server: &ServerConfig,
        card: CanonicalCard,
        timestamp: &str,
    ) -> Result<u16> {
        let url = endpoint_url(server);
        let payload = CardPayload {
            card,
            timestamp: timestamp.to_string(),
        };
        debug!("POST {} {:?}", url, payload);

        // `json` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(DispatchError::Status(status.as_u16()))
        }
    }

    fn classify_error(&self, e: reqwest::Error) -> DispatchError {
        if e.is_timeout() {
            DispatchError::Timeout(self.timeout.as_millis() as u64)
        } else {
            DispatchError::Transport(e.to_string())
        }
    }
}

impl CardDispatcher for HttpDispatcher {
    async fn send(&self, server: &ServerConfig, card: CanonicalCard, timestamp: &str) -> bool {
        match self.try_send(server, card, timestamp).await {
            Ok(status) => {
                info!("Sent {} -> {}", card, status);
                true
            }
            Err(DispatchError::Status(status)) => {
                warn!("Server rejected {} -> {}", card, status);
                false
            }
            Err(e) => {
                error!("Failed to send {}: {}", card, e);
                false
            }
        }
    }
}
