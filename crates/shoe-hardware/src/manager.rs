//! Shoe link manager.
//!
//! This module provides the [`ShoeMonitor`], which owns the link to the shoe
//! for the whole session: it opens the link, drains and classifies the text
//! stream, relays dealt cards to the card server, and reconnects after any
//! failure until it is stopped.
//!
//! # Architecture
//!
//! One background task runs the whole loop. Observers hold a
//! [`MonitorHandle`] and consume notifications from a channel; the link,
//! the classifier buffer and the config snapshot never leave the task.
//!
//! ```text
//!                ┌──────────────────────────────┐
//! ┌──────────┐   │ Monitor task                 │   ┌──────────────┐
//! │ Shoe     │──►│ read ─► classify ─► dispatch │──►│ Card server  │
//! │ link     │   │           │                  │   └──────────────┘
//! └──────────┘   └───────────┼──────────────────┘
//!                            │ MonitorEvent (mpsc)
//!                            │ ConnectionState (watch)
//!                            ▼
//!                       MonitorHandle
//! ```
//!
//! # States
//!
//! ```text
//! Disconnected ─► Connecting ─► Connected ─► (read loop)
//!                    ▲             │
//!                    │  retry      ▼ open or read failure
//!                    └──────── Error(message)
//!
//! any state ── stop ──► Stopped
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use shoe_core::MonitorConfig;
//! use shoe_hardware::devices::AnyShoeLink;
//! use shoe_hardware::manager::{MonitorEvent, ShoeMonitor};
//! use shoe_network::HttpDispatcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = HttpDispatcher::new()?;
//!     let monitor = ShoeMonitor::new(MonitorConfig::default(), AnyShoeLink::serial(), dispatcher);
//!
//!     let mut handle = monitor.start();
//!     while let Some(event) = handle.recv().await {
//!         if let MonitorEvent::Card { text, success } = event {
//!             println!("{} ({})", text, success);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use crate::devices::AnyShoeLink;
use crate::traits::ShoeLink;
use crate::Result;
use shoe_core::MonitorConfig;
use shoe_network::{CardDispatcher, timestamp_now};
use shoe_protocol::{CanonicalCard, ShoeEvent, StreamClassifier};
use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Capacity of the notification channel.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Connection state of the monitor, observable read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not started yet.
    Disconnected,

    /// Opening the link.
    Connecting,

    /// Link open, reading.
    Connected,

    /// Last open or read failed; waiting to retry.
    Error(String),

    /// Stopped on request. Terminal.
    Stopped,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Error(message) => write!(f, "Error: {}", message),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Notification sent to the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The link was opened.
    Connected,

    /// The link failed while reading and was closed.
    Disconnected {
        /// Driver error text.
        reason: String,
    },

    /// Open failure, alarm or warning.
    Error {
        /// Status text for the operator.
        message: String,
    },

    /// A card was read, or a read failed.
    Card {
        /// Canonical code, or `FAIL: reason`.
        text: String,

        /// `false` for failed reads.
        success: bool,
    },
}

impl MonitorEvent {
    /// Map a classified shoe event to its notification.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoe_hardware::manager::MonitorEvent;
    /// use shoe_protocol::ShoeEvent;
    ///
    /// let event = ShoeEvent::Warning { code: "W0x01".to_string() };
    /// assert_eq!(
    ///     MonitorEvent::from_shoe_event(&event),
    ///     MonitorEvent::Error { message: "Warning: W0x01".to_string() }
    /// );
    /// ```
    pub fn from_shoe_event(event: &ShoeEvent) -> Self {
        match event {
            ShoeEvent::CardRead { rank, suit } => Self::Card {
                text: CanonicalCard::new(*rank, *suit).code(),
                success: true,
            },
            ShoeEvent::ReadFailed { reason } => Self::Card {
                text: format!("FAIL: {}", reason),
                success: false,
            },
            ShoeEvent::Alarm { message } => Self::Error {
                message: format!("ALARM: {}", message),
            },
            ShoeEvent::Warning { code } => Self::Error {
                message: format!("Warning: {}", code),
            },
        }
    }
}

/// Handle to a running monitor.
///
/// Dropping the handle without calling [`stop`](Self::stop) leaves the
/// task running until the runtime shuts down; notifications are then
/// discarded.
pub struct MonitorHandle {
    /// Notification receiver.
    event_rx: mpsc::Receiver<MonitorEvent>,

    /// Connection state published by the task.
    state_rx: watch::Receiver<ConnectionState>,

    /// Cancels the task cooperatively.
    cancel: CancellationToken,

    /// The monitor task.
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Receive the next notification.
    ///
    /// Returns `None` once the monitor has stopped and every pending
    /// notification was received.
    pub async fn recv(&mut self) -> Option<MonitorEvent> {
        self.event_rx.recv().await
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to connection state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Request a stop without waiting for it.
    ///
    /// The task finishes any in-flight dispatch, closes the link and ends.
    /// Notifications that no longer fit in the channel are dropped.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Check if a stop was requested.
    pub fn is_stopping(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop the monitor and wait for the task to end.
    ///
    /// Pending notifications are discarded.
    pub async fn shutdown(self) {
        let Self {
            event_rx,
            cancel,
            task,
            ..
        } = self;

        cancel.cancel();
        // Unblocks a task waiting on a full channel.
        drop(event_rx);

        if let Err(e) = task.await {
            error!("Monitor task failed: {}", e);
        }
    }
}

/// Monitors one shoe for a session.
///
/// Generic over the dispatcher so tests can record cards without a network.
pub struct ShoeMonitor<D> {
    config: MonitorConfig,
    link: AnyShoeLink,
    dispatcher: D,
}

impl<D: CardDispatcher + 'static> ShoeMonitor<D> {
    /// Create a monitor for `link` with a config snapshot.
    pub fn new(config: MonitorConfig, link: AnyShoeLink, dispatcher: D) -> Self {
        Self {
            config,
            link,
            dispatcher,
        }
    }

    /// Config snapshot used by this monitor.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Spawn the monitor task and return its handle.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> MonitorHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();

        let task = MonitorTask {
            config: self.config,
            link: self.link,
            dispatcher: self.dispatcher,
            classifier: StreamClassifier::new(),
            event_tx,
            state_tx,
            cancel: cancel.clone(),
        };

        MonitorHandle {
            event_rx,
            state_rx,
            cancel,
            task: tokio::spawn(task.run()),
        }
    }
}

/// State owned by the running monitor task.
struct MonitorTask<D> {
    config: MonitorConfig,
    link: AnyShoeLink,
    dispatcher: D,
    classifier: StreamClassifier,
    event_tx: mpsc::Sender<MonitorEvent>,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
}

impl<D: CardDispatcher> MonitorTask<D> {
    async fn run(mut self) {
        let device = self.config.serial.device.clone();
        info!(
            "Monitoring {} @{}, sending cards to {}:{}",
            device, self.config.serial.baud_rate, self.config.server.host, self.config.server.port
        );

        while !self.cancel.is_cancelled() {
            self.set_state(ConnectionState::Connecting);

            match self.link.open(&self.config.serial).await {
                Ok(()) => {
                    self.classifier.clear();
                    self.set_state(ConnectionState::Connected);
                    info!("Connected to {}", device);
                    notify(&self.cancel, &self.event_tx, MonitorEvent::Connected).await;

                    match self.read_loop().await {
                        Ok(()) => break,
                        Err(e) => {
                            let reason = e.to_string();
                            error!("Lost {}: {}", device, reason);
                            let event = MonitorEvent::Disconnected {
                                reason: reason.clone(),
                            };
                            notify(&self.cancel, &self.event_tx, event).await;
                            self.link.close().await;
                            self.set_state(ConnectionState::Error(reason));
                        }
                    }
                }
                Err(e) => {
                    let message = e.user_message();
                    error!("Failed to open {}: {}", device, e);
                    let event = MonitorEvent::Error {
                        message: message.clone(),
                    };
                    notify(&self.cancel, &self.event_tx, event).await;
                    self.set_state(ConnectionState::Error(message));
                }
            }

            if !pause(&self.cancel, self.config.retry_delay).await {
                break;
            }
            debug!("Retrying {}", device);
        }

        self.link.close().await;
        self.set_state(ConnectionState::Stopped);
        info!("Monitor stopped");
    }

    /// Read until a link error (`Err`) or a stop request (`Ok`).
    async fn read_loop(&mut self) -> Result<()> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(());
            }

            let bytes = self.link.read_available().await?;
            if bytes.is_empty() {
                if !pause(&self.cancel, self.config.poll_interval).await {
                    return Ok(());
                }
                continue;
            }

            for event in self.classifier.feed(&bytes) {
                self.handle_event(event).await;
            }
        }
    }

    async fn handle_event(&mut self, event: ShoeEvent) {
        match &event {
            ShoeEvent::CardRead { rank, suit } => {
                let card = CanonicalCard::new(*rank, *suit);
                info!("Card read: {}", card);
                let timestamp = timestamp_now();
                if !self
                    .dispatcher
                    .send(&self.config.server, card, &timestamp)
                    .await
                {
                    debug!("Card {} kept locally only", card);
                }
            }
            ShoeEvent::ReadFailed { reason } => warn!("Card read failed: {}", reason),
            ShoeEvent::Alarm { message } => error!("Alarm: {}", message),
            ShoeEvent::Warning { code } => warn!("Warning: {}", code),
        }

        notify(&self.cancel, &self.event_tx, MonitorEvent::from_shoe_event(&event)).await;
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }
}

/// Sleep unless stopped. Returns `false` if the stop arrived first.
async fn pause(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Deliver a notification, giving up if a stop arrives while the channel
/// is full.
async fn notify(
    cancel: &CancellationToken,
    event_tx: &mpsc::Sender<MonitorEvent>,
    event: MonitorEvent,
) {
    tokio::select! {
        biased;
        sent = event_tx.send(event) => {
            // A dropped observer is not an error for the monitor.
            if sent.is_err() {
                debug!("Notification dropped, no observer");
            }
        }
        _ = cancel.cancelled() => debug!("Notification dropped, monitor stopping"),
    }
}
