//! Mock shoe link for testing and development.
//!
//! The mock and its handle share one script of open results and reads, so
//! a test can queue a stream before the monitor starts and inspect how the
//! link was used afterwards.

use crate::error::{LinkError, Result};
use crate::traits::ShoeLink;
use shoe_core::SerialConfig;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One scripted outcome of `read_available`.
#[derive(Debug)]
enum ScriptedRead {
    Data(Vec<u8>),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    open_failures: VecDeque<LinkError>,
    reads: VecDeque<ScriptedRead>,
    open: bool,
    device: String,
    open_attempts: usize,
    close_count: usize,
}

/// Mock link driven by a [`MockLinkHandle`].
///
/// Every open succeeds unless a failure was queued; reads return queued
/// chunks in order, then nothing.
///
/// # Examples
///
/// ```
/// use shoe_core::SerialConfig;
/// use shoe_hardware::mock::MockLink;
/// use shoe_hardware::traits::ShoeLink;
///
/// #[tokio::main]
/// async fn main() -> shoe_hardware::Result<()> {
///     let (mut link, handle) = MockLink::new();
///     handle.push_bytes(" [Game]<Card:4S> ");
///
///     link.open(&SerialConfig::default()).await?;
///     let bytes = link.read_available().await?;
///     assert_eq!(bytes, b" [Game]<Card:4S> ");
///     assert!(link.read_available().await?.is_empty());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLink {
    state: Arc<Mutex<MockState>>,
}

/// Handle for scripting and inspecting a [`MockLink`].
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    state: Arc<Mutex<MockState>>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockLink {
    /// Create a mock link and its controlling handle.
    pub fn new() -> (Self, MockLinkHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockLinkHandle { state },
        )
    }
}

impl ShoeLink for MockLink {
    async fn open(&mut self, config: &SerialConfig) -> Result<()> {
        let mut state = lock(&self.state);
        state.open_attempts += 1;
        state.device = config.device.clone();

        if let Some(error) = state.open_failures.pop_front() {
            state.open = false;
            return Err(error);
        }
        state.open = true;
        Ok(())
    }

    async fn read_available(&mut self) -> Result<Vec<u8>> {
        let mut state = lock(&self.state);
        if !state.open {
            return Err(LinkError::disconnected(state.device.clone()));
        }

        match state.reads.pop_front() {
            Some(ScriptedRead::Data(bytes)) => Ok(bytes),
            Some(ScriptedRead::Fail(message)) => Err(LinkError::read_failed(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn close(&mut self) {
        let mut state = lock(&self.state);
        if state.open {
            state.open = false;
            state.close_count += 1;
        }
    }

    fn is_open(&self) -> bool {
        lock(&self.state).open
    }
}

impl MockLinkHandle {
    /// Make the next open attempt fail with `error`.
    pub fn fail_next_open(&self, error: LinkError) {
        lock(&self.state).open_failures.push_back(error);
    }

    /// Queue a chunk to be returned by one read.
    pub fn push_bytes(&self, bytes: impl Into<Vec<u8>>) {
        lock(&self.state)
            .reads
            .push_back(ScriptedRead::Data(bytes.into()));
    }

    /// Queue a read error after the chunks already queued.
    pub fn fail_next_read(&self, message: impl Into<String>) {
        lock(&self.state)
            .reads
            .push_back(ScriptedRead::Fail(message.into()));
    }

    /// Number of open attempts so far, failed or not.
    pub fn open_attempts(&self) -> usize {
        lock(&self.state).open_attempts
    }

    /// Number of times an open link was closed.
    pub fn close_count(&self) -> usize {
        lock(&self.state).close_count
    }

    /// Check if the link is currently open.
    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Number of scripted reads not yet consumed.
    pub fn pending_reads(&self) -> usize {
        lock(&self.state).reads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_open_failure() {
        let (mut link, handle) = MockLink::new();
        handle.fail_next_open(LinkError::device_not_found("/dev/ttyUSB0"));

        let config = SerialConfig::default();
        assert!(link.open(&config).await.is_err());
        assert!(!link.is_open());

        link.open(&config).await.unwrap();
        assert!(link.is_open());
        assert_eq!(handle.open_attempts(), 2);
    }

    #[tokio::test]
    async fn test_reads_in_order() {
        let (mut link, handle) = MockLink::new();
        handle.push_bytes("ab");
        handle.fail_next_read("unplugged");
        handle.push_bytes("cd");

        link.open(&SerialConfig::default()).await.unwrap();
        assert_eq!(link.read_available().await.unwrap(), b"ab");
        assert!(matches!(
            link.read_available().await,
            Err(LinkError::ReadFailed { .. })
        ));
        assert_eq!(link.read_available().await.unwrap(), b"cd");
        assert!(link.read_available().await.unwrap().is_empty());
        assert_eq!(handle.pending_reads(), 0);
    }

    #[tokio::test]
    async fn test_read_requires_open() {
        let (mut link, handle) = MockLink::new();
        handle.push_bytes("ab");

        assert!(matches!(
            link.read_available().await,
            Err(LinkError::Disconnected { .. })
        ));
        assert_eq!(handle.pending_reads(), 1);
    }

    #[tokio::test]
    async fn test_close_counts_once() {
        let (mut link, handle) = MockLink::new();
        link.open(&SerialConfig::default()).await.unwrap();

        link.close().await;
        link.close().await;
        assert_eq!(handle.close_count(), 1);
        assert!(!handle.is_open());
    }
}
