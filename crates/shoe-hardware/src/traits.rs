//! Link trait definition.
//!
//! The shoe is a read-only device: the monitor opens the link, drains
//! whatever bytes are waiting, and closes it on failure or shutdown.
//!
//! The trait uses native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT). It is not object-safe; use the [`AnyShoeLink`](crate::AnyShoeLink)
//! enum where a concrete type is needed.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use shoe_core::SerialConfig;

/// Byte source for the shoe's text stream.
///
/// # Examples
///
/// ```no_run
/// use shoe_hardware::traits::ShoeLink;
/// use shoe_hardware::Result;
/// use shoe_core::SerialConfig;
///
/// async fn drain<L: ShoeLink>(link: &mut L) -> Result<Vec<u8>> {
///     link.open(&SerialConfig::default()).await?;
///     let bytes = link.read_available().await?;
///     link.close().await;
///     Ok(bytes)
/// }
/// ```
pub trait ShoeLink {
    /// Open the device described by `config`.
    ///
    /// Opening an already open link reopens it.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `DeviceNotFound` or `OpenFailed`.
    async fn open(&mut self, config: &SerialConfig) -> Result<()>;

    /// Read every byte currently waiting, without blocking for more.
    ///
    /// Returns an empty vector when nothing is waiting.
    ///
    /// # Errors
    ///
    /// Returns `Disconnected` if the link is not open and `ReadFailed`
    /// when the driver reports an error.
    async fn read_available(&mut self) -> Result<Vec<u8>>;

    /// Release the device. Closing a closed link is a no-op.
    async fn close(&mut self);

    /// Check if the link is open.
    fn is_open(&self) -> bool;
}
