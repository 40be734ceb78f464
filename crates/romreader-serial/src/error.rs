//! Error types for ROM transfers

use thiserror::Error;

/// Errors that abort a transfer
#[derive(Debug, Error)]
pub enum TransferError {
    /// The serial port could not be opened
    #[error("Failed to open serial port {device}: {source}")]
    LinkOpen {
        /// Port name as given by the caller
        device: String,
        /// Underlying serial port error
        #[source]
        source: serialport::Error,
    },

    /// The read timed out before the device sent anything
    #[error("No data received from ROM reader within {timeout_ms} ms")]
    NoData { timeout_ms: u64 },

    /// The read timed out after some data but before the end-of-file record
    #[error("Transfer stopped after {received} bytes without an end-of-file record")]
    Truncated { received: usize },

    /// I/O error while talking to the device
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port error outside of opening a link
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// Result type for transfer operations
pub type Result<T> = core::result::Result<T, TransferError>;
