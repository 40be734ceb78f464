//! Link parameters

use serialport::{DataBits, Parity, StopBits};
use std::time::Duration;

/// Baud rate the ROM reader firmware runs at
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// How long a single read waits for data before giving up
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);

/// Receive buffer size for each read call
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Serial link configuration for a transfer session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits per character
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Stop bits
    pub stop_bits: StopBits,
    /// Blocking read timeout, per read call
    pub read_timeout: Duration,
    /// Maximum bytes requested per read call
    pub chunk_size: usize,
}

impl Default for LinkSettings {
    /// 115200-8-N-1, 5 s read timeout, 1 KiB chunks
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: DEFAULT_READ_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl LinkSettings {
    /// Use a different baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Use a different per-read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub(crate) fn timeout_ms(&self) -> u64 {
        self.read_timeout.as_millis() as u64
    }
}
