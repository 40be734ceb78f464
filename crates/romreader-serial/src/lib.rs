//! romreader-serial - ROM transfers over a serial link
//!
//! This crate drives a ROM reader attached to a serial port. The reader
//! answers a single `READ` command with the whole chip as an Intel HEX
//! transcript, which [`read_rom`] collects and returns for decoding with
//! `romreader_core::hex`.
//!
//! # Example
//!
//! ```no_run
//! use romreader_serial::{read_rom, LinkSettings};
//!
//! let transcript = read_rom("/dev/ttyACM0", &LinkSettings::default())?;
//! let image = romreader_core::hex::decode(transcript.text());
//! println!("Read {} bytes", image.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Transfers are blocking. A caller with a UI thread should run them on a
//! worker and hand the result back; at most one transfer may use a given
//! port at a time.

pub mod error;
pub mod settings;
pub mod transfer;
pub mod transport;

// Re-exports
pub use error::{Result, TransferError};
pub use settings::LinkSettings;
pub use transfer::{
    read_transcript, read_transcript_with_progress, Termination, Transcript, READ_COMMAND,
};
pub use transport::serial::{list_ports, PortInfo, SerialLink};
pub use transport::Link;

/// Read a ROM through the serial port at `device`
///
/// The port is opened with `settings`, and closed again when the session
/// ends, whether it succeeded or not.
pub fn read_rom(device: &str, settings: &LinkSettings) -> Result<Transcript> {
    read_rom_with_progress(device, settings, &mut |_: usize| {})
}

/// Like [`read_rom`], reporting the running byte count to `on_data`
pub fn read_rom_with_progress(
    device: &str,
    settings: &LinkSettings,
    on_data: &mut dyn FnMut(usize),
) -> Result<Transcript> {
    let mut link = SerialLink::open(device, settings)?;
    log::debug!("Starting transfer on {}", link.device());
    read_transcript_with_progress(&mut link, settings, on_data)
}
