//! CLI command implementations
//!
//! Commands that talk to the reader go through [`read_chip`], which runs one
//! transfer session and decodes it. Commands that work on saved images load
//! them with [`load_image`].

pub mod dump;
pub mod read;
pub mod verify;

use indicatif::{ProgressBar, ProgressStyle};
use romreader_core::{hex, MemoryImage};
use romreader_serial::read_rom_with_progress;
use std::path::Path;
use std::time::Duration;

use crate::cli::LinkArgs;

/// Create the spinner shown while a transfer is running
fn create_transfer_spinner() -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bytes} received ({bytes_per_sec}) {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Warnings to show the user about a decoded transcript or file
fn decode_warnings(decoded: &hex::Decoded, source: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    if !decoded.diagnostics.is_empty() {
        warnings.push(format!(
            "{} malformed record(s) skipped in {}",
            decoded.diagnostics.len(),
            source
        ));
    }
    if !decoded.end_of_file && !decoded.image.is_empty() {
        warnings.push(format!(
            "no end-of-file record in {}, image may be incomplete",
            source
        ));
    }
    warnings
}

/// Decode HEX text, logging every skipped line
fn decode_logged(text: &str, source: &str) -> MemoryImage {
    let decoded = hex::decode_with_diagnostics(text);
    for diagnostic in &decoded.diagnostics {
        log::warn!("{}: skipping hex record at {}", source, diagnostic);
    }
    for warning in decode_warnings(&decoded, source) {
        println!("Warning: {}", warning);
    }
    decoded.image
}

/// Read the chip through the reader on the configured port
pub fn read_chip(link: &LinkArgs) -> Result<MemoryImage, Box<dyn std::error::Error>> {
    let settings = link.settings();
    let pb = create_transfer_spinner()?;
    pb.set_message(format!("Reading from {}", link.port));

    let transcript = match read_rom_with_progress(&link.port, &settings, &mut |n: usize| {
        pb.set_position(n as u64)
    }) {
        Ok(transcript) => transcript,
        Err(e) => {
            pb.abandon_with_message("Transfer failed");
            return Err(e.into());
        }
    };

    let transcript = if transcript.is_complete() {
        pb.finish_with_message("Transfer complete");
        transcript
    } else if link.strict {
        pb.abandon_with_message("Transfer incomplete");
        transcript.into_complete()?
    } else {
        pb.finish_with_message("Transfer timed out");
        println!(
            "Warning: no end-of-file record after {} bytes, image may be truncated",
            transcript.bytes_received()
        );
        transcript
    };

    let image = decode_logged(transcript.text(), &link.port);
    println!("Read {} bytes from {}", image.len(), link.port);
    Ok(image)
}

/// Load and decode an Intel HEX file
pub fn load_image(path: &Path) -> Result<MemoryImage, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let image = decode_logged(&text, &path.display().to_string());
    println!("Loaded {} bytes from {:?}", image.len(), path);
    Ok(image)
}

/// List serial ports the reader might be attached to
pub fn list_ports() -> Result<(), Box<dyn std::error::Error>> {
    let ports = romreader_serial::list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    println!("Found {} serial port(s):", ports.len());
    println!();
    for port in &ports {
        println!("  {} - {}", port.name, port.description);
    }
    Ok(())
}
