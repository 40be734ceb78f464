//! Read command implementation

use romreader_core::dump::format_hex_dump;
use romreader_core::hex;
use std::fs;
use std::path::Path;

use crate::cli::LinkArgs;

/// Run the read command
pub fn run_read(
    link: &LinkArgs,
    output: &Path,
    show_dump: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = super::read_chip(link)?;

    if image.is_empty() {
        log::warn!("No data records received, writing an empty image");
    } else if image.is_blank() {
        println!("Note: chip appears blank (all bytes are 0xFF)");
    }

    fs::write(output, hex::encode(&image))
        .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;
    println!("Wrote {} bytes to {:?}", image.len(), output);

    if show_dump {
        println!();
        print!("{}", format_hex_dump(&image));
        println!();
    }

    Ok(())
}
