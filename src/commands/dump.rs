//! Dump command implementation

use romreader_core::dump::format_hex_dump;
use std::path::Path;

/// Print a saved image as a hex dump
pub fn run_dump(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let image = super::load_image(input)?;

    match image.first_programmed() {
        Some(offset) => println!("First programmed byte at 0x{:08X}", offset),
        None if !image.is_empty() => println!("Image is blank (all bytes are 0xFF)"),
        None => {}
    }
    println!();
    print!("{}", format_hex_dump(&image));
    println!();

    Ok(())
}
