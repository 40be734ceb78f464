//! Verify and diff command implementations

use romreader_core::dump::format_hex_dump;
use romreader_core::verify::{self, Mismatch};
use romreader_core::FILL_BYTE;
use std::path::Path;

use crate::cli::LinkArgs;

/// Offsets listed in a failed verification message
const SUMMARY_LIMIT: usize = 10;

/// Run the verify command
pub fn run_verify(
    link: &LinkArgs,
    input: &Path,
    show_dump: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load the file first so a bad path fails before touching the chip
    let expected = super::load_image(input)?;
    let actual = super::read_chip(link)?;

    if expected.len() != actual.len() {
        println!(
            "Note: file has {} bytes, chip returned {}; missing bytes compare as 0x{:02X}",
            expected.len(),
            actual.len(),
            FILL_BYTE
        );
    }

    let differences = verify::compare(&expected, &actual);
    if let Some(&first) = differences.first() {
        if show_dump {
            println!();
            println!("ROM data ({} bytes):", actual.len());
            print!("{}", format_hex_dump(&actual));
            println!();
            println!();
            println!("File data ({} bytes):", expected.len());
            print!("{}", format_hex_dump(&expected));
            println!();
        }

        let byte = |data: &[u8]| data.get(first).copied().unwrap_or(FILL_BYTE);
        return Err(format!(
            "Verification failed: {} byte(s) differ. First mismatch at 0x{:08X}: expected 0x{:02X}, got 0x{:02X} (offsets: {})",
            differences.len(),
            first,
            byte(expected.as_bytes()),
            byte(actual.as_bytes()),
            verify::summarize(&differences, SUMMARY_LIMIT)
        )
        .into());
    }

    println!(
        "Verification passed! ROM matches {:?} ({} bytes)",
        input,
        actual.len()
    );
    Ok(())
}

/// Run the diff command
pub fn run_diff(
    reference: &Path,
    other: &Path,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let expected = super::load_image(reference)?;
    let actual = super::load_image(other)?;

    let mismatches = verify::mismatches(&expected, &actual);
    if mismatches.is_empty() {
        println!("Images are identical");
        return Ok(());
    }

    print_mismatches(&mismatches, limit);
    Err(format!("{} byte(s) differ", mismatches.len()).into())
}

fn print_mismatches(mismatches: &[Mismatch], limit: usize) {
    println!("{:<12} {:>8} {:>8}", "Offset", "Expected", "Actual");
    println!("{}", "-".repeat(30));
    for m in mismatches.iter().take(limit) {
        println!(
            "0x{:08X}   {:>8} {:>8}",
            m.offset,
            format!("{:02X}", m.expected),
            format!("{:02X}", m.actual)
        );
    }
    if mismatches.len() > limit {
        println!("... {} more", mismatches.len() - limit);
    }
}
