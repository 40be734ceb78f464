//! Hex dump formatting for displaying images

use alloc::string::String;
use core::fmt::Write;

const BYTES_PER_ROW: usize = 16;

/// Render `data` as a classic hex dump
///
/// Each row shows the offset, sixteen bytes in hex (split into two groups
/// of eight) and their printable ASCII characters:
///
/// ```text
/// 00000000: 48 65 6C 6C 6F 00 FF FF  FF FF FF FF FF FF FF FF  |Hello...........|
/// ```
pub fn format_hex_dump(data: &[u8]) -> String {
    if data.is_empty() {
        return String::from("No data");
    }

    let mut out = String::with_capacity(data.len().div_ceil(BYTES_PER_ROW) * 78);
    for (row, chunk) in data.chunks(BYTES_PER_ROW).enumerate() {
        let _ = write!(out, "{:08X}: ", row * BYTES_PER_ROW);

        for col in 0..BYTES_PER_ROW {
            match chunk.get(col) {
                Some(byte) => {
                    let _ = write!(out, "{:02X} ", byte);
                }
                None => out.push_str("   "),
            }
            if col == 7 {
                out.push(' ');
            }
        }

        out.push_str(" |");
        for col in 0..BYTES_PER_ROW {
            out.push(match chunk.get(col) {
                Some(&b) if (32..=126).contains(&b) => b as char,
                Some(_) => '.',
                None => ' ',
            });
        }
        out.push_str("|\n");
    }

    out
}
