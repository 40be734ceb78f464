//! Image comparison
//!
//! Two images may have different lengths (a chip read may stop early, or a
//! file may omit trailing blank space). Past the end of the shorter image,
//! its bytes are taken to be [`FILL_BYTE`], so a trailing run of erased
//! cells does not count as a difference.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::image::FILL_BYTE;

/// A differing byte, with both values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Offset into the images
    pub offset: usize,
    /// Byte from the reference image
    pub expected: u8,
    /// Byte from the image under test
    pub actual: u8,
}

fn byte_at(data: &[u8], offset: usize) -> u8 {
    data.get(offset).copied().unwrap_or(FILL_BYTE)
}

fn differing<'a>(a: &'a [u8], b: &'a [u8]) -> impl Iterator<Item = (usize, u8, u8)> + 'a {
    (0..a.len().max(b.len()))
        .map(move |i| (i, byte_at(a, i), byte_at(b, i)))
        .filter(|(_, x, y)| x != y)
}

/// Offsets at which `a` and `b` differ, in ascending order
pub fn compare(a: &[u8], b: &[u8]) -> Vec<usize> {
    differing(a, b).map(|(offset, _, _)| offset).collect()
}

/// Like [`compare`], but keeping the differing values
pub fn mismatches(expected: &[u8], actual: &[u8]) -> Vec<Mismatch> {
    differing(expected, actual)
        .map(|(offset, expected, actual)| Mismatch {
            offset,
            expected,
            actual,
        })
        .collect()
}

/// Format up to `limit` offsets as a comma-separated list
///
/// A trailing `...` marks that more offsets were left out.
pub fn summarize(differences: &[usize], limit: usize) -> String {
    let mut out = String::new();
    for (i, offset) in differences.iter().take(limit).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "0x{:04X}", offset);
    }
    if differences.len() > limit {
        out.push_str(", ...");
    }
    out
}
