//! Intel HEX codec
//!
//! ROM readers send their contents as Intel HEX records, and romreader
//! stores images in the same format. Only three record types matter here:
//!
//! | Type | Meaning                  | Decode behaviour                      |
//! |------|--------------------------|---------------------------------------|
//! | 0x00 | Data                     | Copy payload into the image           |
//! | 0x01 | End of file              | Stop decoding                         |
//! | 0x04 | Extended linear address  | Replace the upper 16 address bits     |
//!
//! Any other record type is skipped. Checksums are generated on encode but
//! not checked on decode.
//!
//! Decoding is line-tolerant: a malformed line is reported as a
//! [`LineFormatError`] and skipped, and the rest of the transcript is still
//! decoded.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::error::{LineErrorKind, LineFormatError};
use crate::image::MemoryImage;

/// The end-of-file record that terminates every transcript
pub const EOF_RECORD: &str = ":00000001FF";

/// Payload bytes per data record produced by [`encode`]
pub const BYTES_PER_RECORD: usize = 16;

/// Characters in `:LLAAAATT`
const HEADER_LEN: usize = 9;

/// Largest image addressable without extended address records
const MAX_16BIT_IMAGE: usize = 0x1_0000;

/// Record type field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// Data record (0x00)
    Data,
    /// End of file record (0x01)
    EndOfFile,
    /// Extended linear address record (0x04)
    ExtendedLinearAddress,
    /// Any type this codec does not interpret
    Other(u8),
}

impl RecordType {
    /// The type byte as it appears on the wire
    pub fn code(self) -> u8 {
        match self {
            Self::Data => 0x00,
            Self::EndOfFile => 0x01,
            Self::ExtendedLinearAddress => 0x04,
            Self::Other(code) => code,
        }
    }
}

impl From<u8> for RecordType {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Self::Data,
            0x01 => Self::EndOfFile,
            0x04 => Self::ExtendedLinearAddress,
            other => Self::Other(other),
        }
    }
}

/// A single parsed record line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    /// Payload length
    pub byte_count: u8,
    /// 16-bit address field (offset from the current base)
    pub address: u16,
    /// Record type
    pub record_type: RecordType,
    /// Payload bytes, `byte_count` long
    pub payload: Vec<u8>,
}

impl HexRecord {
    /// Build a data record
    ///
    /// `payload` must not exceed 255 bytes.
    pub fn data(address: u16, payload: &[u8]) -> Self {
        Self {
            byte_count: payload.len() as u8,
            address,
            record_type: RecordType::Data,
            payload: payload.to_vec(),
        }
    }

    /// Build the end-of-file record
    pub fn end_of_file() -> Self {
        Self {
            byte_count: 0,
            address: 0,
            record_type: RecordType::EndOfFile,
            payload: Vec::new(),
        }
    }

    /// Two's complement of the low byte of the sum of all record bytes
    pub fn checksum(&self) -> u8 {
        let [addr_hi, addr_lo] = self.address.to_be_bytes();
        let sum = self
            .payload
            .iter()
            .fold(
                self.byte_count
                    .wrapping_add(addr_hi)
                    .wrapping_add(addr_lo)
                    .wrapping_add(self.record_type.code()),
                |acc, &b| acc.wrapping_add(b),
            );
        0u8.wrapping_sub(sum)
    }

    /// Render the record as a line of text, without a line terminator
    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(HEADER_LEN + 2 * self.payload.len() + 2);
        // Writing into a String cannot fail
        let _ = write!(
            line,
            ":{:02X}{:04X}{:02X}",
            self.byte_count,
            self.address,
            self.record_type.code()
        );
        for byte in &self.payload {
            let _ = write!(line, "{:02X}", byte);
        }
        let _ = write!(line, "{:02X}", self.checksum());
        line
    }

    /// Base address carried by an extended linear address record
    fn base_address(&self) -> Result<usize, LineFormatError> {
        match self.payload.as_slice() {
            [hi, lo, ..] => Ok((u16::from_be_bytes([*hi, *lo]) as usize) << 16),
            _ => Err(LineFormatError::new(LineErrorKind::MissingBaseAddress)),
        }
    }
}

/// Result of decoding a transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Image built from every well-formed data record
    pub image: MemoryImage,
    /// Lines that were skipped, in transcript order
    pub diagnostics: Vec<LineFormatError>,
    /// Whether an end-of-file record was reached
    pub end_of_file: bool,
}

/// Parse one record line
///
/// Surrounding whitespace (including a `\r` left by CRLF line endings) is
/// ignored. The trailing checksum digits are neither required nor checked.
pub fn parse_line(line: &str) -> Result<HexRecord, LineFormatError> {
    let bytes = line.trim().as_bytes();

    if bytes.first() != Some(&b':') {
        return Err(LineFormatError::new(LineErrorKind::MissingStartCode));
    }
    check_len(bytes, HEADER_LEN)?;

    let byte_count = hex_byte(bytes, 1)?;
    let address = u16::from_be_bytes([hex_byte(bytes, 3)?, hex_byte(bytes, 5)?]);
    let record_type = RecordType::from(hex_byte(bytes, 7)?);

    check_len(bytes, HEADER_LEN + 2 * byte_count as usize)?;
    let payload = (0..byte_count as usize)
        .map(|i| hex_byte(bytes, HEADER_LEN + 2 * i))
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(HexRecord {
        byte_count,
        address,
        record_type,
        payload,
    })
}

/// Decode a transcript, keeping a diagnostic for every skipped line
pub fn decode_with_diagnostics(text: &str) -> Decoded {
    let mut decoded = Decoded::default();
    let mut base_address = 0usize;

    for (index, line) in text.split('\n').enumerate() {
        let line = line.trim();
        if line.is_empty() || !line.starts_with(':') {
            continue;
        }

        let line_no = index + 1;
        let record = match parse_line(line) {
            Ok(record) => record,
            Err(e) => {
                decoded.diagnostics.push(e.at_line(line_no));
                continue;
            }
        };

        match record.record_type {
            RecordType::Data => {
                let full_address = base_address + record.address as usize;
                decoded.image.write_at(full_address, &record.payload);
            }
            RecordType::EndOfFile => {
                decoded.end_of_file = true;
                break;
            }
            RecordType::ExtendedLinearAddress => match record.base_address() {
                Ok(base) => {
                    log::trace!("line {}: base address 0x{:08X}", line_no, base);
                    base_address = base;
                }
                Err(e) => decoded.diagnostics.push(e.at_line(line_no)),
            },
            RecordType::Other(code) => {
                log::trace!("line {}: ignoring record type 0x{:02X}", line_no, code);
            }
        }
    }

    decoded
}

/// Decode a transcript into a memory image
///
/// Malformed lines are logged as warnings and skipped. An empty transcript
/// yields an empty image.
pub fn decode(text: &str) -> MemoryImage {
    let decoded = decode_with_diagnostics(text);
    for diagnostic in &decoded.diagnostics {
        log::warn!("Skipping hex record: {}", diagnostic);
    }
    decoded.image
}

/// Encode an image as data records followed by the end-of-file record
///
/// Records carry [`BYTES_PER_RECORD`] bytes each, starting at address 0.
/// No extended address records are written, so the address field of an
/// image larger than 64 KiB wraps around.
pub fn encode(image: &[u8]) -> String {
    if image.len() > MAX_16BIT_IMAGE {
        log::warn!(
            "Image is {} bytes; addresses above 0x{:X} wrap in the 16-bit address field",
            image.len(),
            MAX_16BIT_IMAGE - 1
        );
    }

    let lines = image.len().div_ceil(BYTES_PER_RECORD) + 1;
    let mut text = String::with_capacity(lines * (HEADER_LEN + 2 * BYTES_PER_RECORD + 3));

    for (index, chunk) in image.chunks(BYTES_PER_RECORD).enumerate() {
        let address = (index * BYTES_PER_RECORD) as u16;
        text.push_str(&HexRecord::data(address, chunk).to_line());
        text.push('\n');
    }
    text.push_str(&HexRecord::end_of_file().to_line());
    text.push('\n');

    text
}

fn check_len(bytes: &[u8], expected: usize) -> Result<(), LineFormatError> {
    if bytes.len() < expected {
        return Err(LineFormatError::new(LineErrorKind::TooShort {
            expected,
            found: bytes.len(),
        }));
    }
    Ok(())
}

fn hex_byte(bytes: &[u8], column: usize) -> Result<u8, LineFormatError> {
    Ok((nibble(bytes, column)? << 4) | nibble(bytes, column + 1)?)
}

fn nibble(bytes: &[u8], column: usize) -> Result<u8, LineFormatError> {
    char::from(bytes[column])
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(LineFormatError::new(LineErrorKind::InvalidHexDigit { column }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_encode_full_record() {
        let data: Vec<u8> = (0x00..=0x0F).collect();
        let text = encode(&data);
        assert_eq!(
            text,
            ":10000000000102030405060708090A0B0C0D0E0F78\n:00000001FF\n"
        );
    }

    #[test]
    fn test_encode_short_final_record() {
        let data = vec![0xAAu8; 18];
        let text = encode(&data);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(":10000000"));
        assert_eq!(lines[1], ":02001000AAAA9A");
        assert_eq!(lines[2], EOF_RECORD);
    }

    #[test]
    fn test_encode_empty_image() {
        assert_eq!(encode(&[]), ":00000001FF\n");
    }

    #[test]
    fn test_eof_record_checksum() {
        assert_eq!(HexRecord::end_of_file().to_line(), EOF_RECORD);
    }

    #[test]
    fn test_round_trip() {
        let data: Vec<u8> = (0..100u32).map(|i| (i * 37 % 256) as u8).collect();
        let image = decode(&encode(&data));
        assert_eq!(image.as_bytes(), data.as_slice());
    }

    #[test]
    fn test_decode_empty() {
        let decoded = decode_with_diagnostics("");
        assert!(decoded.image.is_empty());
        assert!(decoded.diagnostics.is_empty());
        assert!(!decoded.end_of_file);
    }

    #[test]
    fn test_decode_extended_linear_address() {
        let text = ":020000040001F9\n:0100100042AD\n:00000001FF\n";
        let image = decode(text);
        assert_eq!(image.len(), 0x10011);
        assert_eq!(image[0x10010], 0x42);
        assert_eq!(image[0], 0xFF);
    }

    #[test]
    fn test_extended_address_replaces_base() {
        let text = ":020000040001F9\n:020000040002F8\n:0100000055AA\n";
        let image = decode(text);
        assert_eq!(image.len(), 0x20001);
        assert_eq!(image[0x20000], 0x55);
    }

    #[test]
    fn test_extended_address_without_payload() {
        let decoded = decode_with_diagnostics(":00000004FC\n:0100000055AA\n");
        assert_eq!(decoded.image.as_bytes(), &[0x55]);
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].line, 1);
        assert_eq!(decoded.diagnostics[0].kind, LineErrorKind::MissingBaseAddress);
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let text = ":0100000011EE\n:01000100ZZ00\n:0100020033CA\n";
        let decoded = decode_with_diagnostics(text);
        assert_eq!(decoded.image.as_bytes(), &[0x11, 0xFF, 0x33]);
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].line, 2);
        assert_eq!(
            decoded.diagnostics[0].kind,
            LineErrorKind::InvalidHexDigit { column: 9 }
        );
    }

    #[test]
    fn test_truncated_line_is_skipped() {
        let text = ":0400000001\n:0100000011EE\n";
        let decoded = decode_with_diagnostics(text);
        assert_eq!(decoded.image.as_bytes(), &[0x11]);
        assert_eq!(
            decoded.diagnostics[0].kind,
            LineErrorKind::TooShort {
                expected: 17,
                found: 11
            }
        );
    }

    #[test]
    fn test_eof_stops_decoding() {
        let text = ":0100000011EE\n:00000001FF\n:0100050022D8\n";
        let decoded = decode_with_diagnostics(text);
        assert!(decoded.end_of_file);
        assert_eq!(decoded.image.as_bytes(), &[0x11]);
    }

    #[test]
    fn test_unknown_record_type_ignored() {
        let text = ":020000021000EC\n:0100000011EE\n";
        let decoded = decode_with_diagnostics(text);
        assert!(decoded.diagnostics.is_empty());
        assert_eq!(decoded.image.as_bytes(), &[0x11]);
    }

    #[test]
    fn test_crlf_and_noise_lines() {
        let text = "READY\r\n\r\n:020000000102FB\r\n:00000001FF\r\n";
        let decoded = decode_with_diagnostics(text);
        assert!(decoded.diagnostics.is_empty());
        assert_eq!(decoded.image.as_bytes(), &[0x01, 0x02]);
    }

    #[test]
    fn test_overlapping_records_keep_length() {
        let text = ":0400000011223344AA\n:0100010099FF\n";
        let image = decode(text);
        assert_eq!(image.as_bytes(), &[0x11, 0x99, 0x33, 0x44]);
    }

    #[test]
    fn test_parse_line_fields() {
        let record = parse_line(":02ABCD00BEEF00").unwrap();
        assert_eq!(record.byte_count, 2);
        assert_eq!(record.address, 0xABCD);
        assert_eq!(record.record_type, RecordType::Data);
        assert_eq!(record.payload, vec![0xBE, 0xEF]);
    }

    #[test]
    fn test_parse_line_rejects_sign() {
        let err = parse_line(":+1000000").unwrap_err();
        assert_eq!(err.kind, LineErrorKind::InvalidHexDigit { column: 1 });
    }
}
