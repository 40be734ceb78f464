//! Transcript transfer from a ROM reader
//!
//! A session sends [`READ_COMMAND`] once and then reads until the device
//! has sent the end-of-file record. The device does not announce the
//! transcript length, so the only other way a session ends is a read that
//! times out:
//!
//! - timeout before any data: [`TransferError::NoData`]
//! - timeout after some data: the transcript is returned, marked
//!   [`Termination::TimedOut`], and the caller decides whether a partial
//!   image is acceptable (see [`Transcript::into_complete`])

use crate::error::{Result, TransferError};
use crate::settings::LinkSettings;
use crate::transport::Link;
use romreader_core::hex::EOF_RECORD;

/// Command that makes the reader dump the ROM
pub const READ_COMMAND: &[u8] = b"READ\n";

/// Why a transfer session stopped reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The end-of-file record was received
    EofRecord,
    /// A read timed out before the end-of-file record arrived
    TimedOut,
}

/// Raw text received during one transfer session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    termination: Termination,
    bytes_received: usize,
}

impl Transcript {
    /// Transcript text, ready for `romreader_core::hex::decode`
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the transcript, returning its text
    pub fn into_text(self) -> String {
        self.text
    }

    /// How the session ended
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Whether the end-of-file record was received
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::EofRecord
    }

    /// Number of raw bytes received from the device
    pub fn bytes_received(&self) -> usize {
        self.bytes_received
    }

    /// Reject a transcript that never reached the end-of-file record
    pub fn into_complete(self) -> Result<Self> {
        match self.termination {
            Termination::EofRecord => Ok(self),
            Termination::TimedOut => Err(TransferError::Truncated {
                received: self.bytes_received,
            }),
        }
    }
}

/// Run one transfer session over an open link
pub fn read_transcript<L: Link + ?Sized>(
    link: &mut L,
    settings: &LinkSettings,
) -> Result<Transcript> {
    read_transcript_with_progress(link, settings, &mut |_: usize| {})
}

/// Run one transfer session, reporting the running byte count
///
/// `on_data` is called after every read that returned data, with the total
/// number of bytes received so far.
pub fn read_transcript_with_progress<L: Link + ?Sized>(
    link: &mut L,
    settings: &LinkSettings,
    on_data: &mut dyn FnMut(usize),
) -> Result<Transcript> {
    link.write_all(READ_COMMAND)?;
    log::debug!("Sent READ command");

    let sentinel = EOF_RECORD.as_bytes();
    let mut received: Vec<u8> = Vec::new();
    let mut chunk = vec![0u8; settings.chunk_size.max(1)];

    let termination = loop {
        let n = link.read_chunk(&mut chunk)?;
        if n == 0 {
            if received.is_empty() {
                return Err(TransferError::NoData {
                    timeout_ms: settings.timeout_ms(),
                });
            }
            log::warn!(
                "Read timed out after {} bytes without an end-of-file record, transcript may be truncated",
                received.len()
            );
            break Termination::TimedOut;
        }

        // The sentinel may straddle two chunks
        let search_from = received.len().saturating_sub(sentinel.len() - 1);
        received.extend_from_slice(&chunk[..n]);
        log::trace!("Received {} bytes ({} total)", n, received.len());
        on_data(received.len());

        if contains(&received[search_from..], sentinel) {
            log::debug!("End-of-file record received");
            break Termination::EofRecord;
        }
    };

    let bytes_received = received.len();
    let text = match String::from_utf8(received) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Transcript contains invalid UTF-8, replacing bad sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    Ok(Transcript {
        text,
        termination,
        bytes_received,
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockLink;
    use romreader_core::hex;

    const RECORD: &[u8] = b":0100000011EE\r\n";
    const EOF: &[u8] = b":00000001FF\r\n";

    #[test]
    fn test_sends_read_command_once() {
        let mut link = MockLink::new();
        link.queue(RECORD).queue(EOF);
        read_transcript(&mut link, &LinkSettings::default()).unwrap();
        assert_eq!(link.writes, vec![b"READ\n".to_vec()]);
    }

    #[test]
    fn test_complete_transfer() {
        let mut link = MockLink::new();
        link.queue(RECORD).queue(EOF);
        let transcript = read_transcript(&mut link, &LinkSettings::default()).unwrap();
        assert!(transcript.is_complete());
        assert_eq!(transcript.bytes_received(), RECORD.len() + EOF.len());
        assert_eq!(hex::decode(transcript.text()).as_bytes(), &[0x11]);
    }

    #[test]
    fn test_stops_at_eof_record() {
        let mut link = MockLink::new();
        link.queue(RECORD).queue(EOF).queue(b"trailing noise\r\n");
        let transcript = read_transcript(&mut link, &LinkSettings::default()).unwrap();
        assert_eq!(transcript.termination(), Termination::EofRecord);
        assert_eq!(link.pending(), 1);
    }

    #[test]
    fn test_eof_record_split_across_reads() {
        let mut link = MockLink::new();
        link.queue(RECORD).queue(b":000000").queue(b"01FF\r\n");
        let transcript = read_transcript(&mut link, &LinkSettings::default()).unwrap();
        assert!(transcript.is_complete());
        assert_eq!(link.reads, 3);
    }

    #[test]
    fn test_small_chunks() {
        let mut text = hex::encode(&[0x5Au8; 100]).into_bytes();
        text.extend_from_slice(b"ignored");
        let mut link = MockLink::new();
        link.queue(&text);

        let settings = LinkSettings {
            chunk_size: 7,
            ..LinkSettings::default()
        };
        let mut progress = Vec::new();
        let transcript =
            read_transcript_with_progress(&mut link, &settings, &mut |n: usize| progress.push(n))
                .unwrap();

        assert!(transcript.is_complete());
        assert_eq!(hex::decode(transcript.text()).as_bytes(), &[0x5Au8; 100]);
        assert!(progress.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(progress.last().copied(), Some(transcript.bytes_received()));
    }

    #[test]
    fn test_no_data() {
        let mut link = MockLink::new();
        let err = read_transcript(&mut link, &LinkSettings::default()).unwrap_err();
        assert!(matches!(err, TransferError::NoData { timeout_ms: 5000 }));
    }

    #[test]
    fn test_timeout_after_partial_data() {
        let mut link = MockLink::new();
        link.queue(RECORD);
        let transcript = read_transcript(&mut link, &LinkSettings::default()).unwrap();
        assert_eq!(transcript.termination(), Termination::TimedOut);
        assert_eq!(hex::decode(transcript.text()).as_bytes(), &[0x11]);

        let err = transcript.into_complete().unwrap_err();
        assert!(matches!(err, TransferError::Truncated { received } if received == RECORD.len()));
    }

    #[test]
    fn test_read_error_aborts() {
        let mut link = MockLink::new();
        link.queue(RECORD)
            .queue_error(std::io::ErrorKind::BrokenPipe);
        let err = read_transcript(&mut link, &LinkSettings::default()).unwrap_err();
        assert!(matches!(err, TransferError::Io(_)));
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let mut link = MockLink::new();
        let text = "café\n:00000001FF\n".as_bytes();
        link.queue(&text[..4]).queue(&text[4..]);
        let transcript = read_transcript(&mut link, &LinkSettings::default()).unwrap();
        assert!(transcript.text().starts_with("café"));
    }
}
