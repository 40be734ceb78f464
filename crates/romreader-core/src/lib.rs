//! romreader-core - Image handling for ROM dumps
//!
//! This crate holds the parts of romreader that do not touch hardware:
//! the Intel HEX codec used for transcripts and saved files, the growable
//! memory image it decodes into, the comparator used by verification and
//! a hex-dump formatter for displaying images.
//!
//! Everything here is pure and allocation-only, so the crate is `no_std`
//! compatible (it still requires `alloc`).
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for the error types
//!
//! # Example
//!
//! ```
//! use romreader_core::{hex, verify};
//!
//! let text = hex::encode(&[0x01, 0x02, 0x03]);
//! let image = hex::decode(&text);
//! assert_eq!(image.as_bytes(), &[0x01, 0x02, 0x03]);
//! assert!(verify::compare(&image, &[0x01, 0x02, 0x03]).is_empty());
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod dump;
pub mod error;
pub mod hex;
pub mod image;
pub mod verify;

pub use error::{LineErrorKind, LineFormatError};
pub use image::{MemoryImage, FILL_BYTE};
