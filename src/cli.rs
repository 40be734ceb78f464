//! CLI argument parsing

use clap::{Parser, Subcommand};
use romreader_serial::settings::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
use romreader_serial::LinkSettings;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "romreader")]
#[command(author, version, about = "ROM chip reader and verifier", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Serial link options shared by commands that talk to the reader
#[derive(clap::Args, Debug, Clone)]
pub struct LinkArgs {
    /// Serial port the ROM reader is attached to (e.g. /dev/ttyACM0, COM3)
    #[arg(short, long)]
    pub port: String,

    /// Baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Per-read timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Fail if the reader stops sending before the end-of-file record
    #[arg(long)]
    pub strict: bool,
}

impl LinkArgs {
    /// Link settings for these options
    pub fn settings(&self) -> LinkSettings {
        LinkSettings::default()
            .with_baud_rate(self.baud)
            .with_read_timeout(Duration::from_millis(self.timeout_ms))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the ROM and save it as an Intel HEX file
    Read {
        #[command(flatten)]
        link: LinkArgs,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Print a hex dump of the image after saving
        #[arg(long)]
        dump: bool,
    },

    /// Read the ROM and compare it against an Intel HEX file
    Verify {
        #[command(flatten)]
        link: LinkArgs,

        /// Intel HEX file to verify against
        #[arg(short, long)]
        input: PathBuf,

        /// Print hex dumps of both images if they differ
        #[arg(long)]
        dump: bool,
    },

    /// Compare two Intel HEX files
    Diff {
        /// Reference image
        reference: PathBuf,

        /// Image to compare against the reference
        other: PathBuf,

        /// Maximum number of differing bytes to list
        #[arg(short = 'n', long, default_value_t = 32)]
        limit: usize,
    },

    /// Show the contents of an Intel HEX file as a hex dump
    Dump {
        /// Intel HEX file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List available serial ports
    ListPorts,
}
