//! romreader - Read and verify ROM chips through a serial ROM reader
//!
//! The reader hardware answers a `READ` command with the chip contents as
//! an Intel HEX transcript. This tool captures that transcript, saves it
//! as a HEX file, and can later check a chip against such a file.
//!
//! # Architecture
//!
//! - `romreader-serial` runs the blocking transfer over the serial port
//! - `romreader-core` decodes and encodes HEX text and compares images
//!
//! This binary only wires the two together and reports results.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Verbosity picks the default level; RUST_LOG still takes precedence
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Read { link, output, dump } => commands::read::run_read(&link, &output, dump),
        Commands::Verify { link, input, dump } => {
            commands::verify::run_verify(&link, &input, dump)
        }
        Commands::Diff {
            reference,
            other,
            limit,
        } => commands::verify::run_diff(&reference, &other, limit),
        Commands::Dump { input } => commands::dump::run_dump(&input),
        Commands::ListPorts => commands::list_ports(),
    }
}
