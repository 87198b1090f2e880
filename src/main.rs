//! # iqtar
//!
//! A command-line tool for inspecting and creating iq-tar I/Q containers.
//!
//! ## Usage
//!
//! ```bash
//! # Show channels, metadata and archive entries
//! iqtar info capture.iq.tar
//! iqtar info capture.iq.tar --json
//!
//! # Export one array, one channel, or everything to CSV
//! iqtar export capture.iq.tar --array Channel1_I -n 1000 -o ch1_i.csv
//! iqtar export capture.iq.tar --channel Channel2 --offset 500
//!
//! # Generate a synthetic multi-tone container
//! iqtar demo demo.iq.tar --channels 2 --samples 1000000
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
