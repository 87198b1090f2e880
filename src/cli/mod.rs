use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod export;
mod info;

pub use config::Config;

/// iqtar - inspect and create iq-tar I/Q containers
#[derive(Parser)]
#[command(name = "iqtar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file (default: ./iqtar.toml if present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display channels, metadata and entries of a container
    Info {
        /// Input iq-tar file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Export sample values to CSV
    Export {
        /// Input iq-tar file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long, value_name = "CSV")]
        output: Option<PathBuf>,

        /// Export a single array, e.g. `Channel1_I`
        #[arg(short, long, conflicts_with = "channel")]
        array: Option<String>,

        /// Export the interleaved values of one channel
        #[arg(long)]
        channel: Option<String>,

        /// First sample to export
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Number of samples to export (all remaining when omitted)
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Read values in double precision
        #[arg(long)]
        f64: bool,
    },

    /// Write a synthetic multi-tone container
    Demo {
        /// Output iq-tar file path
        #[arg(value_name = "OUTPUT", default_value = "demo.iq.tar")]
        output: PathBuf,

        /// Number of channels
        #[arg(long, default_value_t = 2)]
        channels: usize,

        /// Samples per channel
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        samples: u64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 10e6)]
        clock: f64,

        /// Center frequency in Hz
        #[arg(long, default_value_t = 2.4e9)]
        frequency: f64,

        /// Number of tones per channel
        #[arg(long, default_value_t = 3)]
        tones: usize,

        /// Declare the size up front and write without a temp file
        #[arg(long)]
        direct: bool,

        /// Skip the preview section
        #[arg(long)]
        no_preview: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Info { file, json } => info::run(file, json, &config),
        Commands::Export {
            file,
            output,
            array,
            channel,
            offset,
            count,
            f64,
        } => export::run(
            export::ExportRequest {
                file,
                output,
                array,
                channel,
                offset,
                count,
                f64,
            },
            &config,
        ),
        Commands::Demo {
            output,
            channels,
            samples,
            clock,
            frequency,
            tones,
            direct,
            no_preview,
        } => demo::run(
            demo::DemoSignal {
                channels,
                samples,
                clock,
                frequency,
                tones,
            },
            output,
            direct,
            no_preview,
            &config,
        ),
    }
}
