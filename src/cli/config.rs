//! TOML configuration file support.
//!
//! Settings that rarely change between runs can live in a config file
//! instead of on the command line:
//!
//! ```toml
//! # iqtar.toml
//! [writer]
//! preview = true
//! temp_dir = "/scratch"
//! copy_buffer_size = 8192000
//! pvt_length = 512
//!
//! [reader]
//! copy_buffer_size = 1024000
//! ```

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use iqtar::reader::ReaderConfig;
use iqtar::writer::WriterConfig;

/// Name of the config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "iqtar.toml";

/// Root configuration structure for iqtar.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Settings used when writing containers.
    #[serde(default)]
    pub writer: WriterSection,

    /// Settings used when reading containers.
    #[serde(default)]
    pub reader: ReaderSection,
}

/// Configuration for commands that write.
#[derive(Debug, Default, Deserialize)]
pub struct WriterSection {
    /// Store preview data and the stylesheet.
    pub preview: Option<bool>,

    /// Directory of the staging file.
    pub temp_dir: Option<PathBuf>,

    /// Largest window mapped while copying staged samples.
    pub copy_buffer_size: Option<usize>,

    /// Points of the power-vs-time preview.
    pub pvt_length: Option<usize>,

    /// Spectrum preview FFT length is `2^spectrum_order`.
    pub spectrum_order: Option<u32>,

    /// Histogram bins per half axis.
    pub iq_half_bins: Option<usize>,
}

/// Configuration for commands that read.
#[derive(Debug, Default, Deserialize)]
pub struct ReaderSection {
    /// Largest window mapped while scanning the archive.
    pub copy_buffer_size: Option<usize>,
}

impl Config {
    /// Load `explicit`, or `iqtar.toml` from the working directory if it
    /// exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        debug!("using config file {}", path.display());

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Writer configuration with the file's overrides applied.
    pub fn writer_config(&self) -> WriterConfig {
        let mut config = WriterConfig::default();
        let section = &self.writer;
        if let Some(preview) = section.preview {
            config.preview = preview;
        }
        if let Some(dir) = &section.temp_dir {
            config.temp_dir = Some(dir.clone());
        }
        if let Some(size) = section.copy_buffer_size {
            config.copy_buffer_size = size;
        }
        if let Some(length) = section.pvt_length {
            config.preview_config.pvt_length = length;
        }
        if let Some(order) = section.spectrum_order {
            config.preview_config.spectrum_order = order;
        }
        if let Some(bins) = section.iq_half_bins {
            config.preview_config.iq_half_bins = bins;
        }
        config
    }

    /// Reader configuration with the file's overrides applied.
    pub fn reader_config(&self) -> ReaderConfig {
        match self.reader.copy_buffer_size {
            Some(size) => ReaderConfig::default().with_copy_buffer_size(size),
            None => ReaderConfig::default(),
        }
    }
}
