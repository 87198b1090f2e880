//! # iq-tar Reader Module
//!
//! Opens a container, parses its metadata document and serves strided,
//! type-converted and scaled reads of single arrays or whole channels.
//!
//! ## Features
//!
//! - **Header-only scan**: entry bodies are skipped by seeking, so opening a
//!   multi-gigabyte container maps only the tar headers and the XML
//! - **Random access**: any slice of any array, read straight out of a
//!   memory-mapped window of exactly the bytes it spans
//! - **Type conversion**: `f32` and `f64` callers can read either stored type
//!
//! ## Example
//!
//! ```rust,no_run
//! use iqtar::reader::IqTarReader;
//!
//! let reader = IqTarReader::open("capture.iq.tar")?;
//! println!("arrays: {:?}", reader.array_names());
//!
//! // 100 in-phase values of the first channel, skipping 50 samples
//! let i: Vec<f32> = reader.read_array("Channel1_I", 100, 50)?;
//!
//! // the same samples as interleaved I/Q pairs
//! let iq: Vec<f64> = reader.read_channel("Channel1", 200, 50)?;
//! # Ok::<(), iqtar::reader::ReaderError>(())
//! ```

mod arrays;
mod config;
mod error;
mod open;

#[cfg(test)]
mod tests;

pub use config::ReaderConfig;
pub use error::ReaderError;
pub use open::scan_entries;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::metadata::{ArrayRole, ChannelInfo, ContainerMetadata};

/// One entry of the tar archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Path inside the archive
    pub name: String,
    /// File offset of the entry body
    pub offset: u64,
    /// Body size in bytes
    pub size: u64,
}

/// Reader for iq-tar containers
#[derive(Debug)]
pub struct IqTarReader {
    path: PathBuf,
    config: ReaderConfig,
    metadata: ContainerMetadata,
    entries: Vec<ArchiveEntry>,
    /// Array name, channel index and role, in storage order
    arrays: Vec<(String, usize, ArrayRole)>,
}

impl IqTarReader {
    /// Path the container was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configuration in use
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Parsed metadata document
    pub fn metadata(&self) -> &ContainerMetadata {
        &self.metadata
    }

    /// Channels in storage order
    pub fn channel_infos(&self) -> &[ChannelInfo] {
        &self.metadata.channels
    }

    /// Entries of the archive in file order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Names of all readable arrays, in storage order
    pub fn array_names(&self) -> Vec<String> {
        self.arrays.iter().map(|(name, _, _)| name.clone()).collect()
    }

    /// Whether an array called `name` exists
    pub fn contains_array(&self, name: &str) -> bool {
        self.arrays.iter().any(|(n, _, _)| n == name)
    }

    /// Document fields and free-form keys as one map
    pub fn metadata_map(&self) -> BTreeMap<String, String> {
        self.metadata.metadata_map()
    }

    /// Legacy XML blob of the vendor section, if any
    pub fn deprecated_info(&self) -> Option<&str> {
        self.metadata.deprecated_info.as_deref()
    }

    /// Samples per channel according to the metadata document
    pub fn samples(&self) -> u64 {
        self.metadata.samples()
    }

    fn lookup(&self, name: &str) -> Result<(usize, ArrayRole), ReaderError> {
        self.arrays
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, channel, role)| (*channel, *role))
            .ok_or_else(|| ReaderError::InvalidArrayName(name.to_string()))
    }

    /// The binary data entry named by the metadata document
    pub fn data_entry(&self) -> Result<&ArchiveEntry, ReaderError> {
        self.entries
            .iter()
            .find(|e| e.name == self.metadata.data_filename)
            .ok_or_else(|| {
                ReaderError::InvalidTarArchive(format!(
                    "data entry '{}' is missing",
                    self.metadata.data_filename
                ))
            })
    }
}
