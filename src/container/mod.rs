//! # Container facade
//!
//! [`DataImportExport`] is the capability set shared by file formats that
//! store I/Q data: open for reading or writing, query metadata, read arrays
//! and channels, append blocks, close. [`IqTar`] implements it for iq-tar
//! containers on top of [`crate::reader`] and [`crate::writer`].
//!
//! Methods return plain [`ErrorCode`]s on failure so that callers that only
//! deal in integer status codes can use the facade directly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use iqtar::container::{DataImportExport, IqTar, SampleSlices};
//! use iqtar::metadata::{ChannelInfo, IqDataFormat, IqDataType};
//! use iqtar::writer::ContainerDescription;
//!
//! let mut file = IqTar::new();
//! file.write_open(
//!     Path::new("tone.iq.tar"),
//!     ContainerDescription::new(IqDataFormat::Real, vec![ChannelInfo::new("Channel1", 1e6, 100e6)]),
//! )?;
//! let values = [1.0f32, 2.0, 3.0, 4.0];
//! let arrays: [&[f32]; 1] = [&values];
//! file.append_arrays(SampleSlices::Float32(&arrays))?;
//! file.close()?;
//!
//! let names = file.read_open(Path::new("tone.iq.tar"))?;
//! let read = file.read_array(&names[0], 4, 0, IqDataType::Float32)?;
//! assert_eq!(read.len(), 4);
//! file.close()?;
//! # Ok::<(), iqtar::ErrorCode>(())
//! ```

mod iqtar;
mod types;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ErrorCode;
use crate::metadata::{ChannelInfo, IqDataType};
use crate::writer::ContainerDescription;

pub use iqtar::IqTar;
pub use types::{SampleBuffer, SampleSlices};

/// Operations every I/Q file format offers.
pub trait DataImportExport {
    /// Open `path` for reading and return its array names.
    fn read_open(&mut self, path: &Path) -> Result<Vec<String>, ErrorCode>;

    /// Create `path` and prepare it for appending.
    fn write_open(&mut self, path: &Path, description: ContainerDescription) -> Result<(), ErrorCode>;

    /// Finish the open file. Does nothing when no file is open.
    fn close(&mut self) -> Result<(), ErrorCode>;

    /// Channels of the open file and its flat key/value metadata.
    fn metadata(&mut self) -> Result<(Vec<ChannelInfo>, BTreeMap<String, String>), ErrorCode>;

    /// Read `count` values of array `name` starting at sample `offset`.
    fn read_array(
        &mut self,
        name: &str,
        count: usize,
        offset: u64,
        precision: IqDataType,
    ) -> Result<SampleBuffer, ErrorCode>;

    /// Read `values` interleaved values of channel `name` starting at
    /// sample `offset`.
    fn read_channel(
        &mut self,
        name: &str,
        values: usize,
        offset: u64,
        precision: IqDataType,
    ) -> Result<SampleBuffer, ErrorCode>;

    /// Append one block, one array per stored value.
    fn append_arrays(&mut self, arrays: SampleSlices<'_>) -> Result<(), ErrorCode>;

    /// Append one block, one interleaved buffer per channel.
    fn append_channels(&mut self, channels: SampleSlices<'_>) -> Result<(), ErrorCode>;
}
