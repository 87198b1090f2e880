//! # iqtar - I/Q sample containers in a tar archive
//!
//! `iqtar` reads and writes the iq-tar format: one tar archive holding a
//! binary entry of little-endian I/Q samples, an XML document describing
//! them, and optionally a stylesheet that renders a preview of the capture
//! in a web browser.
//!
//! ## Key Features
//!
//! - **Streaming writes**: sample blocks are appended as they arrive and
//!   staged in a memory-mapped temp file, or written straight into the
//!   archive when the total size is declared up front.
//!
//! - **Zero-copy reads**: the archive is scanned through a windowed
//!   memory map and single arrays are read with strided copies, converting
//!   between single and double precision on the fly.
//!
//! - **Bounded previews**: power-vs-time traces, a Welch spectrum and an
//!   I/Q histogram are kept up to date while writing, in memory that does
//!   not grow with the capture length.
//!
//! - **Integer status codes**: the [`container`] facade reports every
//!   failure as an [`ErrorCode`] for callers that only deal in integers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use iqtar::metadata::{ChannelInfo, IqDataFormat};
//! use iqtar::reader::IqTarReader;
//! use iqtar::writer::{ContainerDescription, IqTarWriter, WriterConfig};
//!
//! let description = ContainerDescription::new(
//!     IqDataFormat::Complex,
//!     vec![
//!         ChannelInfo::new("RX1", 10e6, 2.4e9),
//!         ChannelInfo::new("RX2", 10e6, 2.4e9),
//!     ],
//! )
//! .with_application_name("capture tool");
//!
//! let mut writer = IqTarWriter::new("capture.iq.tar", WriterConfig::default());
//! writer.open(description)?;
//! writer.append_arrays(&[
//!     vec![0.1f32, 0.2], vec![0.0f32, -0.1], // RX1 I, Q
//!     vec![0.3f32, 0.4], vec![0.5f32, 0.6], // RX2 I, Q
//! ])?;
//! writer.close()?;
//!
//! let reader = IqTarReader::open("capture.iq.tar")?;
//! let i: Vec<f64> = reader.read_array("RX2_I", 2, 0)?;
//! assert_eq!(i.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Archive Layout
//!
//! ```text
//! capture.iq.tar
//! ├── File_2024-03-01123000.Complex.2ch.Float32        # samples
//! ├── File_2024-03-01123000.Complex.2ch.Float32.xml    # metadata
//! └── open_IqTar_xml_file_in_web_browser.xslt          # preview only
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`mmap`]: memory-mapped read and write windows
//! - [`stride`]: strided copies, interleaving and little-endian encoding
//! - [`bridge`]: windowed `Read + Seek` source for the tar codec
//! - [`metadata`]: data model and XML document
//! - [`preview`]: histogram, trace and spectrum previews
//! - [`reader`]: container reader
//! - [`writer`]: container writer
//! - [`container`]: capability trait and integer-code facade
//! - [`settings`]: process-wide defaults

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod bridge;
pub mod container;
pub mod error;
pub mod metadata;
pub mod mmap;
pub mod preview;
pub mod reader;
pub mod settings;
pub mod stride;
pub mod writer;

pub use error::ErrorCode;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::container::{DataImportExport, IqTar, SampleBuffer, SampleSlices};
    pub use crate::error::{status, ErrorCode};
    pub use crate::metadata::{
        ChannelInfo, ContainerMetadata, IqDataFormat, IqDataType, MetadataError,
    };
    pub use crate::preview::{ChannelPreview, PreviewConfig, PreviewEngine, PreviewError};
    pub use crate::reader::{ArchiveEntry, IqTarReader, ReaderConfig, ReaderError};
    pub use crate::stride::Sample;
    pub use crate::writer::{
        ContainerDescription, IqTarWriter, WriteMode, WriterConfig, WriterError, WriterStats,
    };
}
