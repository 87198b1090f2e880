//! # iq-tar Writer Module
//!
//! Streams appended sample blocks into an iq-tar container.
//!
//! ## Design Principles
//!
//! 1. **Streaming**: blocks are interleaved and written as they arrive; the
//!    only per-sample state kept in memory is the bounded preview.
//!
//! 2. **Two write modes**: by default samples are staged in a memory-mapped
//!    temp file and copied into the archive on close. When the exact size
//!    is declared up front ([`IqTarWriter::declare_exact_size`]) samples go
//!    straight into the archive, with no temp file and no copy.
//!
//! 3. **Self-describing output**: the data entry is followed by its XML
//!    metadata document and, with previews enabled, a stylesheet that
//!    renders the document in a web browser.
//!
//! ## Example
//!
//! ```rust,no_run
//! use iqtar::metadata::{ChannelInfo, IqDataFormat};
//! use iqtar::writer::{ContainerDescription, IqTarWriter, WriterConfig};
//!
//! let description = ContainerDescription::new(
//!     IqDataFormat::Complex,
//!     vec![ChannelInfo::new("RX", 10e6, 2.4e9)],
//! )
//! .with_application_name("capture tool");
//!
//! let mut writer = IqTarWriter::new("capture.iq.tar", WriterConfig::default());
//! writer.open(description)?;
//! writer.append_arrays(&[vec![0.1f32, 0.2], vec![-0.1f32, 0.0]])?;
//! let stats = writer.close()?;
//! println!("{}", stats);
//! # Ok::<(), iqtar::writer::WriterError>(())
//! ```

mod config;
mod error;
mod sink;
mod stats;
mod types;
mod writer_impl;


pub use config::WriterConfig;
pub use error::WriterError;
pub use stats::{WriteMode, WriterStats};
pub use types::{ContainerDescription, DeclaredSize};
pub use writer_impl::{IqTarWriter, WriterState};
