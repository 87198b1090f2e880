//! # Container metadata
//!
//! Data model of an iq-tar container and the XML document describing it.
//!
//! The document sits next to the binary data entry and carries:
//!
//! 1. **Header fields**: application name, comment, creation time, sample
//!    count, clock, format, data type, scaling factor and channel count
//!
//! 2. **Vendor section**: channel names, center frequency, free-form
//!    key/value pairs and an optional legacy XML blob
//!
//! 3. **Preview section**: per-channel power-vs-time and spectrum traces plus
//!    an I/Q histogram (see [`crate::preview`])
//!
//! ## Example
//!
//! ```rust
//! use iqtar::metadata::{ChannelInfo, ContainerMetadata, IqDataFormat};
//!
//! let metadata = ContainerMetadata {
//!     application_name: "demo".to_string(),
//!     format: IqDataFormat::Complex,
//!     channels: vec![ChannelInfo::new("RX", 1e6, 2.4e9).with_samples(10)],
//!     data_filename: "File_2024-01-01000000.Complex.1ch.Float32".to_string(),
//!     ..Default::default()
//! };
//!
//! let xml = metadata.to_xml()?;
//! let parsed = ContainerMetadata::from_xml(&xml)?;
//! assert_eq!(parsed.channels[0].name, "RX");
//! assert_eq!(parsed.samples(), 10);
//! # Ok::<(), iqtar::metadata::MetadataError>(())
//! ```

mod document;
mod error;
mod stylesheet;
mod types;
mod xml;

#[cfg(test)]
mod tests;

pub use document::{
    data_filename, format_timestamp, parse_scaling_factor, parse_timestamp, xml_filename,
    ROOT_ELEMENT, STYLESHEET_NAME,
};
pub use error::MetadataError;
pub use stylesheet::STYLESHEET;
pub use types::{
    array_names, default_channel_name, ArrayRole, ChannelInfo, ContainerMetadata, IqDataFormat,
    IqDataType,
};
pub use xml::is_valid_xml;
