use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::MetadataError;
use crate::preview::ChannelPreview;

/// Layout of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IqDataFormat {
    /// Cartesian I/Q pairs
    #[default]
    Complex,
    /// One real value per sample
    Real,
    /// Magnitude/phase pairs
    Polar,
}

impl IqDataFormat {
    /// Values stored per sample (1 for real, 2 otherwise)
    pub fn values_per_sample(self) -> usize {
        match self {
            IqDataFormat::Real => 1,
            IqDataFormat::Complex | IqDataFormat::Polar => 2,
        }
    }

    /// Lower-case name used in the metadata document
    pub fn as_str(self) -> &'static str {
        match self {
            IqDataFormat::Complex => "complex",
            IqDataFormat::Real => "real",
            IqDataFormat::Polar => "polar",
        }
    }

    /// Capitalized name used in the data entry file name
    pub fn file_tag(self) -> &'static str {
        match self {
            IqDataFormat::Complex => "Complex",
            IqDataFormat::Real => "Real",
            IqDataFormat::Polar => "Polar",
        }
    }
}

impl fmt::Display for IqDataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IqDataFormat {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complex" => Ok(IqDataFormat::Complex),
            "real" => Ok(IqDataFormat::Real),
            "polar" => Ok(IqDataFormat::Polar),
            other => Err(MetadataError::InvalidValue {
                field: "Format",
                value: other.to_string(),
            }),
        }
    }
}

/// Numeric type of stored values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IqDataType {
    /// IEEE-754 single precision
    #[default]
    Float32,
    /// IEEE-754 double precision
    Float64,
}

impl IqDataType {
    /// Width of one value in bytes
    pub fn width(self) -> usize {
        match self {
            IqDataType::Float32 => 4,
            IqDataType::Float64 => 8,
        }
    }

    /// Lower-case name used in the metadata document
    pub fn as_str(self) -> &'static str {
        match self {
            IqDataType::Float32 => "float32",
            IqDataType::Float64 => "float64",
        }
    }

    /// Capitalized name used in the data entry file name
    pub fn file_tag(self) -> &'static str {
        match self {
            IqDataType::Float32 => "Float32",
            IqDataType::Float64 => "Float64",
        }
    }
}

impl fmt::Display for IqDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IqDataType {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float32" => Ok(IqDataType::Float32),
            "float64" => Ok(IqDataType::Float64),
            other => Err(MetadataError::InvalidValue {
                field: "DataType",
                value: other.to_string(),
            }),
        }
    }
}

/// Description of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel name, unique within a container
    pub name: String,
    /// Sample rate in Hz
    pub clock_rate: f64,
    /// Center frequency in Hz
    pub frequency: f64,
    /// Number of samples stored for this channel
    pub samples: u64,
}

impl ChannelInfo {
    /// Create a channel description without samples
    pub fn new(name: impl Into<String>, clock_rate: f64, frequency: f64) -> Self {
        Self {
            name: name.into(),
            clock_rate,
            frequency,
            samples: 0,
        }
    }

    /// Set the number of samples
    pub fn with_samples(mut self, samples: u64) -> Self {
        self.samples = samples;
        self
    }
}

/// Default name of channel `index` (zero based): `Channel1`, `Channel2`, ...
pub fn default_channel_name(index: usize) -> String {
    format!("Channel{}", index + 1)
}

/// Which stored value of a channel an array refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayRole {
    /// The only value of a real sample
    Real,
    /// In-phase (or magnitude) value
    I,
    /// Quadrature (or phase) value
    Q,
}

impl ArrayRole {
    /// Position of the value within a stored sample
    pub fn value_index(self) -> usize {
        match self {
            ArrayRole::Real | ArrayRole::I => 0,
            ArrayRole::Q => 1,
        }
    }
}

/// Array names of one channel, in storage order
pub fn array_names(channel_name: &str, format: IqDataFormat) -> Vec<(String, ArrayRole)> {
    match format {
        IqDataFormat::Real => vec![(channel_name.to_string(), ArrayRole::Real)],
        IqDataFormat::Complex | IqDataFormat::Polar => vec![
            (format!("{}_I", channel_name), ArrayRole::I),
            (format!("{}_Q", channel_name), ArrayRole::Q),
        ],
    }
}

/// Everything the metadata document describes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    /// Name of the application that wrote the container
    pub application_name: String,
    /// Free text comment
    pub comment: String,
    /// Creation time
    pub timestamp: Option<DateTime<Utc>>,
    /// Sample layout
    pub format: IqDataFormat,
    /// Stored value type
    pub data_type: IqDataType,
    /// Channels in storage order
    pub channels: Vec<ChannelInfo>,
    /// Factor applied to every value on read; `None` means 1
    pub scaling_factor: Option<f64>,
    /// Free-form key/value metadata
    pub user_metadata: BTreeMap<String, String>,
    /// Legacy XML blob carried verbatim in the vendor section
    pub deprecated_info: Option<String>,
    /// Per-channel previews
    pub previews: Option<Vec<ChannelPreview>>,
    /// Name of the binary data entry inside the archive
    pub data_filename: String,
}

impl Default for ContainerMetadata {
    fn default() -> Self {
        Self {
            application_name: String::new(),
            comment: String::new(),
            timestamp: None,
            format: IqDataFormat::default(),
            data_type: IqDataType::default(),
            channels: Vec::new(),
            scaling_factor: None,
            user_metadata: BTreeMap::new(),
            deprecated_info: None,
            previews: None,
            data_filename: String::new(),
        }
    }
}

impl ContainerMetadata {
    /// Samples per channel (all channels share one count)
    pub fn samples(&self) -> u64 {
        self.channels.first().map(|c| c.samples).unwrap_or(0)
    }

    /// Number of arrays (channels times values per sample)
    pub fn array_count(&self) -> usize {
        self.channels.len() * self.format.values_per_sample()
    }

    /// Size in bytes of one sample of all channels
    pub fn frame_size(&self) -> usize {
        self.array_count() * self.data_type.width()
    }
}
