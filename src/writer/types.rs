use std::collections::{BTreeMap, HashSet};

use crate::metadata::{ChannelInfo, IqDataFormat, IqDataType};

use super::WriterError;

/// Largest difference tolerated between channel clocks or frequencies
const CHANNEL_TOLERANCE: f64 = 1e-5;

/// What a container will hold, fixed when the writer opens
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDescription {
    /// Sample layout
    pub format: IqDataFormat,
    /// Number of arrays passed to `append_arrays`
    pub array_count: usize,
    /// Name of the writing application
    pub application_name: String,
    /// Free text comment
    pub comment: String,
    /// Channels in storage order
    pub channels: Vec<ChannelInfo>,
    /// Free-form key/value metadata
    pub user_metadata: BTreeMap<String, String>,
    /// Legacy XML blob, must be well-formed
    pub deprecated_info: Option<String>,
}

impl ContainerDescription {
    /// Description with the array count implied by `format`
    pub fn new(format: IqDataFormat, channels: Vec<ChannelInfo>) -> Self {
        Self {
            format,
            array_count: channels.len() * format.values_per_sample(),
            application_name: String::new(),
            comment: String::new(),
            channels,
            user_metadata: BTreeMap::new(),
            deprecated_info: None,
        }
    }

    /// Set the application name
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Add one free-form key
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_metadata.insert(key.into(), value.into());
        self
    }

    /// Set the legacy XML blob
    pub fn with_deprecated_info(mut self, xml: impl Into<String>) -> Self {
        self.deprecated_info = Some(xml.into());
        self
    }

    /// Check the channel list against the container rules.
    pub fn validate(&self) -> Result<(), WriterError> {
        let Some(first) = self.channels.first() else {
            return Err(WriterError::InconsistentInput("no channel given".to_string()));
        };

        let mut names = HashSet::new();
        for channel in &self.channels {
            // empty names are replaced by `Channel<n>` when the document is written
            if !channel.name.is_empty() && !names.insert(channel.name.as_str()) {
                return Err(WriterError::InconsistentInput(format!(
                    "channel name '{}' is used twice",
                    channel.name
                )));
            }
            if (channel.clock_rate - first.clock_rate).abs() >= CHANNEL_TOLERANCE
                || (channel.frequency - first.frequency).abs() >= CHANNEL_TOLERANCE
            {
                return Err(WriterError::InconsistentInput(
                    "all channels must share clock rate and center frequency".to_string(),
                ));
            }
        }

        let expected = self.channels.len() * self.format.values_per_sample();
        if self.array_count != expected {
            return Err(WriterError::InconsistentInput(format!(
                "{} arrays given, {} {} channel(s) need {}",
                self.array_count,
                self.channels.len(),
                self.format,
                expected
            )));
        }
        Ok(())
    }
}

/// Exact data size announced before opening, enabling direct writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredSize {
    /// Samples per channel
    pub samples: u64,
    /// Number of channels
    pub channels: usize,
    /// Sample layout
    pub format: IqDataFormat,
    /// Stored value type
    pub data_type: IqDataType,
}

impl DeclaredSize {
    /// Size of the data entry in bytes
    pub fn bytes(&self) -> u64 {
        self.samples
            * self.channels as u64
            * self.format.values_per_sample() as u64
            * self.data_type.width() as u64
    }
}
