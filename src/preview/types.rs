use serde::{Deserialize, Serialize};

/// A pair of min/max traces of equal length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxTrace {
    /// Lower envelope
    pub min: Vec<f32>,
    /// Upper envelope
    pub max: Vec<f32>,
}

impl MinMaxTrace {
    /// Number of points
    pub fn len(&self) -> usize {
        self.min.len().max(self.max.len())
    }

    /// Whether both traces are empty
    pub fn is_empty(&self) -> bool {
        self.min.is_empty() && self.max.is_empty()
    }
}

/// 2D I/Q histogram rendered as one digit per bin, row-major
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IqHistogramImage {
    /// Bins per row
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// `width * height` digits `0`..`9`
    pub histogram: String,
}

/// Preview of one channel as embedded in the metadata document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPreview {
    /// Channel name
    pub name: String,
    /// Optional description
    pub comment: Option<String>,
    /// Power over time in dB
    pub power_vs_time: MinMaxTrace,
    /// Power spectrum in dB, DC in the middle
    pub spectrum: MinMaxTrace,
    /// I/Q constellation density
    pub iq: IqHistogramImage,
}
