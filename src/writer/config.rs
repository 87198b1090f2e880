use std::path::PathBuf;

use crate::preview::PreviewConfig;
use crate::settings;

/// Configuration for the iq-tar writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compute previews and store them with the stylesheet
    pub preview: bool,

    /// Sizes of the preview traces and histogram
    pub preview_config: PreviewConfig,

    /// Directory of the staging file; the system temp dir when `None`
    pub temp_dir: Option<PathBuf>,

    /// Largest window mapped at once when copying the staging file into the
    /// archive
    pub copy_buffer_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            preview: true,
            preview_config: PreviewConfig::default(),
            temp_dir: None,
            copy_buffer_size: settings::copy_buffer_size(),
        }
    }
}

impl WriterConfig {
    /// Plain data and metadata, no preview section
    pub fn without_preview() -> Self {
        Self {
            preview: false,
            ..Self::default()
        }
    }

    /// Small preview, cheap to compute on short captures
    pub fn compact_preview() -> Self {
        Self {
            preview_config: PreviewConfig::compact(),
            ..Self::default()
        }
    }
}
