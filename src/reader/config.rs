use crate::settings;

/// Configuration for reading iq-tar containers
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Largest window mapped at once while scanning the archive
    pub copy_buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            copy_buffer_size: settings::copy_buffer_size(),
        }
    }
}

impl ReaderConfig {
    /// Use a different window size; zero is raised to one byte.
    pub fn with_copy_buffer_size(mut self, bytes: usize) -> Self {
        self.copy_buffer_size = bytes.max(1);
        self
    }
}
