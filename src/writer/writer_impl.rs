use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::metadata::{
    data_filename, is_valid_xml, xml_filename, ContainerMetadata, IqDataFormat, IqDataType,
    MetadataError, STYLESHEET, STYLESHEET_NAME,
};
use crate::preview::{complex_block, PreviewEngine};
use crate::settings::archive_lock;
use crate::stride::{encode_le, interleave_arrays, interleave_channels, Sample};

use super::config::WriterConfig;
use super::error::WriterError;
use super::sink::{DirectSink, Sink, StagedSink};
use super::stats::{WriteMode, WriterStats};
use super::types::{ContainerDescription, DeclaredSize};

/// Lifecycle of a writer; it only moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Configurable, nothing written yet
    Unopened,
    /// Accepting sample blocks
    Open,
    /// Archive finished (or abandoned after an error)
    Closed,
}

/// Streaming writer for iq-tar containers
pub struct IqTarWriter {
    path: PathBuf,
    config: WriterConfig,
    state: WriterState,
    declared: Option<DeclaredSize>,
    description: Option<ContainerDescription>,
    timestamp: DateTime<Utc>,
    data_type: Option<IqDataType>,
    sink: Option<Sink>,
    preview: Option<PreviewEngine>,
    samples: u64,
    stats: Option<WriterStats>,
}

impl IqTarWriter {
    /// Create an unopened writer for the archive at `path`
    pub fn new<P: AsRef<Path>>(path: P, config: WriterConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            state: WriterState::Unopened,
            declared: None,
            description: None,
            timestamp: Utc::now(),
            data_type: None,
            sink: None,
            preview: None,
            samples: 0,
            stats: None,
        }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lifecycle state
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Configuration in use
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Samples written per channel so far
    pub fn samples_written(&self) -> u64 {
        self.samples
    }

    /// Bytes written to the data entry so far
    pub fn bytes_written(&self) -> u64 {
        self.sink.as_ref().map(Sink::written).unwrap_or(0)
    }

    /// Path of the staging file while a staged write is open
    pub fn staging_path(&self) -> Option<PathBuf> {
        match &self.sink {
            Some(Sink::Staged(sink)) => Some(sink.temp_path()),
            _ => None,
        }
    }

    /// Whether a direct write rejected a block for exceeding the declared size
    pub fn overflowed(&self) -> bool {
        matches!(&self.sink, Some(Sink::Direct(sink)) if sink.overflowed())
    }

    fn ensure_unopened(&self) -> Result<(), WriterError> {
        if self.state != WriterState::Unopened {
            return Err(WriterError::AlreadyInitialized);
        }
        Ok(())
    }

    /// Enable or disable the preview section
    pub fn set_preview_enabled(&mut self, enabled: bool) -> Result<(), WriterError> {
        self.ensure_unopened()?;
        self.config.preview = enabled;
        Ok(())
    }

    /// Stage samples in `dir` instead of the system temp directory
    pub fn set_temp_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), WriterError> {
        self.ensure_unopened()?;
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(WriterError::FolderNotFound(dir.to_path_buf()));
        }
        self.config.temp_dir = Some(dir.to_path_buf());
        Ok(())
    }

    /// Announce the exact amount of data to come and write it directly into
    /// the archive. Also fixes the stored element type.
    pub fn declare_exact_size(
        &mut self,
        samples: u64,
        channels: usize,
        format: IqDataFormat,
        data_type: IqDataType,
    ) -> Result<(), WriterError> {
        self.ensure_unopened()?;
        self.declared = Some(DeclaredSize {
            samples,
            channels,
            format,
            data_type,
        });
        self.data_type = Some(data_type);
        Ok(())
    }

    /// Validate `description`, create the destination and get ready for
    /// sample blocks.
    pub fn open(&mut self, description: ContainerDescription) -> Result<(), WriterError> {
        self.ensure_unopened()?;
        description.validate()?;
        if let Some(blob) = &description.deprecated_info {
            if !is_valid_xml(blob) {
                return Err(MetadataError::InvalidXmlString(blob.clone()).into());
            }
        }

        let channels = description.channels.len();
        // whole seconds, the resolution of the stored date
        self.timestamp = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_else(Utc::now);
        let mtime = self.timestamp.timestamp().max(0) as u64;

        let sink = match self.declared {
            Some(declared) => {
                if declared.channels != channels || declared.format != description.format {
                    return Err(WriterError::InconsistentInput(format!(
                        "declared {} {} channel(s), opened with {} {}",
                        declared.channels, declared.format, channels, description.format
                    )));
                }
                let name = data_filename(self.timestamp, declared.format, channels, declared.data_type);
                Sink::Direct(DirectSink::create(&self.path, &name, declared.bytes(), mtime)?)
            }
            None => Sink::Staged(StagedSink::create(&self.path, self.config.temp_dir.as_deref())?),
        };

        self.preview = if self.config.preview {
            Some(PreviewEngine::new(self.config.preview_config, channels)?)
        } else {
            None
        };

        info!(
            "writing {} ({} {} channel(s), {} mode{})",
            self.path.display(),
            channels,
            description.format,
            if self.declared.is_some() { "direct" } else { "staged" },
            if self.config.preview { ", preview" } else { "" }
        );

        self.sink = Some(sink);
        self.description = Some(description);
        self.state = WriterState::Open;
        Ok(())
    }

    fn open_description(&self) -> Result<&ContainerDescription, WriterError> {
        match (&self.state, &self.description) {
            (WriterState::Open, Some(description)) => Ok(description),
            _ => Err(WriterError::NotInitialized),
        }
    }

    fn check_type<T: Sample>(&self) -> Result<(), WriterError> {
        match self.data_type {
            Some(expected) if expected != T::DATA_TYPE => Err(WriterError::WrongDataType {
                expected,
                found: T::DATA_TYPE,
            }),
            _ => Ok(()),
        }
    }

    /// Append one block given as one array per stored value.
    ///
    /// Real data takes one array per channel, complex and polar data an
    /// `I`, `Q` pair per channel (`ch1_I, ch1_Q, ch2_I, ...`). All arrays
    /// must have the same length. A rejected block writes nothing.
    pub fn append_arrays<T: Sample, A: AsRef<[T]>>(&mut self, arrays: &[A]) -> Result<(), WriterError> {
        let description = self.open_description()?;
        self.check_type::<T>()?;

        let channels = description.channels.len();
        let format = description.format;
        let expected = channels * format.values_per_sample();
        if arrays.len() != expected {
            return Err(WriterError::InconsistentInput(format!(
                "{} arrays given, {} {} channel(s) need {}",
                arrays.len(),
                channels,
                format,
                expected
            )));
        }

        let slices: Vec<&[T]> = arrays.iter().map(AsRef::as_ref).collect();
        let stored = interleave_arrays(&slices)
            .map_err(|e| WriterError::InconsistentInput(e.to_string()))?;
        let samples = slices.first().map(|s| s.len()).unwrap_or(0) as u64;
        self.write_stored(&stored, format, samples)
    }

    /// Append one block given as one buffer per channel.
    ///
    /// Complex and polar buffers hold interleaved I/Q pairs; real buffers
    /// hold plain values.
    pub fn append_channels<T: Sample, A: AsRef<[T]>>(&mut self, buffers: &[A]) -> Result<(), WriterError> {
        let description = self.open_description()?;
        self.check_type::<T>()?;

        let format = description.format;
        if buffers.len() != description.channels.len() {
            return Err(WriterError::InconsistentInput(format!(
                "{} channel buffers given, container has {} channel(s)",
                buffers.len(),
                description.channels.len()
            )));
        }
        if format == IqDataFormat::Real {
            return self.append_arrays(buffers);
        }

        let slices: Vec<&[T]> = buffers.iter().map(AsRef::as_ref).collect();
        let stored = interleave_channels(&slices)
            .map_err(|e| WriterError::InconsistentInput(e.to_string()))?;
        let samples = slices.first().map(|s| s.len() / 2).unwrap_or(0) as u64;
        self.write_stored(&stored, format, samples)
    }

    fn write_stored<T: Sample>(
        &mut self,
        stored: &[T],
        format: IqDataFormat,
        samples: u64,
    ) -> Result<(), WriterError> {
        if stored.is_empty() {
            return Ok(());
        }
        let sink = self.sink.as_mut().ok_or(WriterError::NotInitialized)?;
        sink.write(&encode_le(stored))?;

        self.data_type = Some(T::DATA_TYPE);
        self.samples += samples;
        if let Some(engine) = self.preview.as_mut() {
            engine.feed(&complex_block(stored, format))?;
        }
        Ok(())
    }

    fn build_metadata(&self, description: &ContainerDescription, data_type: IqDataType, name: &str) -> Result<ContainerMetadata, WriterError> {
        let channels = description
            .channels
            .iter()
            .map(|c| c.clone().with_samples(self.samples))
            .collect();
        let mut metadata = ContainerMetadata {
            application_name: description.application_name.clone(),
            comment: description.comment.clone(),
            timestamp: Some(self.timestamp),
            format: description.format,
            data_type,
            channels,
            scaling_factor: None,
            user_metadata: description.user_metadata.clone(),
            deprecated_info: description.deprecated_info.clone(),
            previews: None,
            data_filename: name.to_string(),
        };

        if let Some(engine) = &self.preview {
            let mut previews = engine.snapshot()?;
            for (index, preview) in previews.iter_mut().enumerate() {
                preview.name = metadata.channel_name(index);
            }
            metadata.previews = Some(previews);
        }
        Ok(metadata)
    }

    /// Finish the archive and release every resource.
    ///
    /// Calling `close` again returns the statistics of the first call.
    /// Resources are released even when finishing fails.
    pub fn close(&mut self) -> Result<WriterStats, WriterError> {
        match self.state {
            WriterState::Closed => return Ok(self.stats.clone().unwrap_or_default()),
            WriterState::Unopened => {
                self.state = WriterState::Closed;
                return Ok(WriterStats::default());
            }
            WriterState::Open => {}
        }

        self.state = WriterState::Closed;
        let sink = self.sink.take();
        let description = self.description.take();
        let result = match (sink, description) {
            (Some(sink), Some(description)) => self.finish(sink, &description),
            _ => Err(WriterError::NotInitialized),
        };
        self.preview = None;

        match result {
            Ok(stats) => {
                info!("{}", stats);
                self.stats = Some(stats.clone());
                Ok(stats)
            }
            Err(e) => {
                warn!("closing {} failed: {}", self.path.display(), e);
                Err(e)
            }
        }
    }

    fn finish(&mut self, sink: Sink, description: &ContainerDescription) -> Result<WriterStats, WriterError> {
        let data_type = self.data_type.unwrap_or_default();
        let name = data_filename(
            self.timestamp,
            description.format,
            description.channels.len(),
            data_type,
        );
        let metadata = self.build_metadata(description, data_type, &name)?;
        let xml = {
            let _guard = archive_lock();
            metadata.to_xml()?
        };

        let mut extra = vec![(xml_filename(&name), xml.into_bytes())];
        if self.config.preview {
            extra.push((STYLESHEET_NAME.to_string(), STYLESHEET.as_bytes().to_vec()));
        }

        let mtime = self.timestamp.timestamp().max(0) as u64;
        let (bytes_written, file_size_bytes, mode) = match sink {
            Sink::Staged(staged) => {
                let written = staged.written();
                let size = staged.finish(&name, mtime, self.config.copy_buffer_size, &extra)?;
                (written, size, WriteMode::Staged)
            }
            Sink::Direct(direct) => {
                let written = direct.written();
                let declared = direct.declared();
                if written != declared {
                    warn!(
                        "direct write of {} ends at {} of {} declared bytes",
                        self.path.display(),
                        written,
                        declared
                    );
                }
                let size = direct.finish(mtime, &extra)?;
                (written, size, WriteMode::Direct)
            }
        };

        Ok(WriterStats {
            samples_written: self.samples,
            bytes_written,
            data_filename: name,
            file_size_bytes,
            mode,
            preview: self.config.preview,
        })
    }
}

impl Drop for IqTarWriter {
    fn drop(&mut self) {
        if self.state == WriterState::Open {
            warn!(
                "IqTarWriter for {} dropped without calling close()",
                self.path.display()
            );
            // best effort, errors were already logged by close()
            let _ = self.close();
        }
    }
}
