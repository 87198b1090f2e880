use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::ErrorCode;
use crate::metadata::{ChannelInfo, IqDataFormat, IqDataType};
use crate::reader::{IqTarReader, ReaderConfig, ReaderError};
use crate::writer::{ContainerDescription, DeclaredSize, IqTarWriter, WriterConfig, WriterError};

use super::types::{SampleBuffer, SampleSlices};
use super::DataImportExport;

/// Errors that know their integer code
trait BoundaryError: fmt::Display {
    fn boundary_code(&self) -> ErrorCode;
}

impl BoundaryError for ReaderError {
    fn boundary_code(&self) -> ErrorCode {
        self.code()
    }
}

impl BoundaryError for WriterError {
    fn boundary_code(&self) -> ErrorCode {
        self.code()
    }
}

enum Session {
    Idle,
    Reading(IqTarReader),
    Writing(IqTarWriter),
}

/// iq-tar implementation of [`DataImportExport`].
///
/// One instance handles one file at a time, either for reading or for
/// writing. Every failure is reported as an [`ErrorCode`]; the full message
/// of the last one is kept for [`IqTar::last_error`].
pub struct IqTar {
    session: Session,
    reader_config: ReaderConfig,
    writer_config: WriterConfig,
    declared: Option<DeclaredSize>,
    last_error: Option<String>,
}

impl Default for IqTar {
    fn default() -> Self {
        Self::new()
    }
}

impl IqTar {
    /// Facade with default reader and writer configuration
    pub fn new() -> Self {
        Self::with_config(ReaderConfig::default(), WriterConfig::default())
    }

    /// Facade with explicit configuration
    pub fn with_config(reader_config: ReaderConfig, writer_config: WriterConfig) -> Self {
        Self {
            session: Session::Idle,
            reader_config,
            writer_config,
            declared: None,
            last_error: None,
        }
    }

    /// Message of the most recent failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a file is open for reading
    pub fn is_reading(&self) -> bool {
        matches!(self.session, Session::Reading(_))
    }

    /// Whether a file is open for writing
    pub fn is_writing(&self) -> bool {
        matches!(self.session, Session::Writing(_))
    }

    fn fail(&mut self, code: ErrorCode, message: impl fmt::Display) -> ErrorCode {
        let message = format!("{} {}", code, message);
        warn!("{}", message);
        self.last_error = Some(message);
        code
    }

    fn report<T, E: BoundaryError>(&mut self, result: Result<T, E>) -> Result<T, ErrorCode> {
        result.map_err(|e| self.fail(e.boundary_code(), e))
    }

    fn ensure_not_writing(&mut self) -> Result<(), ErrorCode> {
        if self.is_writing() {
            return Err(self.fail(ErrorCode::WriterAlreadyInitialized, "close the writer first"));
        }
        Ok(())
    }

    fn reader(&mut self) -> Result<&IqTarReader, ErrorCode> {
        if !self.is_reading() {
            return Err(self.fail(ErrorCode::OpenFileHasNotBeenCalled, "no file open for reading"));
        }
        match &self.session {
            Session::Reading(reader) => Ok(reader),
            _ => Err(ErrorCode::InternalError),
        }
    }

    fn writer(&mut self) -> Result<&mut IqTarWriter, ErrorCode> {
        if !self.is_writing() {
            return Err(self.fail(ErrorCode::FileWriterUninitialized, "no file open for writing"));
        }
        match &mut self.session {
            Session::Writing(writer) => Ok(writer),
            _ => Err(ErrorCode::InternalError),
        }
    }

    /// Enable or disable the preview of the next write
    pub fn set_preview_enabled(&mut self, enabled: bool) -> Result<(), ErrorCode> {
        self.ensure_not_writing()?;
        self.writer_config.preview = enabled;
        Ok(())
    }

    /// Stage the next write in `dir`
    pub fn set_temp_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), ErrorCode> {
        self.ensure_not_writing()?;
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(self.fail(ErrorCode::FolderNotFound, dir.display()));
        }
        self.writer_config.temp_dir = Some(dir.to_path_buf());
        Ok(())
    }

    /// Declare the exact size of the next write so that it skips the temp
    /// file. Applies to one write only.
    pub fn disable_temp_file(
        &mut self,
        samples: u64,
        channels: usize,
        format: IqDataFormat,
        data_type: IqDataType,
    ) -> Result<(), ErrorCode> {
        self.ensure_not_writing()?;
        self.declared = Some(DeclaredSize {
            samples,
            channels,
            format,
            data_type,
        });
        Ok(())
    }

    /// Legacy XML blob of the open file
    pub fn deprecated_info(&mut self) -> Result<Option<String>, ErrorCode> {
        Ok(self.reader()?.deprecated_info().map(str::to_string))
    }

    /// Path of the open file
    pub fn path(&self) -> Option<PathBuf> {
        match &self.session {
            Session::Idle => None,
            Session::Reading(reader) => Some(reader.path().to_path_buf()),
            Session::Writing(writer) => Some(writer.path().to_path_buf()),
        }
    }
}

impl DataImportExport for IqTar {
    fn read_open(&mut self, path: &Path) -> Result<Vec<String>, ErrorCode> {
        self.ensure_not_writing()?;
        if self.is_reading() {
            return Err(self.fail(ErrorCode::ReaderAlreadyInitialized, "close the reader first"));
        }
        let opened = IqTarReader::open_with_config(path, self.reader_config.clone());
        let reader = self.report(opened)?;
        let names = reader.array_names();
        self.session = Session::Reading(reader);
        Ok(names)
    }

    fn write_open(&mut self, path: &Path, description: ContainerDescription) -> Result<(), ErrorCode> {
        self.ensure_not_writing()?;
        if self.is_reading() {
            return Err(self.fail(ErrorCode::ReaderAlreadyInitialized, "close the reader first"));
        }

        let mut writer = IqTarWriter::new(path, self.writer_config.clone());
        if let Some(declared) = self.declared.take() {
            let result = writer.declare_exact_size(
                declared.samples,
                declared.channels,
                declared.format,
                declared.data_type,
            );
            self.report(result)?;
        }
        let opened = writer.open(description);
        self.report(opened)?;
        self.session = Session::Writing(writer);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ErrorCode> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle | Session::Reading(_) => Ok(()),
            Session::Writing(mut writer) => {
                let closed = writer.close();
                self.report(closed).map(|_| ())
            }
        }
    }

    fn metadata(&mut self) -> Result<(Vec<ChannelInfo>, BTreeMap<String, String>), ErrorCode> {
        let reader = self.reader()?;
        Ok((reader.channel_infos().to_vec(), reader.metadata_map()))
    }

    fn read_array(
        &mut self,
        name: &str,
        count: usize,
        offset: u64,
        precision: IqDataType,
    ) -> Result<SampleBuffer, ErrorCode> {
        let reader = self.reader()?;
        let result = match precision {
            IqDataType::Float32 => reader.read_array(name, count, offset).map(SampleBuffer::Float32),
            IqDataType::Float64 => reader.read_array(name, count, offset).map(SampleBuffer::Float64),
        };
        self.report(result)
    }

    fn read_channel(
        &mut self,
        name: &str,
        values: usize,
        offset: u64,
        precision: IqDataType,
    ) -> Result<SampleBuffer, ErrorCode> {
        let reader = self.reader()?;
        let result = match precision {
            IqDataType::Float32 => reader.read_channel(name, values, offset).map(SampleBuffer::Float32),
            IqDataType::Float64 => reader.read_channel(name, values, offset).map(SampleBuffer::Float64),
        };
        self.report(result)
    }

    fn append_arrays(&mut self, arrays: SampleSlices<'_>) -> Result<(), ErrorCode> {
        let writer = self.writer()?;
        let result = match arrays {
            SampleSlices::Float32(arrays) => writer.append_arrays(arrays),
            SampleSlices::Float64(arrays) => writer.append_arrays(arrays),
        };
        self.report(result)
    }

    fn append_channels(&mut self, channels: SampleSlices<'_>) -> Result<(), ErrorCode> {
        let writer = self.writer()?;
        let result = match channels {
            SampleSlices::Float32(channels) => writer.append_channels(channels),
            SampleSlices::Float64(channels) => writer.append_channels(channels),
        };
        self.report(result)
    }
}
