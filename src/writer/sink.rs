use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use super::WriterError;
use crate::bridge::ArchiveBridge;
use crate::mmap::MappedFile;
use crate::settings::archive_lock;

/// Smallest step the staging file grows by
const MIN_GROWTH: u64 = 1 << 20;

const BLOCK: u64 = 512;

/// Tar builder over the destination file
pub(super) type ArchiveBuilder = tar::Builder<BufWriter<File>>;

/// Create (or replace) the destination archive.
pub(super) fn create_archive(path: &Path) -> Result<ArchiveBuilder, WriterError> {
    let file = File::create(path).map_err(|source| WriterError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tar::Builder::new(BufWriter::new(file)))
}

/// Complete ustar header of one regular file entry.
///
/// Only the header encoding runs under the archive lock.
fn entry_header(name: &str, size: u64, mtime: u64) -> Result<tar::Header, WriterError> {
    let mut header = tar::Header::new_ustar();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    let _guard = archive_lock();
    header.set_path(name)?;
    header.set_cksum();
    Ok(header)
}

/// Append one regular file entry streaming its body from `data`.
pub(super) fn append_entry<R: Read>(
    builder: &mut ArchiveBuilder,
    name: &str,
    size: u64,
    mtime: u64,
    data: R,
) -> Result<(), WriterError> {
    let header = entry_header(name, size, mtime)?;
    builder.append(&header, data)?;
    Ok(())
}

/// Terminate the archive and return its size on disk.
pub(super) fn finish_archive(builder: ArchiveBuilder) -> Result<u64, WriterError> {
    let mut out = builder.into_inner()?;
    out.flush()?;
    Ok(out.get_ref().metadata()?.len())
}

fn write_zeros<W: Write>(out: &mut W, mut count: u64) -> io::Result<()> {
    let zeros = [0u8; BLOCK as usize];
    while count > 0 {
        let n = count.min(BLOCK);
        out.write_all(&zeros[..n as usize])?;
        count -= n;
    }
    Ok(())
}

fn padding(len: u64) -> u64 {
    (BLOCK - len % BLOCK) % BLOCK
}

/// Sample bytes buffered in a memory-mapped temp file
pub(super) struct StagedSink {
    temp: NamedTempFile,
    file: MappedFile,
    written: u64,
    /// Opened at open time so that the destination is replaced right away
    destination: ArchiveBuilder,
}

impl StagedSink {
    pub(super) fn create(destination: &Path, temp_dir: Option<&Path>) -> Result<Self, WriterError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("iqtar-").suffix(".tmp");
        let temp = match temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|source| WriterError::FileOpen {
            path: temp_dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
            source,
        })?;

        let file = MappedFile::from_file(temp.reopen()?, temp.path(), true)?;
        debug!("staging samples in {}", temp.path().display());
        Ok(Self {
            destination: create_archive(destination)?,
            temp,
            file,
            written: 0,
        })
    }

    pub(super) fn written(&self) -> u64 {
        self.written
    }

    pub(super) fn temp_path(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }

    pub(super) fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let end = self.written + bytes.len() as u64;
        if end > self.file.len() {
            let grown = end.max(self.file.len().saturating_mul(2)).max(MIN_GROWTH);
            self.file.set_len(grown)?;
        }
        let mut window = self.file.map_mut(self.written, bytes.len())?;
        window.as_mut_slice().copy_from_slice(bytes);
        self.written = end;
        Ok(())
    }

    /// Copy the staged bytes into the archive as entry `name`, followed by
    /// `extra` entries. The temp file is removed when this returns.
    pub(super) fn finish(
        self,
        name: &str,
        mtime: u64,
        copy_buffer_size: usize,
        extra: &[(String, Vec<u8>)],
    ) -> Result<u64, WriterError> {
        let Self {
            temp,
            mut file,
            written,
            mut destination,
        } = self;

        file.set_len(written)?;
        let bridge = ArchiveBridge::new(file, copy_buffer_size);
        append_entry(&mut destination, name, written, mtime, bridge)?;
        for (entry, body) in extra {
            append_entry(&mut destination, entry, body.len() as u64, mtime, body.as_slice())?;
        }
        let size = finish_archive(destination)?;
        temp.close()?;
        Ok(size)
    }
}

/// Sample bytes streamed straight into the archive behind a header that
/// announces the declared size
pub(super) struct DirectSink {
    builder: ArchiveBuilder,
    declared: u64,
    written: u64,
    overflowed: bool,
}

impl DirectSink {
    pub(super) fn create(path: &Path, name: &str, declared: u64, mtime: u64) -> Result<Self, WriterError> {
        let mut builder = create_archive(path)?;
        let header = entry_header(name, declared, mtime)?;
        builder.get_mut().write_all(header.as_bytes())?;
        Ok(Self {
            builder,
            declared,
            written: 0,
            overflowed: false,
        })
    }

    pub(super) fn written(&self) -> u64 {
        self.written
    }

    pub(super) fn declared(&self) -> u64 {
        self.declared
    }

    /// Whether a block was ever rejected for exceeding the declared size
    pub(super) fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub(super) fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        let attempted = self.written + bytes.len() as u64;
        if attempted > self.declared {
            self.overflowed = true;
            return Err(WriterError::DataOverflow {
                declared: self.declared,
                attempted,
            });
        }
        self.builder.get_mut().write_all(bytes)?;
        self.written = attempted;
        Ok(())
    }

    /// Complete the data entry and append `extra` entries.
    ///
    /// A data entry short of its declared size is zero-filled so the archive
    /// stays structurally readable; `extra` is then skipped and the call
    /// reports [`WriterError::SizeMismatch`].
    pub(super) fn finish(mut self, mtime: u64, extra: &[(String, Vec<u8>)]) -> Result<u64, WriterError> {
        let complete = !self.overflowed && self.written == self.declared;
        let out = self.builder.get_mut();
        write_zeros(out, self.declared - self.written)?;
        write_zeros(out, padding(self.declared))?;

        if !complete {
            finish_archive(self.builder)?;
            return Err(WriterError::SizeMismatch {
                declared: self.declared,
                written: self.written,
            });
        }

        for (entry, body) in extra {
            append_entry(&mut self.builder, entry, body.len() as u64, mtime, body.as_slice())?;
        }
        finish_archive(self.builder)
    }
}

/// Where appended sample bytes go
pub(super) enum Sink {
    Staged(StagedSink),
    Direct(DirectSink),
}

impl Sink {
    pub(super) fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        match self {
            Sink::Staged(sink) => sink.write(bytes),
            Sink::Direct(sink) => sink.write(bytes),
        }
    }

    pub(super) fn written(&self) -> u64 {
        match self {
            Sink::Staged(sink) => sink.written(),
            Sink::Direct(sink) => sink.written(),
        }
    }
}
