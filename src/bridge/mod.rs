//! Pull-based byte source over a memory-mapped file.
//!
//! [`ArchiveBridge`] is what the tar codec reads from. Instead of holding the
//! whole file resident it maps one window of at most `copy_buffer_size`
//! bytes at the cursor, serves reads out of it and remaps when the cursor
//! leaves the window. Skipping (entry bodies the codec is not interested
//! in) only moves the cursor.
//!
//! ```rust,no_run
//! use iqtar::bridge::ArchiveBridge;
//!
//! let bridge = ArchiveBridge::open("capture.iq.tar", 4_096_000)?;
//! let mut archive = tar::Archive::new(bridge);
//! for entry in archive.entries_with_seek()? {
//!     let entry = entry?;
//!     println!("{} at {}", entry.path()?.display(), entry.raw_file_position());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```


use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::mmap::{MappedFile, MappedWindow, MmapError};

/// Read/seek adapter that maps the file window by window.
#[derive(Debug)]
pub struct ArchiveBridge {
    file: MappedFile,
    window: Option<MappedWindow>,
    cursor: u64,
    copy_buffer_size: usize,
    remaps: u64,
}

impl ArchiveBridge {
    /// Open `path` read-only.
    pub fn open<P: AsRef<Path>>(path: P, copy_buffer_size: usize) -> Result<Self, MmapError> {
        let file = MappedFile::open(path, false)?;
        Ok(Self::new(file, copy_buffer_size))
    }

    /// Wrap an already opened file.
    pub fn new(file: MappedFile, copy_buffer_size: usize) -> Self {
        Self {
            file,
            window: None,
            cursor: 0,
            copy_buffer_size: copy_buffer_size.max(1),
            remaps: 0,
        }
    }

    /// Total length of the underlying file.
    pub fn len(&self) -> u64 {
        self.file.len()
    }

    /// Whether the underlying file is empty.
    pub fn is_empty(&self) -> bool {
        self.file.is_empty()
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Bytes left between the cursor and end of file.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.cursor)
    }

    /// Number of windows mapped so far.
    pub fn remap_count(&self) -> u64 {
        self.remaps
    }

    /// Advance the cursor by `n` bytes without mapping anything.
    ///
    /// Returns `false` (cursor unchanged) if that would pass end of file.
    pub fn skip(&mut self, n: u64) -> bool {
        match self.cursor.checked_add(n) {
            Some(target) if target <= self.len() => {
                self.cursor = target;
                true
            }
            _ => false,
        }
    }

    /// Release the current mapping and rewind to the start of the file.
    pub fn close(&mut self) {
        self.window = None;
        self.cursor = 0;
    }

    /// Give back the underlying file.
    pub fn into_inner(self) -> MappedFile {
        self.file
    }

    fn window_covers_cursor(&self) -> bool {
        match &self.window {
            Some(window) => {
                let start = window.offset();
                self.cursor >= start && self.cursor < start + window.len() as u64
            }
            None => false,
        }
    }

    fn remap(&mut self) -> Result<(), MmapError> {
        let len = self.remaining().min(self.copy_buffer_size as u64) as usize;
        self.window = None;
        let window = self.file.map(self.cursor, len)?;
        debug!("bridge mapped {} bytes at offset {}", len, self.cursor);
        self.remaps += 1;
        self.window = Some(window);
        Ok(())
    }
}

impl Read for ArchiveBridge {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.remaining() == 0 {
            return Ok(0);
        }

        if !self.window_covers_cursor() {
            self.remap().map_err(|e| match e {
                MmapError::IoError(io) => io,
                other => io::Error::new(io::ErrorKind::Other, other.to_string()),
            })?;
        }

        let Some(window) = &self.window else {
            return Ok(0);
        };
        let start = (self.cursor - window.offset()) as usize;
        let available = &window.as_slice()[start..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.cursor += n as u64;
        Ok(n)
    }
}

impl Seek for ArchiveBridge {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.len().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.cursor.checked_add_signed(delta),
        };

        match target {
            Some(target) if target <= self.len() => {
                self.cursor = target;
                Ok(target)
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("seek outside of archive ({} bytes)", self.len()),
            )),
        }
    }
}
