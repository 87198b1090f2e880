//! Memory-mapped windows over a file.
//!
//! A [`MappedFile`] owns the open file handle; callers request short-lived
//! [`MappedWindow`]s (read) or [`MappedWindowMut`]s (write) over any byte
//! range that lies inside the file. Offsets do not need to be page aligned:
//! the mapping is rounded down to the platform page granularity internally
//! and the window exposes exactly the requested bytes.
//!
//! ```rust,no_run
//! use iqtar::mmap::MappedFile;
//!
//! let file = MappedFile::open("capture.iq.tar", false)?;
//! let window = file.map(512, 4096)?;
//! println!("first byte: {}", window.as_slice()[0]);
//! # Ok::<(), iqtar::mmap::MmapError>(())
//! ```

mod error;

#[cfg(test)]
mod tests;

pub use error::MmapError;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut, MmapOptions};

/// An open file that hands out mapped windows.
#[derive(Debug)]
pub struct MappedFile {
    file: File,
    path: PathBuf,
    len: u64,
    writable: bool,
}

impl MappedFile {
    /// Open `path` for mapping. A writable file is created if missing.
    pub fn open<P: AsRef<Path>>(path: P, writable: bool) -> Result<Self, MmapError> {
        let path = path.as_ref();
        let file = if writable {
            OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)?
        } else {
            File::open(path)?
        };
        Self::from_file(file, path, writable)
    }

    /// Wrap an already open file handle.
    pub fn from_file<P: AsRef<Path>>(file: File, path: P, writable: bool) -> Result<Self, MmapError> {
        let len = file.metadata()?.len();
        Ok(Self {
            file,
            path: path.as_ref().to_path_buf(),
            len,
            writable,
        })
    }

    /// Current length of the file in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether writable windows can be requested.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Grow or shrink the file. Existing windows must not outlive this call.
    pub fn set_len(&mut self, len: u64) -> Result<(), MmapError> {
        if !self.writable {
            return Err(MmapError::ReadOnly);
        }
        self.file.set_len(len)?;
        self.len = len;
        Ok(())
    }

    fn check_bounds(&self, offset: u64, len: usize) -> Result<(), MmapError> {
        let end = offset.checked_add(len as u64);
        match end {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(MmapError::OutOfBounds {
                offset,
                len: len as u64,
                file_len: self.len,
            }),
        }
    }

    /// Map `len` bytes starting at `offset` for reading.
    pub fn map(&self, offset: u64, len: usize) -> Result<MappedWindow, MmapError> {
        self.check_bounds(offset, len)?;
        if len == 0 {
            return Ok(MappedWindow { map: None, offset });
        }

        // SAFETY: the range was checked against the file length. The file is
        // owned by this crate for the lifetime of the window and is not
        // truncated while windows are alive.
        let map = unsafe { MmapOptions::new().offset(offset).len(len).map(&self.file)? };
        Ok(MappedWindow {
            map: Some(map),
            offset,
        })
    }

    /// Map `len` bytes starting at `offset` for writing.
    pub fn map_mut(&mut self, offset: u64, len: usize) -> Result<MappedWindowMut, MmapError> {
        if !self.writable {
            return Err(MmapError::ReadOnly);
        }
        self.check_bounds(offset, len)?;
        if len == 0 {
            return Ok(MappedWindowMut { map: None, offset });
        }

        // SAFETY: as in `map`; the exclusive borrow keeps `set_len` from
        // running while the window is being created.
        let map = unsafe {
            MmapOptions::new()
                .offset(offset)
                .len(len)
                .map_mut(&self.file)?
        };
        Ok(MappedWindowMut {
            map: Some(map),
            offset,
        })
    }
}

/// Read-only view over a byte range of a [`MappedFile`].
#[derive(Debug)]
pub struct MappedWindow {
    map: Option<Mmap>,
    offset: u64,
}

impl MappedWindow {
    /// The mapped bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    /// File offset of the first byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Length of the window.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the window maps no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writable view over a byte range of a [`MappedFile`].
#[derive(Debug)]
pub struct MappedWindowMut {
    map: Option<MmapMut>,
    offset: u64,
}

impl MappedWindowMut {
    /// The mapped bytes.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.map.as_mut() {
            Some(map) => &mut map[..],
            None => &mut [],
        }
    }

    /// File offset of the first byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Length of the window.
    pub fn len(&self) -> usize {
        self.map.as_ref().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether the window maps no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write dirty pages back to the file.
    pub fn flush(&self) -> Result<(), MmapError> {
        if let Some(map) = &self.map {
            map.flush()?;
        }
        Ok(())
    }
}
