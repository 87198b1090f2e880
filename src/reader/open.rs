use std::path::Path;

use log::{debug, info};

use super::{ArchiveEntry, IqTarReader, ReaderConfig, ReaderError};
use crate::bridge::ArchiveBridge;
use crate::metadata::{array_names, ContainerMetadata, MetadataError};
use crate::mmap::MappedFile;
use crate::settings::archive_lock;

fn tar_error(e: std::io::Error) -> ReaderError {
    ReaderError::InvalidTarArchive(e.to_string())
}

impl IqTarReader {
    /// Open an iq-tar container
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open an iq-tar container with custom configuration
    ///
    /// Scans the archive, parses the first `.xml` entry and builds the
    /// array name table.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ReaderError::NotFound(path.to_path_buf()));
        }

        let entries = scan_entries(path, config.copy_buffer_size)?;
        if entries.is_empty() {
            return Err(ReaderError::InvalidTarArchive(
                "archive holds no entries".to_string(),
            ));
        }

        let xml_entry = entries
            .iter()
            .find(|e| e.name.to_ascii_lowercase().ends_with(".xml"))
            .ok_or(ReaderError::NoXmlFound)?;
        let metadata = read_metadata(path, xml_entry)?;
        if metadata.channels.is_empty() {
            return Err(MetadataError::EmptyChannelInfo.into());
        }

        let mut arrays = Vec::with_capacity(metadata.array_count());
        for (channel, info) in metadata.channels.iter().enumerate() {
            for (name, role) in array_names(&info.name, metadata.format) {
                arrays.push((name, channel, role));
            }
        }

        info!(
            "opened {}: {} entries, {} channel(s) of {} {}, {} samples",
            path.display(),
            entries.len(),
            metadata.channels.len(),
            metadata.format,
            metadata.data_type,
            metadata.samples()
        );

        Ok(Self {
            path: path.to_path_buf(),
            config,
            metadata,
            entries,
            arrays,
        })
    }
}

/// List every entry of the archive with the position of its body.
///
/// Bodies are skipped by seeking, so only the headers are ever mapped.
pub fn scan_entries(path: &Path, copy_buffer_size: usize) -> Result<Vec<ArchiveEntry>, ReaderError> {
    let bridge = ArchiveBridge::open(path, copy_buffer_size)?;
    let mut archive = tar::Archive::new(bridge);

    let _guard = archive_lock();
    let mut entries = Vec::new();
    for entry in archive.entries_with_seek().map_err(tar_error)? {
        let entry = entry.map_err(tar_error)?;
        let raw = entry.path().map_err(tar_error)?;
        let name = raw.to_string_lossy();
        let name = name.strip_prefix("./").unwrap_or(&*name).to_string();
        if name.is_empty() {
            return Err(ReaderError::InvalidTarArchive(
                "entry without a name".to_string(),
            ));
        }
        debug!(
            "entry {} ({} bytes at offset {})",
            name,
            entry.size(),
            entry.raw_file_position()
        );
        entries.push(ArchiveEntry {
            name,
            offset: entry.raw_file_position(),
            size: entry.size(),
        });
    }
    Ok(entries)
}

fn read_metadata(path: &Path, entry: &ArchiveEntry) -> Result<ContainerMetadata, ReaderError> {
    let file = MappedFile::open(path, false)?;
    let window = file.map(entry.offset, entry.size as usize)?;

    let _guard = archive_lock();
    let text = std::str::from_utf8(window.as_slice()).map_err(MetadataError::from)?;
    // a byte order mark is legal in front of the declaration
    let text = text.trim_start_matches('\u{feff}');
    Ok(ContainerMetadata::from_xml(text)?)
}
