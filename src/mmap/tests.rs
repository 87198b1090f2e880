use super::*;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_map_unaligned_window() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("bytes.bin");
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    std::fs::File::create(&path)?.write_all(&data)?;

    let file = MappedFile::open(&path, false)?;
    assert_eq!(file.len(), 10_000);

    let window = file.map(4097, 1000)?;
    assert_eq!(window.offset(), 4097);
    assert_eq!(window.as_slice(), &data[4097..5097]);
    Ok(())
}

#[test]
fn test_map_past_end_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("short.bin");
    std::fs::write(&path, [1u8; 16])?;

    let file = MappedFile::open(&path, false)?;
    let err = file.map(8, 9).unwrap_err();
    assert!(matches!(err, MmapError::OutOfBounds { file_len: 16, .. }));
    Ok(())
}

#[test]
fn test_zero_length_window() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.bin");
    std::fs::write(&path, [0u8; 0])?;

    let file = MappedFile::open(&path, false)?;
    let window = file.map(0, 0)?;
    assert!(window.is_empty());
    Ok(())
}

#[test]
fn test_write_through_mutable_window() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("grow.bin");

    let mut file = MappedFile::open(&path, true)?;
    file.set_len(8)?;
    {
        let mut window = file.map_mut(0, 8)?;
        window.as_mut_slice().copy_from_slice(b"iqtar!!!");
        window.flush()?;
    }
    file.set_len(12)?;
    {
        let mut window = file.map_mut(8, 4)?;
        window.as_mut_slice().copy_from_slice(b"tail");
        window.flush()?;
    }

    assert_eq!(std::fs::read(&path)?, b"iqtar!!!tail");
    Ok(())
}

#[test]
fn test_read_only_file_rejects_writes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("ro.bin");
    std::fs::write(&path, [0u8; 4])?;

    let mut file = MappedFile::open(&path, false)?;
    assert!(matches!(file.map_mut(0, 4), Err(MmapError::ReadOnly)));
    assert!(matches!(file.set_len(8), Err(MmapError::ReadOnly)));
    Ok(())
}
