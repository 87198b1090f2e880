use super::*;
use crate::metadata::IqDataFormat;
use tempfile::tempdir;

fn one_real_channel() -> ContainerDescription {
    ContainerDescription::new(
        IqDataFormat::Real,
        vec![ChannelInfo::new("Channel1", 1e6, 100e6)],
    )
    .with_application_name("facade test")
}

#[test]
fn test_real_channel_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("real.iq.tar");

    let mut file = IqTar::new();
    file.write_open(&path, one_real_channel())?;
    let values = [1.0f32, 2.0, 3.0, 4.0];
    let arrays: [&[f32]; 1] = [&values];
    file.append_arrays(SampleSlices::Float32(&arrays))?;
    file.close()?;

    assert_eq!(file.read_open(&path)?, vec!["Channel1"]);
    let (channels, map) = file.metadata()?;
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].samples, 4);
    assert_eq!(channels[0].clock_rate, 1e6);
    assert_eq!(channels[0].frequency, 100e6);
    assert_eq!(map.get("Name").map(String::as_str), Some("facade test"));
    assert_eq!(map.get("Format").map(String::as_str), Some("real"));

    let read = file.read_array("Channel1", 4, 0, IqDataType::Float32)?;
    assert_eq!(read.as_f32(), Some(&values[..]));
    let wide = file.read_array("Channel1", 2, 2, IqDataType::Float64)?;
    assert_eq!(wide, SampleBuffer::Float64(vec![3.0, 4.0]));
    file.close()?;
    Ok(())
}

#[test]
fn test_state_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("state.iq.tar");
    let mut file = IqTar::new();

    assert_eq!(file.metadata().err(), Some(ErrorCode::OpenFileHasNotBeenCalled));
    assert_eq!(
        file.read_array("Channel1", 1, 0, IqDataType::Float32).err(),
        Some(ErrorCode::OpenFileHasNotBeenCalled)
    );
    let values = [1.0f64];
    let arrays: [&[f64]; 1] = [&values];
    assert_eq!(
        file.append_arrays(SampleSlices::Float64(&arrays)).err(),
        Some(ErrorCode::FileWriterUninitialized)
    );
    assert!(file.last_error().is_some());

    file.write_open(&path, one_real_channel())?;
    assert_eq!(file.read_open(&path).err(), Some(ErrorCode::WriterAlreadyInitialized));
    assert_eq!(
        file.write_open(&path, one_real_channel()).err(),
        Some(ErrorCode::WriterAlreadyInitialized)
    );
    assert_eq!(file.set_preview_enabled(false).err(), Some(ErrorCode::WriterAlreadyInitialized));
    file.append_arrays(SampleSlices::Float64(&arrays))?;
    file.close()?;
    file.close()?;

    file.read_open(&path)?;
    assert_eq!(file.read_open(&path).err(), Some(ErrorCode::ReaderAlreadyInitialized));
    assert_eq!(
        file.write_open(&path, one_real_channel()).err(),
        Some(ErrorCode::ReaderAlreadyInitialized)
    );
    assert_eq!(file.deprecated_info()?, None);
    file.close()?;
    Ok(())
}

#[test]
fn test_reader_errors_become_codes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("codes.iq.tar");
    let mut file = IqTar::new();

    assert_eq!(
        file.read_open(&dir.path().join("missing.iq.tar")).err(),
        Some(ErrorCode::FileNotFound)
    );
    assert_eq!(file.set_temp_dir(dir.path().join("nowhere")).err(), Some(ErrorCode::FolderNotFound));

    file.write_open(&path, one_real_channel())?;
    let values = [0.5f32; 10];
    let arrays: [&[f32]; 1] = [&values];
    file.append_arrays(SampleSlices::Float32(&arrays))?;
    file.close()?;

    file.read_open(&path)?;
    assert_eq!(
        file.read_array("Channel9", 1, 0, IqDataType::Float32).err(),
        Some(ErrorCode::InvalidArrayName)
    );
    assert_eq!(
        file.read_array("Channel1", 1, 10, IqDataType::Float32).err(),
        Some(ErrorCode::StartIndexOutOfRange)
    );
    assert_eq!(
        file.read_array("Channel1", 5, 8, IqDataType::Float32).err(),
        Some(ErrorCode::InvalidDataInterval)
    );
    let message = file.last_error().ok_or("no message kept")?;
    assert!(message.contains("-104"));
    Ok(())
}

#[test]
fn test_disable_temp_file_applies_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = IqTar::new();
    file.set_preview_enabled(false)?;
    file.disable_temp_file(2, 1, IqDataFormat::Complex, IqDataType::Float32)?;

    let description = ContainerDescription::new(
        IqDataFormat::Complex,
        vec![ChannelInfo::new("RX", 1e6, 0.0)],
    );
    file.write_open(&dir.path().join("direct.iq.tar"), description.clone())?;
    let channel = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
    let buffers: [&[f32]; 1] = [&channel];
    assert_eq!(
        file.append_channels(SampleSlices::Float32(&buffers)).err(),
        Some(ErrorCode::DataOverflow)
    );
    let fits: [&[f32]; 1] = [&channel[..4]];
    file.append_channels(SampleSlices::Float32(&fits))?;
    assert_eq!(file.close().err(), Some(ErrorCode::InvalidTarArchive));

    // no declared size any more, so any length goes
    file.write_open(&dir.path().join("staged.iq.tar"), description)?;
    file.append_channels(SampleSlices::Float32(&buffers))?;
    file.close()?;

    file.read_open(&dir.path().join("staged.iq.tar"))?;
    let read = file.read_channel("RX", 6, 0, IqDataType::Float32)?;
    assert_eq!(read.as_f32(), Some(&channel[..]));
    assert_eq!(
        file.read_channel("RX", 3, 0, IqDataType::Float32).err(),
        Some(ErrorCode::InvalidArraySize)
    );
    Ok(())
}
