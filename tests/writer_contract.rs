//! Integration tests for the writer contract as seen through the integer
//! status code facade

use iqtar::container::{DataImportExport, IqTar, SampleSlices};
use iqtar::error::status;
use iqtar::metadata::{ChannelInfo, IqDataFormat, IqDataType};
use iqtar::writer::ContainerDescription;
use iqtar::ErrorCode;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn complex_channel() -> ContainerDescription {
    ContainerDescription::new(
        IqDataFormat::Complex,
        vec![ChannelInfo::new("Channel1", 1e6, 100e6)],
    )
}

#[test]
fn test_close_twice_is_harmless() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("twice.iq.tar");
    let mut file = IqTar::new();

    assert_eq!(status(&file.close()), 0);
    file.write_open(&path, complex_channel())?;
    let i = [0.5f32; 8];
    let q = [-0.5f32; 8];
    let arrays: [&[f32]; 2] = [&i, &q];
    file.append_arrays(SampleSlices::Float32(&arrays))?;
    assert_eq!(status(&file.close()), 0);
    assert_eq!(status(&file.close()), 0);

    file.read_open(&path)?;
    assert_eq!(status(&file.close()), 0);
    assert_eq!(status(&file.close()), 0);
    Ok(())
}

#[test]
fn test_mismatched_iq_lengths_write_nothing() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("mismatch.iq.tar");
    let mut file = IqTar::new();
    file.write_open(&path, complex_channel())?;

    let i = [1.0f32; 10];
    let q = [2.0f32; 9];
    let arrays: [&[f32]; 2] = [&i, &q];
    let result = file.append_arrays(SampleSlices::Float32(&arrays));
    assert_eq!(status(&result), ErrorCode::InconsistentInputData.as_i32());
    file.close()?;

    file.read_open(&path)?;
    let (channels, _) = file.metadata()?;
    assert_eq!(channels[0].samples, 0);
    assert_eq!(
        file.read_array("Channel1_I", 1, 0, IqDataType::Float32).err(),
        Some(ErrorCode::NoDataFoundInFile)
    );
    Ok(())
}

#[test]
fn test_direct_overflow_leaves_invalid_archive() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("overflow.iq.tar");
    let mut file = IqTar::new();

    // 4 samples of one complex float32 channel: 32 bytes declared
    file.disable_temp_file(4, 1, IqDataFormat::Complex, IqDataType::Float32)?;
    file.write_open(&path, complex_channel())?;
    let i = [1.0f32; 4];
    let q = [1.0f32; 4];
    let arrays: [&[f32]; 2] = [&i, &q];
    file.append_arrays(SampleSlices::Float32(&arrays))?;

    let one_more: [&[f32]; 2] = [&i[..1], &q[..1]];
    assert_eq!(
        file.append_arrays(SampleSlices::Float32(&one_more)).err(),
        Some(ErrorCode::DataOverflow)
    );
    assert_eq!(file.close().err(), Some(ErrorCode::InvalidTarArchive));
    assert!(file.last_error().is_some());

    // the archive is still there but has no metadata document
    assert!(path.exists());
    assert_eq!(
        file.read_open(&path).err(),
        Some(ErrorCode::InvalidFormatNoXmlFoundInTar)
    );
    Ok(())
}

#[test]
fn test_existing_destination_is_replaced() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("replace.iq.tar");
    std::fs::write(&path, b"not an archive")?;

    let mut file = IqTar::new();
    file.set_preview_enabled(false)?;
    file.write_open(&path, complex_channel())?;
    let values = [1.0f64, 2.0, 3.0, 4.0];
    let buffers: [&[f64]; 1] = [&values];
    file.append_channels(SampleSlices::Float64(&buffers))?;
    file.close()?;

    let names = file.read_open(&path)?;
    assert_eq!(names, vec!["Channel1_I", "Channel1_Q"]);
    let q = file.read_array("Channel1_Q", 2, 0, IqDataType::Float64)?;
    assert_eq!(q.to_f64_vec(), vec![2.0, 4.0]);
    Ok(())
}

#[test]
fn test_staging_file_lives_in_temp_dir() -> TestResult {
    let dir = tempdir()?;
    let staging = tempdir()?;
    let path = dir.path().join("staged.iq.tar");

    let mut file = IqTar::new();
    file.set_temp_dir(staging.path())?;
    file.write_open(&path, complex_channel())?;
    assert_eq!(std::fs::read_dir(staging.path())?.count(), 1);

    let i = [0.25f32; 100];
    let arrays: [&[f32]; 2] = [&i, &i];
    file.append_arrays(SampleSlices::Float32(&arrays))?;
    file.close()?;
    assert_eq!(std::fs::read_dir(staging.path())?.count(), 0);
    Ok(())
}
