use super::*;
use crate::error::ErrorCode;
use crate::metadata::{IqDataFormat, IqDataType};
use crate::stride::encode_le;
use std::fs::File;
use tempfile::tempdir;

fn metadata(format: IqDataFormat, data_type: IqDataType, channels: usize, samples: u64) -> ContainerMetadata {
    ContainerMetadata {
        application_name: "reader test".to_string(),
        format,
        data_type,
        channels: (0..channels)
            .map(|c| ChannelInfo::new(format!("Channel{}", c + 1), 1e6, 0.0).with_samples(samples))
            .collect(),
        data_filename: format!("File_test.{}.{}ch.{}", format.file_tag(), channels, data_type.file_tag()),
        ..Default::default()
    }
}

/// Build a container by hand with GNU headers
fn write_container(
    path: &Path,
    metadata: &ContainerMetadata,
    data: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = tar::Builder::new(File::create(path)?);

    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    builder.append_data(&mut header, &metadata.data_filename, data)?;

    let xml = metadata.to_xml()?;
    let mut header = tar::Header::new_gnu();
    header.set_size(xml.len() as u64);
    header.set_mode(0o644);
    builder.append_data(
        &mut header,
        format!("{}.xml", metadata.data_filename),
        xml.as_bytes(),
    )?;

    builder.into_inner()?;
    Ok(())
}

/// Sample s of channel c: I = s + 1000 c, Q = -(s + 1000 c)
fn two_channel_complex(samples: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(samples * 4);
    for s in 0..samples {
        for c in 0..2 {
            let v = (s + 1000 * c) as f32;
            out.push(v);
            out.push(-v);
        }
    }
    out
}

#[test]
fn test_read_array_slices() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("two.iq.tar");
    let md = metadata(IqDataFormat::Complex, IqDataType::Float32, 2, 200);
    write_container(&path, &md, &encode_le(&two_channel_complex(200)))?;

    let reader = IqTarReader::open(&path)?;
    assert_eq!(
        reader.array_names(),
        vec!["Channel1_I", "Channel1_Q", "Channel2_I", "Channel2_Q"]
    );
    assert_eq!(reader.available_samples()?, 200);

    let i: Vec<f32> = reader.read_array("Channel1_I", 100, 50)?;
    let expected: Vec<f32> = (50..150).map(|v| v as f32).collect();
    assert_eq!(i, expected);

    let q: Vec<f64> = reader.read_array("Channel2_Q", 3, 197)?;
    assert_eq!(q, vec![-1197.0, -1198.0, -1199.0]);
    Ok(())
}

#[test]
fn test_read_channel_interleaves_pairs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("pairs.iq.tar");
    let md = metadata(IqDataFormat::Complex, IqDataType::Float32, 2, 20);
    write_container(&path, &md, &encode_le(&two_channel_complex(20)))?;

    let reader = IqTarReader::open(&path)?;
    let iq: Vec<f32> = reader.read_channel("Channel2", 6, 10)?;
    assert_eq!(iq, vec![1010.0, -1010.0, 1011.0, -1011.0, 1012.0, -1012.0]);

    let err = reader.read_channel::<f32>("Channel2", 5, 0).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArraySize);
    Ok(())
}

#[test]
fn test_float64_scaled_read() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("real.iq.tar");
    let mut md = metadata(IqDataFormat::Real, IqDataType::Float64, 1, 4);
    md.scaling_factor = Some(0.5);
    write_container(&path, &md, &encode_le(&[1.0f64, 2.0, 3.0, 4.0]))?;

    let reader = IqTarReader::open(&path)?;
    assert_eq!(reader.array_names(), vec!["Channel1"]);
    let values: Vec<f32> = reader.read_array("Channel1", 4, 0)?;
    assert_eq!(values, vec![0.5, 1.0, 1.5, 2.0]);
    let same: Vec<f64> = reader.read_channel("Channel1", 2, 2)?;
    assert_eq!(same, vec![1.5, 2.0]);
    assert_eq!(reader.metadata_map()["ScalingFactor"], "0.5");
    Ok(())
}

#[test]
fn test_range_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("range.iq.tar");
    let md = metadata(IqDataFormat::Complex, IqDataType::Float32, 2, 10);
    write_container(&path, &md, &encode_le(&two_channel_complex(10)))?;
    let reader = IqTarReader::open(&path)?;

    let code = |r: Result<Vec<f32>, ReaderError>| r.unwrap_err().code();
    assert_eq!(code(reader.read_array("Nope", 1, 0)), ErrorCode::InvalidArrayName);
    assert_eq!(code(reader.read_array("Channel1_I", 1, 10)), ErrorCode::StartIndexOutOfRange);
    assert_eq!(code(reader.read_array("Channel1_I", 5, 6)), ErrorCode::InvalidDataInterval);
    assert_eq!(code(reader.read_array("Channel1_I", 0, 0)), ErrorCode::InvalidDataInterval);
    assert_eq!(reader.read_array::<f32>("Channel1_I", 4, 6)?.len(), 4);
    Ok(())
}

#[test]
fn test_empty_data_entry() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.iq.tar");
    let md = metadata(IqDataFormat::Real, IqDataType::Float32, 1, 0);
    write_container(&path, &md, &[])?;

    let reader = IqTarReader::open(&path)?;
    let err = reader.read_array::<f32>("Channel1", 1, 0).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoDataFoundInFile);
    Ok(())
}

#[test]
fn test_open_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let missing = IqTarReader::open(dir.path().join("missing.iq.tar")).unwrap_err();
    assert_eq!(missing.code(), ErrorCode::FileNotFound);

    let empty = dir.path().join("zero.iq.tar");
    File::create(&empty)?;
    assert_eq!(
        IqTarReader::open(&empty).unwrap_err().code(),
        ErrorCode::InvalidTarArchive
    );

    let no_xml = dir.path().join("noxml.iq.tar");
    let mut builder = tar::Builder::new(File::create(&no_xml)?);
    let mut header = tar::Header::new_ustar();
    header.set_size(4);
    header.set_mode(0o644);
    builder.append_data(&mut header, "data.bin", &[0u8; 4][..])?;
    builder.into_inner()?;
    assert_eq!(
        IqTarReader::open(&no_xml).unwrap_err().code(),
        ErrorCode::InvalidFormatNoXmlFoundInTar
    );

    let bad_xml = dir.path().join("badxml.iq.tar");
    let mut builder = tar::Builder::new(File::create(&bad_xml)?);
    let body = b"<RS_IQ_TAR_FileFormat><Samples>1</Samples></RS_IQ_TAR_FileFormat>";
    let mut header = tar::Header::new_ustar();
    header.set_size(body.len() as u64);
    header.set_mode(0o644);
    builder.append_data(&mut header, "meta.XML", &body[..])?;
    builder.into_inner()?;
    assert_eq!(
        IqTarReader::open(&bad_xml).unwrap_err().code(),
        ErrorCode::InvalidFormatOfIQTarXmlContent
    );
    Ok(())
}

#[test]
fn test_small_copy_window_scans_the_same() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("window.iq.tar");
    let md = metadata(IqDataFormat::Complex, IqDataType::Float32, 2, 64);
    write_container(&path, &md, &encode_le(&two_channel_complex(64)))?;

    let wide = IqTarReader::open(&path)?;
    let narrow = IqTarReader::open_with_config(&path, ReaderConfig::default().with_copy_buffer_size(100))?;
    assert_eq!(wide.entries(), narrow.entries());
    assert_eq!(narrow.entries().len(), 2);
    assert_eq!(narrow.entries()[0].offset, 512);
    assert_eq!(narrow.metadata(), wide.metadata());
    Ok(())
}
