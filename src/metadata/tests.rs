use super::*;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

use crate::preview::{ChannelPreview, IqHistogramImage, MinMaxTrace};

fn two_channel_metadata() -> ContainerMetadata {
    ContainerMetadata {
        application_name: "unit test".to_string(),
        comment: "a & b".to_string(),
        timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap()),
        format: IqDataFormat::Complex,
        data_type: IqDataType::Float32,
        channels: vec![
            ChannelInfo::new("Left", 1e6, 2.4e9).with_samples(128),
            ChannelInfo::new("Right", 1e6, 2.4e9).with_samples(128),
        ],
        scaling_factor: None,
        user_metadata: BTreeMap::new(),
        deprecated_info: None,
        previews: None,
        data_filename: "File_2024-03-01123005.Complex.2ch.Float32".to_string(),
    }
}

#[test]
fn test_format_and_type_parsing() {
    assert_eq!("COMPLEX".parse::<IqDataFormat>().unwrap(), IqDataFormat::Complex);
    assert_eq!(" real ".parse::<IqDataFormat>().unwrap(), IqDataFormat::Real);
    assert_eq!("Float64".parse::<IqDataType>().unwrap(), IqDataType::Float64);
    assert!("int16".parse::<IqDataType>().is_err());
    assert_eq!(IqDataFormat::Polar.values_per_sample(), 2);
    assert_eq!(IqDataFormat::Real.values_per_sample(), 1);
}

#[test]
fn test_array_names_follow_format() {
    let names = array_names("Channel1", IqDataFormat::Complex);
    assert_eq!(names[0], ("Channel1_I".to_string(), ArrayRole::I));
    assert_eq!(names[1], ("Channel1_Q".to_string(), ArrayRole::Q));
    assert_eq!(
        array_names("Sensor", IqDataFormat::Real),
        vec![("Sensor".to_string(), ArrayRole::Real)]
    );
    assert_eq!(default_channel_name(0), "Channel1");
}

#[test]
fn test_data_filename_layout() {
    let ts = Utc.with_ymd_and_hms(2017, 9, 28, 8, 5, 1).unwrap();
    assert_eq!(
        data_filename(ts, IqDataFormat::Real, 3, IqDataType::Float64),
        "File_2017-09-28080501.Real.3ch.Float64"
    );
    assert_eq!(xml_filename("File_x"), "File_x.xml");
}

#[test]
fn test_timestamp_accepts_both_separators() {
    let expected = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(parse_timestamp("2020-01-02T03:04:05"), Some(expected));
    assert_eq!(parse_timestamp("2020-01-02 03:04:05"), Some(expected));
    assert_eq!(parse_timestamp("yesterday"), None);
    assert_eq!(format_timestamp(&expected), "2020-01-02T03:04:05");
}

#[test]
fn test_scaling_factor_unity_is_none() {
    assert_eq!(parse_scaling_factor("1").unwrap(), None);
    assert_eq!(parse_scaling_factor("1.000").unwrap(), None);
    assert_eq!(parse_scaling_factor("0.5").unwrap(), Some(0.5));
    assert_eq!(parse_scaling_factor("1.5").unwrap(), Some(1.5));
    assert!(parse_scaling_factor("volts").is_err());
}

#[test]
fn test_xml_round_trip() {
    let mut metadata = two_channel_metadata();
    metadata.scaling_factor = Some(0.25);
    metadata
        .user_metadata
        .insert("Operator".to_string(), "x < y".to_string());
    metadata
        .user_metadata
        .insert("Setup".to_string(), "<Gain unit=\"dB\">10</Gain>".to_string());

    let xml = metadata.to_xml().unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<Format>complex</Format>"));
    assert!(xml.contains("<Clock unit=\"Hz\">1000000.000000</Clock>"));
    assert!(xml.contains("<Key name=\"Operator\">x &lt; y</Key>"));
    assert!(xml.contains("<Key name=\"Setup\"><Gain unit=\"dB\">10</Gain></Key>"));

    let parsed = ContainerMetadata::from_xml(&xml).unwrap();
    assert_eq!(parsed, metadata);
}

#[test]
fn test_empty_channel_names_get_defaults() {
    let mut metadata = two_channel_metadata();
    metadata.channels[1].name.clear();
    let parsed = ContainerMetadata::from_xml(&metadata.to_xml().unwrap()).unwrap();
    assert_eq!(parsed.channels[0].name, "Left");
    assert_eq!(parsed.channels[1].name, "Channel2");
}

#[test]
fn test_deprecated_blob_must_be_xml() {
    let mut metadata = two_channel_metadata();
    metadata.deprecated_info = Some("not <xml".to_string());
    let err = metadata.to_xml().unwrap_err();
    assert_eq!(err.code(), crate::error::ErrorCode::InvalidXmlString);

    metadata.deprecated_info = Some("<Legacy><Level>3</Level></Legacy>".to_string());
    let parsed = ContainerMetadata::from_xml(&metadata.to_xml().unwrap()).unwrap();
    assert_eq!(parsed.deprecated_info, metadata.deprecated_info);
}

#[test]
fn test_preview_section_round_trip() {
    let mut metadata = two_channel_metadata();
    let preview = ChannelPreview {
        name: "Left".to_string(),
        comment: None,
        power_vs_time: MinMaxTrace {
            min: vec![-30.0, -20.0],
            max: vec![-3.0, 0.0],
        },
        spectrum: MinMaxTrace {
            min: vec![-90.0, -80.0],
            max: vec![-10.0, -12.0],
        },
        iq: IqHistogramImage {
            width: 2,
            height: 2,
            histogram: "0190".to_string(),
        },
    };
    let mut second = preview.clone();
    second.name = "Right".to_string();
    metadata.previews = Some(vec![preview, second]);

    let xml = metadata.to_xml().unwrap();
    assert!(xml.contains("<ArrayOfChannel length=\"2\">"));
    assert!(xml.contains("<Histogram width=\"2\" height=\"2\">0190</Histogram>"));
    let parsed = ContainerMetadata::from_xml(&xml).unwrap();
    assert_eq!(parsed.previews, metadata.previews);
}

#[test]
fn test_minimal_document_uses_defaults() {
    let xml = r#"<?xml version="1.0"?>
<RS_IQ_TAR_FileFormat fileFormatVersion="1">
  <ApplicationName>legacy</ApplicationName>
  <DateTime>2015-06-01 10:00:00</DateTime>
  <Samples>4</Samples>
  <Clock unit="Hz">1e3</Clock>
  <Format>real</Format>
  <DataType>float64</DataType>
  <ScalingFactor unit="V">1.0</ScalingFactor>
  <DataFilename>data.bin</DataFilename>
</RS_IQ_TAR_FileFormat>"#;

    let parsed = ContainerMetadata::from_xml(xml).unwrap();
    assert_eq!(parsed.application_name, "legacy");
    assert_eq!(parsed.channels.len(), 1);
    assert_eq!(parsed.channels[0].name, "Channel1");
    assert_eq!(parsed.channels[0].clock_rate, 1000.0);
    assert!(parsed.channels[0].frequency.is_nan());
    assert_eq!(parsed.scaling_factor, None);
    assert_eq!(parsed.format, IqDataFormat::Real);
    assert_eq!(parsed.data_type, IqDataType::Float64);
    assert!(parsed.previews.is_none());
}

#[test]
fn test_missing_mandatory_field_fails() {
    let metadata = two_channel_metadata();
    let xml = metadata
        .to_xml()
        .unwrap()
        .replace("<DataType>float32</DataType>", "");
    let err = ContainerMetadata::from_xml(&xml).unwrap_err();
    assert!(matches!(err, MetadataError::MissingField("DataType")));
    assert_eq!(err.code(), crate::error::ErrorCode::InvalidFormatOfIQTarXmlContent);

    assert!(ContainerMetadata::from_xml("<Other/>").is_err());
    assert!(ContainerMetadata::from_xml("<RS_IQ_TAR_FileFormat>").is_err());
}

#[test]
fn test_too_many_channel_names_fall_back() {
    let metadata = two_channel_metadata();
    let xml = metadata.to_xml().unwrap().replace(
        "<ChannelName>Right</ChannelName>",
        "<ChannelName>Right</ChannelName><ChannelName>Extra</ChannelName>",
    );
    let parsed = ContainerMetadata::from_xml(&xml).unwrap();
    assert_eq!(parsed.channels[0].name, "Channel1");
    assert_eq!(parsed.channels[1].name, "Channel2");
}

#[test]
fn test_metadata_map_keys() {
    let mut metadata = two_channel_metadata();
    metadata
        .user_metadata
        .insert("Antenna".to_string(), "Dipole".to_string());
    let map = metadata.metadata_map();
    assert_eq!(map["Name"], "unit test");
    assert_eq!(map["Format"], "complex");
    assert_eq!(map["DataType"], "float32");
    assert_eq!(map["ScalingFactor"], "1");
    assert_eq!(map["Antenna"], "Dipole");
}

#[test]
fn test_is_valid_xml() {
    assert!(is_valid_xml("<a><b/></a>"));
    assert!(is_valid_xml("<a/><b/>"));
    assert!(!is_valid_xml("plain text"));
    assert!(!is_valid_xml("<a>"));
    assert!(!is_valid_xml(""));
}

#[test]
fn test_frame_size() {
    let metadata = two_channel_metadata();
    assert_eq!(metadata.array_count(), 4);
    assert_eq!(metadata.frame_size(), 16);
}
