use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use quick_xml::escape::escape;

use super::error::MetadataError;
use super::types::{default_channel_name, ChannelInfo, ContainerMetadata, IqDataFormat, IqDataType};
use super::xml::{is_valid_xml, parse_root, write_nodes, XmlElement, XmlNode};
use crate::preview::{ChannelPreview, IqHistogramImage, MinMaxTrace};

/// Root element of the metadata document
pub const ROOT_ELEMENT: &str = "RS_IQ_TAR_FileFormat";

/// File name of the stylesheet entry
pub const STYLESHEET_NAME: &str = "open_IqTar_xml_file_in_web_browser.xslt";

const VENDOR_PATH: [&str; 2] = ["UserData", "RohdeSchwarz"];
const MANDATORY_DATA: &str = "DataImportExport_MandatoryData";
const OPTIONAL_DATA: &str = "DataImportExport_OptionalData";

/// Format of `DateTime` as written
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Name of the binary data entry, e.g.
/// `File_2024-03-01123000.Complex.2ch.Float32`.
pub fn data_filename(
    timestamp: DateTime<Utc>,
    format: IqDataFormat,
    channels: usize,
    data_type: IqDataType,
) -> String {
    format!(
        "File_{}.{}.{}ch.{}",
        timestamp.format("%Y-%m-%d%H%M%S"),
        format.file_tag(),
        channels,
        data_type.file_tag()
    )
}

/// Name of the metadata entry belonging to a data entry
pub fn xml_filename(data_filename: &str) -> String {
    format!("{}.xml", data_filename)
}

/// Format a timestamp the way `DateTime` stores it
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

/// Parse `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS` as UTC
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let normalized = text.trim().replacen('T', " ", 1);
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Scaling factor text to a factor; `1` and `1.000...` mean none.
pub fn parse_scaling_factor(text: &str) -> Result<Option<f64>, MetadataError> {
    let text = text.trim();
    let is_unity = text == "1"
        || text
            .strip_prefix("1.")
            .is_some_and(|rest| rest.chars().all(|c| c == '0'));
    if is_unity {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| MetadataError::InvalidValue {
            field: "ScalingFactor",
            value: text.to_string(),
        })
}

/// Escape a value unless it already is well-formed markup
fn embed_value(value: &str) -> String {
    if is_valid_xml(value) {
        value.to_string()
    } else {
        escape(value).into_owned()
    }
}

fn write_float_array(out: &mut String, indent: &str, tag: &str, values: &[f32]) {
    let _ = writeln!(out, "{indent}<{tag}>");
    let _ = writeln!(out, "{indent}  <ArrayOfFloat length=\"{}\">", values.len());
    for v in values {
        let _ = writeln!(out, "{indent}    <float>{}</float>", *v as i32);
    }
    let _ = writeln!(out, "{indent}  </ArrayOfFloat>");
    let _ = writeln!(out, "{indent}</{tag}>");
}

fn write_trace(out: &mut String, tag: &str, trace: &MinMaxTrace) {
    let _ = writeln!(out, "      <{tag}>");
    write_float_array(out, "        ", "Min", &trace.min);
    write_float_array(out, "        ", "Max", &trace.max);
    let _ = writeln!(out, "      </{tag}>");
}

impl ContainerMetadata {
    /// Channel name at `index`, falling back to the default name
    pub fn channel_name(&self, index: usize) -> String {
        match self.channels.get(index) {
            Some(c) if !c.name.is_empty() => c.name.clone(),
            _ => default_channel_name(index),
        }
    }

    /// Render the metadata document.
    pub fn to_xml(&self) -> Result<String, MetadataError> {
        if let Some(blob) = &self.deprecated_info {
            if !is_valid_xml(blob) {
                return Err(MetadataError::InvalidXmlString(blob.clone()));
            }
        }

        let (clock, frequency) = self
            .channels
            .first()
            .map(|c| (c.clock_rate, c.frequency))
            .unwrap_or((0.0, 0.0));
        let scaling = self
            .scaling_factor
            .map(|f| f.to_string())
            .unwrap_or_else(|| "1".to_string());

        let mut out = String::with_capacity(4096);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            out,
            "<!-- Open this file in a web browser. With '{}' next to it the content is rendered as a table. -->",
            STYLESHEET_NAME
        );
        let _ = writeln!(
            out,
            "<?xml-stylesheet type=\"text/xsl\" href=\"{}\"?>",
            STYLESHEET_NAME
        );
        let _ = writeln!(
            out,
            "<{} fileFormatVersion=\"1\" xsi:noNamespaceSchemaLocation=\"http://www.rohde-schwarz.com/file/RsIqTar.xsd\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
            ROOT_ELEMENT
        );
        let _ = writeln!(out, "  <Name>{}</Name>", escape(self.application_name.as_str()));
        let _ = writeln!(out, "  <Comment>{}</Comment>", escape(self.comment.as_str()));
        if let Some(ts) = &self.timestamp {
            let _ = writeln!(out, "  <DateTime>{}</DateTime>", format_timestamp(ts));
        }
        let _ = writeln!(out, "  <Samples>{}</Samples>", self.samples());
        let _ = writeln!(out, "  <Clock unit=\"Hz\">{:.6}</Clock>", clock);
        let _ = writeln!(out, "  <Format>{}</Format>", self.format.as_str());
        let _ = writeln!(out, "  <DataType>{}</DataType>", self.data_type.as_str());
        let _ = writeln!(out, "  <ScalingFactor unit=\"V\">{}</ScalingFactor>", scaling);
        let _ = writeln!(out, "  <NumberOfChannels>{}</NumberOfChannels>", self.channels.len());
        let _ = writeln!(out, "  <DataFilename>{}</DataFilename>", escape(self.data_filename.as_str()));

        // UserData stays on one line, its end tag on the next
        out.push_str("  <UserData><RohdeSchwarz>");
        if let Some(blob) = &self.deprecated_info {
            out.push_str(blob.trim());
        }
        out.push_str("<DataImportExport_MandatoryData><ChannelNames>");
        for index in 0..self.channels.len() {
            let _ = write!(
                out,
                "<ChannelName>{}</ChannelName>",
                escape(self.channel_name(index).as_str())
            );
        }
        let _ = write!(
            out,
            "</ChannelNames><CenterFrequency unit=\"Hz\">{:.6}</CenterFrequency></DataImportExport_MandatoryData>",
            frequency
        );
        if !self.user_metadata.is_empty() {
            out.push_str("<DataImportExport_OptionalData>");
            for (key, value) in &self.user_metadata {
                let _ = write!(
                    out,
                    "<Key name=\"{}\">{}</Key>",
                    escape(key.as_str()),
                    embed_value(value)
                );
            }
            out.push_str("</DataImportExport_OptionalData>");
        }
        out.push_str("</RohdeSchwarz>\n  </UserData>\n");

        if let Some(previews) = &self.previews {
            let _ = writeln!(out, "  <PreviewData>");
            let _ = writeln!(out, "    <ArrayOfChannel length=\"{}\">", previews.len());
            for (index, preview) in previews.iter().enumerate() {
                let name = if preview.name.is_empty() {
                    self.channel_name(index)
                } else {
                    preview.name.clone()
                };
                let _ = writeln!(out, "    <Channel>");
                let _ = writeln!(out, "      <Name>{}</Name>", escape(name.as_str()));
                if let Some(comment) = &preview.comment {
                    let _ = writeln!(out, "      <Comment>{}</Comment>", escape(comment.as_str()));
                }
                write_trace(&mut out, "PowerVsTime", &preview.power_vs_time);
                write_trace(&mut out, "Spectrum", &preview.spectrum);
                let _ = writeln!(out, "      <IQ>");
                let _ = writeln!(
                    out,
                    "        <Histogram width=\"{}\" height=\"{}\">{}</Histogram>",
                    preview.iq.width, preview.iq.height, preview.iq.histogram
                );
                let _ = writeln!(out, "      </IQ>");
                let _ = writeln!(out, "    </Channel>");
            }
            let _ = writeln!(out, "    </ArrayOfChannel>");
            let _ = writeln!(out, "  </PreviewData>");
        }

        let _ = writeln!(out, "</{}>", ROOT_ELEMENT);
        Ok(out)
    }

    /// Parse a metadata document.
    ///
    /// Missing or malformed mandatory elements fail the whole parse; the
    /// optional sections (free-form keys, legacy blob, previews) are dropped
    /// with a warning instead.
    pub fn from_xml(text: &str) -> Result<Self, MetadataError> {
        let root = parse_root(text)?;
        if root.name != ROOT_ELEMENT {
            return Err(MetadataError::InvalidFormat(format!(
                "root element is <{}>, expected <{}>",
                root.name, ROOT_ELEMENT
            )));
        }

        let data_filename = root
            .child_text(&["DataFilename"])
            .ok_or(MetadataError::MissingField("DataFilename"))?;
        let application_name = root
            .child_text(&["Name", "ApplicationName"])
            .unwrap_or_default();
        let comment = root.child_text(&["Comment"]).unwrap_or_default();
        let timestamp = match root.child_text(&["DateTime"]) {
            Some(text) => Some(parse_timestamp(&text).ok_or(MetadataError::InvalidValue {
                field: "DateTime",
                value: text,
            })?),
            None => None,
        };

        let format: IqDataFormat = root
            .child_text(&["Format"])
            .ok_or(MetadataError::MissingField("Format"))?
            .parse()?;
        let scaling_factor = parse_scaling_factor(
            &root
                .child_text(&["ScalingFactor"])
                .ok_or(MetadataError::MissingField("ScalingFactor"))?,
        )?;
        let data_type: IqDataType = root
            .child_text(&["DataType"])
            .ok_or(MetadataError::MissingField("DataType"))?
            .parse()?;

        let channel_count = match root.child_text(&["NumberOfChannels", "Channels"]) {
            Some(text) => text.parse::<usize>().map_err(|_| MetadataError::InvalidValue {
                field: "NumberOfChannels",
                value: text,
            })?,
            None => 1,
        };
        if channel_count == 0 {
            return Err(MetadataError::EmptyChannelInfo);
        }

        let clock_text = root
            .child_text(&["Clock"])
            .ok_or(MetadataError::MissingField("Clock"))?;
        let clock_rate = clock_text
            .parse::<f64>()
            .map_err(|_| MetadataError::InvalidValue {
                field: "Clock",
                value: clock_text,
            })?;
        let samples_text = root
            .child_text(&["Samples"])
            .ok_or(MetadataError::MissingField("Samples"))?;
        let samples = samples_text
            .parse::<u64>()
            .map_err(|_| MetadataError::InvalidValue {
                field: "Samples",
                value: samples_text,
            })?;

        let vendor = root.descend(&VENDOR_PATH);
        let frequency = vendor.and_then(read_center_frequency).unwrap_or(f64::NAN);
        let names = channel_names(vendor, channel_count);
        let channels = names
            .into_iter()
            .map(|name| ChannelInfo::new(name, clock_rate, frequency).with_samples(samples))
            .collect();

        Ok(Self {
            application_name,
            comment,
            timestamp,
            format,
            data_type,
            channels,
            scaling_factor,
            user_metadata: vendor.map(read_user_metadata).unwrap_or_default(),
            deprecated_info: vendor.and_then(read_deprecated_info),
            previews: root.child("PreviewData").and_then(read_previews),
            data_filename,
        })
    }

    /// Flat key/value view: the document fields plus every free-form key
    pub fn metadata_map(&self) -> BTreeMap<String, String> {
        let mut map = self.user_metadata.clone();
        map.insert("Name".to_string(), self.application_name.clone());
        map.insert("Comment".to_string(), self.comment.clone());
        map.insert("Format".to_string(), self.format.as_str().to_string());
        map.insert("DataType".to_string(), self.data_type.as_str().to_string());
        map.insert(
            "ScalingFactor".to_string(),
            self.scaling_factor
                .map(|f| f.to_string())
                .unwrap_or_else(|| "1".to_string()),
        );
        map
    }
}

fn read_center_frequency(vendor: &XmlElement) -> Option<f64> {
    vendor
        .elements()
        .find_map(|section| section.child("CenterFrequency"))
        .and_then(|node| node.text().trim().parse::<f64>().ok())
}

fn channel_names(vendor: Option<&XmlElement>, count: usize) -> Vec<String> {
    let mut names: Vec<String> = (0..count).map(default_channel_name).collect();
    let listed: Vec<String> = vendor
        .and_then(|v| v.descend(&[MANDATORY_DATA, "ChannelNames"]))
        .map(|list| list.elements().map(|e| e.text().trim().to_string()).collect())
        .unwrap_or_default();
    if listed.len() <= count {
        for (slot, name) in names.iter_mut().zip(listed) {
            if !name.is_empty() {
                *slot = name;
            }
        }
    } else {
        warn!(
            "metadata lists {} channel names for {} channels, using default names",
            listed.len(),
            count
        );
    }
    names
}

fn read_user_metadata(vendor: &XmlElement) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let Some(section) = vendor.child(OPTIONAL_DATA) else {
        return map;
    };
    for key in section.elements() {
        let Some(name) = key.attribute("name") else {
            warn!("skipping optional metadata <{}> without a name", key.name);
            continue;
        };
        let value = match key.children.as_slice() {
            [XmlNode::Text(text)] => text.clone(),
            nodes => {
                let mut raw = String::new();
                write_nodes(nodes, &mut raw);
                raw.replace(['\n', '\r'], "")
            }
        };
        map.insert(name.to_string(), value);
    }
    map
}

fn read_deprecated_info(vendor: &XmlElement) -> Option<String> {
    vendor
        .elements()
        .find(|e| {
            !e.name.eq_ignore_ascii_case(MANDATORY_DATA) && !e.name.eq_ignore_ascii_case(OPTIONAL_DATA)
        })
        .map(XmlElement::to_xml_string)
}

fn read_float_array(parent: &XmlElement, tag: &str) -> Option<Vec<f32>> {
    parent
        .descend(&[tag, "ArrayOfFloat"])?
        .elements()
        .map(|e| e.text().trim().parse::<f32>().ok())
        .collect()
}

fn read_trace(channel: &XmlElement, tag: &str) -> Option<MinMaxTrace> {
    let section = channel.child(tag)?;
    Some(MinMaxTrace {
        min: read_float_array(section, "Min")?,
        max: read_float_array(section, "Max")?,
    })
}

fn read_channel_preview(channel: &XmlElement) -> Option<ChannelPreview> {
    let histogram = channel.descend(&["IQ", "Histogram"])?;
    Some(ChannelPreview {
        name: channel.child_text(&["Name"]).unwrap_or_default(),
        comment: channel.child_text(&["Comment"]),
        power_vs_time: read_trace(channel, "PowerVsTime")?,
        spectrum: read_trace(channel, "Spectrum")?,
        iq: IqHistogramImage {
            width: histogram.attribute("width")?.trim().parse().ok()?,
            height: histogram.attribute("height")?.trim().parse().ok()?,
            histogram: histogram.text().trim().to_string(),
        },
    })
}

fn read_previews(section: &XmlElement) -> Option<Vec<ChannelPreview>> {
    let list = section.child("ArrayOfChannel")?;
    let previews: Option<Vec<ChannelPreview>> = list
        .elements()
        .filter(|e| e.name == "Channel")
        .map(read_channel_preview)
        .collect();
    if previews.is_none() {
        warn!("ignoring malformed preview section");
    }
    previews
}
