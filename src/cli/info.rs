use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use iqtar::metadata::{format_timestamp, ChannelInfo};
use iqtar::reader::{ArchiveEntry, IqTarReader};

use super::Config;

/// Everything `info` prints
#[derive(Debug, Serialize)]
struct InfoReport {
    file: String,
    application_name: String,
    comment: String,
    timestamp: Option<String>,
    format: String,
    data_type: String,
    samples: u64,
    available_samples: u64,
    scaling_factor: Option<f64>,
    channels: Vec<ChannelInfo>,
    arrays: Vec<String>,
    user_metadata: BTreeMap<String, String>,
    has_deprecated_info: bool,
    has_preview: bool,
    entries: Vec<ArchiveEntry>,
}

impl InfoReport {
    fn collect(reader: &IqTarReader) -> Result<Self> {
        let metadata = reader.metadata();
        Ok(Self {
            file: reader.path().display().to_string(),
            application_name: metadata.application_name.clone(),
            comment: metadata.comment.clone(),
            timestamp: metadata.timestamp.as_ref().map(format_timestamp),
            format: metadata.format.to_string(),
            data_type: metadata.data_type.to_string(),
            samples: metadata.samples(),
            available_samples: reader
                .available_samples()
                .context("Failed to size the data entry")?,
            scaling_factor: metadata.scaling_factor,
            channels: metadata.channels.clone(),
            arrays: reader.array_names(),
            user_metadata: metadata.user_metadata.clone(),
            has_deprecated_info: metadata.deprecated_info.is_some(),
            has_preview: metadata.previews.is_some(),
            entries: reader.entries().to_vec(),
        })
    }

    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", heading("iq-tar File Information"));
        let _ = writeln!(out, "=======================");
        let _ = writeln!(out, "File: {}", self.file);
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", heading("Container:"));
        let _ = writeln!(out, "  Application: {}", self.application_name);
        if !self.comment.is_empty() {
            let _ = writeln!(out, "  Comment: {}", self.comment);
        }
        let _ = writeln!(
            out,
            "  Date: {}",
            self.timestamp.as_deref().unwrap_or("<unknown>")
        );
        let _ = writeln!(out, "  Format: {} / {}", self.format, self.data_type);
        let _ = writeln!(out, "  Samples per channel: {}", self.samples);
        if self.available_samples != self.samples {
            let _ = writeln!(
                out,
                "  Samples in data entry: {} (differs from metadata)",
                self.available_samples
            );
        }
        if let Some(factor) = self.scaling_factor {
            let _ = writeln!(out, "  Scaling factor: {} V", factor);
        }
        let _ = writeln!(out, "  Preview: {}", if self.has_preview { "yes" } else { "no" });
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", heading("Channels:"));
        for (index, channel) in self.channels.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:3}. {} (clock {} Hz, center {} Hz)",
                index + 1,
                channel.name,
                channel.clock_rate,
                channel.frequency
            );
        }
        let _ = writeln!(out, "  Arrays: {}", self.arrays.join(", "));
        let _ = writeln!(out);

        if !self.user_metadata.is_empty() {
            let _ = writeln!(out, "{}", heading("User Metadata:"));
            for (key, value) in &self.user_metadata {
                let shown = if value.len() > 100 {
                    let head: String = value.chars().take(100).collect();
                    format!("{}... ({} bytes)", head, value.len())
                } else {
                    value.clone()
                };
                let _ = writeln!(out, "  {}: {}", key, shown);
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "{}", heading("Entries:"));
        for entry in &self.entries {
            let _ = writeln!(out, "  {:>12} bytes  {}", entry.size, entry.name);
        }
        out
    }
}

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    console::style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}

/// Display information about an iq-tar file
pub fn run(file: PathBuf, json: bool, config: &Config) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let reader = IqTarReader::open_with_config(&file, config.reader_config())
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let report = InfoReport::collect(&reader)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
