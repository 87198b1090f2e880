use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use iqtar::metadata::array_names;
use iqtar::reader::IqTarReader;

use super::Config;

/// Samples read per step, so exports of any size run in bounded memory
const CHUNK_SAMPLES: u64 = 65_536;

/// What to export and where
pub struct ExportRequest {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub array: Option<String>,
    pub channel: Option<String>,
    pub offset: u64,
    pub count: Option<u64>,
    pub f64: bool,
}

/// Columns of one export
enum Selection {
    /// One column per array
    Arrays(Vec<String>),
    /// Interleaved values of one channel, split into columns
    Channel { name: String, columns: Vec<String> },
}

impl Selection {
    fn header(&self) -> Vec<String> {
        let columns = match self {
            Selection::Arrays(names) => names,
            Selection::Channel { columns, .. } => columns,
        };
        std::iter::once("sample".to_string())
            .chain(columns.iter().cloned())
            .collect()
    }
}

fn format_values(reader: &IqTarReader, name: &str, count: usize, offset: u64, wide: bool, channel: bool) -> Result<Vec<String>> {
    let values = match (wide, channel) {
        (false, false) => to_strings(reader.read_array::<f32>(name, count, offset)?),
        (true, false) => to_strings(reader.read_array::<f64>(name, count, offset)?),
        (false, true) => to_strings(reader.read_channel::<f32>(name, count, offset)?),
        (true, true) => to_strings(reader.read_channel::<f64>(name, count, offset)?),
    };
    Ok(values)
}

fn to_strings<T: ToString>(values: Vec<T>) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Export sample values of an iq-tar file to CSV
pub fn run(request: ExportRequest, config: &Config) -> Result<()> {
    let reader = IqTarReader::open_with_config(&request.file, config.reader_config())
        .with_context(|| format!("Failed to open {}", request.file.display()))?;
    let format = reader.metadata().format;

    let selection = match (&request.array, &request.channel) {
        (Some(array), _) => {
            if !reader.contains_array(array) {
                anyhow::bail!(
                    "No array '{}' in {} (available: {})",
                    array,
                    request.file.display(),
                    reader.array_names().join(", ")
                );
            }
            Selection::Arrays(vec![array.clone()])
        }
        (None, Some(channel)) => Selection::Channel {
            name: channel.clone(),
            columns: array_names(channel, format)
                .into_iter()
                .map(|(name, _)| name)
                .collect(),
        },
        (None, None) => Selection::Arrays(reader.array_names()),
    };

    let available = reader
        .available_samples()
        .context("Failed to size the data entry")?;
    if request.offset >= available {
        anyhow::bail!(
            "Offset {} is past the {} available samples",
            request.offset,
            available
        );
    }
    let count = request.count.unwrap_or(available - request.offset);

    let sink: Box<dyn Write> = match &request.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut csv_writer = csv::WriterBuilder::new().from_writer(sink);
    csv_writer.write_record(selection.header())?;

    let end = request.offset + count;
    let mut start = request.offset;
    while start < end {
        let n = CHUNK_SAMPLES.min(end - start) as usize;
        let columns: Vec<Vec<String>> = match &selection {
            Selection::Arrays(names) => names
                .iter()
                .map(|name| format_values(&reader, name, n, start, request.f64, false))
                .collect::<Result<_>>()?,
            Selection::Channel { name, .. } => {
                let vps = format.values_per_sample();
                let values = format_values(&reader, name, n * vps, start, request.f64, true)?;
                (0..vps)
                    .map(|k| values.iter().skip(k).step_by(vps).cloned().collect())
                    .collect()
            }
        };

        for row in 0..n {
            let mut record = Vec::with_capacity(columns.len() + 1);
            record.push((start + row as u64).to_string());
            for column in &columns {
                record.push(column[row].clone());
            }
            csv_writer.write_record(&record)?;
        }
        start += n as u64;
    }
    csv_writer.flush().context("Failed to write CSV output")?;

    info!("exported {} samples from {}", count, request.file.display());
    Ok(())
}
