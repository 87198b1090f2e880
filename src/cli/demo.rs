use anyhow::{Context, Result};
use log::info;
use std::f64::consts::TAU;
use std::path::PathBuf;

use iqtar::metadata::{ChannelInfo, IqDataFormat, IqDataType};
use iqtar::writer::{ContainerDescription, IqTarWriter};

use super::Config;

const BLOCK_SAMPLES: u64 = 16_384;

/// Parameters of the synthetic capture
pub struct DemoSignal {
    pub channels: usize,
    pub samples: u64,
    pub clock: f64,
    pub frequency: f64,
    pub tones: usize,
}

impl DemoSignal {
    /// Baseband tone offsets of `channel` in Hz
    fn tone_offsets(&self, channel: usize) -> Vec<f64> {
        let spacing = self.clock / (4.0 * (self.tones + 1) as f64);
        let shift = channel as f64 * self.clock / 64.0;
        (0..self.tones)
            .map(|k| {
                let offset = (k + 1) as f64 * spacing;
                if k % 2 == 0 {
                    offset + shift
                } else {
                    -offset + shift
                }
            })
            .collect()
    }

    /// I and Q arrays of `channel` for samples `start..start + len`
    fn block(&self, channel: usize, start: u64, len: usize) -> (Vec<f32>, Vec<f32>) {
        let tones = self.tone_offsets(channel);
        let amplitude = 1.0 / self.tones.max(1) as f64;
        let mut i = Vec::with_capacity(len);
        let mut q = Vec::with_capacity(len);
        for n in 0..len {
            let t = (start + n as u64) as f64 / self.clock;
            let (mut re, mut im) = (0.0, 0.0);
            for (k, f) in tones.iter().enumerate() {
                // each tone 6 dB below the previous one
                let gain = amplitude / (1u32 << k.min(16)) as f64;
                let phase = TAU * f * t;
                re += gain * phase.cos();
                im += gain * phase.sin();
            }
            i.push(re as f32);
            q.push(im as f32);
        }
        (i, q)
    }

    fn description(&self) -> ContainerDescription {
        let channels = (0..self.channels)
            .map(|c| ChannelInfo::new(format!("Channel{}", c + 1), self.clock, self.frequency))
            .collect();
        ContainerDescription::new(IqDataFormat::Complex, channels)
            .with_application_name(format!("iqtar demo {}", env!("CARGO_PKG_VERSION")))
            .with_comment(format!("{} synthetic tone(s) per channel", self.tones))
            .with_metadata("Generator", "iqtar demo")
    }
}

/// Write a synthetic multi-tone container
pub fn run(signal: DemoSignal, output: PathBuf, direct: bool, no_preview: bool, config: &Config) -> Result<()> {
    if signal.channels == 0 {
        anyhow::bail!("At least one channel is needed");
    }
    if signal.clock <= 0.0 {
        anyhow::bail!("Clock rate must be positive, got {}", signal.clock);
    }

    info!("iqtar demo - synthetic multi-tone capture");
    info!("==========================================");
    info!("Creating iq-tar file: {}", output.display());

    let mut writer = IqTarWriter::new(&output, config.writer_config());
    if no_preview {
        writer.set_preview_enabled(false)?;
    }
    if direct {
        writer.declare_exact_size(
            signal.samples,
            signal.channels,
            IqDataFormat::Complex,
            IqDataType::Float32,
        )?;
    }
    writer
        .open(signal.description())
        .context("Failed to create iq-tar writer")?;

    info!(
        "Generating {} samples on {} channel(s)...",
        signal.samples, signal.channels
    );
    let mut start = 0;
    while start < signal.samples {
        let len = BLOCK_SAMPLES.min(signal.samples - start) as usize;
        let mut arrays = Vec::with_capacity(2 * signal.channels);
        for channel in 0..signal.channels {
            let (i, q) = signal.block(channel, start, len);
            arrays.push(i);
            arrays.push(q);
        }
        writer
            .append_arrays(&arrays)
            .context("Failed to append sample block")?;
        start += len as u64;
    }

    let stats = writer.close().context("Failed to finalize iq-tar file")?;
    info!("{}", stats);
    println!("{}", stats);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> DemoSignal {
        DemoSignal {
            channels: 2,
            samples: 100,
            clock: 1e6,
            frequency: 0.0,
            tones: 3,
        }
    }

    #[test]
    fn test_tones_stay_inside_band() {
        let signal = signal();
        for channel in 0..signal.channels {
            let offsets = signal.tone_offsets(channel);
            assert_eq!(offsets.len(), 3);
            assert!(offsets.iter().all(|f| f.abs() < signal.clock / 2.0));
        }
    }

    #[test]
    fn test_block_is_bounded() {
        let (i, q) = signal().block(1, 40, 25);
        assert_eq!(i.len(), 25);
        assert_eq!(q.len(), 25);
        assert!(i.iter().chain(q.iter()).all(|v| v.abs() <= 1.0));
    }
}
