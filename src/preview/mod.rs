//! # Preview engine
//!
//! Bounded-size visual summary of an arbitrarily long I/Q stream, updated
//! block by block while a container is written:
//!
//! - **Power vs time**: min and max trace of `|x|^2`, decimated to a fixed
//!   number of points ([`TraceDecimationPreview`])
//! - **Spectrum**: min and max Welch periodogram with a flat-top window
//!   ([`SpectrumPreview`])
//! - **I/Q**: adaptive 2D histogram of the constellation
//!   ([`HistogramPreview`])
//!
//! ## Example
//!
//! ```rust
//! use iqtar::preview::{PreviewConfig, PreviewEngine};
//! use rustfft::num_complex::Complex32;
//!
//! let mut engine = PreviewEngine::new(PreviewConfig::default(), 1)?;
//! let block: Vec<Complex32> = (0..1024)
//!     .map(|i| Complex32::from_polar(1.0, i as f32 * 0.1))
//!     .collect();
//! engine.feed(&block)?;
//!
//! let previews = engine.snapshot()?;
//! assert_eq!(previews[0].power_vs_time.min.len(), 256);
//! assert_eq!(previews[0].iq.width, 64);
//! # Ok::<(), iqtar::preview::PreviewError>(())
//! ```

mod db;
mod error;
mod histogram;
mod spectrum;
mod trace;
mod types;


pub use db::power_traces_to_db;
pub use error::PreviewError;
pub use histogram::HistogramPreview;
pub use spectrum::{fft_shift, flattop_window, SpectrumPreview, WelchMinMax};
pub use trace::{Reducer, TraceDecimationPreview};
pub use types::{ChannelPreview, IqHistogramImage, MinMaxTrace};

use rustfft::num_complex::Complex32;

use crate::metadata::IqDataFormat;
use crate::stride::Sample;

/// Sizes of the three previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Points of the power-vs-time trace
    pub pvt_length: usize,
    /// Spectrum FFT length is `2^spectrum_order`
    pub spectrum_order: u32,
    /// Histogram bins per half axis
    pub iq_half_bins: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            pvt_length: 256,
            spectrum_order: 8,
            iq_half_bins: 32,
        }
    }
}

impl PreviewConfig {
    /// Small previews for tests and quick looks
    pub fn compact() -> Self {
        Self {
            pvt_length: 32,
            spectrum_order: 5,
            iq_half_bins: 8,
        }
    }
}

/// All three estimators for a fixed channel count.
#[derive(Debug, Clone)]
pub struct PreviewEngine {
    config: PreviewConfig,
    channels: usize,
    pvt_min: TraceDecimationPreview,
    pvt_max: TraceDecimationPreview,
    spectrum: SpectrumPreview,
    histogram: HistogramPreview,
    samples: u64,
}

impl PreviewEngine {
    /// Create an engine for `channels` channels.
    pub fn new(config: PreviewConfig, channels: usize) -> Result<Self, PreviewError> {
        Ok(Self {
            config,
            channels,
            pvt_min: TraceDecimationPreview::new(config.pvt_length, Reducer::Min, channels)?,
            pvt_max: TraceDecimationPreview::new(config.pvt_length, Reducer::Max, channels)?,
            spectrum: SpectrumPreview::new(config.spectrum_order, channels)?,
            histogram: HistogramPreview::new(config.iq_half_bins, channels)?,
            samples: 0,
        })
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples fed per channel
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// The histogram estimator
    pub fn histogram(&self) -> &HistogramPreview {
        &self.histogram
    }

    /// Feed a channel-interleaved block of complex samples.
    pub fn feed(&mut self, block: &[Complex32]) -> Result<(), PreviewError> {
        if block.len() % self.channels != 0 {
            return Err(PreviewError::BlockNotMultiple {
                len: block.len(),
                channels: self.channels,
            });
        }
        let power: Vec<f32> = block.iter().map(|c| c.norm_sqr()).collect();
        self.pvt_min.feed(&power)?;
        self.pvt_max.feed(&power)?;
        self.spectrum.feed(block)?;
        self.histogram.feed(block)?;
        self.samples += (block.len() / self.channels) as u64;
        Ok(())
    }

    /// Per-channel previews with traces converted to dB.
    ///
    /// Channel names are left empty for the caller to fill in.
    pub fn snapshot(&self) -> Result<Vec<ChannelPreview>, PreviewError> {
        let side = self.histogram.side();
        let mut previews = Vec::with_capacity(self.channels);
        for ch in 0..self.channels {
            let mut power_vs_time = MinMaxTrace {
                min: self.pvt_min.get_trace(ch)?,
                max: self.pvt_max.get_trace(ch)?,
            };
            power_traces_to_db(&mut power_vs_time.min, &mut power_vs_time.max)?;

            let mut spectrum = self.spectrum.spectrum(ch)?;
            power_traces_to_db(&mut spectrum.min, &mut spectrum.max)?;

            previews.push(ChannelPreview {
                name: String::new(),
                comment: None,
                power_vs_time,
                spectrum,
                iq: IqHistogramImage {
                    width: side,
                    height: side,
                    histogram: self.histogram.render_digits(ch)?,
                },
            });
        }
        Ok(previews)
    }
}

/// Turn stored-order values (sample-major, channel-interleaved) into the
/// complex block the engine consumes. Real values get a zero imaginary part;
/// complex and polar pairs are taken as they are stored.
pub fn complex_block<T: Sample>(stored: &[T], format: IqDataFormat) -> Vec<Complex32> {
    match format {
        IqDataFormat::Real => stored
            .iter()
            .map(|v| Complex32::new(v.to_f64() as f32, 0.0))
            .collect(),
        IqDataFormat::Complex | IqDataFormat::Polar => stored
            .chunks_exact(2)
            .map(|p| Complex32::new(p[0].to_f64() as f32, p[1].to_f64() as f32))
            .collect(),
    }
}
