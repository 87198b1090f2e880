use std::collections::VecDeque;
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use super::{MinMaxTrace, PreviewError};

/// Cosine-sum coefficients of the flat-top window
const FLATTOP: [f32; 5] = [0.209_671, -0.407_331, 0.281_225, -0.092_669, 0.009_103_6];

/// Overlap between consecutive segments
const OVERLAP: f32 = 0.5;

/// Flat-top window of `n` taps scaled to unit mean power (`sum w^2 == n`).
pub fn flattop_window(n: usize) -> Vec<f32> {
    let mut taps: Vec<f32> = (0..n)
        .map(|i| {
            let x = 2.0 * PI * i as f32 / n as f32;
            FLATTOP
                .iter()
                .enumerate()
                .map(|(k, a)| a * (k as f32 * x).cos())
                .sum()
        })
        .collect();

    let energy: f32 = taps.iter().map(|w| w * w).sum();
    if energy > 0.0 {
        let scale = (n as f32).sqrt() / energy.sqrt();
        taps.iter_mut().for_each(|w| *w *= scale);
    }
    taps
}

/// Welch estimator keeping the element-wise min and max periodogram
/// instead of an average.
pub struct WelchMinMax {
    n: usize,
    shift: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex32>,
    /// Samples from the next segment start on
    pending: Vec<Complex32>,
    /// The last `n` samples seen
    recent: VecDeque<Complex32>,
    min: Vec<f32>,
    max: Vec<f32>,
    segments: u64,
}

impl fmt::Debug for WelchMinMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WelchMinMax")
            .field("n", &self.n)
            .field("shift", &self.shift)
            .field("segments", &self.segments)
            .finish()
    }
}

impl Clone for WelchMinMax {
    fn clone(&self) -> Self {
        Self {
            n: self.n,
            shift: self.shift,
            window: self.window.clone(),
            fft: Arc::clone(&self.fft),
            scratch: self.scratch.clone(),
            pending: self.pending.clone(),
            recent: self.recent.clone(),
            min: self.min.clone(),
            max: self.max.clone(),
            segments: self.segments,
        }
    }
}

impl WelchMinMax {
    /// Estimator with window and FFT length `2^order`.
    pub fn new(order: u32) -> Result<Self, PreviewError> {
        if order == 0 || order > 24 {
            return Err(PreviewError::InvalidConfig(format!(
                "spectrum order {} outside 1..=24",
                order
            )));
        }
        let n = 1usize << order;
        let shift = (n as f32 * (1.0 - OVERLAP)).ceil() as usize;
        let fft = FftPlanner::new().plan_fft_forward(n);
        let scratch = vec![Complex32::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Ok(Self {
            n,
            shift,
            window: flattop_window(n),
            fft,
            scratch,
            pending: Vec::with_capacity(2 * n),
            recent: VecDeque::with_capacity(n),
            min: vec![0.0; n],
            max: vec![0.0; n],
            segments: 0,
        })
    }

    /// FFT length
    pub fn fft_len(&self) -> usize {
        self.n
    }

    /// Segments processed so far
    pub fn segments(&self) -> u64 {
        self.segments
    }

    /// Add samples of one channel.
    pub fn feed(&mut self, samples: &[Complex32]) {
        for &s in samples {
            if self.recent.len() == self.n {
                self.recent.pop_front();
            }
            self.recent.push_back(s);
        }
        self.pending.extend_from_slice(samples);

        let mut start = 0;
        while self.pending.len() - start >= self.n {
            let segment: Vec<Complex32> = self.pending[start..start + self.n].to_vec();
            self.process(&segment);
            start += self.shift;
        }
        self.pending.drain(..start);
    }

    fn process(&mut self, segment: &[Complex32]) {
        let mut buf: Vec<Complex32> = segment
            .iter()
            .zip(&self.window)
            .map(|(s, w)| *s * *w)
            .collect();
        self.fft.process_with_scratch(&mut buf, &mut self.scratch);

        let first = self.segments == 0;
        for (k, bin) in buf.iter().enumerate() {
            let power = bin.norm_sqr();
            if first {
                self.min[k] = power;
                self.max[k] = power;
            } else {
                self.min[k] = self.min[k].min(power);
                self.max[k] = self.max[k].max(power);
            }
        }
        self.segments += 1;
    }

    /// Min/max power spectrum, DC in the middle, in V^2.
    ///
    /// Samples that arrived after the last full segment are covered by one
    /// more segment ending at the newest sample. Empty until at least one
    /// full window was seen.
    pub fn spectrum(&self) -> MinMaxTrace {
        if self.segments == 0 {
            return MinMaxTrace::default();
        }

        let mut est = self.clone();
        if est.pending.len() > est.n - est.shift && est.recent.len() == est.n {
            let tail: Vec<Complex32> = est.recent.iter().copied().collect();
            est.process(&tail);
        }

        let scale = 1.0 / est.n as f32;
        MinMaxTrace {
            min: fft_shift(&est.min).into_iter().map(|v| v * scale).collect(),
            max: fft_shift(&est.max).into_iter().map(|v| v * scale).collect(),
        }
    }
}

/// Rotate a spectrum so that the zero frequency sits in the middle.
pub fn fft_shift(values: &[f32]) -> Vec<f32> {
    let n = values.len();
    let upper = n.div_ceil(2);
    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&values[upper..]);
    out.extend_from_slice(&values[..upper]);
    out
}

/// One Welch min/max estimator per channel.
#[derive(Debug, Clone)]
pub struct SpectrumPreview {
    channels: Vec<WelchMinMax>,
}

impl SpectrumPreview {
    /// Create estimators of order `order` for `channels` channels.
    pub fn new(order: u32, channels: usize) -> Result<Self, PreviewError> {
        if channels == 0 {
            return Err(PreviewError::InvalidConfig(
                "spectrum needs at least one channel".to_string(),
            ));
        }
        let estimator = WelchMinMax::new(order)?;
        Ok(Self {
            channels: vec![estimator; channels],
        })
    }

    /// Add a channel-interleaved block.
    pub fn feed(&mut self, block: &[Complex32]) -> Result<(), PreviewError> {
        let count = self.channels.len();
        if block.len() % count != 0 {
            return Err(PreviewError::BlockNotMultiple {
                len: block.len(),
                channels: count,
            });
        }
        for (ch, estimator) in self.channels.iter_mut().enumerate() {
            let samples: Vec<Complex32> = block.iter().skip(ch).step_by(count).copied().collect();
            estimator.feed(&samples);
        }
        Ok(())
    }

    /// Min/max spectrum of `channel`
    pub fn spectrum(&self, channel: usize) -> Result<MinMaxTrace, PreviewError> {
        self.channels
            .get(channel)
            .map(WelchMinMax::spectrum)
            .ok_or(PreviewError::InvalidChannel(channel))
    }

    /// Estimator of `channel`
    pub fn estimator(&self, channel: usize) -> Option<&WelchMinMax> {
        self.channels.get(channel)
    }
}
