use serde::{Deserialize, Serialize};

use super::PreviewError;

/// How consecutive values are combined into one trace point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reducer {
    /// Keep the smallest value
    Min,
    /// Keep the largest value
    Max,
}

impl Reducer {
    /// Value that leaves any other value unchanged
    pub fn identity(self) -> f32 {
        match self {
            Reducer::Min => f32::INFINITY,
            Reducer::Max => f32::NEG_INFINITY,
        }
    }

    /// Combine two values
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            Reducer::Min => {
                if b < a {
                    b
                } else {
                    a
                }
            }
            Reducer::Max => {
                if b > a {
                    b
                } else {
                    a
                }
            }
        }
    }

    fn fold(self, values: &[f32]) -> f32 {
        values
            .iter()
            .fold(self.identity(), |acc, &v| self.apply(acc, v))
    }
}

/// Bounded-length min or max trace of an unbounded stream.
///
/// Values are folded in runs of `factor` samples. Whenever the stream
/// outgrows `length * factor` the factor is multiplied up and the stored
/// trace is folded again, so the stored trace never holds more than
/// `length` points.
#[derive(Debug, Clone)]
pub struct TraceDecimationPreview {
    length: usize,
    reducer: Reducer,
    channels: usize,
    factor: u64,
    samples: u64,
    rest_value: Vec<f32>,
    rest_count: Vec<u64>,
    traces: Vec<Vec<f32>>,
}

impl TraceDecimationPreview {
    /// Create a decimator producing `length` points per channel.
    pub fn new(length: usize, reducer: Reducer, channels: usize) -> Result<Self, PreviewError> {
        if length == 0 || channels == 0 {
            return Err(PreviewError::InvalidConfig(format!(
                "trace needs a length and a channel (length={}, channels={})",
                length, channels
            )));
        }
        Ok(Self {
            length,
            reducer,
            channels,
            factor: 1,
            samples: 0,
            rest_value: vec![reducer.identity(); channels],
            rest_count: vec![0; channels],
            traces: vec![Vec::with_capacity(length + 1); channels],
        })
    }

    /// Target trace length
    pub fn length(&self) -> usize {
        self.length
    }

    /// Samples folded into one stored point
    pub fn decimation_factor(&self) -> u64 {
        self.factor
    }

    /// Samples fed per channel
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// The stored points of `channel`, without the pending remainder
    pub fn raw_trace(&self, channel: usize) -> Result<&[f32], PreviewError> {
        self.traces
            .get(channel)
            .map(|t| t.as_slice())
            .ok_or(PreviewError::InvalidChannel(channel))
    }

    /// Add a channel-interleaved block.
    pub fn feed(&mut self, block: &[f32]) -> Result<(), PreviewError> {
        if block.len() % self.channels != 0 {
            return Err(PreviewError::BlockNotMultiple {
                len: block.len(),
                channels: self.channels,
            });
        }
        let count = (block.len() / self.channels) as u64;
        if count == 0 {
            return Ok(());
        }
        self.samples += count;

        let span = self.length as u64 * self.factor;
        if self.samples > span {
            let q = self.samples.div_ceil(span);
            self.redecimate(q);
        }

        let reducer = self.reducer;
        for ch in 0..self.channels {
            let mut value = self.rest_value[ch];
            let mut pending = self.rest_count[ch];
            for &x in block.iter().skip(ch).step_by(self.channels) {
                value = reducer.apply(value, x);
                pending += 1;
                if pending == self.factor {
                    self.traces[ch].push(value);
                    value = reducer.identity();
                    pending = 0;
                }
            }
            self.rest_value[ch] = value;
            self.rest_count[ch] = pending;
        }
        Ok(())
    }

    /// Fold every run of `q` stored points; a trailing partial run joins the
    /// remainder.
    fn redecimate(&mut self, q: u64) {
        let step = q as usize;
        let reducer = self.reducer;
        for ch in 0..self.channels {
            let trace = std::mem::take(&mut self.traces[ch]);
            let mut folded = Vec::with_capacity(self.length + 1);
            for run in trace.chunks(step) {
                if run.len() == step {
                    folded.push(reducer.fold(run));
                } else {
                    self.rest_value[ch] = reducer.apply(self.rest_value[ch], reducer.fold(run));
                    self.rest_count[ch] += run.len() as u64 * self.factor;
                }
            }
            self.traces[ch] = folded;
        }
        self.factor *= q;
    }

    /// Trace of `channel` resampled to exactly `length` points.
    ///
    /// The outstanding remainder is folded into the last point. Nothing fed
    /// yields an empty trace.
    pub fn get_trace(&self, channel: usize) -> Result<Vec<f32>, PreviewError> {
        let stored = self.raw_trace(channel)?;
        let rest = self.rest_value[channel];
        let has_rest = self.rest_count[channel] > 0;

        let source: Vec<f32> = if stored.is_empty() {
            if !has_rest {
                return Ok(Vec::new());
            }
            vec![rest]
        } else {
            stored.to_vec()
        };

        let mut out = resample(&source, self.length, self.reducer);
        if let Some(last) = out.last_mut() {
            *last = self.reducer.apply(*last, rest);
        }
        Ok(out)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Redistribute `source` over `target` slots on a common grid of
/// `lcm(len, target)` sub-slots.
fn resample(source: &[f32], target: usize, reducer: Reducer) -> Vec<f32> {
    let len = source.len();
    if len == target {
        return source.to_vec();
    }
    if len < target {
        // every output slot takes the input slot covering its start
        return (0..target).map(|ip| source[ip * len / target]).collect();
    }

    let lcm = len / gcd(len, target) * target;
    let xm = lcm / len;
    let pm = lcm / target;
    let mut out = vec![reducer.identity(); target];
    let mut value = reducer.identity();
    let mut ip = 0;
    for (ix, &x) in source.iter().enumerate() {
        if (ix + 1) * xm <= (ip + 1) * pm {
            value = reducer.apply(value, x);
        } else {
            out[ip] = value;
            ip = (ip + 1).min(target - 1);
            value = x;
        }
    }
    out[ip] = value;
    out
}
