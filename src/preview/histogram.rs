use rustfft::num_complex::Complex32;

use super::PreviewError;

/// Adaptive 2D I/Q histogram.
///
/// Every channel owns a `2N x 2N` grid; all channels share one bin width.
/// The grid starts sized to the first block and is coarsened in place
/// whenever a later block exceeds its range, so counts are never dropped.
#[derive(Debug, Clone)]
pub struct HistogramPreview {
    half_width: usize,
    channels: usize,
    bin_width: f32,
    grids: Vec<Vec<u64>>,
    samples: u64,
}

impl HistogramPreview {
    /// Create a histogram with `half_width` bins per half axis.
    pub fn new(half_width: usize, channels: usize) -> Result<Self, PreviewError> {
        if half_width == 0 || channels == 0 {
            return Err(PreviewError::InvalidConfig(format!(
                "histogram needs at least one bin and one channel (bins={}, channels={})",
                half_width, channels
            )));
        }
        let side = 2 * half_width;
        Ok(Self {
            half_width,
            channels,
            bin_width: 0.0,
            grids: vec![vec![0; side * side]; channels],
            samples: 0,
        })
    }

    /// Bins per half axis
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Bins per row and per column
    pub fn side(&self) -> usize {
        2 * self.half_width
    }

    /// Current bin width; 0 until a non-zero sample was seen
    pub fn bin_width(&self) -> f32 {
        self.bin_width
    }

    /// Samples fed per channel
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Count grid of `channel`, row-major, row 0 is the most positive Q
    pub fn grid(&self, channel: usize) -> Result<&[u64], PreviewError> {
        self.grids
            .get(channel)
            .map(|g| g.as_slice())
            .ok_or(PreviewError::InvalidChannel(channel))
    }

    /// Sum of all bins of `channel`
    pub fn total(&self, channel: usize) -> Result<u64, PreviewError> {
        Ok(self.grid(channel)?.iter().sum())
    }

    /// Add a channel-interleaved block.
    pub fn feed(&mut self, block: &[Complex32]) -> Result<(), PreviewError> {
        if block.len() % self.channels != 0 {
            return Err(PreviewError::BlockNotMultiple {
                len: block.len(),
                channels: self.channels,
            });
        }
        if block.is_empty() {
            return Ok(());
        }

        let max_abs = block
            .iter()
            .flat_map(|c| [c.re, c.im])
            .filter(|v| v.is_finite())
            .fold(0.0f32, |acc, v| acc.max(v.abs()));

        let n = self.half_width as f32;
        if self.bin_width == 0.0 {
            self.bin_width = max_abs / (n - 0.5);
        }
        if self.bin_width > 0.0 && max_abs >= self.bin_width * n {
            let factor = (max_abs / self.bin_width / (n - 0.5)).ceil() as usize;
            self.rebin(factor);
        }

        let side = self.side();
        for (ch, grid) in self.grids.iter_mut().enumerate() {
            for sample in block.iter().skip(ch).step_by(self.channels) {
                let col = bin_index(sample.re, self.bin_width, self.half_width);
                let row = bin_index(-sample.im, self.bin_width, self.half_width);
                grid[row * side + col] += 1;
            }
        }
        self.samples += (block.len() / self.channels) as u64;
        Ok(())
    }

    /// Merge every run of `factor` adjacent bins toward the center on each
    /// half axis and widen the bins accordingly.
    fn rebin(&mut self, factor: usize) {
        if factor < 2 {
            return;
        }
        let n = self.half_width;
        let side = self.side();
        let merge = |i: usize| {
            if i >= n {
                n + (i - n) / factor
            } else {
                n - 1 - (n - 1 - i) / factor
            }
        };

        for grid in &mut self.grids {
            let mut merged = vec![0u64; side * side];
            for row in 0..side {
                let target_row = merge(row);
                for col in 0..side {
                    merged[target_row * side + merge(col)] += grid[row * side + col];
                }
            }
            *grid = merged;
        }
        self.bin_width *= factor as f32;
    }

    /// Render `channel` as one digit per bin.
    ///
    /// An empty bin is `0`; a bin holding `x` counts becomes
    /// `(9 (x - 1) + max) / max` where `max` is the largest count, floored
    /// at 9.
    pub fn render_digits(&self, channel: usize) -> Result<String, PreviewError> {
        let grid = self.grid(channel)?;
        let max = grid.iter().copied().max().unwrap_or(0).max(9);
        Ok(grid
            .iter()
            .map(|&x| {
                if x == 0 {
                    '0'
                } else {
                    let digit = ((9 * (x - 1) + max) / max).min(9) as u32;
                    char::from_digit(digit, 10).unwrap_or('9')
                }
            })
            .collect())
    }
}

/// Bin of one component. Zero always lands in bin `n`; values outside the
/// grid (including non-finite ones) are clamped to the edge bins.
fn bin_index(value: f32, bin_width: f32, n: usize) -> usize {
    let last = 2 * n - 1;
    if !value.is_finite() {
        return if value.is_sign_negative() { 0 } else { last };
    }
    if bin_width <= 0.0 {
        return n;
    }
    let index = (value / bin_width).floor() as i64 + n as i64;
    index.clamp(0, last as i64) as usize
}
