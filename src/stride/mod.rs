//! Strided, width-converting copies between raw little-endian buffers and
//! typed sample vectors.
//!
//! Samples are stored sample-major: for every sample index the values of all
//! channels follow each other, and for complex or polar data the I and Q
//! value of a channel are adjacent. Reading one array therefore means taking
//! every n-th element of a mapped window; writing means interleaving the
//! caller's arrays back into that order.

mod error;

#[cfg(test)]
mod tests;

pub use error::StrideError;

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::metadata::IqDataType;

/// A floating-point sample type that can be stored in a container.
pub trait Sample: Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static {
    /// Stored data type for this sample
    const DATA_TYPE: IqDataType;

    /// Width in bytes
    const WIDTH: usize;

    /// Decode one value from the first `WIDTH` bytes of `bytes`.
    fn read_le(bytes: &[u8]) -> Self;

    /// Encode into the first `WIDTH` bytes of `out`.
    fn write_le(self, out: &mut [u8]);

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Narrow (or copy) from `f64`.
    fn from_f64(value: f64) -> Self;
}

impl Sample for f32 {
    const DATA_TYPE: IqDataType = IqDataType::Float32;
    const WIDTH: usize = 4;

    fn read_le(bytes: &[u8]) -> Self {
        LittleEndian::read_f32(bytes)
    }

    fn write_le(self, out: &mut [u8]) {
        LittleEndian::write_f32(out, self)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    const DATA_TYPE: IqDataType = IqDataType::Float64;
    const WIDTH: usize = 8;

    fn read_le(bytes: &[u8]) -> Self {
        LittleEndian::read_f64(bytes)
    }

    fn write_le(self, out: &mut [u8]) {
        LittleEndian::write_f64(out, self)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

fn ensure_len(bytes: &[u8], needed: usize) -> Result<(), StrideError> {
    if bytes.len() < needed {
        return Err(StrideError::ShortBuffer {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

/// Number of source elements spanned by `count` values taken every `step`
/// elements starting at `first`.
pub fn span(first: usize, step: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        first + (count - 1) * step + 1
    }
}

/// Copy `count` values of type `S` out of `bytes`, taking element
/// `first + k * step` for the k-th value, converting each to `D`.
pub fn copy_every_nth<S: Sample, D: Sample>(
    bytes: &[u8],
    first: usize,
    step: usize,
    count: usize,
) -> Result<Vec<D>, StrideError> {
    ensure_len(bytes, span(first, step, count) * S::WIDTH)?;

    let mut out = Vec::with_capacity(count);
    for k in 0..count {
        let at = (first + k * step) * S::WIDTH;
        out.push(D::from_f64(S::read_le(&bytes[at..at + S::WIDTH]).to_f64()));
    }
    Ok(out)
}

/// Copy `count` adjacent (I, Q) pairs, skipping `ignore` elements after
/// every pair. The result is I/Q interleaved.
pub fn copy_pairs<S: Sample, D: Sample>(
    bytes: &[u8],
    count: usize,
    ignore: usize,
) -> Result<Vec<D>, StrideError> {
    let step = 2 + ignore;
    let needed = if count == 0 { 0 } else { (count - 1) * step + 2 };
    ensure_len(bytes, needed * S::WIDTH)?;

    let mut out = Vec::with_capacity(2 * count);
    for k in 0..count {
        let at = k * step * S::WIDTH;
        out.push(D::from_f64(S::read_le(&bytes[at..]).to_f64()));
        out.push(D::from_f64(S::read_le(&bytes[at + S::WIDTH..]).to_f64()));
    }
    Ok(out)
}

/// Interleave equal-length arrays sample by sample.
///
/// Given `[a, b, c]` the output is `a0 b0 c0 a1 b1 c1 ...`. Ordering arrays
/// as `ch1_I, ch1_Q, ch2_I, ch2_Q, ...` produces the stored complex layout.
pub fn interleave_arrays<T: Copy>(arrays: &[&[T]]) -> Result<Vec<T>, StrideError> {
    let Some(first) = arrays.first() else {
        return Ok(Vec::new());
    };
    let len = first.len();
    for (index, array) in arrays.iter().enumerate() {
        if array.len() != len {
            return Err(StrideError::LengthMismatch {
                index,
                expected: len,
                found: array.len(),
            });
        }
    }

    let mut out = Vec::with_capacity(len * arrays.len());
    for s in 0..len {
        for array in arrays {
            out.push(array[s]);
        }
    }
    Ok(out)
}

/// Interleave channel buffers that each hold I/Q pairs.
///
/// Every channel is `I0 Q0 I1 Q1 ...`; the output takes one pair from each
/// channel in turn.
pub fn interleave_channels<T: Copy>(channels: &[&[T]]) -> Result<Vec<T>, StrideError> {
    let Some(first) = channels.first() else {
        return Ok(Vec::new());
    };
    let len = first.len();
    for (index, channel) in channels.iter().enumerate() {
        if channel.len() != len {
            return Err(StrideError::LengthMismatch {
                index,
                expected: len,
                found: channel.len(),
            });
        }
        if channel.len() % 2 != 0 {
            return Err(StrideError::OddLength {
                index,
                len: channel.len(),
            });
        }
    }

    let mut out = Vec::with_capacity(len * channels.len());
    for pair in (0..len).step_by(2) {
        for channel in channels {
            out.push(channel[pair]);
            out.push(channel[pair + 1]);
        }
    }
    Ok(out)
}

/// Encode values as contiguous little-endian bytes.
pub fn encode_le<T: Sample>(values: &[T]) -> Vec<u8> {
    let mut out = vec![0u8; values.len() * T::WIDTH];
    for (value, chunk) in values.iter().zip(out.chunks_exact_mut(T::WIDTH)) {
        value.write_le(chunk);
    }
    out
}

/// Decode contiguous little-endian bytes. Trailing partial values are ignored.
pub fn decode_le<T: Sample>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::WIDTH).map(T::read_le).collect()
}
