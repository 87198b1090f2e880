use crate::metadata::IqDataType;

/// Values returned by a read, in the requested precision
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBuffer {
    /// Single precision values
    Float32(Vec<f32>),
    /// Double precision values
    Float64(Vec<f64>),
}

impl SampleBuffer {
    /// Precision of the values
    pub fn data_type(&self) -> IqDataType {
        match self {
            SampleBuffer::Float32(_) => IqDataType::Float32,
            SampleBuffer::Float64(_) => IqDataType::Float64,
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            SampleBuffer::Float32(v) => v.len(),
            SampleBuffer::Float64(v) => v.len(),
        }
    }

    /// Whether the buffer holds no value
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values if they are single precision
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            SampleBuffer::Float32(v) => Some(v),
            SampleBuffer::Float64(_) => None,
        }
    }

    /// The values if they are double precision
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            SampleBuffer::Float64(v) => Some(v),
            SampleBuffer::Float32(_) => None,
        }
    }

    /// All values widened to `f64`
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            SampleBuffer::Float32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            SampleBuffer::Float64(v) => v.clone(),
        }
    }
}

/// Borrowed arrays handed to an append, all of one precision
#[derive(Debug, Clone, Copy)]
pub enum SampleSlices<'a> {
    /// Single precision arrays
    Float32(&'a [&'a [f32]]),
    /// Double precision arrays
    Float64(&'a [&'a [f64]]),
}

impl<'a> From<&'a [&'a [f32]]> for SampleSlices<'a> {
    fn from(arrays: &'a [&'a [f32]]) -> Self {
        SampleSlices::Float32(arrays)
    }
}

impl<'a> From<&'a [&'a [f64]]> for SampleSlices<'a> {
    fn from(arrays: &'a [&'a [f64]]) -> Self {
        SampleSlices::Float64(arrays)
    }
}
