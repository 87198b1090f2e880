use log::debug;

use super::{IqTarReader, ReaderError};
use crate::metadata::{IqDataFormat, IqDataType};
use crate::mmap::MappedFile;
use crate::stride::{copy_every_nth, copy_pairs, Sample};

/// Byte range and stride of one read
struct ReadPlan {
    start: u64,
    len: usize,
    ignore: usize,
}

impl IqTarReader {
    /// Samples per channel actually present in the data entry
    pub fn available_samples(&self) -> Result<u64, ReaderError> {
        let frame = self.metadata.frame_size() as u64;
        Ok(self.data_entry()?.size / frame.max(1))
    }

    fn plan(&self, channel: usize, count: usize, offset: u64) -> Result<ReadPlan, ReaderError> {
        let entry = self.data_entry()?;
        let vps = self.metadata.format.values_per_sample();
        let width = self.metadata.data_type.width();
        let channels = self.metadata.channels.len();
        let frame = (vps * width * channels) as u64;

        let available = entry.size / frame;
        if available == 0 {
            return Err(ReaderError::NoDataFound);
        }
        if offset >= available {
            return Err(ReaderError::StartIndexOutOfRange { offset, available });
        }
        if count == 0 || offset + count as u64 > available {
            return Err(ReaderError::InvalidDataInterval {
                offset,
                count: count as u64,
                available,
            });
        }

        let ignore = vps * (channels - 1);
        let start = entry.offset + (channel * vps * width) as u64 + offset * frame;
        let len = (count * vps + (count - 1) * ignore) * width;
        Ok(ReadPlan { start, len, ignore })
    }

    fn scale<T: Sample>(&self, values: &mut [T]) {
        if let Some(factor) = self.metadata.scaling_factor {
            for v in values.iter_mut() {
                *v = T::from_f64(v.to_f64() * factor);
            }
        }
    }

    /// Read `count` values of array `name`, starting at sample `offset`.
    ///
    /// Stored values are converted to `T` and multiplied by the scaling
    /// factor, if the container has one.
    pub fn read_array<T: Sample>(
        &self,
        name: &str,
        count: usize,
        offset: u64,
    ) -> Result<Vec<T>, ReaderError> {
        let (channel, role) = self.lookup(name)?;
        let plan = self.plan(channel, count, offset)?;
        let vps = self.metadata.format.values_per_sample();
        let first = role.value_index();
        let step = vps + plan.ignore;

        let file = MappedFile::open(&self.path, false)?;
        let window = file.map(plan.start, plan.len)?;
        debug!(
            "read {} values of {} from {} bytes at offset {}",
            count, name, plan.len, plan.start
        );

        let mut values = match self.metadata.data_type {
            IqDataType::Float32 => copy_every_nth::<f32, T>(window.as_slice(), first, step, count)?,
            IqDataType::Float64 => copy_every_nth::<f64, T>(window.as_slice(), first, step, count)?,
        };
        self.scale(&mut values);
        Ok(values)
    }

    /// Read `values` values of channel `channel`, starting at sample
    /// `offset`.
    ///
    /// Real channels return plain values. Complex and polar channels return
    /// interleaved I/Q pairs, so `values` must be even.
    pub fn read_channel<T: Sample>(
        &self,
        channel: &str,
        values: usize,
        offset: u64,
    ) -> Result<Vec<T>, ReaderError> {
        if self.metadata.format == IqDataFormat::Real {
            return self.read_array(channel, values, offset);
        }
        if values % 2 != 0 {
            return Err(ReaderError::InvalidArraySize(values));
        }

        let (index, _) = self.lookup(&format!("{}_I", channel))?;
        let pairs = values / 2;
        let plan = self.plan(index, pairs, offset)?;

        let file = MappedFile::open(&self.path, false)?;
        let window = file.map(plan.start, plan.len)?;

        let mut out = match self.metadata.data_type {
            IqDataType::Float32 => copy_pairs::<f32, T>(window.as_slice(), pairs, plan.ignore)?,
            IqDataType::Float64 => copy_pairs::<f64, T>(window.as_slice(), pairs, plan.ignore)?,
        };
        self.scale(&mut out);
        Ok(out)
    }
}
