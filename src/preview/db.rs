use super::PreviewError;

/// Convert a min/max pair of power traces (V^2) to whole dB in place.
///
/// Non-positive values have no logarithm: in the min trace they are replaced
/// by the smallest positive value of either trace, in the max trace by a
/// tenth of it. When the traces carry a single level the lower reference is
/// put 100 dB below it. Min points round down, max points round up.
pub fn power_traces_to_db(min: &mut [f32], max: &mut [f32]) -> Result<(), PreviewError> {
    if min.len() != max.len() {
        return Err(PreviewError::TraceLengthMismatch {
            min: min.len(),
            max: max.len(),
        });
    }

    let lowest_min = min.iter().copied().filter(|v| *v > 0.0).reduce(f32::min);
    let highest_max = max.iter().copied().filter(|v| *v > 0.0).reduce(f32::max);

    let (mut floor, ceiling) = match (lowest_min, highest_max) {
        (Some(lo), Some(hi)) => (lo, hi),
        (Some(lo), None) => (lo, lo),
        (None, Some(hi)) => (hi, hi),
        // silent or empty: everything ends up at -200 dB
        (None, None) => (1.0e-20, 1.0e-20),
    };
    if floor == ceiling {
        floor = 1.0e-10 * ceiling;
    }

    for v in min.iter_mut() {
        if *v <= 0.0 || v.is_nan() {
            *v = floor;
        }
        *v = (10.0 * (*v as f64).log10()).floor() as f32;
    }
    for v in max.iter_mut() {
        if *v <= 0.0 || v.is_nan() {
            *v = 0.1 * floor;
        }
        *v = (10.0 * (*v as f64).log10()).ceil() as f32;
    }
    Ok(())
}
