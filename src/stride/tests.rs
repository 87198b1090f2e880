use super::*;
use proptest::prelude::*;

#[test]
fn test_copy_every_nth_picks_strided_values() {
    // two complex channels: I1c1 Q1c1 I1c2 Q1c2 I2c1 ...
    let stored: Vec<f32> = (0..16).map(|v| v as f32).collect();
    let bytes = encode_le(&stored);

    // channel 1, Q role: first = 1, step = 4
    let q: Vec<f32> = copy_every_nth::<f32, f32>(&bytes, 1, 4, 4).unwrap();
    assert_eq!(q, vec![1.0, 5.0, 9.0, 13.0]);

    // channel 2, I role, widened to f64
    let i: Vec<f64> = copy_every_nth::<f32, f64>(&bytes, 2, 4, 4).unwrap();
    assert_eq!(i, vec![2.0, 6.0, 10.0, 14.0]);
}

#[test]
fn test_copy_every_nth_checks_source_length() {
    let bytes = encode_le(&[1.0f64, 2.0, 3.0]);
    let err = copy_every_nth::<f64, f64>(&bytes, 0, 2, 3).unwrap_err();
    assert_eq!(
        err,
        StrideError::ShortBuffer {
            needed: 40,
            available: 24
        }
    );
}

#[test]
fn test_copy_pairs_skips_other_channels() {
    // three complex channels, read channel 1 pairs
    let stored: Vec<f64> = (0..18).map(|v| v as f64).collect();
    let bytes = encode_le(&stored);

    let pairs: Vec<f32> = copy_pairs::<f64, f32>(&bytes, 3, 4).unwrap();
    assert_eq!(pairs, vec![0.0, 1.0, 6.0, 7.0, 12.0, 13.0]);
}

#[test]
fn test_copy_zero_values() {
    let empty: Vec<f32> = copy_every_nth::<f32, f32>(&[], 3, 7, 0).unwrap();
    assert!(empty.is_empty());
    let pairs: Vec<f32> = copy_pairs::<f32, f32>(&[], 0, 2).unwrap();
    assert!(pairs.is_empty());
}

#[test]
fn test_interleave_arrays_sample_major() {
    let i1 = [1.0f32, 2.0];
    let q1 = [10.0f32, 20.0];
    let i2 = [100.0f32, 200.0];
    let q2 = [1000.0f32, 2000.0];
    let out = interleave_arrays(&[&i1[..], &q1[..], &i2[..], &q2[..]]).unwrap();
    assert_eq!(out, vec![1.0, 10.0, 100.0, 1000.0, 2.0, 20.0, 200.0, 2000.0]);
}

#[test]
fn test_interleave_arrays_rejects_length_mismatch() {
    let a = [1.0f32, 2.0];
    let b = [1.0f32];
    let err = interleave_arrays(&[&a[..], &b[..]]).unwrap_err();
    assert_eq!(
        err,
        StrideError::LengthMismatch {
            index: 1,
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_interleave_channels_pairs() {
    let c1 = [1.0f64, -1.0, 2.0, -2.0];
    let c2 = [5.0f64, -5.0, 6.0, -6.0];
    let out = interleave_channels(&[&c1[..], &c2[..]]).unwrap();
    assert_eq!(out, vec![1.0, -1.0, 5.0, -5.0, 2.0, -2.0, 6.0, -6.0]);

    let odd = [1.0f64, 2.0, 3.0];
    assert!(matches!(
        interleave_channels(&[&odd[..]]),
        Err(StrideError::OddLength { index: 0, len: 3 })
    ));
}

proptest! {
    /// Interleaving arrays and reading each back with its stride restores it
    #[test]
    fn test_interleave_then_stride(
        arrays in (1usize..5, 0usize..40).prop_flat_map(|(n, len)| {
            prop::collection::vec(
                prop::collection::vec(any::<f32>().prop_filter("finite", |v| v.is_finite()), len..=len),
                n..=n,
            )
        })
    ) {
        let views: Vec<&[f32]> = arrays.iter().map(|a| a.as_slice()).collect();
        let stored = interleave_arrays(&views).unwrap();
        let bytes = encode_le(&stored);
        let len = arrays[0].len();

        for (index, original) in arrays.iter().enumerate() {
            let back: Vec<f32> = copy_every_nth::<f32, f32>(&bytes, index, arrays.len(), len).unwrap();
            prop_assert_eq!(&back, original);
        }
    }
}
