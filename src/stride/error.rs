/// Errors raised by strided copies and interleaving
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrideError {
    /// Source buffer holds fewer bytes than the strided copy needs
    #[error("source holds {available} bytes, strided copy needs {needed}")]
    ShortBuffer {
        /// Bytes required by the copy
        needed: usize,
        /// Bytes available in the source
        available: usize,
    },

    /// Arrays that must be interleaved have different lengths
    #[error("array {index} has {found} values, expected {expected}")]
    LengthMismatch {
        /// Index of the offending array
        index: usize,
        /// Length of the first array
        expected: usize,
        /// Length of the offending array
        found: usize,
    },

    /// A channel buffer of I/Q pairs has an odd length
    #[error("channel {index} holds an odd number of values ({len})")]
    OddLength {
        /// Index of the offending channel
        index: usize,
        /// Its length
        len: usize,
    },
}
