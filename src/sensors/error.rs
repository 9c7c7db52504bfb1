//! Error handling for sensor decoding.

/// A descriptor does not fit the payload it is evaluated against.
/// These are configuration errors and are never retried.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Register/conversion arity mismatch: {registers} registers, {conversions} conversions")]
    ArityMismatch {
        registers: usize,
        conversions: usize,
    },
    #[error("Register {position} out of range (payload has {len} registers)")]
    IndexOutOfRange { position: usize, len: usize },
    #[error("Label conversions cannot be summed over several registers")]
    NonNumericComposite,
}

pub type Result<T> = std::result::Result<T, DecodeError>;
