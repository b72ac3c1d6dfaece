//! Error types for codec operations

use thiserror::Error;

/// Errors that can occur while encoding, correcting or rebuilding shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Codec parameters out of range
    #[error("requires 1 <= k <= n <= 256 (got k={k}, n={n})")]
    InvalidParameters { k: usize, n: usize },

    /// Input buffer is not divisible into k blocks
    #[error("input length {len} must be a multiple of k={k}")]
    InvalidInputLength { len: usize, k: usize },

    /// Output buffer does not match the required size
    #[error("output buffer holds {len} bytes but {expected} are required")]
    InvalidOutputLength { len: usize, expected: usize },

    /// Shares within one batch must all have the same length
    #[error("share {num} has {len} bytes, expected {expected}")]
    UnequalShareLengths {
        num: usize,
        len: usize,
        expected: usize,
    },

    /// Share number outside [0, n)
    #[error("invalid share number {num} (total shares n={n})")]
    InvalidShareNum { num: usize, n: usize },

    /// Two shares in the collection carry the same number
    #[error("duplicate share number {num}")]
    DuplicateShareNum { num: usize },

    /// Fewer shares than reconstruction requires
    #[error("not enough shares: have {have}, need {need}")]
    NotEnoughShares { have: usize, need: usize },

    /// Corruption exceeds the Berlekamp-Welch correction radius
    #[error("too many errors to reconstruct")]
    TooManyErrors,

    /// Division or inversion of the field zero
    #[error("divide by zero in GF(2^8) arithmetic")]
    DivideByZero,

    /// Polynomial long division produced a nonzero leading coefficient
    #[error("algebra invariant violated during polynomial division")]
    AlgebraError,

    /// A matrix that must be invertible by construction was not
    #[error("matrix is singular")]
    SingularMatrix,
}

/// Type alias for Result with the codec [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
