//! Error handling for hashing operations

use thiserror::Error;

use crate::HashType;

/// Hashing-specific errors
///
/// Every variant describes a precondition that was checked before any
/// cryptographic work started, so an error never comes with partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// The identifier is out of range or its algorithm was not compiled in.
    #[error("Unsupported hash algorithm identifier: {0}")]
    UnsupportedAlgorithm(u8),

    /// A typed accessor was asked for the other hash function family.
    #[error("{algorithm} is not a {expected} hash function")]
    WrongHashType {
        /// Name of the algorithm that was asked for.
        algorithm: &'static str,
        /// Family the caller required.
        expected: HashType,
    },

    /// HMAC key longer than the digest.
    #[error("HMAC key length is larger than hash output size: maximum {maximum}, got {actual}")]
    InvalidMacKeyLength {
        /// Digest size in bytes.
        maximum: usize,
        /// Length of the rejected key.
        actual: usize,
    },

    /// Extendable output shorter than the algorithm's standard size.
    #[error("Requested output size too small: minimum {minimum}, got {requested}")]
    OutputTooSmall {
        /// Standard output size in bytes.
        minimum: usize,
        /// Requested length.
        requested: usize,
    },

    /// HKDF output past 255 digests, or a read past the end of a BLAKE2X stream.
    #[error("Requested output size too large: maximum {maximum}, got {requested}")]
    OutputTooLong {
        /// Largest length that could have been served.
        maximum: usize,
        /// Requested length.
        requested: usize,
    },

    /// HKDF pseudorandom key shorter than the digest.
    #[error("Pseudorandom key too short: minimum {minimum}, got {actual}")]
    InvalidPseudorandomKey {
        /// Digest size in bytes.
        minimum: usize,
        /// Length of the rejected key.
        actual: usize,
    },

    /// The MAC implementation refused the key.
    #[error("MAC initialization error: {0}")]
    MacInitialization(String),

    /// Malformed input such as an unknown algorithm name.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Failure inside the crate, e.g. a dropped background task.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HashError {
    /// Create an internal error
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an `invalid_parameters` error
    #[must_use]
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
}

/// Result type for hashing operations
pub type Result<T> = std::result::Result<T, HashError>;
