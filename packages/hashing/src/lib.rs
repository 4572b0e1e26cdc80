//! One hashing interface over fixed-output digests and extendable-output functions
//!
//! Every supported hash function is named by an [`Identifier`]. An identifier
//! knows its name, sizes and family, and hands out a fresh [`Hasher`]:
//!
//! ```
//! use unihash::Identifier;
//!
//! let digest = Identifier::SHA256.hash([b"input"])?;
//! assert_eq!(digest.len(), 32);
//!
//! let mut xof = Identifier::SHAKE128.extendable()?;
//! xof.write(b"input");
//! let stream = xof.read(64)?;
//! assert_eq!(stream.len(), 64);
//! # Ok::<(), unihash::HashError>(())
//! ```
//!
//! Extendable-output functions are SHAKE128, SHAKE256, BLAKE2Xb and BLAKE2Xs
//! (feature `blake2`) and BLAKE3 (feature `blake3`).
//!
//! HMAC and HKDF are available on every [`FixedHasher`]:
//!
//! ```
//! use unihash::Identifier;
//!
//! let sha256 = Identifier::SHA256.fixed()?;
//! let tag = sha256.hmac(b"message", b"key")?;
//! let okm = sha256.hkdf(b"secret", b"salt", b"info", 64)?;
//! assert_eq!((tag.len(), okm.len()), (32, 64));
//! # Ok::<(), unihash::HashError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod extendable;
pub mod fixed;
pub mod hash_result;
pub mod hasher;
pub mod identifier;
pub mod registry;

#[cfg(feature = "blake2")]
mod blake2x;

#[cfg(feature = "async")]
pub mod async_result;
#[cfg(feature = "async")]
pub mod streaming;

// Re-export error types
pub use error::{HashError, Result};

// Re-export hasher types
pub use extendable::ExtendableHasher;
pub use fixed::FixedHasher;
pub use hasher::Hasher;
pub use identifier::{HashType, Identifier, MAX_FIXED, MAX_ID};

// Re-export hash result types
pub use hash_result::HashResult;

#[cfg(feature = "async")]
pub use async_result::{AsyncHashResult, AsyncHashResultWithError, AsyncHashResultWithHandler};
#[cfg(feature = "async")]
pub use streaming::{collect_hash, stream, StreamHashChunk, StreamHashResult, StreamingHasher};
