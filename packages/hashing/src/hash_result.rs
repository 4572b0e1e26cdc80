//! Hash output tagged with the function that produced it

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::Identifier;

/// Output of a hash, MAC or key derivation, with encoding helpers.
///
/// The bytes are wiped when the value is dropped, since MAC tags and derived
/// keys travel through the same type as plain digests. Equality compares the
/// bytes in constant time.
#[derive(Clone, Debug)]
pub struct HashResult {
    algorithm: Identifier,
    bytes: Vec<u8>,
}

impl HashResult {
    /// Create a new hash result from raw bytes
    #[must_use]
    pub fn new(algorithm: Identifier, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// Function that produced the bytes
    #[must_use]
    pub fn algorithm(&self) -> Identifier {
        self.algorithm
    }

    /// Get the raw bytes of the hash
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the raw bytes out of the result
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    /// Get the hash as a hexadecimal string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Get the hash as a base64 string
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::{engine::general_purpose, Engine as _};
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Get the hash as a base64url string (URL-safe)
    #[must_use]
    pub fn to_base64url(&self) -> String {
        base64_url::encode(&self.bytes)
    }

    /// Compares against `expected` in constant time.
    #[must_use]
    pub fn verify(&self, expected: &[u8]) -> bool {
        self.bytes.ct_eq(expected).into()
    }

    /// Get the length of the hash in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the hash is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for HashResult {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl Eq for HashResult {}

impl Drop for HashResult {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl From<HashResult> for Vec<u8> {
    fn from(result: HashResult) -> Self {
        result.into_bytes()
    }
}

impl AsRef<[u8]> for HashResult {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
