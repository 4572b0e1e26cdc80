//! Algorithm identifiers and the metadata facade over the registry
//!
//! An [`Identifier`] is a small integer. Values below [`MAX_FIXED`] name
//! fixed-output-length functions and follow the numbering commonly used for
//! cryptographic hash identities (SHA-256 is 5, SHA3-512 is 13, ...). Values
//! between [`MAX_FIXED`] and [`MAX_ID`] name extendable-output functions.
//! Anything else is never available.

use std::fmt;
use std::str::FromStr;

use const_oid::ObjectIdentifier;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::registry;
use crate::{ExtendableHasher, FixedHasher, HashError, Hasher, Result};

/// Boundary between the fixed and the extendable identifier ranges.
pub const MAX_FIXED: u8 = 20;

/// First identifier past the supported range.
pub const MAX_ID: u8 = MAX_FIXED + 6;

/// Family of a hash function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashType {
    /// Merkle–Damgård or sponge construction with one standard digest length.
    FixedOutputLength,
    /// Construction producing an arbitrarily long output stream.
    ExtendableOutputFunction,
}

impl HashType {
    /// Short label of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FixedOutputLength => "fixed",
            Self::ExtendableOutputFunction => "extendable-output-function",
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one hash function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(u8);

impl Identifier {
    /// Zero value, never available.
    pub const NONE: Self = Self(0);

    /// SHA-2 with 224 bit output.
    pub const SHA224: Self = Self(4);
    /// SHA-2 with 256 bit output.
    pub const SHA256: Self = Self(5);
    /// SHA-2 with 384 bit output.
    pub const SHA384: Self = Self(6);
    /// SHA-2 with 512 bit output.
    pub const SHA512: Self = Self(7);
    /// SHA-3 with 224 bit output.
    pub const SHA3_224: Self = Self(10);
    /// SHA-3 with 256 bit output.
    pub const SHA3_256: Self = Self(11);
    /// SHA-3 with 384 bit output.
    pub const SHA3_384: Self = Self(12);
    /// SHA-3 with 512 bit output.
    pub const SHA3_512: Self = Self(13);
    /// SHA-512 truncated to 224 bits.
    pub const SHA512_224: Self = Self(14);
    /// SHA-512 truncated to 256 bits.
    pub const SHA512_256: Self = Self(15);
    /// BLAKE2s with 256 bit output.
    pub const BLAKE2S_256: Self = Self(16);
    /// BLAKE2b with 256 bit output.
    pub const BLAKE2B_256: Self = Self(17);
    /// BLAKE2b with 384 bit output.
    pub const BLAKE2B_384: Self = Self(18);
    /// BLAKE2b with 512 bit output.
    pub const BLAKE2B_512: Self = Self(19);

    /// SHAKE128 extendable-output function.
    pub const SHAKE128: Self = Self(MAX_FIXED + 1);
    /// SHAKE256 extendable-output function.
    pub const SHAKE256: Self = Self(MAX_FIXED + 2);
    /// BLAKE2Xb, the BLAKE2b based extendable-output function.
    pub const BLAKE2XB: Self = Self(MAX_FIXED + 3);
    /// BLAKE2Xs, the BLAKE2s based extendable-output function.
    pub const BLAKE2XS: Self = Self(MAX_FIXED + 4);
    /// BLAKE3 in extendable-output mode.
    pub const BLAKE3: Self = Self(MAX_FIXED + 5);

    /// Maps a numeric hash identity onto an identifier, or [`Identifier::NONE`]
    /// if that function is not available.
    #[must_use]
    pub fn from_u8(id: u8) -> Self {
        let id = Self(id);
        if id.available() {
            id
        } else {
            Self::NONE
        }
    }

    /// Maps an ASN.1 object identifier onto an identifier, or
    /// [`Identifier::NONE`] if no available function carries that OID.
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Self {
        registry::registered()
            .find(|id| id.oid().as_ref() == Some(oid))
            .unwrap_or(Self::NONE)
    }

    pub(crate) const fn from_raw(id: u8) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Reports whether the hash function is linked into the binary.
    #[must_use]
    pub fn available(self) -> bool {
        registry::available(self)
    }

    /// Returns a fresh hasher for this function.
    ///
    /// # Errors
    ///
    /// Returns `HashError::UnsupportedAlgorithm` if the identifier is not available.
    pub fn hasher(self) -> Result<Hasher> {
        registry::entry(self)
            .ok_or(HashError::UnsupportedAlgorithm(self.0))?
            .construct(self)
    }

    /// Returns a fresh fixed-output hasher.
    ///
    /// # Errors
    ///
    /// Returns `HashError::UnsupportedAlgorithm` if the identifier is not available,
    /// or `HashError::WrongHashType` if it names an extendable-output function.
    pub fn fixed(self) -> Result<FixedHasher> {
        match self.hasher()? {
            Hasher::Fixed(hasher) => Ok(hasher),
            Hasher::Extendable(_) => Err(HashError::WrongHashType {
                algorithm: self.name(),
                expected: HashType::FixedOutputLength,
            }),
        }
    }

    /// Returns a fresh extendable-output hasher.
    ///
    /// # Errors
    ///
    /// Returns `HashError::UnsupportedAlgorithm` if the identifier is not available,
    /// or `HashError::WrongHashType` if it names a fixed-output function.
    pub fn extendable(self) -> Result<ExtendableHasher> {
        match self.hasher()? {
            Hasher::Extendable(hasher) => Ok(hasher),
            Hasher::Fixed(_) => Err(HashError::WrongHashType {
                algorithm: self.name(),
                expected: HashType::ExtendableOutputFunction,
            }),
        }
    }

    /// Hashes the concatenation of `input` and returns [`Identifier::size`] bytes.
    ///
    /// # Errors
    ///
    /// Returns `HashError::UnsupportedAlgorithm` if the identifier is not available.
    pub fn hash<I>(self, input: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.hasher()?.hash(self.size(), input)
    }

    /// Name of the hash function, empty when unavailable.
    #[must_use]
    pub fn name(self) -> &'static str {
        registry::entry(self).map_or("", registry::Entry::name)
    }

    /// Underlying block size in bytes.
    ///
    /// Only meaningful for fixed-output functions and sponges; 0 for BLAKE2X and BLAKE3.
    #[must_use]
    pub fn block_size(self) -> usize {
        registry::entry(self).map_or(0, registry::Entry::block_size)
    }

    /// Standard number of bytes returned by [`Identifier::hash`].
    #[must_use]
    pub fn size(self) -> usize {
        registry::entry(self).map_or(0, registry::Entry::output_size)
    }

    /// Security level in bits.
    #[must_use]
    pub fn security_level(self) -> usize {
        registry::entry(self).map_or(0, registry::Entry::security_level)
    }

    /// ASN.1 object identifier of the hash function, if it has one.
    #[must_use]
    pub fn oid(self) -> Option<ObjectIdentifier> {
        registry::entry(self).and_then(registry::Entry::oid)
    }

    /// Type of the hash function, `None` when unavailable.
    #[must_use]
    pub fn hash_type(self) -> Option<HashType> {
        if !self.available() {
            return None;
        }

        match self.0 {
            id if id < MAX_FIXED => Some(HashType::FixedOutputLength),
            id if id > MAX_FIXED && id < MAX_ID => Some(HashType::ExtendableOutputFunction),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Identifier> for u8 {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '/' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl FromStr for Identifier {
    type Err = HashError;

    /// Parses a display name such as `SHA-256`, `sha3_512` or `blake2b-512`.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        registry::registered()
            .find(|id| normalize(id.name()) == wanted)
            .ok_or_else(|| HashError::invalid_parameters(format!("unknown hash function name {s:?}")))
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if !self.available() {
            return Err(serde::ser::Error::custom(format!(
                "hash function {} is not available",
                self.0
            )));
        }
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
