//! The shared hasher contract over both hash function families

use crate::{ExtendableHasher, FixedHasher, HashType, Identifier, Result};

/// A live hash state of either family.
///
/// Operations behave per family: for [`Hasher::Fixed`] `read` and `sum`
/// return a snapshot of the digest and leave the state untouched, for
/// [`Hasher::Extendable`] they consume the output stream. HMAC and HKDF are
/// only reachable through the [`FixedHasher`] variant.
#[derive(Debug, Clone)]
pub enum Hasher {
    /// Fixed-output-length function.
    Fixed(FixedHasher),
    /// Extendable-output function.
    Extendable(ExtendableHasher),
}

impl Hasher {
    /// Hash function identifier.
    #[must_use]
    pub fn algorithm(&self) -> Identifier {
        match self {
            Self::Fixed(h) => h.algorithm(),
            Self::Extendable(h) => h.algorithm(),
        }
    }

    /// Family of the underlying function.
    #[must_use]
    pub fn hash_type(&self) -> HashType {
        match self {
            Self::Fixed(_) => HashType::FixedOutputLength,
            Self::Extendable(_) => HashType::ExtendableOutputFunction,
        }
    }

    /// Adds more data to the running hash. Never fails.
    pub fn write(&mut self, input: &[u8]) {
        match self {
            Self::Fixed(h) => h.write(input),
            Self::Extendable(h) => h.write(input),
        }
    }

    /// Resets the hash to its initial state.
    pub fn reset(&mut self) {
        match self {
            Self::Fixed(h) => h.reset(),
            Self::Extendable(h) => h.reset(),
        }
    }

    /// Hashes the concatenation of `input` from a fresh state.
    ///
    /// `size` is the output length for extendable-output functions and is
    /// ignored by fixed ones, which always return their standard size.
    ///
    /// # Errors
    ///
    /// Returns `HashError::OutputTooSmall` for an extendable-output function
    /// asked for fewer than [`Hasher::size`] bytes, `HashError::OutputTooLong`
    /// for more than a BLAKE2X stream holds.
    pub fn hash<I>(&mut self, size: usize, input: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        match self {
            Self::Fixed(h) => Ok(h.hash(size, input)),
            Self::Extendable(h) => h.hash(size, input),
        }
    }

    /// Returns `size` bytes from the current hash.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::hash`].
    pub fn read(&mut self, size: usize) -> Result<Vec<u8>> {
        match self {
            Self::Fixed(h) => Ok(h.read(size)),
            Self::Extendable(h) => h.read(size),
        }
    }

    /// Appends the current hash to `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `HashError::OutputTooLong` once a BLAKE2X output stream is
    /// exhausted. Fixed-output functions never fail.
    pub fn sum(&mut self, prefix: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Fixed(h) => Ok(h.sum(prefix)),
            Self::Extendable(h) => h.sum(prefix),
        }
    }

    /// Standard output size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.algorithm().size()
    }

    /// Underlying block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.algorithm().block_size()
    }

    /// The fixed-output hasher, if this is one.
    #[must_use]
    pub fn as_fixed(&self) -> Option<&FixedHasher> {
        match self {
            Self::Fixed(h) => Some(h),
            Self::Extendable(_) => None,
        }
    }

    /// Mutable access to the fixed-output hasher, if this is one.
    #[must_use]
    pub fn as_fixed_mut(&mut self) -> Option<&mut FixedHasher> {
        match self {
            Self::Fixed(h) => Some(h),
            Self::Extendable(_) => None,
        }
    }

    /// The extendable-output hasher, if this is one.
    #[must_use]
    pub fn as_extendable(&self) -> Option<&ExtendableHasher> {
        match self {
            Self::Extendable(h) => Some(h),
            Self::Fixed(_) => None,
        }
    }

    /// Mutable access to the extendable-output hasher, if this is one.
    #[must_use]
    pub fn as_extendable_mut(&mut self) -> Option<&mut ExtendableHasher> {
        match self {
            Self::Extendable(h) => Some(h),
            Self::Fixed(_) => None,
        }
    }

    /// Converts into the fixed-output hasher, if this is one.
    #[must_use]
    pub fn into_fixed(self) -> Option<FixedHasher> {
        match self {
            Self::Fixed(h) => Some(h),
            Self::Extendable(_) => None,
        }
    }

    /// Converts into the extendable-output hasher, if this is one.
    #[must_use]
    pub fn into_extendable(self) -> Option<ExtendableHasher> {
        match self {
            Self::Extendable(h) => Some(h),
            Self::Fixed(_) => None,
        }
    }
}

impl From<FixedHasher> for Hasher {
    fn from(hasher: FixedHasher) -> Self {
        Self::Fixed(hasher)
    }
}

impl From<ExtendableHasher> for Hasher {
    fn from(hasher: ExtendableHasher) -> Self {
        Self::Extendable(hasher)
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Hasher::write(self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
