//! Extendable-output functions (SHAKE, BLAKE2X, BLAKE3)
//!
//! Output is a stream: every `read` consumes bytes and the next one continues
//! where the previous stopped.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake128Reader, Shake256, Shake256Reader};
use tracing::{debug, warn};

#[cfg(feature = "blake2")]
use crate::blake2x::{Blake2Xb, Blake2XbReader, Blake2Xs, Blake2XsReader};
use crate::{HashError, Hasher, Identifier, Result};

/// Absorbing side of the function: accumulates input.
#[derive(Clone)]
enum Absorber {
    Shake128(Shake128),
    Shake256(Shake256),
    #[cfg(feature = "blake2")]
    Blake2Xb(Box<Blake2Xb>),
    #[cfg(feature = "blake2")]
    Blake2Xs(Box<Blake2Xs>),
    #[cfg(feature = "blake3")]
    Blake3(Box<blake3::Hasher>),
}

/// Squeezing side of the function: the output stream after finalization.
#[derive(Clone)]
enum Squeezer {
    Shake128(Shake128Reader),
    Shake256(Shake256Reader),
    #[cfg(feature = "blake2")]
    Blake2Xb(Box<Blake2XbReader>),
    #[cfg(feature = "blake2")]
    Blake2Xs(Box<Blake2XsReader>),
    #[cfg(feature = "blake3")]
    Blake3(blake3::OutputReader),
}

impl Absorber {
    fn new(id: Identifier) -> Option<Self> {
        let absorber = match id {
            Identifier::SHAKE128 => Self::Shake128(Shake128::default()),
            Identifier::SHAKE256 => Self::Shake256(Shake256::default()),
            #[cfg(feature = "blake2")]
            Identifier::BLAKE2XB => Self::Blake2Xb(Box::new(Blake2Xb::new())),
            #[cfg(feature = "blake2")]
            Identifier::BLAKE2XS => Self::Blake2Xs(Box::new(Blake2Xs::new())),
            #[cfg(feature = "blake3")]
            Identifier::BLAKE3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            _ => return None,
        };

        Some(absorber)
    }

    fn update(&mut self, input: &[u8]) {
        match self {
            Self::Shake128(xof) => xof.update(input),
            Self::Shake256(xof) => xof.update(input),
            #[cfg(feature = "blake2")]
            Self::Blake2Xb(xof) => xof.update(input),
            #[cfg(feature = "blake2")]
            Self::Blake2Xs(xof) => xof.update(input),
            #[cfg(feature = "blake3")]
            Self::Blake3(xof) => {
                xof.update(input);
            }
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Shake128(xof) => *xof = Shake128::default(),
            Self::Shake256(xof) => *xof = Shake256::default(),
            #[cfg(feature = "blake2")]
            Self::Blake2Xb(xof) => xof.reset(),
            #[cfg(feature = "blake2")]
            Self::Blake2Xs(xof) => xof.reset(),
            #[cfg(feature = "blake3")]
            Self::Blake3(xof) => {
                xof.reset();
            }
        }
    }

    /// Finalizes a copy of the absorbed input, the absorber stays usable.
    fn squeeze(&self) -> Squeezer {
        match self {
            Self::Shake128(xof) => Squeezer::Shake128(xof.clone().finalize_xof()),
            Self::Shake256(xof) => Squeezer::Shake256(xof.clone().finalize_xof()),
            #[cfg(feature = "blake2")]
            Self::Blake2Xb(xof) => Squeezer::Blake2Xb(Box::new(xof.squeeze())),
            #[cfg(feature = "blake2")]
            Self::Blake2Xs(xof) => Squeezer::Blake2Xs(Box::new(xof.squeeze())),
            #[cfg(feature = "blake3")]
            Self::Blake3(xof) => Squeezer::Blake3(xof.finalize_xof()),
        }
    }
}

impl Squeezer {
    /// Bytes the stream can still produce, `None` when unbounded.
    fn remaining(&self) -> Option<u64> {
        match self {
            #[cfg(feature = "blake2")]
            Self::Blake2Xb(reader) => Some(reader.remaining()),
            #[cfg(feature = "blake2")]
            Self::Blake2Xs(reader) => Some(reader.remaining()),
            _ => None,
        }
    }

    fn fill(&mut self, output: &mut [u8]) {
        match self {
            Self::Shake128(reader) => reader.read(output),
            Self::Shake256(reader) => reader.read(output),
            #[cfg(feature = "blake2")]
            Self::Blake2Xb(reader) => reader.fill(output),
            #[cfg(feature = "blake2")]
            Self::Blake2Xs(reader) => reader.fill(output),
            #[cfg(feature = "blake3")]
            Self::Blake3(reader) => reader.fill(output),
        }
    }
}

/// Easy-to-use API for extendable-output functions.
///
/// Unlike [`FixedHasher`](crate::FixedHasher), reading is destructive and
/// no keyed constructions are offered. Owned by one caller at a time.
#[derive(Clone)]
pub struct ExtendableHasher {
    id: Identifier,
    absorber: Absorber,
    squeezer: Option<Squeezer>,
}

impl std::fmt::Debug for ExtendableHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendableHasher")
            .field("algorithm", &self.id.name())
            .field("squeezing", &self.squeezer.is_some())
            .finish_non_exhaustive()
    }
}

impl ExtendableHasher {
    pub(crate) fn construct(id: Identifier) -> Result<Hasher> {
        Self::new(id).map(Hasher::Extendable)
    }

    pub(crate) fn new(id: Identifier) -> Result<Self> {
        let absorber = Absorber::new(id).ok_or(HashError::UnsupportedAlgorithm(id.as_u8()))?;
        debug!(algorithm = id.name(), "new extendable-output hasher");
        Ok(Self {
            id,
            absorber,
            squeezer: None,
        })
    }

    /// Hash function identifier.
    #[must_use]
    pub fn algorithm(&self) -> Identifier {
        self.id
    }

    /// Absorbs more data.
    ///
    /// Writing after output has been read discards the current output stream;
    /// the next read starts a fresh stream over everything written so far.
    /// An empty write changes nothing.
    pub fn write(&mut self, input: &[u8]) {
        if input.is_empty() {
            return;
        }

        if self.squeezer.take().is_some() {
            debug!(algorithm = self.id.name(), "write after read, output stream restarted");
        }

        self.absorber.update(input);
    }

    /// Discards all absorbed input and the output stream position.
    pub fn reset(&mut self) {
        self.squeezer = None;
        self.absorber.reset();
    }

    /// Hashes the concatenation of `input` from a fresh state and returns
    /// `size` bytes of output.
    ///
    /// # Errors
    ///
    /// Returns `HashError::OutputTooSmall` if `size` is below [`ExtendableHasher::size`]
    /// and `HashError::OutputTooLong` if it exceeds a BLAKE2X stream.
    pub fn hash<I>(&mut self, size: usize, input: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.check_output_size(size)?;
        self.reset();
        for chunk in input {
            self.write(chunk.as_ref());
        }

        self.squeeze(size)
    }

    /// Consumes and returns the next `size` bytes of the output stream.
    ///
    /// # Errors
    ///
    /// Returns `HashError::OutputTooSmall` if `size` is below
    /// [`ExtendableHasher::size`], or `HashError::OutputTooLong` if the
    /// remaining BLAKE2X stream is shorter than `size`. Output is never
    /// silently truncated.
    pub fn read(&mut self, size: usize) -> Result<Vec<u8>> {
        self.check_output_size(size)?;
        self.squeeze(size)
    }

    /// Appends the next [`ExtendableHasher::size`] bytes of the output stream
    /// to `prefix`. Consumes output like [`ExtendableHasher::read`].
    ///
    /// # Errors
    ///
    /// Returns `HashError::OutputTooLong` once a BLAKE2X stream is exhausted.
    pub fn sum(&mut self, prefix: &[u8]) -> Result<Vec<u8>> {
        let digest = self.squeeze(self.size())?;
        let mut output = Vec::with_capacity(prefix.len() + digest.len());
        output.extend_from_slice(prefix);
        output.extend_from_slice(&digest);
        Ok(output)
    }

    /// Minimum, and standard, output length in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.id.size()
    }

    /// Sponge rate in bytes for SHAKE, 0 for BLAKE2X and BLAKE3.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.id.block_size()
    }

    fn check_output_size(&self, size: usize) -> Result<()> {
        if size < self.size() {
            warn!(
                algorithm = self.id.name(),
                requested = size,
                minimum = self.size(),
                "rejected extendable output below the standard size"
            );
            return Err(HashError::OutputTooSmall {
                minimum: self.size(),
                requested: size,
            });
        }

        Ok(())
    }

    fn squeeze(&mut self, size: usize) -> Result<Vec<u8>> {
        let absorber = &self.absorber;
        let squeezer = self.squeezer.get_or_insert_with(|| absorber.squeeze());

        if let Some(remaining) = squeezer.remaining() {
            if size as u64 > remaining {
                warn!(
                    algorithm = self.id.name(),
                    requested = size,
                    remaining,
                    "rejected extendable output past the end of the stream"
                );
                return Err(HashError::OutputTooLong {
                    maximum: usize::try_from(remaining).unwrap_or(usize::MAX),
                    requested: size,
                });
            }
        }

        let mut output = vec![0u8; size];
        squeezer.fill(&mut output);
        Ok(output)
    }
}

impl std::io::Write for ExtendableHasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        ExtendableHasher::write(self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
