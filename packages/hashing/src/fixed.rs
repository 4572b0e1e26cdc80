//! Fixed-output-length hash functions (SHA-2, SHA-3, BLAKE2)
//!
//! Reading the digest is a projection of the data written so far: `sum` and
//! `read` never change the state, so writing may continue afterwards.

use digest::Digest;
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use tracing::{debug, trace, warn};

use crate::{HashError, Hasher, Identifier, Result};

/// HKDF cannot expand to more than this many hash-length blocks.
const HKDF_MAX_BLOCKS: usize = 255;

/// Keyed constructions over one concrete digest type.
trait Keyed: Digest + Clone {
    fn hmac(key: &[u8], message: &[u8]) -> Result<Vec<u8>>;

    fn verify_hmac(key: &[u8], message: &[u8], tag: &[u8]) -> Result<bool>;

    fn hkdf_extract(secret: &[u8], salt: &[u8]) -> Vec<u8>;

    fn hkdf(secret: &[u8], salt: &[u8], info: &[u8], okm: &mut [u8]) -> bool;

    fn hkdf_expand(prk: &[u8], info: &[u8], okm: &mut [u8]) -> bool;
}

macro_rules! impl_keyed {
    ($digest:ty => $mac:ty, $kdf:ty) => {
        impl Keyed for $digest {
            fn hmac(key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
                let mut mac = <$mac as Mac>::new_from_slice(key)
                    .map_err(|e| HashError::MacInitialization(e.to_string()))?;
                mac.update(message);
                Ok(mac.finalize().into_bytes().to_vec())
            }

            fn verify_hmac(key: &[u8], message: &[u8], tag: &[u8]) -> Result<bool> {
                let mut mac = <$mac as Mac>::new_from_slice(key)
                    .map_err(|e| HashError::MacInitialization(e.to_string()))?;
                mac.update(message);
                Ok(mac.verify_slice(tag).is_ok())
            }

            fn hkdf_extract(secret: &[u8], salt: &[u8]) -> Vec<u8> {
                let (prk, _) = <$kdf>::extract(Some(salt), secret);
                prk.to_vec()
            }

            fn hkdf(secret: &[u8], salt: &[u8], info: &[u8], okm: &mut [u8]) -> bool {
                <$kdf>::new(Some(salt), secret).expand(info, okm).is_ok()
            }

            fn hkdf_expand(prk: &[u8], info: &[u8], okm: &mut [u8]) -> bool {
                <$kdf>::from_prk(prk).is_ok_and(|kdf| kdf.expand(info, okm).is_ok())
            }
        }
    };
    ($($digest:ty),+ $(,)?) => {
        $(impl_keyed!($digest => Hmac<$digest>, Hkdf<$digest>);)+
    };
}

impl_keyed!(
    sha2::Sha224,
    sha2::Sha256,
    sha2::Sha384,
    sha2::Sha512,
    sha2::Sha512_224,
    sha2::Sha512_256,
);

impl_keyed!(sha3::Sha3_224, sha3::Sha3_256, sha3::Sha3_384, sha3::Sha3_512);

// BLAKE2 buffers lazily, which the block-level HMAC does not accept.
#[cfg(feature = "blake2")]
mod blake2_keyed {
    use super::{HashError, Keyed, Mac, Result};
    use blake2::digest::consts::{U32, U48};
    use blake2::{Blake2b, Blake2b512, Blake2s256};
    use hkdf::SimpleHkdf;
    use hmac::SimpleHmac;

    impl_keyed!(Blake2s256 => SimpleHmac<Blake2s256>, SimpleHkdf<Blake2s256>);
    impl_keyed!(Blake2b<U32> => SimpleHmac<Blake2b<U32>>, SimpleHkdf<Blake2b<U32>>);
    impl_keyed!(Blake2b<U48> => SimpleHmac<Blake2b<U48>>, SimpleHkdf<Blake2b<U48>>);
    impl_keyed!(Blake2b512 => SimpleHmac<Blake2b512>, SimpleHkdf<Blake2b512>);
}

#[derive(Clone)]
enum State {
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
    Sha3_224(sha3::Sha3_224),
    Sha3_256(sha3::Sha3_256),
    Sha3_384(sha3::Sha3_384),
    Sha3_512(sha3::Sha3_512),
    Sha512_224(sha2::Sha512_224),
    Sha512_256(sha2::Sha512_256),
    #[cfg(feature = "blake2")]
    Blake2s256(blake2::Blake2s256),
    #[cfg(feature = "blake2")]
    Blake2b256(blake2::Blake2b<blake2::digest::consts::U32>),
    #[cfg(feature = "blake2")]
    Blake2b384(blake2::Blake2b<blake2::digest::consts::U48>),
    #[cfg(feature = "blake2")]
    Blake2b512(blake2::Blake2b512),
}

/// Runs `$body` with `$h` bound to the concrete digest state and `$d` naming
/// its type.
macro_rules! dispatch {
    (@arm $h:ident, $d:ident, $ty:ty, $body:expr) => {{
        #[allow(dead_code)]
        type $d = $ty;
        $body
    }};
    ($state:expr, $h:ident: $d:ident => $body:expr) => {
        match $state {
            State::Sha224($h) => dispatch!(@arm $h, $d, sha2::Sha224, $body),
            State::Sha256($h) => dispatch!(@arm $h, $d, sha2::Sha256, $body),
            State::Sha384($h) => dispatch!(@arm $h, $d, sha2::Sha384, $body),
            State::Sha512($h) => dispatch!(@arm $h, $d, sha2::Sha512, $body),
            State::Sha3_224($h) => dispatch!(@arm $h, $d, sha3::Sha3_224, $body),
            State::Sha3_256($h) => dispatch!(@arm $h, $d, sha3::Sha3_256, $body),
            State::Sha3_384($h) => dispatch!(@arm $h, $d, sha3::Sha3_384, $body),
            State::Sha3_512($h) => dispatch!(@arm $h, $d, sha3::Sha3_512, $body),
            State::Sha512_224($h) => dispatch!(@arm $h, $d, sha2::Sha512_224, $body),
            State::Sha512_256($h) => dispatch!(@arm $h, $d, sha2::Sha512_256, $body),
            #[cfg(feature = "blake2")]
            State::Blake2s256($h) => dispatch!(@arm $h, $d, blake2::Blake2s256, $body),
            #[cfg(feature = "blake2")]
            State::Blake2b256($h) => {
                dispatch!(@arm $h, $d, blake2::Blake2b<blake2::digest::consts::U32>, $body)
            }
            #[cfg(feature = "blake2")]
            State::Blake2b384($h) => {
                dispatch!(@arm $h, $d, blake2::Blake2b<blake2::digest::consts::U48>, $body)
            }
            #[cfg(feature = "blake2")]
            State::Blake2b512($h) => dispatch!(@arm $h, $d, blake2::Blake2b512, $body),
        }
    };
}

impl State {
    fn new(id: Identifier) -> Option<Self> {
        let state = match id {
            Identifier::SHA224 => Self::Sha224(Default::default()),
            Identifier::SHA256 => Self::Sha256(Default::default()),
            Identifier::SHA384 => Self::Sha384(Default::default()),
            Identifier::SHA512 => Self::Sha512(Default::default()),
            Identifier::SHA3_224 => Self::Sha3_224(Default::default()),
            Identifier::SHA3_256 => Self::Sha3_256(Default::default()),
            Identifier::SHA3_384 => Self::Sha3_384(Default::default()),
            Identifier::SHA3_512 => Self::Sha3_512(Default::default()),
            Identifier::SHA512_224 => Self::Sha512_224(Default::default()),
            Identifier::SHA512_256 => Self::Sha512_256(Default::default()),
            #[cfg(feature = "blake2")]
            Identifier::BLAKE2S_256 => Self::Blake2s256(Default::default()),
            #[cfg(feature = "blake2")]
            Identifier::BLAKE2B_256 => Self::Blake2b256(Default::default()),
            #[cfg(feature = "blake2")]
            Identifier::BLAKE2B_384 => Self::Blake2b384(Default::default()),
            #[cfg(feature = "blake2")]
            Identifier::BLAKE2B_512 => Self::Blake2b512(Default::default()),
            _ => return None,
        };

        Some(state)
    }
}

/// Easy-to-use API for fixed-output-length hash functions and the keyed
/// constructions built on them.
///
/// A `FixedHasher` is owned by one caller at a time; share it across threads
/// only behind external synchronization.
#[derive(Clone)]
pub struct FixedHasher {
    id: Identifier,
    state: State,
}

impl std::fmt::Debug for FixedHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedHasher")
            .field("algorithm", &self.id.name())
            .finish_non_exhaustive()
    }
}

impl FixedHasher {
    pub(crate) fn construct(id: Identifier) -> Result<Hasher> {
        Self::new(id).map(Hasher::Fixed)
    }

    pub(crate) fn new(id: Identifier) -> Result<Self> {
        let state = State::new(id).ok_or(HashError::UnsupportedAlgorithm(id.as_u8()))?;
        debug!(algorithm = id.name(), "new fixed-output hasher");
        Ok(Self { id, state })
    }

    /// Hash function identifier.
    #[must_use]
    pub fn algorithm(&self) -> Identifier {
        self.id
    }

    /// Adds more data to the running hash.
    pub fn write(&mut self, input: &[u8]) {
        dispatch!(&mut self.state, h: _D => Digest::update(h, input));
    }

    /// Resets the hash to its initial state.
    pub fn reset(&mut self) {
        dispatch!(&mut self.state, h: _D => Digest::reset(h));
    }

    /// Hashes the concatenation of `input` from a fresh state and returns the
    /// standard digest. The size hint is ignored; the output is always
    /// [`FixedHasher::size`] bytes.
    pub fn hash<I>(&mut self, size_hint: usize, input: I) -> Vec<u8>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.reset();
        for chunk in input {
            self.write(chunk.as_ref());
        }

        self.read(size_hint)
    }

    /// Returns the digest of the data written so far, leaving the state
    /// untouched. The size hint is ignored.
    #[must_use]
    pub fn read(&self, size_hint: usize) -> Vec<u8> {
        if size_hint != self.size() {
            trace!(
                algorithm = self.id.name(),
                size_hint,
                size = self.size(),
                "size hint ignored for fixed-output hash"
            );
        }

        self.digest()
    }

    /// Appends the current digest to `prefix`, leaving the state untouched.
    #[must_use]
    pub fn sum(&self, prefix: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(prefix.len() + self.size());
        output.extend_from_slice(prefix);
        output.extend_from_slice(&self.digest());
        output
    }

    /// Standard digest length in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.id.size()
    }

    /// Underlying block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.id.block_size()
    }

    fn digest(&self) -> Vec<u8> {
        dispatch!(&self.state, h: _D => Digest::finalize(h.clone()).to_vec())
    }

    fn check_hmac_key(&self, key: &[u8]) -> Result<()> {
        if key.len() > self.size() {
            warn!(
                algorithm = self.id.name(),
                key_len = key.len(),
                "rejected HMAC key longer than the digest"
            );
            return Err(HashError::InvalidMacKeyLength {
                maximum: self.size(),
                actual: key.len(),
            });
        }

        Ok(())
    }

    /// Computes the HMAC of `message` under `key` with this hash function.
    ///
    /// # Errors
    ///
    /// Returns `HashError::InvalidMacKeyLength` if `key` is longer than
    /// [`FixedHasher::size`].
    pub fn hmac(&self, message: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        self.check_hmac_key(key)?;
        dispatch!(&self.state, _h: D => <D as Keyed>::hmac(key, message))
    }

    /// Checks `tag` against the HMAC of `message` in constant time.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`FixedHasher::hmac`].
    pub fn verify_hmac(&self, message: &[u8], key: &[u8], tag: &[u8]) -> Result<bool> {
        self.check_hmac_key(key)?;
        dispatch!(&self.state, _h: D => <D as Keyed>::verify_hmac(key, message, tag))
    }

    /// "Extract" half of HKDF: turns `secret` and `salt` into a pseudorandom
    /// key of [`FixedHasher::size`] bytes, usable in several
    /// [`FixedHasher::hkdf_expand`] calls.
    #[must_use]
    pub fn hkdf_extract(&self, secret: &[u8], salt: &[u8]) -> Vec<u8> {
        dispatch!(&self.state, _h: D => <D as Keyed>::hkdf_extract(secret, salt))
    }

    /// Extract-then-expand HKDF, where `info` identifies the key usage.
    /// A `length` of 0 yields [`FixedHasher::size`] bytes.
    ///
    /// # Errors
    ///
    /// Returns `HashError::OutputTooLong` if `length` exceeds 255 digests.
    pub fn hkdf(
        &self,
        secret: &[u8],
        salt: &[u8],
        info: &[u8],
        length: usize,
    ) -> Result<Vec<u8>> {
        let mut okm = vec![0u8; self.output_length(length)?];
        let expanded =
            dispatch!(&self.state, _h: D => <D as Keyed>::hkdf(secret, salt, info, &mut okm));

        if expanded {
            Ok(okm)
        } else {
            Err(HashError::internal("HKDF expansion failed"))
        }
    }

    /// "Expand" half of HKDF from an already extracted pseudorandom key.
    /// A `length` of 0 yields [`FixedHasher::size`] bytes.
    ///
    /// # Errors
    ///
    /// Returns `HashError::InvalidPseudorandomKey` if `pseudorandom_key` is
    /// shorter than a digest, or `HashError::OutputTooLong` if `length`
    /// exceeds 255 digests.
    pub fn hkdf_expand(
        &self,
        pseudorandom_key: &[u8],
        info: &[u8],
        length: usize,
    ) -> Result<Vec<u8>> {
        if pseudorandom_key.len() < self.size() {
            return Err(HashError::InvalidPseudorandomKey {
                minimum: self.size(),
                actual: pseudorandom_key.len(),
            });
        }

        let mut okm = vec![0u8; self.output_length(length)?];
        let expanded = dispatch!(
            &self.state,
            _h: D => <D as Keyed>::hkdf_expand(pseudorandom_key, info, &mut okm)
        );

        if expanded {
            Ok(okm)
        } else {
            Err(HashError::internal("HKDF expansion failed"))
        }
    }

    fn output_length(&self, length: usize) -> Result<usize> {
        let maximum = HKDF_MAX_BLOCKS * self.size();
        match length {
            0 => Ok(self.size()),
            requested if requested > maximum => {
                Err(HashError::OutputTooLong { maximum, requested })
            }
            requested => Ok(requested),
        }
    }
}

impl std::io::Write for FixedHasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        FixedHasher::write(self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
