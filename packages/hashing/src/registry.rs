//! Process-wide table of supported hash functions
//!
//! The table is built once, on first use, by registering every algorithm
//! enabled through Cargo features in identifier order. It is read-only
//! afterwards, so lookups from any number of threads need no locking.

use const_oid::ObjectIdentifier;
use digest::core_api::BlockSizeUser;
use once_cell::sync::Lazy;
use tracing::trace;

use crate::identifier::MAX_ID;
use crate::{ExtendableHasher, FixedHasher, HashType, Hasher, Identifier, Result};

// security levels in bits
const SEC112: usize = 112;
const SEC128: usize = 128;
const SEC192: usize = 192;
const SEC224: usize = 224;
const SEC256: usize = 256;

type Constructor = fn(Identifier) -> Result<Hasher>;

/// Static metadata and constructor of one registered hash function.
#[derive(Debug, Clone)]
pub struct Entry {
    kind: HashType,
    constructor: Constructor,
    name: &'static str,
    block_size: usize,
    output_size: usize,
    security_level: usize,
    oid: Option<ObjectIdentifier>,
}

impl Entry {
    /// Family the constructor instantiates.
    #[must_use]
    pub fn kind(&self) -> HashType {
        self.kind
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Block size in bytes, 0 where it has no meaning.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Standard output size in bytes.
    #[must_use]
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Security level in bits.
    #[must_use]
    pub fn security_level(&self) -> usize {
        self.security_level
    }

    /// ASN.1 object identifier, if the function has one.
    #[must_use]
    pub fn oid(&self) -> Option<ObjectIdentifier> {
        self.oid
    }

    pub(crate) fn construct(&self, id: Identifier) -> Result<Hasher> {
        (self.constructor)(id)
    }
}

struct Registry {
    entries: [Option<Entry>; MAX_ID as usize],
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::builtin);

impl Registry {
    fn builtin() -> Self {
        let mut registry = Self {
            entries: std::array::from_fn(|_| None),
        };

        registry.register_fixed::<sha2::Sha224>(
            Identifier::SHA224,
            "SHA-224",
            SEC112,
            oid::SHA224,
        );
        registry.register_fixed::<sha2::Sha256>(
            Identifier::SHA256,
            "SHA-256",
            SEC128,
            oid::SHA256,
        );
        registry.register_fixed::<sha2::Sha384>(
            Identifier::SHA384,
            "SHA-384",
            SEC192,
            oid::SHA384,
        );
        registry.register_fixed::<sha2::Sha512>(
            Identifier::SHA512,
            "SHA-512",
            SEC256,
            oid::SHA512,
        );

        registry.register_fixed::<sha3::Sha3_224>(
            Identifier::SHA3_224,
            "SHA3-224",
            SEC112,
            oid::SHA3_224,
        );
        registry.register_fixed::<sha3::Sha3_256>(
            Identifier::SHA3_256,
            "SHA3-256",
            SEC128,
            oid::SHA3_256,
        );
        registry.register_fixed::<sha3::Sha3_384>(
            Identifier::SHA3_384,
            "SHA3-384",
            SEC192,
            oid::SHA3_384,
        );
        registry.register_fixed::<sha3::Sha3_512>(
            Identifier::SHA3_512,
            "SHA3-512",
            SEC256,
            oid::SHA3_512,
        );

        registry.register_fixed::<sha2::Sha512_224>(
            Identifier::SHA512_224,
            "SHA-512/224",
            SEC112,
            oid::SHA512_224,
        );
        registry.register_fixed::<sha2::Sha512_256>(
            Identifier::SHA512_256,
            "SHA-512/256",
            SEC128,
            oid::SHA512_256,
        );

        #[cfg(feature = "blake2")]
        {
            use blake2::digest::consts::{U32, U48};

            registry.register_fixed::<blake2::Blake2s256>(
                Identifier::BLAKE2S_256,
                "BLAKE2s-256",
                SEC128,
                oid::BLAKE2S_256,
            );
            registry.register_fixed::<blake2::Blake2b<U32>>(
                Identifier::BLAKE2B_256,
                "BLAKE2b-256",
                SEC128,
                oid::BLAKE2B_256,
            );
            registry.register_fixed::<blake2::Blake2b<U48>>(
                Identifier::BLAKE2B_384,
                "BLAKE2b-384",
                SEC192,
                oid::BLAKE2B_384,
            );
            registry.register_fixed::<blake2::Blake2b512>(
                Identifier::BLAKE2B_512,
                "BLAKE2b-512",
                SEC256,
                oid::BLAKE2B_512,
            );
        }

        registry.register(
            Identifier::SHAKE128,
            HashType::ExtendableOutputFunction,
            "SHAKE128",
            sha3::Shake128::block_size(),
            32,
            SEC128,
            Some(oid::SHAKE128),
        );
        registry.register(
            Identifier::SHAKE256,
            HashType::ExtendableOutputFunction,
            "SHAKE256",
            sha3::Shake256::block_size(),
            32,
            SEC224,
            Some(oid::SHAKE256),
        );

        #[cfg(feature = "blake2")]
        {
            registry.register(
                Identifier::BLAKE2XB,
                HashType::ExtendableOutputFunction,
                "BLAKE2Xb",
                0,
                32,
                SEC128,
                None,
            );
            registry.register(
                Identifier::BLAKE2XS,
                HashType::ExtendableOutputFunction,
                "BLAKE2Xs",
                0,
                32,
                SEC128,
                None,
            );
        }

        #[cfg(feature = "blake3")]
        registry.register(
            Identifier::BLAKE3,
            HashType::ExtendableOutputFunction,
            "BLAKE3",
            0,
            blake3::OUT_LEN,
            SEC128,
            None,
        );

        registry
    }

    /// Records one entry. Each identifier is registered at most once.
    #[allow(clippy::too_many_arguments)]
    fn register(
        &mut self,
        id: Identifier,
        kind: HashType,
        name: &'static str,
        block_size: usize,
        output_size: usize,
        security_level: usize,
        oid: Option<ObjectIdentifier>,
    ) {
        let Some(slot) = self.entries.get_mut(usize::from(id.as_u8())) else {
            trace!(id = id.as_u8(), name, "identifier out of range, not registered");
            return;
        };
        if slot.is_some() {
            trace!(id = id.as_u8(), name, "identifier already registered");
            return;
        }

        let constructor: Constructor = match kind {
            HashType::FixedOutputLength => FixedHasher::construct,
            HashType::ExtendableOutputFunction => ExtendableHasher::construct,
        };

        trace!(
            id = id.as_u8(),
            name,
            %kind,
            block_size,
            output_size,
            security_level,
            "registered hash function"
        );
        *slot = Some(Entry {
            kind,
            constructor,
            name,
            block_size,
            output_size,
            security_level,
            oid,
        });
    }

    fn register_fixed<D>(
        &mut self,
        id: Identifier,
        name: &'static str,
        security_level: usize,
        oid: ObjectIdentifier,
    ) where
        D: digest::Digest + BlockSizeUser,
    {
        self.register(
            id,
            HashType::FixedOutputLength,
            name,
            D::block_size(),
            <D as digest::Digest>::output_size(),
            security_level,
            Some(oid),
        );
    }
}

/// Builds the table if that has not happened yet. Idempotent.
pub fn init() {
    Lazy::force(&REGISTRY);
}

/// Reports whether `id` is in range and registered.
#[must_use]
pub fn available(id: Identifier) -> bool {
    entry(id).is_some()
}

/// Table entry for `id`, `None` if unavailable.
#[must_use]
pub fn entry(id: Identifier) -> Option<&'static Entry> {
    REGISTRY.entries.get(usize::from(id.as_u8()))?.as_ref()
}

/// Every available identifier, in ascending order.
pub fn registered() -> impl Iterator<Item = Identifier> {
    (0..MAX_ID)
        .map(Identifier::from_raw)
        .filter(|id| available(*id))
}

#[allow(dead_code)]
mod oid {
    use const_oid::ObjectIdentifier;

    pub const SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
    pub const SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");
    pub const SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");
    pub const SHA224: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.4");
    pub const SHA512_224: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.5");
    pub const SHA512_256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.6");
    pub const SHA3_224: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.7");
    pub const SHA3_256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.8");
    pub const SHA3_384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.9");
    pub const SHA3_512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.10");
    pub const SHAKE128: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.11");
    pub const SHAKE256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.12");

    // RFC 7693
    pub const BLAKE2B_256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.1722.12.2.1.8");
    pub const BLAKE2B_384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.1722.12.2.1.12");
    pub const BLAKE2B_512: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.1722.12.2.1.16");
    pub const BLAKE2S_256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.1722.12.2.2.8");
}
