//! Fixed-output hasher: digests, snapshots, HMAC and HKDF

#![cfg(feature = "blake2")]

use hex_literal::hex;
use std::io::Write;
use unihash::{HashError, Identifier};

#[test]
fn test_sha256_known_vector() {
    let digest = Identifier::SHA256.hash([b"input"]).expect("SHA-256 should be available");
    assert_eq!(
        digest,
        hex!("c96c6d5be8d08a12e7b5cdc1b207fa6b2430974c86803d8891675e76fd992c20")
    );
}

#[test]
fn test_empty_input_vectors() {
    let empty: [&[u8]; 0] = [];
    let cases: [(Identifier, &[u8]); 4] = [
        (
            Identifier::SHA256,
            &hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
        ),
        (
            Identifier::SHA3_256,
            &hex!("a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"),
        ),
        (
            Identifier::BLAKE2S_256,
            &hex!("69217a3079908094e11121d042354a7c1f55b6482ca1a51e1b250dfd1ed0eef9"),
        ),
        (
            Identifier::BLAKE2B_512,
            &hex!(
                "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419"
                "d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce"
            ),
        ),
    ];

    for (id, expected) in cases {
        let digest = id.hash(empty).expect("hash should be available");
        assert_eq!(digest, expected, "{id}");
    }
}

#[test]
fn test_hash_concatenates_inputs() {
    let joined = Identifier::SHA384.hash([b"hello world"]).unwrap();
    let split = Identifier::SHA384
        .hash([&b"hel"[..], &b"lo wo"[..], &b"rld"[..]])
        .unwrap();
    assert_eq!(joined, split);
}

#[test]
fn test_size_hint_is_ignored() {
    let mut hasher = Identifier::SHA512.fixed().unwrap();
    for hint in [0, 1, 64, 1000] {
        let digest = hasher.hash(hint, [b"data"]);
        assert_eq!(digest.len(), 64);
    }
    assert_eq!(hasher.read(7).len(), 64);
}

#[test]
fn test_read_is_not_destructive() {
    let mut hasher = Identifier::SHA3_384.fixed().unwrap();
    hasher.write(b"part one");
    let first = hasher.read(hasher.size());
    let second = hasher.read(hasher.size());
    assert_eq!(first, second);

    hasher.write(b" and two");
    let third = hasher.read(hasher.size());
    assert_ne!(first, third);
    assert_eq!(third, Identifier::SHA3_384.hash([b"part one and two"]).unwrap());
}

#[test]
fn test_sum_appends_digest() {
    let mut hasher = Identifier::SHA224.fixed().unwrap();
    hasher.write(b"abc");

    let out = hasher.sum(b"prefix:");
    assert_eq!(&out[..7], b"prefix:");
    assert_eq!(&out[7..], hasher.read(0).as_slice());
    assert_eq!(out.len(), 7 + 28);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut hasher = Identifier::SHA512_256.fixed().unwrap();
    let fresh = hasher.read(0);
    hasher.write(b"noise");
    hasher.reset();
    assert_eq!(hasher.read(0), fresh);
}

#[test]
fn test_io_write_feeds_hasher() {
    let mut hasher = Identifier::SHA256.fixed().unwrap();
    hasher.write_all(b"input").unwrap();
    hasher.flush().unwrap();
    assert_eq!(
        hasher.read(32),
        hex!("c96c6d5be8d08a12e7b5cdc1b207fa6b2430974c86803d8891675e76fd992c20")
    );
}

#[test]
fn test_hmac_sha256_vector() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    let tag = hasher.hmac(b"message", b"key").unwrap();
    assert_eq!(
        tag,
        hex!("6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a")
    );
}

#[test]
fn test_hmac_sha256_rfc4231_case2() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    let tag = hasher
        .hmac(b"what do ya want for nothing?", b"Jefe")
        .unwrap();
    assert_eq!(
        tag,
        hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
    );
}

#[test]
fn test_hmac_key_length_boundary() {
    for id in unihash::registry::registered().filter(|id| id.fixed().is_ok()) {
        let hasher = id.fixed().unwrap();

        let key = vec![0x42u8; hasher.size()];
        let tag = hasher.hmac(b"message", &key).expect("key of digest length is accepted");
        assert_eq!(tag.len(), hasher.size(), "{id}");

        let key = vec![0x42u8; hasher.size() + 1];
        assert_eq!(
            hasher.hmac(b"message", &key),
            Err(HashError::InvalidMacKeyLength {
                maximum: hasher.size(),
                actual: hasher.size() + 1,
            }),
            "{id}"
        );
    }
}

#[test]
fn test_hmac_empty_key() {
    let hasher = Identifier::BLAKE2B_256.fixed().unwrap();
    let tag = hasher.hmac(b"message", b"").unwrap();
    assert_eq!(tag.len(), 32);
}

#[test]
fn test_verify_hmac() {
    let hasher = Identifier::SHA3_512.fixed().unwrap();
    let tag = hasher.hmac(b"message", b"key").unwrap();

    assert_eq!(hasher.verify_hmac(b"message", b"key", &tag), Ok(true));
    assert_eq!(hasher.verify_hmac(b"massage", b"key", &tag), Ok(false));
    assert_eq!(hasher.verify_hmac(b"message", b"key", &tag[..10]), Ok(false));
    assert!(hasher
        .verify_hmac(b"message", &[0u8; 65], &tag)
        .is_err());
}

#[test]
fn test_hkdf_sha256_vector() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    let okm = hasher.hkdf(b"secret", b"salt", b"info", 32).unwrap();
    assert_eq!(
        okm,
        hex!("f6d2fcc47cb939deafe3853a1e641a27e6924aff7a63d09cb04ccfffbe4776ef")
    );
}

#[test]
fn test_hkdf_rfc5869_case1() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    let ikm = [0x0bu8; 22];
    let salt = hex!("000102030405060708090a0b0c");
    let info = hex!("f0f1f2f3f4f5f6f7f8f9");

    let prk = hasher.hkdf_extract(&ikm, &salt);
    assert_eq!(
        prk,
        hex!("077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5")
    );

    let okm = hasher.hkdf_expand(&prk, &info, 42).unwrap();
    assert_eq!(
        okm,
        hex!(
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf"
            "34007208d5b887185865"
        )
    );
}

#[test]
fn test_hkdf_extract_then_expand_many_keys() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    let prk = hasher.hkdf_extract(b"secret", b"salt");
    assert_eq!(
        prk,
        hex!("98e5340f0f4f96d2b80c2a90da0d03cf46c35e9492918cc7af73d9a39efa5981")
    );

    let expected = [
        (
            &b"key1"[..],
            hex!("f490601be934fe13381586ba657fae4534c0921345d41b97b804bf76ba29664b"),
        ),
        (
            &b"key2"[..],
            hex!("cca6ff4021287207e49c5e8297bea41b405eed697f78ef1174707a0bfcf70da7"),
        ),
        (
            &b"key3"[..],
            hex!("a9d11fb5ce71802b6a4c19e7bb45c51aa7e131ea3b673e1fb77a6698babbf1ea"),
        ),
        (
            &b"key4"[..],
            hex!("ff0330c4aaf9cc58db65a5346b0e97050856649e2cc0a256038133c30b420bfc"),
        ),
    ];

    for (info, key) in expected {
        assert_eq!(hasher.hkdf_expand(&prk, info, 32).unwrap(), key);
    }
}

#[test]
fn test_hkdf_composes_from_extract_and_expand() {
    for id in [
        Identifier::SHA224,
        Identifier::SHA512,
        Identifier::SHA3_256,
        Identifier::BLAKE2S_256,
        Identifier::BLAKE2B_384,
    ] {
        let hasher = id.fixed().unwrap();
        let prk = hasher.hkdf_extract(b"secret", b"salt");
        assert_eq!(prk.len(), hasher.size(), "{id}");

        for length in [0, 1, hasher.size(), 100, 255 * hasher.size()] {
            let composed = hasher.hkdf_expand(&prk, b"info", length).unwrap();
            let direct = hasher.hkdf(b"secret", b"salt", b"info", length).unwrap();
            assert_eq!(composed, direct, "{id} L={length}");
        }
    }
}

#[test]
fn test_hkdf_zero_length_yields_digest_size() {
    let hasher = Identifier::SHA384.fixed().unwrap();
    assert_eq!(hasher.hkdf(b"secret", b"", b"", 0).unwrap().len(), 48);

    let prk = hasher.hkdf_extract(b"secret", b"");
    assert_eq!(hasher.hkdf_expand(&prk, b"", 0).unwrap().len(), 48);
}

#[test]
fn test_hkdf_output_length_limit() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    let maximum = 255 * 32;

    assert_eq!(
        hasher.hkdf(b"secret", b"salt", b"info", maximum).unwrap().len(),
        maximum
    );
    assert_eq!(
        hasher.hkdf(b"secret", b"salt", b"info", maximum + 1),
        Err(HashError::OutputTooLong {
            maximum,
            requested: maximum + 1,
        })
    );

    let prk = hasher.hkdf_extract(b"secret", b"salt");
    assert!(matches!(
        hasher.hkdf_expand(&prk, b"info", maximum + 1),
        Err(HashError::OutputTooLong { .. })
    ));
}

#[test]
fn test_hkdf_expand_rejects_short_pseudorandom_key() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    assert_eq!(
        hasher.hkdf_expand(&[0u8; 31], b"info", 32),
        Err(HashError::InvalidPseudorandomKey {
            minimum: 32,
            actual: 31,
        })
    );
    assert!(hasher.hkdf_expand(&[0u8; 32], b"info", 32).is_ok());
}

#[test]
fn test_hkdf_empty_salt_matches_zero_salt() {
    let hasher = Identifier::SHA256.fixed().unwrap();
    let without = hasher.hkdf_extract(b"secret", b"");
    let zeros = hasher.hkdf_extract(b"secret", &[0u8; 64]);
    assert_eq!(without, zeros);
}
