//! Integration tests for the vault file header codec.

use credvault::crypto::KdfParams;
use credvault::errors::VaultError;
use credvault::vault::format::{decode, encode, CURRENT_VERSION, FIXED_HEADER_LEN, MAGIC};
use credvault::vault::{FileHeader, KdfAlgorithm};

fn sample_header() -> FileHeader {
    let params = KdfParams::new(3, 65_536, 4).with_salt((0u8..16).collect());
    FileHeader::new(&params, &[0xEE; 24])
}

#[test]
fn encoded_header_is_big_endian_and_ordered() {
    let header = sample_header();
    let bytes = encode(&header).unwrap();

    assert_eq!(bytes.len(), FIXED_HEADER_LEN + 16 + 24);
    assert_eq!(&bytes[0..4], MAGIC);
    assert_eq!(bytes[4], CURRENT_VERSION);
    assert_eq!(&bytes[5..7], &[0, 0]);
    assert_eq!(bytes[7], KdfAlgorithm::Argon2id as u8);
    assert_eq!(&bytes[8..12], &3u32.to_be_bytes());
    assert_eq!(&bytes[12..16], &65_536u32.to_be_bytes());
    assert_eq!(bytes[16], 4);
    assert_eq!(bytes[17], 16);
    assert_eq!(&bytes[18..34], (0u8..16).collect::<Vec<_>>().as_slice());
    assert_eq!(bytes[34], 24);
    assert_eq!(&bytes[35..59], &[0xEE; 24]);
}

#[test]
fn decode_returns_header_and_trailing_ciphertext() {
    let header = sample_header();
    let mut bytes = encode(&header).unwrap();
    bytes.extend_from_slice(b"ciphertext-and-tag");

    let (decoded, rest) = decode(&bytes).unwrap();
    assert_eq!(decoded, header);
    assert_eq!(rest, b"ciphertext-and-tag");
    assert_eq!(decoded.kdf_params().memory_kib, 65_536);
}

#[test]
fn flags_are_ignored_on_decode() {
    let mut bytes = encode(&sample_header()).unwrap();
    bytes[5] = 0xAB;
    bytes[6] = 0xCD;

    let (decoded, _) = decode(&bytes).unwrap();
    assert_eq!(decoded.flags, 0xABCD);
    assert_eq!(decoded.kdf_params(), sample_header().kdf_params());
}

#[test]
fn oversized_salt_cannot_be_encoded() {
    let mut header = sample_header();
    header.salt = vec![0; 256];
    assert!(matches!(
        encode(&header),
        Err(VaultError::FieldTooLong { field: "salt", len: 256 })
    ));
}

#[test]
fn bad_magic_version_and_algorithm_are_corrupt() {
    let good = encode(&sample_header()).unwrap();

    for (offset, value) in [(0, b'X'), (4, 2), (7, 9)] {
        let mut bytes = good.clone();
        bytes[offset] = value;
        assert!(
            matches!(decode(&bytes), Err(VaultError::CorruptFormat(_))),
            "offset {offset} = {value} should be corrupt"
        );
    }
}

#[test]
fn absurd_kdf_costs_are_corrupt() {
    let good = encode(&sample_header()).unwrap();

    // time = u32::MAX
    let mut bytes = good.clone();
    bytes[8..12].copy_from_slice(&u32::MAX.to_be_bytes());
    assert!(matches!(decode(&bytes), Err(VaultError::CorruptFormat(_))));

    // threads = 0
    let mut bytes = good;
    bytes[16] = 0;
    assert!(matches!(decode(&bytes), Err(VaultError::CorruptFormat(_))));
}

#[test]
fn every_truncation_is_corrupt() {
    let bytes = encode(&sample_header()).unwrap();
    for len in 0..bytes.len() {
        assert!(
            matches!(decode(&bytes[..len]), Err(VaultError::CorruptFormat(_))),
            "truncated to {len} bytes should be corrupt"
        );
    }
}
