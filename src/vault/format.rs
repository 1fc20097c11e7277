//! Binary vault file header.
//!
//! A vault file has this layout (all integers big-endian):
//!
//! ```text
//! offset        field        size
//! 0             magic        4     "GVLT"
//! 4             version      1     currently 1
//! 5             flags        2     reserved, written as 0
//! 7             kdf_algo     1     1 = Argon2id
//! 8             kdf_time     4
//! 12            kdf_memory   4     KiB
//! 16            kdf_threads  1
//! 17            salt_len     1
//! 18            salt         salt_len
//! 18+salt_len   nonce_len    1
//! 19+salt_len   nonce        nonce_len
//! ...           ciphertext   rest of the file (tag included)
//! ```
//!
//! The ciphertext is not length-prefixed: it is whatever follows the
//! header.  Fields must be decoded in order because the offsets of the
//! later ones depend on the salt length.

use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.  Also the AEAD
/// associated data.
pub const MAGIC: &[u8; 4] = b"GVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size part of the header: everything except the salt and nonce
/// bodies (4 + 1 + 2 + 1 + 4 + 4 + 1 + 1 + 1).
pub const FIXED_HEADER_LEN: usize = 19;

// ---------------------------------------------------------------------------
// FileHeader
// ---------------------------------------------------------------------------

/// Key derivation algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KdfAlgorithm {
    Argon2id = 1,
}

impl TryFrom<u8> for KdfAlgorithm {
    type Error = VaultError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Argon2id),
            other => Err(VaultError::CorruptFormat(format!(
                "unsupported KDF algorithm {other}"
            ))),
        }
    }
}

/// Metadata stored at the beginning of a vault file.
///
/// Carries everything needed to re-derive the key and open the payload;
/// the version is implied (`encode` always writes `CURRENT_VERSION`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Reserved bitfield.
    pub flags: u16,
    pub kdf_algorithm: KdfAlgorithm,
    pub kdf_time: u32,
    pub kdf_memory_kib: u32,
    pub kdf_threads: u8,
    pub salt: Vec<u8>,
    /// AEAD nonce used for this save.
    pub nonce: Vec<u8>,
}

impl FileHeader {
    /// Build a header for an Argon2id vault from its KDF params and the
    /// nonce of the current save.
    pub fn new(params: &KdfParams, nonce: &[u8]) -> Self {
        Self {
            flags: 0,
            kdf_algorithm: KdfAlgorithm::Argon2id,
            kdf_time: params.time,
            kdf_memory_kib: params.memory_kib,
            kdf_threads: params.threads,
            salt: params.salt.clone(),
            nonce: nonce.to_vec(),
        }
    }

    /// The KDF parameters this header describes.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            time: self.kdf_time,
            memory_kib: self.kdf_memory_kib,
            threads: self.kdf_threads,
            salt: self.salt.clone(),
        }
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + self.salt.len() + self.nonce.len()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize a header into its flat binary form.
///
/// Fails with `FieldTooLong` if the salt or nonce exceeds 255 bytes.
pub fn encode(header: &FileHeader) -> Result<Vec<u8>> {
    let salt_len = field_len("salt", &header.salt)?;
    let nonce_len = field_len("nonce", &header.nonce)?;

    let mut buf = Vec::with_capacity(header.encoded_len());

    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header.flags.to_be_bytes()); // 2 bytes
    buf.push(header.kdf_algorithm as u8); // 1 byte
    buf.extend_from_slice(&header.kdf_time.to_be_bytes()); // 4 bytes
    buf.extend_from_slice(&header.kdf_memory_kib.to_be_bytes()); // 4 bytes
    buf.push(header.kdf_threads); // 1 byte
    buf.push(salt_len);
    buf.extend_from_slice(&header.salt);
    buf.push(nonce_len);
    buf.extend_from_slice(&header.nonce);

    Ok(buf)
}

/// Parse a header from the start of `data`.
///
/// Returns the header and the remaining bytes (the ciphertext).  Fails with
/// `CorruptFormat` on a short input, bad magic, unsupported version or
/// KDF algorithm, truncated salt/nonce, or KDF parameters outside what
/// Argon2id can safely run with.
pub fn decode(data: &[u8]) -> Result<(FileHeader, &[u8])> {
    if data.len() < FIXED_HEADER_LEN {
        return Err(VaultError::CorruptFormat(format!(
            "file too small to be a vault ({} bytes)",
            data.len()
        )));
    }

    let mut reader = Reader::new(data);

    if reader.take(4)? != MAGIC {
        return Err(VaultError::CorruptFormat("missing GVLT magic bytes".into()));
    }

    let version = reader.u8()?;
    if version != CURRENT_VERSION {
        return Err(VaultError::CorruptFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let flags = reader.u16()?;
    let kdf_algorithm = KdfAlgorithm::try_from(reader.u8()?)?;
    let kdf_time = reader.u32()?;
    let kdf_memory_kib = reader.u32()?;
    let kdf_threads = reader.u8()?;

    let salt_len = usize::from(reader.u8()?);
    let salt = reader.take(salt_len)?.to_vec();

    let nonce_len = usize::from(reader.u8()?);
    let nonce = reader.take(nonce_len)?.to_vec();

    let header = FileHeader {
        flags,
        kdf_algorithm,
        kdf_time,
        kdf_memory_kib,
        kdf_threads,
        salt,
        nonce,
    };

    // Refuse to hand a damaged cost parameter to Argon2.
    header
        .kdf_params()
        .check()
        .map_err(|reason| VaultError::CorruptFormat(format!("bad KDF parameters: {reason}")))?;

    Ok((header, reader.rest()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn field_len(field: &'static str, bytes: &[u8]) -> Result<u8> {
    u8::try_from(bytes.len()).map_err(|_| VaultError::FieldTooLong {
        field,
        len: bytes.len(),
    })
}

/// Bounds-checked big-endian cursor over the header bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| VaultError::CorruptFormat("header is truncated".into()))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}
