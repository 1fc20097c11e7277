//! Credential entries and the plaintext payload that gets sealed.
//!
//! The payload is JSON shaped as
//! `{"Entries":[{"ID","Title","Username","Secret","Notes"}]}` with the
//! secret bytes as a base64 string.  Entries wipe themselves on drop.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{Result, VaultError};

/// One stored credential.
///
/// Only `id` is assumed printable; the secret is raw bytes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    /// Opaque unique identifier (e.g. a UUID), chosen by the caller.
    #[serde(rename = "ID")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub username: String,

    /// The sensitive value.  Base64 in the serialized payload.
    #[serde(
        default,
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub secret: Vec<u8>,

    #[serde(default)]
    pub notes: String,
}

impl Entry {
    /// Start an entry with an id and title; the other fields are empty.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            username: String::new(),
            secret: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret.zeroize();
        self.secret = secret.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("notes", &"<redacted>")
            .finish()
    }
}

/// The decrypted payload: every entry, in insertion order.
#[derive(Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "PascalCase")]
pub struct Payload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: Vec<Entry>,
}

impl Payload {
    /// Serialize for sealing.  The buffer wipes itself on drop.
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| VaultError::SerializationError(format!("entries: {e}")))
    }

    /// Parse an opened payload.
    ///
    /// The bytes have already passed authentication, so a parse failure
    /// means the file was written by something that is not this format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| VaultError::CorruptFormat(format!("payload: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let encoded = Zeroizing::new(BASE64.encode(data));
    serializer.serialize_str(&encoded)
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    match encoded {
        Some(mut s) => {
            let decoded = BASE64.decode(s.as_bytes());
            s.zeroize();
            decoded.map_err(serde::de::Error::custom)
        }
        None => Ok(Vec::new()),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
