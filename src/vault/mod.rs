//! Vault module: the encrypted credential store.
//!
//! This module provides:
//! - `Entry` and the sealed `Payload` (`entry`)
//! - The binary file header codec (`format`)
//! - Crash-safe file writes (`persist`)
//! - High-level `VaultStore` for creating, opening, and editing vaults (`store`)

pub mod entry;
pub mod format;
pub mod persist;
pub mod store;

// Re-export the most commonly used items.
pub use entry::Entry;
pub use format::{FileHeader, KdfAlgorithm};
pub use store::{VaultStatus, VaultStore};
