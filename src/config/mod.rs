//! Configuration: `Settings` loaded from `config.toml` in the data directory.

pub mod settings;

pub use settings::Settings;
