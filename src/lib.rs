//! gpgpass: a password store keeping one GPG-encrypted file per entry.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod gpg;
pub mod models;
pub mod prompt;
pub mod registry;
pub mod secure_temp;
pub mod service;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use config::VaultConfig;
pub use error::{Result, VaultError};
pub use gpg::{CryptoEngine, GpgEngine};
pub use models::{EntryName, VaultLayout};
pub use service::VaultService;
