//! Service layer for vault operations.

use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::generator::generate_password;
use crate::gpg::CryptoEngine;
use crate::models::{EntryName, VaultLayout};
use crate::registry::RecipientRegistry;
use crate::secure_temp::{SecretEditor, SecureTempFile};
use crate::tree::VaultTree;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Entry lifecycle and state queries over one vault directory.
pub struct VaultService<E> {
    layout: VaultLayout,
    registry: RecipientRegistry,
    engine: E,
}

impl<E: CryptoEngine> VaultService<E> {
    /// Create a service for the vault described by `config`.
    pub fn new(config: &VaultConfig, engine: E) -> Self {
        let layout = VaultLayout::new(config.root.clone());
        let registry = RecipientRegistry::new(layout.root(), layout.registry_path());
        Self {
            layout,
            registry,
            engine,
        }
    }

    pub fn layout(&self) -> &VaultLayout {
        &self.layout
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// True iff the vault root and the recipient registry both exist.
    pub fn is_initialized(&self) -> bool {
        self.layout.root().is_dir() && self.registry.exists()
    }

    /// True iff the entry's artifact is a regular file. Errors count as absent.
    pub fn entry_exists(&self, name: &EntryName) -> bool {
        self.layout.resolve(name).is_file()
    }

    /// Recipient ids every new entry is encrypted for.
    pub fn recipients(&self) -> Result<Vec<String>> {
        self.registry.read()
    }

    /// Initialize the vault for `recipients`.
    ///
    /// An initialized vault is only re-initialized when `force` is set, which
    /// replaces the recipient list. Existing entries are not re-encrypted.
    pub fn init(&self, recipients: &[String], force: bool) -> Result<()> {
        if recipients.is_empty() {
            return Err(VaultError::NoRecipients);
        }
        if self.is_initialized() && !force {
            return Err(VaultError::AlreadyInitialized(
                self.layout.root().display().to_string(),
            ));
        }

        self.registry.write(recipients)?;
        info!(root = %self.layout.root().display(), recipients = ?recipients, "vault initialized");
        Ok(())
    }

    /// Encrypt `secret` into a new entry.
    ///
    /// Fails with [`VaultError::EntryAlreadyExists`] if the entry exists and
    /// `overwrite` is false.
    pub fn insert(&self, name: &EntryName, secret: &[u8], overwrite: bool) -> Result<PathBuf> {
        let recipients = self.registry.read()?;

        if !overwrite && self.entry_exists(name) {
            return Err(VaultError::EntryAlreadyExists(name.to_string()));
        }

        self.write_entry(name, secret, &recipients)
    }

    /// Generate a random password of `length` characters and store it.
    pub fn generate(
        &self,
        name: &EntryName,
        length: usize,
        overwrite: bool,
    ) -> Result<Zeroizing<String>> {
        let password = generate_password(length);
        self.insert(name, password.as_bytes(), overwrite)?;
        Ok(password)
    }

    /// Decrypt an entry.
    pub fn show(&self, name: &EntryName) -> Result<Zeroizing<Vec<u8>>> {
        self.ensure_entry(name)?;
        self.engine.decrypt(&self.layout.resolve(name))
    }

    /// Decrypt an entry into a scratch file, let `editor` change it and
    /// re-encrypt the result for the current recipients.
    pub fn edit(&self, name: &EntryName, editor: &dyn SecretEditor) -> Result<()> {
        let plaintext = self.show(name)?;
        let recipients = self.registry.read()?;

        // Removed on drop, whichever way we leave this function.
        let mut scratch = SecureTempFile::new()?;
        scratch.write(&plaintext)?;
        editor.edit(scratch.path())?;
        let edited = scratch.read()?;
        scratch.cleanup()?;

        self.write_entry(name, &edited, &recipients)?;
        info!(entry = %name, "entry edited");
        Ok(())
    }

    /// Delete an entry's artifact. Parent namespaces are left in place.
    pub fn remove(&self, name: &EntryName) -> Result<()> {
        self.ensure_entry(name)?;
        fs::remove_file(self.layout.resolve(name))?;
        info!(entry = %name, "entry removed");
        Ok(())
    }

    /// Walk the vault, yielding namespaces and entries in display order.
    pub fn list(&self) -> Result<VaultTree> {
        if !self.is_initialized() {
            return Err(VaultError::NotInitialized);
        }
        Ok(VaultTree::new(self.layout.root()))
    }

    fn ensure_entry(&self, name: &EntryName) -> Result<()> {
        if !self.is_initialized() {
            return Err(VaultError::NotInitialized);
        }
        if !self.entry_exists(name) {
            return Err(VaultError::EntryNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Encrypt into a hidden staging file next to the target, then rename it
    /// over the target.
    fn write_entry(
        &self,
        name: &EntryName,
        plaintext: &[u8],
        recipients: &[String],
    ) -> Result<PathBuf> {
        let dir = self.layout.namespace_dir(name);
        fs::create_dir_all(&dir)?;

        let target = self.layout.resolve(name);
        let staging = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        self.engine.encrypt(plaintext, recipients, staging.path())?;

        staging
            .persist(&target)
            .map_err(|e| VaultError::Io(e.error))?;

        debug!(entry = %name, path = %target.display(), "entry written");
        Ok(target)
    }
}
