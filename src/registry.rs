//! Recipient registry: the GPG ids every entry is encrypted for.

use crate::error::{Result, VaultError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The `.gpg_id` file under the vault root.
#[derive(Debug, Clone)]
pub struct RecipientRegistry {
    root: PathBuf,
    path: PathBuf,
}

impl RecipientRegistry {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        Self {
            root: root.to_path_buf(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write one id per line, replacing any previous content.
    ///
    /// Creates the vault root if it does not exist yet.
    pub fn write(&self, recipients: &[String]) -> Result<()> {
        if recipients.is_empty() {
            return Err(VaultError::NoRecipients);
        }

        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.root, fs::Permissions::from_mode(0o700))?;
            }
        }

        let mut content = String::new();
        for id in recipients {
            content.push_str(id);
            content.push('\n');
        }
        fs::write(&self.path, content)?;

        debug!(path = %self.path.display(), count = recipients.len(), "wrote recipient registry");
        Ok(())
    }

    /// Read the ids in file order, skipping blank lines.
    pub fn read(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(VaultError::GpgIdNotFound),
            Err(e) => return Err(e.into()),
        };

        let recipients: Vec<String> = content
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if recipients.is_empty() {
            return Err(VaultError::GpgIdNotFound);
        }

        Ok(recipients)
    }
}
