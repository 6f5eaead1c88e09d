//! Secure temporary file handling for editing decrypted entries.

use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use zeroize::Zeroizing;

/// Prefix for gpgpass temporary files
const TEMP_FILE_PREFIX: &str = "gpgpass-edit-";

/// Get the secure temp directory for gpgpass
fn get_secure_temp_dir() -> Result<PathBuf> {
    let temp_dir = std::env::temp_dir().join("gpgpass-secure");

    if !temp_dir.exists() {
        fs::create_dir_all(&temp_dir)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&temp_dir)?.permissions();
        perms.set_mode(0o700);
        fs::set_permissions(&temp_dir, perms)?;
    }

    Ok(temp_dir)
}

/// Overwrite a file in place with zeros, then with random bytes, keeping its length.
fn wipe(path: &Path) -> Result<()> {
    let len = fs::metadata(path)?.len() as usize;
    fs::write(path, vec![0u8; len])?;

    let random_data: Vec<u8> = (0..len).map(|_| rand::random::<u8>()).collect();
    fs::write(path, random_data)?;
    Ok(())
}

/// Clean up any leftover temporary files from previous sessions
pub fn cleanup_old_temp_files() -> Result<()> {
    let temp_dir = get_secure_temp_dir()?;

    for entry in fs::read_dir(&temp_dir)? {
        let path = entry?.path();
        let is_ours = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(TEMP_FILE_PREFIX));

        if is_ours {
            let _ = wipe(&path);
            let _ = fs::remove_file(&path);
            debug!(path = %path.display(), "removed stale temp file");
        }
    }

    Ok(())
}

/// Scratch file holding decrypted content while it is being edited.
///
/// The file is wiped and removed on drop, so every exit path releases it.
pub struct SecureTempFile {
    path: PathBuf,
    cleaned: bool,
}

impl SecureTempFile {
    /// Create a new file in the per-user secure temp directory.
    pub fn new() -> Result<Self> {
        Self::new_in(&get_secure_temp_dir()?)
    }

    /// Create a new file in `dir`.
    pub fn new_in(dir: &Path) -> Result<Self> {
        let temp_file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(".txt")
            .tempfile_in(dir)?;

        // Keep the file but we'll manage it ourselves
        let (_file, path) = temp_file
            .keep()
            .map_err(|e| VaultError::Other(format!("Failed to persist temp file: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(Self {
            path,
            cleaned: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, content: &[u8]) -> Result<()> {
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn read(&self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(fs::read(&self.path)?))
    }

    /// Wipe and remove the file.
    pub fn cleanup(&mut self) -> Result<()> {
        if !self.cleaned && self.path.exists() {
            wipe(&self.path)?;
            fs::remove_file(&self.path)?;
        }
        self.cleaned = true;
        Ok(())
    }
}

impl Drop for SecureTempFile {
    fn drop(&mut self) {
        // Best effort cleanup in destructor
        let _ = self.cleanup();
    }
}

/// Hands a file to the user for editing and blocks until they are done.
pub trait SecretEditor {
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Runs an external editor process, e.g. `vi` or `code --wait`.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.resolve_editor())
    }
}

impl SecretEditor for ExternalEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| VaultError::EditorFailed("no editor configured".to_string()))?;

        debug!(editor = %self.command, "launching editor");

        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|e| {
                VaultError::EditorFailed(format!("failed to launch '{}': {e}", self.command))
            })?;

        if !status.success() {
            return Err(VaultError::EditorFailed(format!(
                "'{}' exited with {status}",
                self.command
            )));
        }

        Ok(())
    }
}
