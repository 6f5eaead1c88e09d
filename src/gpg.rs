//! GPG integration for encrypting and decrypting entry files.

use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Public-key encryption primitive used by the vault.
///
/// Implementations must report failure explicitly; an empty plaintext is a
/// valid decryption result.
pub trait CryptoEngine {
    /// Encrypt `plaintext` for every id in `recipients`, writing the
    /// ciphertext to `output`.
    fn encrypt(&self, plaintext: &[u8], recipients: &[String], output: &Path) -> Result<()>;

    /// Decrypt the file at `input`.
    fn decrypt(&self, input: &Path) -> Result<Zeroizing<Vec<u8>>>;
}

/// [`CryptoEngine`] backed by the `gpg` executable.
#[derive(Debug, Clone)]
pub struct GpgEngine {
    program: String,
    homedir: Option<PathBuf>,
}

impl GpgEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            homedir: None,
        }
    }

    /// Use the keyring in `homedir` instead of the default `GNUPGHOME`.
    pub fn with_homedir(mut self, homedir: impl Into<PathBuf>) -> Self {
        self.homedir = Some(homedir.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(homedir) = &self.homedir {
            cmd.arg("--homedir").arg(homedir);
        }
        cmd
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.gpg_program.clone())
    }

    /// Check that the GPG executable can be run.
    pub fn check_available(&self) -> Result<()> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(VaultError::GpgUnavailable(format!(
                "'{} --version' exited with {}",
                self.program, output.status
            )));
        }

        Ok(())
    }

    fn spawn_error(&self, e: std::io::Error) -> VaultError {
        if e.kind() == ErrorKind::NotFound {
            VaultError::GpgUnavailable(format!("'{}' not found, please install GPG", self.program))
        } else {
            VaultError::GpgUnavailable(format!("failed to run '{}': {e}", self.program))
        }
    }
}

impl Default for GpgEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_GPG_PROGRAM)
    }
}

/// Diagnostic for a failed GPG run: its stderr, or the exit status.
fn failure_status(status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("gpg exited with {status}")
    } else {
        stderr.to_string()
    }
}

impl CryptoEngine for GpgEngine {
    fn encrypt(&self, plaintext: &[u8], recipients: &[String], output: &Path) -> Result<()> {
        if recipients.is_empty() {
            return Err(VaultError::GpgIdNotFound);
        }

        let mut cmd = self.command();
        cmd.args(["--batch", "--yes", "--quiet", "--encrypt"]);
        for recipient in recipients {
            cmd.arg("--recipient").arg(recipient);
        }
        cmd.arg("--output")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!(output = %output.display(), recipients = recipients.len(), "running gpg --encrypt");

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // gpg may exit early (e.g. unknown recipient) and close its end.
            if let Err(e) = stdin.write_all(plaintext) {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
                warn!("gpg closed stdin before reading all input");
            }
        }

        let result = child
            .wait_with_output()
            .map_err(|e| VaultError::Other(format!("Failed to wait for GPG: {e}")))?;

        if !result.status.success() {
            return Err(VaultError::EncryptionError(failure_status(
                result.status,
                &result.stderr,
            )));
        }

        Ok(())
    }

    fn decrypt(&self, input: &Path) -> Result<Zeroizing<Vec<u8>>> {
        debug!(input = %input.display(), "running gpg --decrypt");

        let result = self
            .command()
            .args(["--quiet", "--yes", "--decrypt"])
            .arg(input)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        let plaintext = Zeroizing::new(result.stdout);

        if !result.status.success() {
            return Err(VaultError::DecryptionError(failure_status(
                result.status,
                &result.stderr,
            )));
        }

        Ok(plaintext)
    }
}
