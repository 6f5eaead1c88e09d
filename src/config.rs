//! Runtime configuration shared by the vault components.

use std::path::PathBuf;

/// Directory name of the default vault under the user's home.
pub const DEFAULT_VAULT_DIR: &str = ".gpgpass";

/// Default GPG executable.
pub const DEFAULT_GPG_PROGRAM: &str = "gpg";

/// Settings passed into each component at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Root directory holding the registry and all entries.
    pub root: PathBuf,
    /// GPG executable used for encryption and decryption.
    pub gpg_program: String,
    /// Editor command for `edit`; falls back to `$VISUAL` / `$EDITOR`.
    pub editor: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: default_vault_root(),
            gpg_program: DEFAULT_GPG_PROGRAM.to_string(),
            editor: None,
        }
    }
}

impl VaultConfig {
    /// Config rooted at `root` with default collaborators.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Override the GPG executable.
    pub fn gpg_program(mut self, program: impl Into<String>) -> Self {
        self.gpg_program = program.into();
        self
    }

    /// Override the editor command.
    pub fn editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    /// Editor to launch: explicit override, then `$VISUAL`, then `$EDITOR`.
    pub fn resolve_editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok().filter(|v| !v.is_empty()))
            .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "vi".to_string()
                }
            })
    }
}

/// `~/.gpgpass`, or `./.gpgpass` when no home directory can be determined.
pub fn default_vault_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_VAULT_DIR)
}
