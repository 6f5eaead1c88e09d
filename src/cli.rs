//! Command-line interface implementation.

use crate::config::{VaultConfig, DEFAULT_GPG_PROGRAM};
use crate::error::{Result, VaultError};
use crate::generator::DEFAULT_PASSWORD_LENGTH;
use crate::gpg::{CryptoEngine, GpgEngine};
use crate::models::EntryName;
use crate::prompt::{Decision, Prompter, TerminalPrompter};
use crate::secure_temp::{ExternalEditor, SecretEditor};
use crate::service::VaultService;
use crate::tree::TreeLine;
use crate::utils::{self, success_line, warning_line};
use clap::{Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Password store keeping one GPG-encrypted file per entry.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the vault directory
    #[arg(
        long,
        global = true,
        env = "GPGPASS_DIR",
        help = "Path to the vault directory (default: ~/.gpgpass)"
    )]
    pub vault: Option<PathBuf>,

    /// GPG executable
    #[arg(long, global = true, env = "GPGPASS_GPG", default_value = DEFAULT_GPG_PROGRAM)]
    pub gpg: String,

    /// Output format
    #[arg(
        short = 'o',
        long,
        global = true,
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the vault for one or more GPG ids
    Init {
        /// Recipient GPG ids (key ids, fingerprints or emails)
        #[arg(required = true)]
        recipients: Vec<String>,

        /// Overwrite the recipient list of an existing vault
        #[arg(short, long)]
        force: bool,
    },

    /// Add an existing password to the vault
    Add {
        /// Entry name (e.g., work/email)
        name: String,

        /// Overwrite an existing entry without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a new password and store it
    Generate {
        /// Entry name (e.g., work/email)
        name: String,

        /// Password length
        #[arg(default_value_t = DEFAULT_PASSWORD_LENGTH)]
        length: usize,

        /// Overwrite an existing entry without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt and display an entry
    View {
        /// Entry name
        name: String,
    },

    /// Edit an entry in an external editor
    Edit {
        /// Entry name
        name: String,
    },

    /// Remove an entry
    Rm {
        /// Entry name
        name: String,
    },

    /// List all entries
    Ls,
}

impl Commands {
    /// Whether the command runs GPG.
    fn needs_gpg(&self) -> bool {
        matches!(
            self,
            Commands::Add { .. }
                | Commands::Generate { .. }
                | Commands::View { .. }
                | Commands::Edit { .. }
        )
    }
}

impl Cli {
    /// Build the runtime configuration from flags and environment.
    pub fn config(&self) -> VaultConfig {
        let config = match &self.vault {
            Some(root) => VaultConfig::with_root(root.clone()),
            None => VaultConfig::default(),
        };
        config.gpg_program(self.gpg.clone())
    }

    /// Execute the CLI command against the terminal.
    pub fn execute(&self) -> Result<()> {
        let config = self.config();
        debug!(root = %config.root.display(), gpg = %config.gpg_program, "configuration");

        let engine = GpgEngine::from_config(&config);
        if self.command.needs_gpg() {
            engine.check_available()?;
        }

        let service = VaultService::new(&config, engine);
        let editor = ExternalEditor::from_config(&config);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        run(
            &self.command,
            &service,
            &TerminalPrompter,
            &editor,
            self.output,
            &mut out,
        )
    }
}

/// Ask before overwriting an existing entry unless `force` is set.
///
/// Returns `None` when the user declines.
fn overwrite_decision<E: CryptoEngine>(
    service: &VaultService<E>,
    prompter: &dyn Prompter,
    name: &EntryName,
    force: bool,
) -> Result<Option<bool>> {
    if force || !service.entry_exists(name) {
        return Ok(Some(force));
    }

    match prompter.confirm(&format!("Entry '{name}' already exists, overwrite?"))? {
        Decision::Proceed => Ok(Some(true)),
        Decision::Decline => Ok(None),
    }
}

/// Run one command. Output goes to `out`; prompts go through `prompter`.
pub fn run<E: CryptoEngine>(
    command: &Commands,
    service: &VaultService<E>,
    prompter: &dyn Prompter,
    editor: &dyn SecretEditor,
    output: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Init { recipients, force } => {
            service.init(recipients, *force)?;
            let root = service.layout().root();
            writeln!(
                out,
                "{}",
                success_line(&format!(
                    "Vault initialized for {}, it can be found at '{}'",
                    recipients.join(" ").bold(),
                    root.display()
                ))
            )?;
            for warn in utils::check_dir_permissions(root) {
                writeln!(out, "{}", warning_line(&warn))?;
            }
        }

        Commands::Add { name, force } => {
            let name = EntryName::parse(name)?;
            service.recipients()?;

            let Some(overwrite) = overwrite_decision(service, prompter, &name, *force)? else {
                writeln!(out, "Aborted, '{name}' left unchanged")?;
                return Ok(());
            };

            let secret = prompter.secret_with_confirmation(&name.to_string())?;
            let path = service.insert(&name, secret.as_bytes(), overwrite)?;
            writeln!(
                out,
                "{}",
                success_line(&format!("Added '{name}' at '{}'", path.display()))
            )?;
        }

        Commands::Generate {
            name,
            length,
            force,
        } => {
            let name = EntryName::parse(name)?;
            service.recipients()?;

            let Some(overwrite) = overwrite_decision(service, prompter, &name, *force)? else {
                writeln!(out, "Aborted, '{name}' left unchanged")?;
                return Ok(());
            };

            let password = service.generate(&name, *length, overwrite)?;
            writeln!(
                out,
                "{}",
                success_line(&format!("Generated password for '{name}'"))
            )?;
            writeln!(out, "{}", password.as_str())?;
        }

        Commands::View { name } => {
            let name = EntryName::parse(name)?;
            let plaintext = service.show(&name)?;
            let text = String::from_utf8_lossy(&plaintext);
            writeln!(out, "{} {name}", "Login:".bold())?;
            writeln!(out, "{} {text}", "Password:".bold())?;
        }

        Commands::Edit { name } => {
            let name = EntryName::parse(name)?;
            service.edit(&name, editor)?;
            writeln!(out, "{}", success_line(&format!("Edited '{name}'")))?;
        }

        Commands::Rm { name } => {
            let name = EntryName::parse(name)?;
            service.remove(&name)?;
            writeln!(out, "{}", success_line(&format!("Removed '{name}'")))?;
        }

        Commands::Ls => {
            let tree = service.list()?;
            match output {
                OutputFormat::Text => {
                    for line in tree {
                        writeln!(out, "{}", line?)?;
                    }
                }
                OutputFormat::Json => {
                    let lines = tree.collect::<Result<Vec<TreeLine>>>()?;
                    let json = serde_json::to_string_pretty(&lines)
                        .map_err(|e| VaultError::Other(e.to_string()))?;
                    writeln!(out, "{json}")?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["gpgpass", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::Ls));
        assert_eq!(cli.output, OutputFormat::Text);

        let cli = Cli::try_parse_from(["gpgpass", "generate", "site/login"]).unwrap();
        match cli.command {
            Commands::Generate { name, length, force } => {
                assert_eq!(name, "site/login");
                assert_eq!(length, DEFAULT_PASSWORD_LENGTH);
                assert!(!force);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["gpgpass", "generate", "x", "0"]).unwrap();
        assert!(matches!(cli.command, Commands::Generate { length: 0, .. }));
    }

    #[test]
    fn test_init_requires_recipient() {
        assert!(Cli::try_parse_from(["gpgpass", "init"]).is_err());

        let cli = Cli::try_parse_from(["gpgpass", "init", "a@x", "b@x", "--force"]).unwrap();
        match cli.command {
            Commands::Init { recipients, force } => {
                assert_eq!(recipients, vec!["a@x", "b@x"]);
                assert!(force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_config_from_flags() {
        let cli = Cli::try_parse_from([
            "gpgpass", "--vault", "/tmp/v", "--gpg", "gpg2", "-o", "json", "ls",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.root, PathBuf::from("/tmp/v"));
        assert_eq!(config.gpg_program, "gpg2");
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_needs_gpg() {
        assert!(Commands::View { name: "x".into() }.needs_gpg());
        assert!(!Commands::Ls.needs_gpg());
        assert!(!Commands::Rm { name: "x".into() }.needs_gpg());
    }
}
