//! Interactive prompts: overwrite confirmation and masked secret entry.

use crate::error::{Result, VaultError};
use dialoguer::{Confirm, Password};
use zeroize::Zeroizing;

/// Outcome of a yes/no confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Decline,
}

impl From<bool> for Decision {
    fn from(answer: bool) -> Self {
        if answer {
            Decision::Proceed
        } else {
            Decision::Decline
        }
    }
}

/// Source of user decisions and secrets.
pub trait Prompter {
    /// Ask a yes/no question; anything but an explicit yes declines.
    fn confirm(&self, message: &str) -> Result<Decision>;

    /// Read a secret twice with masked input; the two must match.
    fn secret_with_confirmation(&self, label: &str) -> Result<Zeroizing<String>>;
}

/// Compare the two entries of a double-entry prompt.
pub fn matching_secret(
    first: Zeroizing<String>,
    second: Zeroizing<String>,
) -> Result<Zeroizing<String>> {
    if *first != *second {
        return Err(VaultError::PasswordsDontMatch);
    }
    Ok(first)
}

/// [`Prompter`] reading from the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> Result<Decision> {
        // Without a terminal there is nobody to say yes.
        if !atty::is(atty::Stream::Stdin) {
            return Ok(Decision::Decline);
        }

        let answer = Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| VaultError::Other(e.to_string()))?;

        Ok(answer.into())
    }

    fn secret_with_confirmation(&self, label: &str) -> Result<Zeroizing<String>> {
        let first = Password::new()
            .with_prompt(format!("Enter password for '{label}'"))
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| VaultError::Other(e.to_string()))?;

        let second = Password::new()
            .with_prompt(format!("Confirm password for '{label}'"))
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| VaultError::Other(e.to_string()))?;

        matching_secret(first, second)
    }
}
