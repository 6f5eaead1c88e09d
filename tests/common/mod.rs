// Shared fakes for the integration tests.
#![allow(dead_code)]

use gpgpass::prompt::{matching_secret, Decision, Prompter};
use gpgpass::secure_temp::SecretEditor;
use gpgpass::{CryptoEngine, Result, VaultConfig, VaultError, VaultService};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use zeroize::Zeroizing;

const HEADER: &[u8] = b"-----FAKE PGP MESSAGE-----\n";

/// Reversible stand-in for GPG: the ciphertext names its recipients and
/// only an engine holding one of them can read it back.
pub struct FakeEngine {
    secret_keys: Vec<String>,
}

impl FakeEngine {
    pub fn holding(keys: &[&str]) -> Self {
        Self {
            secret_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl CryptoEngine for FakeEngine {
    fn encrypt(&self, plaintext: &[u8], recipients: &[String], output: &Path) -> Result<()> {
        let mut data = HEADER.to_vec();
        data.extend_from_slice(recipients.join(" ").as_bytes());
        data.push(b'\n');
        // keep the plaintext out of the file in the clear
        data.extend(plaintext.iter().map(|b| b ^ 0x5a));
        fs::write(output, data)?;
        Ok(())
    }

    fn decrypt(&self, input: &Path) -> Result<Zeroizing<Vec<u8>>> {
        let data = fs::read(input)?;
        let body = data
            .strip_prefix(HEADER)
            .ok_or_else(|| VaultError::DecryptionError("no valid OpenPGP data found".into()))?;
        let split = body
            .iter()
            .position(|b| *b == b'\n')
            .ok_or_else(|| VaultError::DecryptionError("invalid packet".into()))?;
        let recipients = String::from_utf8_lossy(&body[..split]);
        if !recipients
            .split(' ')
            .any(|r| self.secret_keys.iter().any(|k| k == r))
        {
            return Err(VaultError::DecryptionError(
                "decryption failed: No secret key".into(),
            ));
        }
        Ok(Zeroizing::new(
            body[split + 1..].iter().map(|b| b ^ 0x5a).collect(),
        ))
    }
}

/// Replays canned answers.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub confirmations: RefCell<VecDeque<Decision>>,
    pub secrets: RefCell<VecDeque<(String, String)>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn confirming(decision: Decision) -> Self {
        let prompter = Self::default();
        prompter.confirmations.borrow_mut().push_back(decision);
        prompter
    }

    pub fn with_secret(self, first: &str, second: &str) -> Self {
        self.secrets
            .borrow_mut()
            .push_back((first.to_string(), second.to_string()));
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> Result<Decision> {
        self.asked.borrow_mut().push(message.to_string());
        Ok(self
            .confirmations
            .borrow_mut()
            .pop_front()
            .unwrap_or(Decision::Decline))
    }

    fn secret_with_confirmation(&self, label: &str) -> Result<Zeroizing<String>> {
        self.asked.borrow_mut().push(label.to_string());
        let (first, second) = self
            .secrets
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| VaultError::Other("no scripted secret".to_string()))?;
        matching_secret(Zeroizing::new(first), Zeroizing::new(second))
    }
}

/// Replaces the file content with fixed text.
pub struct ReplacingEditor(pub &'static str);

impl SecretEditor for ReplacingEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        fs::write(path, self.0)?;
        Ok(())
    }
}

pub fn vault_with(keys: &[&str]) -> (TempDir, VaultService<FakeEngine>) {
    let dir = tempfile::tempdir().unwrap();
    let config = VaultConfig::with_root(dir.path().join("vault"));
    (dir, VaultService::new(&config, FakeEngine::holding(keys)))
}
