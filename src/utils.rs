//! Terminal output helpers.

use colored::*;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Check directory permissions and return warnings.
pub fn check_dir_permissions(path: &Path) -> Vec<String> {
    let mut warnings = Vec::new();

    #[cfg(unix)]
    {
        if let Ok(metadata) = std::fs::metadata(path) {
            let mode = metadata.permissions().mode();

            // Check if group or others have any permissions
            if mode & 0o077 != 0 {
                warnings.push(format!(
                    "Vault directory has insecure permissions: {:o}. Run 'chmod 700 {}' to fix.",
                    mode & 0o777,
                    path.display()
                ));
            }
        }
    }

    #[cfg(not(unix))]
    let _ = path;

    warnings
}

/// Format a success message.
pub fn success_line(message: &str) -> String {
    format!("{} {}", "✓".green(), message)
}

/// Format a warning message.
pub fn warning_line(message: &str) -> String {
    format!("{} {}", "Warning:".yellow(), message)
}

/// Print an error message and exit.
pub fn error_exit(message: &str, code: i32) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lines_carry_message() {
        assert!(success_line("Added 'x'").contains("Added 'x'"));
        assert!(warning_line("careful").contains("careful"));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_dir_permissions() {
        let dir = tempdir().unwrap();

        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o700)).unwrap();
        assert!(check_dir_permissions(dir.path()).is_empty());

        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
        let warnings = check_dir_permissions(dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("755"));
    }
}
