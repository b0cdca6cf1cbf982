use super::{HarnessConfig, MAX_TIMEOUT_SECS};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;

impl HarnessConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize free-form strings.
    pub fn validate(&mut self) -> Result<()> {
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            bail!(
                "--timeout-secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            );
        }

        let make_cmd = self.make_cmd.trim();
        if make_cmd.is_empty() {
            bail!("--make-cmd cannot be empty");
        }
        self.make_cmd = make_cmd.to_string();

        if self.search_dirs.is_empty() {
            bail!("at least one --search-dir is required");
        }
        if self.search_dirs.iter().any(|dir| dir.as_os_str().is_empty()) {
            bail!("--search-dir cannot be empty");
        }

        if self.suites.is_empty() {
            bail!("no suite files given");
        }

        validate_shell(&self.shell)?;

        if let Some(filter) = self.filter.take() {
            let trimmed = filter.trim();
            if trimmed.is_empty() {
                bail!("--filter cannot be empty");
            }
            self.filter = Some(trimmed.to_string());
        }

        Ok(())
    }
}

/// A shell given as a path must point at an executable file; bare names are left to `PATH`.
pub(super) fn validate_shell(shell: &Path) -> Result<()> {
    let raw = shell.as_os_str();
    if raw.is_empty() {
        bail!("--shell cannot be empty");
    }
    if !shell.is_absolute() && shell.components().count() == 1 {
        return Ok(());
    }
    let metadata = fs::metadata(shell)
        .with_context(|| format!("failed to inspect --shell '{}'", shell.display()))?;
    if !metadata.is_file() {
        bail!("--shell '{}' is not a file", shell.display());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            bail!("--shell '{}' is not executable", shell.display());
        }
    }
    Ok(())
}
