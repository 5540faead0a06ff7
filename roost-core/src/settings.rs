//! Required-setting precondition.
//!
//! The managed program refuses to start without its secret key, so roost
//! checks for it before touching anything: either the process environment
//! has it, or the env file that gets deployed next to the executable does.

use std::path::Path;

use crate::error::ConfigurationError;

/// Where the required setting was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    Environment,
    EnvFile,
}

/// Check `key` against the real process environment and `env_file`.
pub fn check_required_setting(
    key: &str,
    env_file: &Path,
) -> Result<SettingSource, ConfigurationError> {
    check_required_setting_with(key, env_file, |k| std::env::var(k).ok())
}

/// Same as [`check_required_setting`] with an injectable environment lookup.
pub fn check_required_setting_with(
    key: &str,
    env_file: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SettingSource, ConfigurationError> {
    // Set counts, even when empty.
    if lookup(key).is_some() {
        return Ok(SettingSource::Environment);
    }

    if !env_file.is_file() {
        return Err(ConfigurationError::EnvFileMissing {
            key: key.to_owned(),
            path: env_file.to_path_buf(),
        });
    }

    if env_file_defines(key, env_file)? {
        tracing::debug!("{key} found in {}", env_file.display());
        Ok(SettingSource::EnvFile)
    } else {
        Err(ConfigurationError::SettingMissing {
            key: key.to_owned(),
            path: env_file.to_path_buf(),
        })
    }
}

fn env_file_defines(key: &str, env_file: &Path) -> Result<bool, ConfigurationError> {
    let unreadable = |details: String| ConfigurationError::EnvFileUnreadable {
        path: env_file.to_path_buf(),
        details,
    };

    let iter = dotenvy::from_path_iter(env_file).map_err(|e| unreadable(e.to_string()))?;
    for item in iter {
        match item {
            Ok((k, _)) if k == key => return Ok(true),
            Ok(_) => {}
            Err(e) => {
                // Syntax of the env file is the program's business; fall back to a plain scan.
                tracing::debug!("{} did not parse cleanly ({e}); scanning lines", env_file.display());
                let text = std::fs::read_to_string(env_file).map_err(|e| unreadable(e.to_string()))?;
                return Ok(scan_for_key(key, &text));
            }
        }
    }
    Ok(false)
}

fn scan_for_key(key: &str, text: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim_start();
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        line.strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
}
