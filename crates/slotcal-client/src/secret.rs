//! Header value references.
//!
//! Header values in `config.toml` (typically `Authorization`) may point at a
//! secret instead of embedding it:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - `pass::path/in/store` takes the first line of `pass show path/in/store`
//! - anything else is used verbatim

use std::process::Command;

use crate::config::ConfigError;

/// Resolves a possibly indirect header value.
pub fn resolve(value: &str) -> Result<String, ConfigError> {
    if let Some(var) = value.strip_prefix("env::") {
        std::env::var(var)
            .map_err(|_| ConfigError::Secret(format!("environment variable `{}` is not set", var)))
    } else if let Some(path) = value.strip_prefix("pass::") {
        from_pass(path)
    } else {
        Ok(value.to_string())
    }
}

fn from_pass(path: &str) -> Result<String, ConfigError> {
    let output = Command::new("pass")
        .args(["show", path])
        .output()
        .map_err(|e| ConfigError::Secret(format!("failed to run `pass show {}`: {}", path, e)))?;

    if !output.status.success() {
        return Err(ConfigError::Secret(format!(
            "`pass show {}` exited with {}: {}",
            path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Secret(format!("`pass show {}` printed nothing", path)))
}
