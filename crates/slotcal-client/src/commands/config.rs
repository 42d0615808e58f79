//! Configuration commands.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the effective configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    config
        .validate()
        .map_err(|e| ClientError::Config(e.to_string()))?;
    if config.calendar.shop_id == 0 {
        println!("warning: calendar.shop_id is not set");
    }
    println!("Configuration is valid ({} provider).", provider_label(config));
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    println!("config: {}", ClientConfig::default_path().display());
    Ok(())
}

fn provider_label(config: &ClientConfig) -> &'static str {
    match config.provider {
        crate::config::ProviderKind::Api => "api",
        crate::config::ProviderKind::Static => "static",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    #[test]
    fn validate_accepts_static_defaults() {
        let config = ClientConfig {
            provider: ProviderKind::Static,
            ..Default::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn validate_reports_unresolvable_endpoint() {
        let err = validate(&ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("relative"));
    }

    #[test]
    fn dump_serializes_defaults() {
        assert!(dump(&ClientConfig::default()).is_ok());
    }
}
