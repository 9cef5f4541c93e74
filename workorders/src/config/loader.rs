use std::fs;
use std::path::Path;

use super::error::ConfigError;
use crate::types::ClientConfig;

pub const ENV_HOST: &str = "WORKORDERS_HOST";
pub const ENV_ORG: &str = "WORKORDERS_ORG";
pub const ENV_SITE: &str = "WORKORDERS_SITE";
pub const ENV_TIMEOUT_SECONDS: &str = "WORKORDERS_TIMEOUT_SECONDS";
pub const ENV_TOKEN: &str = "WORKORDERS_TOKEN";

/// Variables that override file settings, in display order
pub const OVERRIDE_VARS: [&str; 4] = [ENV_HOST, ENV_ORG, ENV_SITE, ENV_TIMEOUT_SECONDS];

/// Read and parse a config file.
pub fn read_config(path: &str) -> Result<ClientConfig, ConfigError> {
    if !Path::new(path).exists() {
        return Err(ConfigError::NotFound(path.to_string()));
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(ClientConfig::default());
    }
    Ok(serde_yaml::from_str(&contents)?)
}

/// Read a config file, falling back to defaults when it does not exist.
pub fn read_config_or_default(path: &str) -> Result<ClientConfig, ConfigError> {
    match read_config(path) {
        Err(ConfigError::NotFound(_)) => Ok(ClientConfig::default()),
        other => other,
    }
}

/// Apply `WORKORDERS_*` overrides from `lookup`.
pub fn apply_env_overrides<L>(config: &mut ClientConfig, lookup: L) -> Result<(), ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_HOST) {
        config.host = host;
    }
    if let Some(org) = lookup(ENV_ORG) {
        config.org = org;
    }
    if let Some(site) = lookup(ENV_SITE) {
        config.site = site;
    }
    if let Some(timeout) = lookup(ENV_TIMEOUT_SECONDS) {
        config.timeout_seconds = timeout.trim().parse().map_err(|_| {
            ConfigError::ValidationError(vec![format!(
                "{ENV_TIMEOUT_SECONDS} must be a whole number of seconds, got '{timeout}'"
            )])
        })?;
    }
    Ok(())
}

/// Read a config file (or defaults) and apply environment overrides.
pub fn read_config_with_env(path: &str) -> Result<ClientConfig, ConfigError> {
    let mut config = read_config_or_default(path)?;
    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    Ok(config)
}

/// Check that the settings can address an API.
pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.host.trim().is_empty() {
        errors.push("host must not be empty".to_string());
    }
    if config.org.trim().is_empty() {
        errors.push(format!("org must be set (config file or {ENV_ORG})"));
    }
    if config.site.trim().is_empty() {
        errors.push(format!("site must be set (config file or {ENV_SITE})"));
    }
    if config.timeout_seconds == 0 {
        errors.push("timeout_seconds must be greater than 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors))
    }
}

/// API token from `lookup`. Never read from the config file.
pub fn read_token<L>(lookup: L) -> Result<String, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    lookup(ENV_TOKEN)
        .filter(|token| !token.trim().is_empty())
        .ok_or(ConfigError::MissingToken(ENV_TOKEN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn valid_config() -> ClientConfig {
        ClientConfig {
            org: "acme".to_string(),
            site: "site-1".to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_read_config_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        let err = read_config(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));

        let config = read_config_or_default(&path.to_string_lossy()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_read_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "org: acme\nsite: site-1\ntimeout_seconds: 10\n").unwrap();

        let config = read_config(&path.to_string_lossy()).unwrap();
        assert_eq!(config.org, "acme");
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_read_config_empty_file_is_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();

        let config = read_config(&path.to_string_lossy()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_read_config_invalid_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "org: [unclosed\n").unwrap();

        let err = read_config(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = valid_config();
        let lookup = env_of(&[
            (ENV_HOST, "web.vesta.example.com"),
            (ENV_SITE, "site-2"),
            (ENV_TIMEOUT_SECONDS, " 12 "),
        ]);

        apply_env_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.host, "web.vesta.example.com");
        assert_eq!(config.org, "acme");
        assert_eq!(config.site, "site-2");
        assert_eq!(config.timeout_seconds, 12);
    }

    #[test]
    fn test_env_override_bad_timeout() {
        let mut config = valid_config();
        let err = apply_env_overrides(&mut config, env_of(&[(ENV_TIMEOUT_SECONDS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = ClientConfig {
            timeout_seconds: 0,
            ..ClientConfig::default()
        };
        match validate_config(&config).unwrap_err() {
            ConfigError::ValidationError(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_read_token() {
        assert_eq!(read_token(env_of(&[(ENV_TOKEN, "abc")])).unwrap(), "abc");
        assert!(matches!(
            read_token(env_of(&[])),
            Err(ConfigError::MissingToken(ENV_TOKEN))
        ));
        assert!(read_token(env_of(&[(ENV_TOKEN, "  ")])).is_err());
    }
}
