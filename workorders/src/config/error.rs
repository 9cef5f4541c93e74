use std::fmt;

/// Errors that can occur while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found at expected path
    NotFound(String),
    /// Failed to parse config file (YAML syntax error)
    ParseError(String),
    /// IO error reading config
    IoError(std::io::Error),
    /// Config validation failed
    ValidationError(Vec<String>),
    /// No API token in the environment
    MissingToken(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {msg}"),
            ConfigError::IoError(err) => write!(f, "Config IO error: {err}"),
            ConfigError::ValidationError(errors) => {
                writeln!(f, "Config validation failed:")?;
                for err in errors {
                    writeln!(f, "  - {err}")?;
                }
                Ok(())
            }
            ConfigError::MissingToken(var) => {
                write!(f, "{var} environment variable is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound("/path/to/config.yaml".to_string());
        assert!(err.to_string().contains("/path/to/config.yaml"));

        let err = ConfigError::ParseError("invalid YAML".to_string());
        assert!(err.to_string().contains("invalid YAML"));

        let err = ConfigError::ValidationError(vec![
            "org is empty".to_string(),
            "site is empty".to_string(),
        ]);
        let display = err.to_string();
        assert!(display.contains("org is empty"));
        assert!(display.contains("site is empty"));

        let err = ConfigError::MissingToken("WORKORDERS_TOKEN");
        assert!(err.to_string().contains("WORKORDERS_TOKEN"));
    }

    #[test]
    fn test_config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::IoError(_)));
        assert!(std::error::Error::source(&config_err).is_some());
    }
}
