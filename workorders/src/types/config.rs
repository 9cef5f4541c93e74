use serde::{Deserialize, Serialize};

/// Connection settings for the field-service app API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub site: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_prefix: default_api_prefix(),
            org: String::new(),
            site: String::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Where the config file was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub source: ConfigSource,
    pub config_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Passed with `--config`
    Explicit,
    /// Found by walking up from the working directory
    Local,
    Global,
}

// Default value helpers
fn default_host() -> String {
    "studio.deepomatic.com".to_string()
}

fn default_api_prefix() -> String {
    "/api/fs-app/v1/on-site".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ClientConfig = serde_yaml::from_str("org: acme\nsite: s-1\n").unwrap();
        assert_eq!(config.org, "acme");
        assert_eq!(config.site, "s-1");
        assert_eq!(config.host, "studio.deepomatic.com");
        assert_eq!(config.api_prefix, "/api/fs-app/v1/on-site");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
host: web.vesta.example.com
api_prefix: /api/v2
org: acme
site: s-1
timeout_seconds: 5
"#;
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.host, "web.vesta.example.com");
        assert_eq!(config.api_prefix, "/api/v2");
        assert_eq!(config.timeout_seconds, 5);
    }
}
