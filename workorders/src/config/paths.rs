use std::env;
use std::path::{Path, PathBuf};

use crate::types::{ConfigLocation, ConfigSource};

pub const LOCAL_CONFIG_FILE: &str = "workorders.config.yaml";

/// Get the global config directory (~/.config/workorders or $XDG_CONFIG_HOME/workorders)
pub fn get_global_config_dir() -> PathBuf {
    let base = if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config")
    } else {
        PathBuf::from(".config")
    };
    base.join("workorders")
}

/// Walk up from start_dir looking for workorders.config.yaml
pub fn find_local_config(start_dir: Option<&Path>) -> Option<PathBuf> {
    let start = match start_dir {
        Some(dir) => dir.to_path_buf(),
        None => env::current_dir().ok()?,
    };

    let mut dir = start.as_path();

    loop {
        let config_path = dir.join(LOCAL_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => break,
        }
    }

    None
}

/// Resolve which config file to read.
/// Priority: explicit path > local config (walk up tree) > global config
pub fn resolve_config_path(explicit: Option<&Path>) -> ConfigLocation {
    resolve_config_path_from(explicit, None)
}

pub fn resolve_config_path_from(
    explicit: Option<&Path>,
    start_dir: Option<&Path>,
) -> ConfigLocation {
    if let Some(path) = explicit {
        return ConfigLocation {
            source: ConfigSource::Explicit,
            config_path: path.to_string_lossy().to_string(),
        };
    }

    if let Some(local_config) = find_local_config(start_dir) {
        return ConfigLocation {
            source: ConfigSource::Local,
            config_path: local_config.to_string_lossy().to_string(),
        };
    }

    ConfigLocation {
        source: ConfigSource::Global,
        config_path: get_global_config_dir()
            .join("config.yaml")
            .to_string_lossy()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_local_config_with_temp_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join(LOCAL_CONFIG_FILE);
        std::fs::write(&config_path, "org: acme\n").unwrap();

        let found = find_local_config(Some(tmp.path()));
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_local_config_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join(LOCAL_CONFIG_FILE);
        std::fs::write(&config_path, "org: acme\n").unwrap();

        let subdir = tmp.path().join("reports").join("2024");
        std::fs::create_dir_all(&subdir).unwrap();

        let found = find_local_config(Some(&subdir));
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_local_config_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let found = find_local_config(Some(tmp.path()));
        assert!(found.is_none());
    }

    #[test]
    fn test_explicit_path_wins() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(LOCAL_CONFIG_FILE), "org: acme\n").unwrap();
        let explicit = tmp.path().join("other.yaml");

        let location = resolve_config_path_from(Some(&explicit), Some(tmp.path()));
        assert_eq!(location.source, ConfigSource::Explicit);
        assert!(location.config_path.ends_with("other.yaml"));
    }

    #[test]
    fn test_local_before_global() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(LOCAL_CONFIG_FILE), "org: acme\n").unwrap();

        let location = resolve_config_path_from(None, Some(tmp.path()));
        assert_eq!(location.source, ConfigSource::Local);
    }

    #[test]
    fn test_global_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        let location = resolve_config_path_from(None, Some(tmp.path()));
        assert_eq!(location.source, ConfigSource::Global);
        assert!(location.config_path.contains("workorders"));
        assert!(location.config_path.ends_with("config.yaml"));
    }
}
