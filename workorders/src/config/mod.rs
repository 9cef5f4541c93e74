pub mod error;
pub mod loader;
pub mod paths;

use std::path::Path;

pub use error::ConfigError;
pub use loader::{read_config, read_config_with_env, read_token, validate_config};
pub use paths::{find_local_config, resolve_config_path};

use crate::types::{ClientConfig, ConfigLocation};

/// Resolve, read, override and validate the configuration for a run.
pub fn load(explicit: Option<&Path>) -> Result<(ConfigLocation, ClientConfig), ConfigError> {
    let location = resolve_config_path(explicit);
    let config = if location.source == crate::types::ConfigSource::Explicit {
        // An explicitly named file has to exist
        let mut config = read_config(&location.config_path)?;
        loader::apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
        config
    } else {
        read_config_with_env(&location.config_path)?
    };
    validate_config(&config)?;
    Ok((location, config))
}
