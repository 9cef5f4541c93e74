pub mod config;
pub mod list;
pub mod show;

use std::path::Path;

use crate::config::{load, read_token};
use crate::resolver::WorkOrderClient;

/// Load settings and token, then build an HTTP client.
pub(crate) fn connect(config_path: Option<&Path>) -> anyhow::Result<WorkOrderClient> {
    let (_, config) = load(config_path)?;
    let token = read_token(|var| std::env::var(var).ok())?;
    Ok(WorkOrderClient::from_config(&config, &token)?)
}
