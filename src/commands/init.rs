use crate::commands::{Out, Output};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and an initial `config.json` with default settings.
///
/// # Arguments
/// - `home` - The directory that will be the home directory, e.g. `$HOME/.sales-dash`
/// - `base_url` - The sales data service endpoint, or `None` for the public service.
///
/// # Errors
/// - Returns an error if the config file already exists or any file operations fail.
pub async fn init(home: &Path, base_url: Option<&str>) -> Result<Out<Output>> {
    let config = Config::create(home, base_url)
        .await
        .context("Unable to create the home directory and config")?;
    Ok(format!(
        "Successfully created '{}' using {}",
        config.config_path().display(),
        config.base_url()
    )
    .into())
}
