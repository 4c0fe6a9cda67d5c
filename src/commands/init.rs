use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the earnings home directory and an initial `config.json` with default settings.
///
/// # Errors
/// - Returns an error if the config file already exists or any file operation fails.
pub async fn init(earnings_home: &Path) -> Result<Out<()>> {
    let config = Config::create(earnings_home)
        .await
        .context("Unable to create the earnings directory and config")?;
    Ok(format!(
        "Successfully created the earnings directory and config at '{}'",
        config.root().display()
    )
    .into())
}
