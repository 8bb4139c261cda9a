use std::path::Path;

use anyhow::Result;

use super::util::load_config;

pub fn handle(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
