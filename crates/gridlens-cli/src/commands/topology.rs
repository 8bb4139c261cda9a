use std::path::{Path, PathBuf};

use anyhow::Result;

use super::util::{load_config, open_session, write_json};

pub fn handle(snapshot: &Path, output: Option<&PathBuf>, config: Option<&Path>) -> Result<()> {
    let session = open_session(snapshot, load_config(config)?)?;
    write_json(&session.topology()?, output)
}
