use std::path::{Path, PathBuf};

use anyhow::Result;

use super::util::{load_config, open_session, write_json};

/// Grid size defaults to the `[zones]` config section.
pub fn handle(
    snapshot: &Path,
    rows: Option<usize>,
    cols: Option<usize>,
    output: Option<&PathBuf>,
    config: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let rows = rows.unwrap_or(config.zones.rows);
    let cols = cols.unwrap_or(config.zones.cols);
    let session = open_session(snapshot, config)?;
    write_json(&session.zones(rows, cols)?, output)
}
