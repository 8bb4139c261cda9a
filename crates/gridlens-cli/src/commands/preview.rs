use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gridlens_viz::CandidateRequest;
use tracing::warn;

use super::util::{load_config, open_session, write_json};

/// Writes the preview geometry, or `null` when the candidate cannot be placed.
pub fn handle(
    snapshot: &Path,
    candidate: &Path,
    output: Option<&PathBuf>,
    config: Option<&Path>,
) -> Result<()> {
    let session = open_session(snapshot, load_config(config)?)?;
    let contents = fs::read_to_string(candidate)
        .with_context(|| format!("reading candidate {}", candidate.display()))?;
    let request: CandidateRequest = serde_json::from_str(&contents)
        .with_context(|| format!("parsing candidate {}", candidate.display()))?;

    let geometry = session.preview(&request);
    if geometry.is_none() {
        warn!("candidate could not be placed on the current snapshot");
    }
    write_json(&geometry, output)
}
