use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gridlens_viz::{OverlayConfig, OverlaySession};
use serde::Serialize;
use tracing::{debug, info};

/// Effective configuration: `--config` when given, else the default location.
pub fn load_config(path: Option<&Path>) -> Result<OverlayConfig> {
    OverlayConfig::resolve(path).with_context(|| match path {
        Some(path) => format!("loading config {}", path.display()),
        None => "loading default config".to_string(),
    })
}

/// Session with `snapshot` loaded; ingestion issues are logged, not fatal.
pub fn open_session(snapshot: &Path, config: OverlayConfig) -> Result<OverlaySession> {
    let mut session = OverlaySession::new(config)?;
    let (stats, diagnostics) = session.load_file(snapshot)?;
    for issue in &diagnostics.issues {
        debug!("{issue}");
    }
    info!(
        located = stats.located_nodes,
        dangling = stats.dangling_edges,
        "snapshot ready"
    );
    Ok(session)
}

/// Pretty JSON to `output`, or stdout when absent.
pub fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, &payload)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("output written to {}", path.display());
        }
        None => println!("{payload}"),
    }
    Ok(())
}
