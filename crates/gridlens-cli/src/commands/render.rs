use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use super::util::{load_config, open_session, write_json};

pub struct RenderArgs<'a> {
    pub snapshot: &'a Path,
    pub triangulate: bool,
    pub zones: bool,
    pub no_densify: bool,
    pub output: Option<&'a PathBuf>,
}

pub fn handle(args: RenderArgs<'_>, config: Option<&Path>) -> Result<()> {
    let mut session = open_session(args.snapshot, load_config(config)?)?;
    if args.no_densify {
        session.set_densify(false);
    }
    if args.triangulate && !session.layers().triangles {
        session.toggle_triangles();
    }
    if args.zones && !session.layers().zones {
        session.toggle_zones();
    }
    let frame = session.render()?;
    write_json(&frame, args.output)?;
    info!("overlay produced for {}", args.snapshot.display());
    Ok(())
}
