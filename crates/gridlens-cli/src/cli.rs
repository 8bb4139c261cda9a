use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridlens", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overridden by GRIDLENS_LOG / RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    /// Overlay config file (defaults to ~/.gridlens/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a snapshot into overlay primitives (JSON)
    Render {
        /// Network snapshot JSON
        snapshot: PathBuf,
        /// Include Delaunay faces over the stations
        #[arg(long)]
        triangulate: bool,
        /// Include the planning-zone grid
        #[arg(long)]
        zones: bool,
        /// Draw at true coordinates
        #[arg(long)]
        no_densify: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delaunay triangulation of the located stations
    Triangulate {
        snapshot: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Stations nearest to a point
    Nearest {
        snapshot: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Number of stations to return
        #[arg(short, long, default_value_t = 1)]
        k: usize,
        /// Restrict the great-circle match to one voltage level (kV)
        #[arg(long)]
        voltage: Option<f64>,
    },
    /// Preview a planning candidate against a snapshot
    Preview {
        snapshot: PathBuf,
        /// Candidate JSON (new_line, new_substation or substation_expansion)
        candidate: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Degree, weak-node and island summary
    Topology {
        snapshot: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rectangular planning zones as GeoJSON
    Zones {
        snapshot: PathBuf,
        #[arg(long)]
        rows: Option<usize>,
        #[arg(long)]
        cols: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}
