use std::process::ExitCode;

use clap::Parser;
use gridlens_cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::nearest::NearestArgs;
use commands::render::RenderArgs;

/// `GRIDLENS_LOG` wins, then `RUST_LOG`, then `--log-level`. Logs go to
/// stderr so stdout carries only JSON.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_env("GRIDLENS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Render {
            snapshot,
            triangulate,
            zones,
            no_densify,
            output,
        } => commands::render::handle(
            RenderArgs {
                snapshot,
                triangulate: *triangulate,
                zones: *zones,
                no_densify: *no_densify,
                output: output.as_ref(),
            },
            config,
        ),
        Commands::Triangulate { snapshot, output } => {
            commands::triangulate::handle(snapshot, output.as_ref(), config)
        }
        Commands::Nearest {
            snapshot,
            lat,
            lon,
            k,
            voltage,
        } => commands::nearest::handle(
            NearestArgs {
                snapshot,
                lat: *lat,
                lon: *lon,
                k: *k,
                voltage: *voltage,
            },
            config,
        ),
        Commands::Preview {
            snapshot,
            candidate,
            output,
        } => commands::preview::handle(snapshot, candidate, output.as_ref(), config),
        Commands::Topology { snapshot, output } => {
            commands::topology::handle(snapshot, output.as_ref(), config)
        }
        Commands::Zones {
            snapshot,
            rows,
            cols,
            output,
        } => commands::zones::handle(snapshot, *rows, *cols, output.as_ref(), config),
        Commands::Config => commands::config::handle(config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
