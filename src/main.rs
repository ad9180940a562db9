//! dockersql CLI - query your Docker host with SQL

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dockersql::config::{load_config, Config};
use dockersql::app;
use dockersql::shell::{RustylineReader, SessionOutcome};
use dockersql::ui::TableRenderer;
use dockersql::{DockerClient, SqliteStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dockersql")]
#[command(version)]
#[command(about = "Query your Docker containers and images with SQL")]
#[command(long_about = r#"
dockersql snapshots the containers and images of a Docker daemon into an
in-memory SQLite database and opens an interactive SQL shell on it.

Tables:
  containers(id, name, names, image, image_id, command, state, status, created, ports, labels)
  images(id, reference, tags, parent_id, size, created, labels)

Example usage:
  dockersql
  dockersql --docker tcp://10.0.0.5:2375
  > SELECT name, state FROM containers WHERE state != 'running';
"#)]
struct Cli {
    /// Enable debug output for the logs
    #[arg(short, long)]
    debug: bool,

    /// URL of your Docker daemon endpoint [default: unix:///var/run/docker.sock]
    #[arg(long, env = "DOCKER_HOST")]
    docker: Option<String>,

    /// Path to a config file (defaults to ./dockersql.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let file_config = match load_config(cli.config.as_deref()) {
        Ok(file_config) => file_config,
        Err(e) => {
            eprintln!("Error: failed to load config: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = Config::resolve(file_config, cli.debug, cli.docker);

    // Initialize logging
    let filter = if config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&config) {
        Ok(outcome) => {
            tracing::debug!("Session ended: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<SessionOutcome> {
    let reader = RustylineReader::new(true).context("cannot start line editor")?;

    let outcome = app::run(
        || {
            tracing::debug!("Connecting to Docker daemon at {}", config.docker);
            DockerClient::connect(&config.endpoint()?)
        },
        SqliteStore::open_in_memory,
        reader,
        TableRenderer::stdout(),
    )?;
    Ok(outcome)
}
