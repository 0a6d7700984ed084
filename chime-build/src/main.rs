#[macro_use]
extern crate tracing;

use chime_config::Configuration;
use clap::Parser;
use color_eyre::eyre::{self, Context};
use std::{path::PathBuf, process::ExitCode};

/// Compile, prefix and write every stylesheet of the project
#[derive(Parser)]
#[command(about, author, version)]
struct Args {
    /// Path to the configuration file. Without one the defaults are used
    #[clap(long, short)]
    config: Option<PathBuf>,
}

async fn boot() -> eyre::Result<ExitCode> {
    let args = Args::parse();
    chime_observability::initialise()?;

    let config = match args.config {
        Some(path) => Configuration::load(&path)
            .await
            .wrap_err_with(|| format!("Failed to load the configuration from {}", path.display()))?,
        None => Configuration::default(),
    };

    let report = chime_scss_compiler::build(&config)
        .await
        .map_err(chime_error::Error::into_error)
        .wrap_err("Failed to build the stylesheets")?;

    info!(
        built = report.built.len(),
        failed = report.failed.len(),
        "finished build"
    );

    if config.fail_on_error && !report.is_success() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(boot())
}
