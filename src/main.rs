use env_logger::Builder;
use log::{LevelFilter, error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use cloudsim_replay::config::ReplayConfig;
use cloudsim_replay::pipeline;

const DEFAULT_CONFIG_PATH: &str = "replay.toml";

fn run(config: &ReplayConfig) -> anyhow::Result<()> {
    for strategy in &config.strategies {
        let output = pipeline::animate_strategy(strategy, &config.animation, &config.output_dir)?;
        match output.artifact {
            Some(path) => info!("{} animation saved as {}", strategy.name, path.display()),
            None => info!("{}: no animation written", strategy.name),
        }
    }

    if pipeline::compare_runtimes(&config.metrics)?.is_none() {
        error!("Comparison chart skipped");
    }
    Ok(())
}

fn main() -> ExitCode {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("cloudsim_replay"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match ReplayConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting replay of {} strategy log(s)", config.strategies.len());
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
