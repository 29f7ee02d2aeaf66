// src/main.rs
mod app;
mod cert;
mod config;
mod store;
mod utils;

use clap::Parser;
use config::BootstrapConfig;
use std::{io, process::ExitCode};
use utils::logging::{ConsoleLogger, FileLogger, Logger, MultiLogger};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render the TLS assets needed to bootstrap a cluster control plane",
    long_about = None
)]
pub struct Args {
    // Specify custom config path
    #[arg(short, long, default_value = "bootstrap_config.json")]
    pub config: String,

    // Override the asset output directory from the config
    #[arg(short, long)]
    pub asset_dir: Option<String>,

    // Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    #[arg(long, default_value = "logs/bootstrap.log")]
    pub log_file: String,

    // Print the effective config as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    // Save the effective config to the config path and exit
    #[arg(long)]
    pub write_config: bool,
}

fn load_config(args: &Args, logger: &mut dyn Logger) -> io::Result<BootstrapConfig> {
    let mut config = match BootstrapConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            logger.log(&format!("No config at {}, using defaults", args.config));
            BootstrapConfig::default()
        }
        Err(e) => return Err(e),
    };
    if let Some(dir) = &args.asset_dir {
        config.asset_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut loggers: Vec<Box<dyn Logger>> = vec![Box::new(ConsoleLogger::new(args.debug))];
    match FileLogger::new(&args.log_file, args.debug) {
        Ok(file_logger) => loggers.push(Box::new(file_logger)),
        Err(e) => eprintln!("Failed to open log file {}: {}", args.log_file, e),
    }
    let mut logger = MultiLogger::new(loggers);

    let config = match load_config(&args, &mut logger) {
        Ok(config) => config,
        Err(e) => {
            logger.log(&format!("Failed to load config {}: {}", args.config, e));
            return ExitCode::FAILURE;
        }
    };

    if args.print_config {
        return match serde_json::to_string_pretty(&config) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                logger.log(&format!("Failed to render config: {}", e));
                ExitCode::FAILURE
            }
        };
    }

    if args.write_config {
        return match config.save_to_file(&args.config) {
            Ok(()) => {
                logger.log(&format!("Wrote config to {}", args.config));
                ExitCode::SUCCESS
            }
            Err(e) => {
                logger.log(&format!("Failed to write config {}: {}", args.config, e));
                ExitCode::FAILURE
            }
        };
    }

    match app::run_bootstrap(&config, &mut logger) {
        Ok(assets) => {
            logger.log(&format!(
                "Bootstrap assets ready: {} files in {}",
                assets.len(),
                config.asset_dir().display()
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger.log(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
