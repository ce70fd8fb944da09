// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, LevelFilter};
use std::path::PathBuf;

use openie_harvest::app_config::{Config, LogLevel};
use openie_harvest::app_controller::Controller;
use openie_harvest::logging::CustomLogger;
use openie_harvest::prompt::{parse_stop_id, prompt_stdin_or_interrupt};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for openie-harvest
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// openie-harvest - scrape a paginated API into OpenIE segment files
///
/// Fetches the tag dictionary, pages through the record list until the stop
/// id (exclusive) or an empty page, and writes OpenIE documents in segments.
#[derive(Parser, Debug)]
#[command(name = "openie-harvest")]
#[command(version)]
#[command(about = "Scrape a paginated API into OpenIE JSON segments")]
#[command(long_about = "openie-harvest pages through the remote record list, maps tag codes to labels
and writes OpenIE documents (passage, entities, triples) as JSON segment files.

EXAMPLES:
    openie-harvest                          # Ask for the stop id interactively
    openie-harvest --stop-id 12000          # Stop before record 12000
    openie-harvest -o out --log-level debug # Write to ./out with debug logging
    openie-harvest completions bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Id of the first record NOT to collect; asked interactively when omitted
    #[arg(short, long)]
    stop_id: Option<u64>,

    /// Directory receiving the segment files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Base URL of the API
    #[arg(short, long)]
    base_url: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run());
    // A prompt interrupted by Ctrl-C leaves its stdin reader blocked
    runtime.shutdown_background();
    result
}

async fn run() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "openie-harvest", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(output_dir) = &cli.output_dir {
        config.output.output_dir = output_dir.to_string_lossy().into_owned();
    }
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    let stop_id = match cli.stop_id {
        Some(stop_id) => stop_id,
        None => {
            let answer = prompt_stdin_or_interrupt(
                "Stop id (collection stops before this record): ",
                parse_stop_id,
            )
            .await?;
            match answer {
                Some(stop_id) => stop_id,
                None => {
                    info!("Exiting");
                    return Ok(());
                }
            }
        }
    };

    tokio::select! {
        summary = controller.run(stop_id) => {
            let summary = summary?;
            println!();
            println!("{}", summary);
            Ok(())
        }
        interrupted = tokio::signal::ctrl_c() => {
            interrupted.map_err(|e| anyhow!("Failed to listen for Ctrl-C: {}", e))?;
            warn!("Interrupted, exiting");
            Ok(())
        }
    }
}
