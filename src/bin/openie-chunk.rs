use anyhow::{anyhow, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, LevelFilter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use openie_harvest::app_config::LogLevel;
use openie_harvest::chunker::split_file_until;
use openie_harvest::errors::AppError;
use openie_harvest::file_utils::FileManager;
use openie_harvest::logging::CustomLogger;
use openie_harvest::prompt::{parse_file_name, parse_integer, prompt_stdin_or_interrupt};

/// Split an OpenIE JSON collection into N balanced chunk files
///
/// Reads `<dir>/<file>` and writes `<dir>/<stem>-part<N>.json`. Missing
/// arguments are asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "openie-chunk")]
#[command(version)]
struct ChunkOptions {
    /// Collection file name, relative to --dir
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Number of chunks to write
    #[arg(short = 'n', long)]
    chunks: Option<i64>,

    /// Directory holding the collection and receiving the chunks
    #[arg(short, long, default_value = "openie")]
    dir: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: CliLogLevel,
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, clap::ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
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
    let options = ChunkOptions::parse();
    log::set_max_level(LogLevel::from(options.log_level.clone()).to_level_filter());

    let file_name = match options.file {
        Some(name) => name,
        None => match prompt_stdin_or_interrupt("OpenIE JSON file name: ", parse_file_name).await? {
            Some(name) => name,
            None => return Ok(()),
        },
    };
    let requested = match options.chunks {
        Some(count) => count,
        None => match prompt_stdin_or_interrupt("Number of chunks: ", parse_integer).await? {
            Some(count) => count,
            None => return Ok(()),
        },
    };

    let source = options.dir.join(&file_name);
    if !FileManager::file_exists(&source) {
        error!("File {:?} does not exist", source);
        if FileManager::dir_exists(&options.dir) {
            let available = FileManager::find_files(&options.dir, "json")?;
            if !available.is_empty() {
                info!("Available files in {:?}:", options.dir);
                for path in available {
                    info!("  {}", path.file_name().unwrap_or_default().to_string_lossy());
                }
            }
        }
        return Ok(());
    }

    let requested = match usize::try_from(requested) {
        Ok(count) if count > 0 => count,
        _ => {
            error!("The chunk count must be greater than 0");
            return Ok(());
        }
    };

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} chunks")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let mut splitter = tokio::task::spawn_blocking({
        let interrupted = Arc::clone(&interrupted);
        let progress = progress.clone();
        move || split_file_until(&source, requested, &progress, &interrupted)
    });

    let joined = tokio::select! {
        joined = &mut splitter => joined,
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| anyhow!("Failed to listen for Ctrl-C: {}", e))?;
            warn!("Interrupted, finishing the current chunk file");
            interrupted.store(true, Ordering::SeqCst);
            splitter.await
        }
    };
    progress.finish_and_clear();
    let result = joined.map_err(|e| anyhow!("Chunk writer failed: {}", e))?;

    match result {
        Ok(report) => {
            for (path, count) in &report.files {
                println!("✓ {} ({} documents)", path.display(), count);
            }
            println!("Done: {} chunk files written", report.plan.count);
            Ok(())
        }
        Err(AppError::Input(message)) => {
            error!("{}", message);
            Ok(())
        }
        Err(AppError::Interrupted) => {
            warn!("Exiting");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
