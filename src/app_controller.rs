use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{ApiClient, RecordSource};
use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::pagination::{collect_records, StopReason};
use crate::segment::SegmentWriter;
use crate::tags::load_dictionary;
use crate::transform::{transform_records, DocumentBuilder};

// @module: Application controller for the scrape pipeline

/// What one pipeline run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Records collected before the stop condition
    pub records: usize,
    /// Page requests made
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
    /// Segment files written, in order
    pub files: Vec<PathBuf>,
    pub avg_ent_chars: f64,
    pub avg_ent_words: f64,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records collected: {}", self.records)?;
        match self.stop_reason {
            StopReason::StopIdFound { page } => writeln!(f, "Stopped at the stop id on page {}", page)?,
            StopReason::EmptyPage { page } => writeln!(f, "Stopped at empty page {}", page)?,
        }
        writeln!(f, "Pages fetched: {}", self.pages_fetched)?;
        writeln!(f, "Segment files written: {}", self.files.len())?;
        for file in &self.files {
            writeln!(f, "  {}", file.display())?;
        }
        writeln!(f, "Average entity length: {:.1} chars", self.avg_ent_chars)?;
        write!(f, "Completed in {:.1}s", self.elapsed.as_secs_f64())
    }
}

/// Main application controller for the scrape-transform-segment pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Run the pipeline against the configured HTTP API
    pub async fn run(&self, stop_id: u64) -> Result<RunSummary> {
        let client = ApiClient::new(&self.config.api, self.config.retry.policy()?)?;
        self.run_with_source(&client, stop_id).await
    }

    /// Run the pipeline against any record source
    ///
    /// Nothing is written until every record has been transformed, so a
    /// fetch or transform failure leaves the output directory untouched.
    pub async fn run_with_source<S: RecordSource + ?Sized>(&self, source: &S, stop_id: u64) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        let dictionary = load_dictionary(source)
            .await
            .context("Failed to load the tag dictionary")?;
        if dictionary.is_empty() {
            warn!("The tag dictionary is empty, any tagged record will fail");
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] Fetching {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));

        let harvest = collect_records(source, stop_id, self.config.api.page_size, &spinner).await;
        spinner.finish_and_clear();
        let harvest = harvest.context("Failed to fetch records")?;
        info!("Collected {} records from {} pages", harvest.records.len(), harvest.pages_fetched);

        let builder = DocumentBuilder::new(&dictionary, self.config.output.file_prefix.as_str(), &self.config.openie);
        let set = transform_records(&builder, &harvest.records).context("Failed to transform records")?;
        info!("Generated {} OpenIE documents", set.documents.len());

        let writer = SegmentWriter::new(
            &self.config.output.output_dir,
            self.config.output.file_prefix.as_str(),
            self.config.output.segment_size,
            self.config.openie.avg_ent_words,
        );
        FileManager::ensure_dir(writer.output_dir())?;

        let bar = ProgressBar::new(set.documents.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} documents written")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        let files = writer.write_all(&set.documents, &set.stats, &bar);
        bar.finish_and_clear();
        let files = files.context("Failed to write segment files")?;

        if files.is_empty() {
            warn!("No records were collected, no segment file was written");
        }

        Ok(RunSummary {
            records: harvest.records.len(),
            pages_fetched: harvest.pages_fetched,
            stop_reason: harvest.stop_reason,
            files,
            avg_ent_chars: set.stats.avg_ent_chars(),
            avg_ent_words: self.config.openie.avg_ent_words,
            elapsed: start_time.elapsed(),
        })
    }
}
