/*!
 * Segment writer.
 *
 * Documents are written in consecutive segments of at most `segment_size`
 * documents, one JSON file per segment, named after the source id of the
 * segment's first document. Every file carries the same statistics, computed
 * over the whole document set.
 */

use indicatif::ProgressBar;
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::errors::OutputError;
use crate::file_utils::{FileManager, JsonIndent};
use crate::transform::{EntityStats, OpenIeDocument};

/// Content of one segment file
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentPayload<'a> {
    pub docs: &'a [OpenIeDocument],
    pub avg_ent_chars: f64,
    pub avg_ent_words: f64,
}

/// `<prefix>-<first id>.json`
pub fn segment_file_name(prefix: &str, first_id: u64) -> String {
    format!("{}-{}.json", prefix, first_id)
}

/// Writes document segments into a directory
#[derive(Debug, Clone)]
pub struct SegmentWriter {
    output_dir: PathBuf,
    prefix: String,
    segment_size: usize,
    avg_ent_words: f64,
}

impl SegmentWriter {
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>, segment_size: usize, avg_ent_words: f64) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
            segment_size: segment_size.max(1),
            avg_ent_words,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of files `document_count` documents produce
    pub fn segment_count(&self, document_count: usize) -> usize {
        document_count.div_ceil(self.segment_size)
    }

    /// Write every segment and return the written paths in order
    pub fn write_all(
        &self,
        documents: &[OpenIeDocument],
        stats: &EntityStats,
        progress: &ProgressBar,
    ) -> Result<Vec<PathBuf>, OutputError> {
        let avg_ent_chars = stats.avg_ent_chars();
        let mut written = Vec::with_capacity(self.segment_count(documents.len()));

        for segment in documents.chunks(self.segment_size) {
            // chunks() never yields an empty slice
            let first_id = segment[0].source_id;
            let path = self.output_dir.join(segment_file_name(&self.prefix, first_id));

            info!("Writing {} documents to {:?}", segment.len(), path);
            let payload = SegmentPayload {
                docs: segment,
                avg_ent_chars,
                avg_ent_words: self.avg_ent_words,
            };
            FileManager::write_json_atomic(&path, &payload, JsonIndent::Two)?;
            debug!("Wrote {:?}", path);

            progress.inc(segment.len() as u64);
            written.push(path);
        }

        Ok(written)
    }
}
