/*!
 * Chunk splitter.
 *
 * Splits the `docs` array of a JSON collection into N contiguous, ordered
 * chunks whose sizes differ by at most one, larger chunks first. A request
 * for more chunks than documents is clamped to one document per chunk.
 * Every file is written atomically; an interrupt stops between files.
 */

use indicatif::ProgressBar;
use log::{info, warn};
use serde_json::{json, Value};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::AppError;
use crate::file_utils::{FileManager, JsonIndent};

/// How a collection is divided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Number of documents
    pub total: usize,
    /// Effective chunk count after clamping
    pub count: usize,
    /// Size of the smaller chunks
    pub base_size: usize,
    /// Number of chunks holding one extra document
    pub remainder: usize,
    /// Document range of each chunk, in order
    pub ranges: Vec<Range<usize>>,
}

impl ChunkPlan {
    /// Plan `requested` chunks over `total` documents
    pub fn new(total: usize, requested: usize) -> Self {
        let count = requested.min(total);
        if count == 0 {
            return Self {
                total,
                count: 0,
                base_size: 0,
                remainder: 0,
                ranges: Vec::new(),
            };
        }

        let base_size = total / count;
        let remainder = total % count;

        let mut ranges = Vec::with_capacity(count);
        let mut start = 0;
        for chunk in 0..count {
            let size = base_size + usize::from(chunk < remainder);
            ranges.push(start..start + size);
            start += size;
        }

        Self {
            total,
            count,
            base_size,
            remainder,
            ranges,
        }
    }

    pub fn was_clamped(&self, requested: usize) -> bool {
        requested > self.count
    }
}

/// `<stem>-part<index>.json`, index 1-based
pub fn chunk_file_name(source: &Path, index: usize) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chunk".to_string());
    format!("{}-part{}.json", stem, index)
}

/// Result of splitting one file
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkReport {
    pub plan: ChunkPlan,
    /// Written files with their document counts, in chunk order
    pub files: Vec<(PathBuf, usize)>,
}

/// The `docs` array of a collection; a missing key reads as empty
pub fn collection_docs(collection: Value) -> Result<Vec<Value>, AppError> {
    match collection {
        Value::Object(mut map) => match map.remove("docs") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(docs)) => Ok(docs),
            Some(_) => Err(AppError::Input("\"docs\" is not an array".to_string())),
        },
        _ => Err(AppError::Input("collection is not a JSON object".to_string())),
    }
}

/// Split `docs` into chunk files next to `source`
pub fn write_chunks(
    source: &Path,
    docs: &[Value],
    requested: usize,
    progress: &ProgressBar,
) -> Result<ChunkReport, AppError> {
    write_chunks_until(source, docs, requested, progress, &AtomicBool::new(false))
}

/// [`write_chunks`], checking `interrupted` before each file
///
/// Once the flag is set no further file is started and
/// [`AppError::Interrupted`] is returned; files already written are kept.
pub fn write_chunks_until(
    source: &Path,
    docs: &[Value],
    requested: usize,
    progress: &ProgressBar,
    interrupted: &AtomicBool,
) -> Result<ChunkReport, AppError> {
    if requested == 0 {
        return Err(AppError::Input("chunk count must be greater than 0".to_string()));
    }
    if docs.is_empty() {
        return Err(AppError::Input(format!("{} contains no documents", source.display())));
    }

    let plan = ChunkPlan::new(docs.len(), requested);
    if plan.was_clamped(requested) {
        warn!(
            "Chunk count ({}) exceeds document count ({}), using {}",
            requested, plan.total, plan.count
        );
    }

    info!("Total documents: {}", plan.total);
    info!("Chunk count: {}", plan.count);
    info!("Base chunk size: {}", plan.base_size);
    if plan.remainder > 0 {
        info!("The first {} chunks hold one extra document", plan.remainder);
    }

    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    progress.set_length(plan.count as u64);

    let mut files = Vec::with_capacity(plan.count);
    for (i, range) in plan.ranges.iter().enumerate() {
        if interrupted.load(Ordering::SeqCst) {
            warn!("Interrupted after {} of {} chunk files", files.len(), plan.count);
            return Err(AppError::Interrupted);
        }

        let path = dir.join(chunk_file_name(source, i + 1));
        let chunk = &docs[range.clone()];

        FileManager::write_json_atomic(&path, &json!({ "docs": chunk }), JsonIndent::Four)?;
        info!("Wrote {:?} ({} documents)", path, chunk.len());

        progress.inc(1);
        files.push((path, chunk.len()));
    }

    Ok(ChunkReport { plan, files })
}

/// Read `source` and split it into `requested` chunk files
pub fn split_file(source: &Path, requested: usize, progress: &ProgressBar) -> Result<ChunkReport, AppError> {
    split_file_until(source, requested, progress, &AtomicBool::new(false))
}

/// [`split_file`] that stops between files once `interrupted` is set
pub fn split_file_until(
    source: &Path,
    requested: usize,
    progress: &ProgressBar,
    interrupted: &AtomicBool,
) -> Result<ChunkReport, AppError> {
    info!("Reading {:?}", source);
    let collection: Value = FileManager::read_json(source)?;
    let docs = collection_docs(collection)?;
    write_chunks_until(source, &docs, requested, progress, interrupted)
}
