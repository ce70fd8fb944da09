/*!
 * Common test utilities for the openie-harvest test suite
 */

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use openie_harvest::api::{DictEntry, RawRecord};
use openie_harvest::app_config::Config;

// Local HTTP server for client tests
pub mod http_stub;

/// Route library logs to the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Dictionary with codes "1".."3"
pub fn sample_dictionary() -> Vec<DictEntry> {
    vec![
        DictEntry::new("1", "Gaming"),
        DictEntry::new("2", "Sports"),
        DictEntry::new("3", "Music"),
    ]
}

/// Records with ids `1..=count`, cycling through tag lists
pub fn sample_records(count: u64) -> Vec<RawRecord> {
    (1..=count)
        .map(|id| {
            let tags = match id % 3 {
                0 => "",
                1 => "1",
                _ => "2, 3",
            };
            RawRecord::new(id, format!("record {}\nsecond line", id), tags)
        })
        .collect()
}

/// Default configuration writing into `output_dir`
pub fn test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.output.output_dir = output_dir.to_string_lossy().into_owned();
    config
}

/// Parse every `.json` file in `dir`, sorted by file name
pub fn read_json_files(dir: &Path) -> Result<Vec<(String, Value)>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    entries
        .into_iter()
        .map(|path| -> Result<(String, Value)> {
            let name = path.file_name().unwrap_or_default().to_string_lossy().into_owned();
            let value: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
            Ok((name, value))
        })
        .collect()
}
