use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::OutputError;

// @module: File and directory utilities

/// Indentation used when pretty-printing JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonIndent {
    /// Two spaces
    Two,
    /// Four spaces
    Four,
}

impl JsonIndent {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            JsonIndent::Two => b"  ",
            JsonIndent::Four => b"    ",
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with a specific extension directly inside a directory, sorted by name
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read and parse a JSON file
    pub fn read_json<T, P>(path: P) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file: {:?}", path))
    }

    /// Pretty-print `value` to `path` through a temporary file in the same directory
    ///
    /// The target only appears once fully written, so an interrupted write never
    /// leaves a truncated file behind. Non-ASCII text is written as-is.
    pub fn write_json_atomic<T, P>(path: P, value: &T, indent: JsonIndent) -> Result<(), OutputError>
    where
        T: Serialize + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| OutputError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(io_error)?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            value.serialize(&mut serializer).map_err(|e| OutputError::Json {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            writer.flush().map_err(io_error)?;
        }

        temp.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}
