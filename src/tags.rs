use log::{debug, info};
use std::collections::HashMap;

use crate::api::{DictEntry, RecordSource};
use crate::errors::{FetchError, TransformError};

// @module: Tag code to label mapping

/// Read-only mapping from tag code to human-readable label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDictionary {
    labels: HashMap<String, String>,
}

impl TagDictionary {
    /// Build the dictionary; entries with an empty code are skipped, later duplicates win
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = DictEntry>,
    {
        let labels = entries
            .into_iter()
            .filter(|entry| !entry.dict_value.is_empty())
            .map(|entry| (entry.dict_value, entry.dict_label))
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of a single code
    pub fn label(&self, code: &str) -> Result<&str, TransformError> {
        match self.labels.get(code) {
            None => Err(TransformError::UnknownTag(code.to_string())),
            Some(label) if label.is_empty() => Err(TransformError::EmptyLabel(code.to_string())),
            Some(label) => Ok(label.as_str()),
        }
    }

    /// Labels of a comma-separated code list, in list order
    ///
    /// A blank list resolves to no labels. Every fragment of a non-blank list
    /// is trimmed and must resolve, so `"1,,2"` fails on the empty code.
    pub fn resolve(&self, tags: &str) -> Result<Vec<String>, TransformError> {
        if tags.trim().is_empty() {
            return Ok(Vec::new());
        }

        tags.split(',')
            .map(|code| self.label(code.trim()).map(str::to_string))
            .collect()
    }
}

/// Fetch the dictionary from `source` and build a [`TagDictionary`]
pub async fn load_dictionary<S: RecordSource + ?Sized>(source: &S) -> Result<TagDictionary, FetchError> {
    info!("Fetching tag dictionary...");
    let entries = source.fetch_dictionary().await?;
    debug!("Dictionary endpoint returned {} entries", entries.len());

    let dictionary = TagDictionary::from_entries(entries);
    info!("Loaded {} tag mappings", dictionary.len());
    Ok(dictionary)
}
