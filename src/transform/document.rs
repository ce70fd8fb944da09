use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::RawRecord;
use crate::app_config::OpenIeConfig;
use crate::errors::TransformError;
use crate::tags::TagDictionary;
use crate::transform::text::{escape_xml_illegal, normalize_passage};

/// Subject, predicate and object, serialized as a three-element array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple(pub String, pub String, pub String);

/// One normalized OpenIE document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenIeDocument {
    /// `<prefix>-<source id>`
    pub idx: String,
    /// Normalized, escaped passage text
    pub passage: String,
    /// Sentinel entity first, then the record's tag labels
    pub extracted_entities: Vec<String>,
    /// One triple per tag label
    pub extracted_triples: Vec<Triple>,
    /// Source record id, used for file naming only
    #[serde(skip)]
    pub source_id: u64,
}

/// Running entity totals over every transformed document
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntityStats {
    /// Sum of entity lengths in characters
    pub total_chars: usize,
    /// Number of entities seen
    pub entity_count: usize,
}

impl EntityStats {
    pub fn record(&mut self, entities: &[String]) {
        self.entity_count += entities.len();
        self.total_chars += entities.iter().map(|e| e.chars().count()).sum::<usize>();
    }

    /// Mean entity length in characters, rounded to one decimal, 0 without entities
    pub fn avg_ent_chars(&self) -> f64 {
        if self.entity_count == 0 {
            return 0.0;
        }
        let mean = self.total_chars as f64 / self.entity_count as f64;
        (mean * 10.0).round() / 10.0
    }
}

/// Builds documents with a fixed prefix, sentinel and predicate
#[derive(Debug, Clone)]
pub struct DocumentBuilder<'a> {
    dictionary: &'a TagDictionary,
    prefix: String,
    sentinel: String,
    predicate: String,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(dictionary: &'a TagDictionary, prefix: impl Into<String>, openie: &OpenIeConfig) -> Self {
        Self {
            dictionary,
            prefix: prefix.into(),
            sentinel: openie.sentinel_entity.clone(),
            predicate: openie.predicate.clone(),
        }
    }

    /// Transform one record; fails on the first tag that does not resolve to a label
    pub fn build(&self, record: &RawRecord) -> Result<OpenIeDocument, TransformError> {
        let labels = self.dictionary.resolve(&record.tags)?;
        let passage = escape_xml_illegal(&normalize_passage(&record.barrage));

        let extracted_triples = labels
            .iter()
            .map(|label| Triple(label.clone(), self.predicate.clone(), passage.clone()))
            .collect();

        let mut extracted_entities = Vec::with_capacity(labels.len() + 1);
        extracted_entities.push(self.sentinel.clone());
        extracted_entities.extend(labels);

        Ok(OpenIeDocument {
            idx: format!("{}-{}", self.prefix, record.id),
            passage,
            extracted_entities,
            extracted_triples,
            source_id: record.id,
        })
    }
}

/// Documents of a whole run plus their entity totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformedSet {
    pub documents: Vec<OpenIeDocument>,
    pub stats: EntityStats,
}

/// Transform every record in order; the first failure aborts the whole set
pub fn transform_records(builder: &DocumentBuilder<'_>, records: &[RawRecord]) -> Result<TransformedSet, TransformError> {
    let mut set = TransformedSet {
        documents: Vec::with_capacity(records.len()),
        stats: EntityStats::default(),
    };

    for record in records {
        let document = builder.build(record).inspect_err(|e| {
            debug!("Record {} failed to transform: {}", record.id, e);
        })?;
        set.stats.record(&document.extracted_entities);
        set.documents.push(document);
    }

    Ok(set)
}
