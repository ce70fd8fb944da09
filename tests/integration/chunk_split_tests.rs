/*!
 * Integration tests for splitting collection files into chunk files
 */

use anyhow::Result;
use indicatif::ProgressBar;
use serde_json::{json, Value};
use std::fs;
use std::sync::atomic::AtomicBool;

use openie_harvest::chunker::{split_file, split_file_until};
use openie_harvest::errors::AppError;
use crate::common;

fn collection(count: usize) -> Value {
    let docs: Vec<Value> = (1..=count)
        .map(|i| json!({"idx": format!("sb6657-{}", i), "passage": format!("p{}", i)}))
        .collect();
    json!({"docs": docs, "avg_ent_chars": 2.5, "avg_ent_words": 1.0})
}

#[test]
fn test_splitFile_withRemainder_shouldWriteOrderedBalancedChunks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "sb6657-1.json", &collection(11).to_string())?;

    let report = split_file(&source, 3, &ProgressBar::hidden())?;

    let counts: Vec<usize> = report.files.iter().map(|(_, n)| *n).collect();
    assert_eq!(counts, vec![4, 4, 3]);

    let mut rejoined = Vec::new();
    for index in 1..=3 {
        let path = temp_dir.path().join(format!("sb6657-1-part{}.json", index));
        let chunk: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let object = chunk.as_object().expect("chunk is an object");
        assert_eq!(object.len(), 1, "chunk files only carry docs");
        rejoined.extend(chunk["docs"].as_array().expect("docs").iter().cloned());
    }
    assert_eq!(Value::Array(rejoined), collection(11)["docs"]);
    Ok(())
}

#[test]
fn test_splitFile_withTooManyChunks_shouldClampToDocumentCount() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "small.json", &collection(2).to_string())?;

    let report = split_file(&source, 5, &ProgressBar::hidden())?;

    assert_eq!(report.plan.count, 2);
    assert!(temp_dir.path().join("small-part2.json").exists());
    assert!(!temp_dir.path().join("small-part3.json").exists());
    Ok(())
}

#[test]
fn test_splitFile_withNoDocuments_shouldReturnInputErrorAndWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "empty.json", r#"{"docs": []}"#)?;

    let result = split_file(&source, 2, &ProgressBar::hidden());

    assert!(matches!(result, Err(AppError::Input(_))));
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_splitFile_shouldUseFourSpaceIndent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "c.json", &collection(1).to_string())?;

    split_file(&source, 1, &ProgressBar::hidden())?;

    let content = fs::read_to_string(temp_dir.path().join("c-part1.json"))?;
    assert!(content.starts_with("{\n    \"docs\": [\n        {"));
    Ok(())
}

#[test]
fn test_splitFileUntil_whenInterrupted_shouldLeaveOnlyTheSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "big.json", &collection(6).to_string())?;

    let result = split_file_until(&source, 3, &ProgressBar::hidden(), &AtomicBool::new(true));

    assert!(matches!(result, Err(AppError::Interrupted)));
    let names: Vec<String> = fs::read_dir(temp_dir.path())?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(names, vec!["big.json".to_string()]);
    Ok(())
}
