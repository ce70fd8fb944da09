/*!
 * Tests for passage escaping, tag mapping and document building
 */

use openie_harvest::api::{DictEntry, RawRecord};
use openie_harvest::app_config::OpenIeConfig;
use openie_harvest::errors::TransformError;
use openie_harvest::tags::TagDictionary;
use openie_harvest::transform::{escape_xml_illegal, is_xml_legal, transform_records, DocumentBuilder};
use crate::common;

/// Parse `&#xHHHH;` references back into characters, leaving other text as is
fn unescape_references(text: &str) -> Vec<u32> {
    let mut code_points = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("&#x") {
        code_points.extend(rest[..start].chars().map(|c| c as u32));
        let after = &rest[start + 3..];
        let end = after.find(';').expect("reference is terminated");
        let hex = &after[..end];
        assert!(!hex.is_empty());
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)), "uppercase hex: {}", hex);
        assert!(hex == "0" || !hex.starts_with('0'), "no leading zeros: {}", hex);
        code_points.push(u32::from_str_radix(hex, 16).unwrap());
        rest = &after[end + 1..];
    }
    code_points.extend(rest.chars().map(|c| c as u32));
    code_points
}

#[test]
fn test_escapeXmlIllegal_everyControlChar_shouldBecomeWellFormedReference() {
    let input: String = (0u32..0x20)
        .chain([0x7F, 0xFFFE, 0xFFFF])
        .filter_map(char::from_u32)
        .collect();

    let escaped = escape_xml_illegal(&input);

    assert!(escaped.chars().all(is_xml_legal));
    let original: Vec<u32> = input.chars().map(|c| c as u32).collect();
    assert_eq!(unescape_references(&escaped), original);
}

#[test]
fn test_escapeXmlIllegal_mixedText_shouldOnlyTouchIllegalChars() {
    let escaped = escape_xml_illegal("ok\u{1}中\u{FFFF}😀");
    assert_eq!(escaped, "ok&#x1;中&#xFFFF;😀");
}

#[test]
fn test_escapeXmlIllegal_withLegalTextSample_shouldBeIdentity() {
    let sample = "Tab\there, CR\rLF\n 中文 \u{D7FF}\u{E000}\u{FFFD}\u{10000}\u{10FFFF} &amp; <tag>";
    assert_eq!(escape_xml_illegal(sample), sample);
}

#[test]
fn test_transformRecords_shouldPreserveOrderAndIds() {
    let dictionary = TagDictionary::from_entries(common::sample_dictionary());
    let builder = DocumentBuilder::new(&dictionary, "sb6657", &OpenIeConfig::default());

    let set = transform_records(&builder, &common::sample_records(30)).unwrap();

    let idx: Vec<String> = set.documents.iter().map(|d| d.idx.clone()).collect();
    let expected: Vec<String> = (1..=30).map(|id| format!("sb6657-{}", id)).collect();
    assert_eq!(idx, expected);
    for doc in &set.documents {
        assert_eq!(doc.extracted_entities[0], "烂梗");
        assert_eq!(doc.extracted_triples.len(), doc.extracted_entities.len() - 1);
        assert!(doc.extracted_entities.iter().all(|e| !e.is_empty()));
        assert!(doc.extracted_triples.iter().all(|t| t.0 != "烂梗"));
    }
}

#[test]
fn test_transformRecords_withUnknownTagLate_shouldReturnNoDocuments() {
    let dictionary = TagDictionary::from_entries(vec![DictEntry::new("1", "A")]);
    let builder = DocumentBuilder::new(&dictionary, "p", &OpenIeConfig::default());
    let records = vec![
        RawRecord::new(1, "a", "1"),
        RawRecord::new(2, "b", "1"),
        RawRecord::new(3, "c", " 1 , x "),
    ];

    let result = transform_records(&builder, &records);

    assert_eq!(result, Err(TransformError::UnknownTag("x".to_string())));
}
