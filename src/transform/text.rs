
// @module: Passage text normalization and escaping

/// Replace line breaks with spaces and trim surrounding whitespace
pub fn normalize_passage(text: &str) -> String {
    text.replace(['\n', '\r'], " ").trim().to_string()
}

/// Whether `c` is allowed in XML 1.0 character data
pub fn is_xml_legal(c: char) -> bool {
    matches!(
        c as u32,
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Replace every character XML cannot carry with `&#xHHHH;`
///
/// Legal characters pass through untouched, so the output of legal input is
/// the input itself.
pub fn escape_xml_illegal(text: &str) -> String {
    if text.chars().all(is_xml_legal) {
        return text.to_string();
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_xml_legal(c) {
            escaped.push(c);
        } else {
            escaped.push_str(&format!("&#x{:X};", c as u32));
        }
    }
    escaped
}
