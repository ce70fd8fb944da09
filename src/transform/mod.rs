/*!
 * Record transformation into OpenIE documents.
 *
 * - `text`: passage normalization and XML-illegal character escaping
 * - `document`: document model, builder and entity statistics
 */

pub mod document;
pub mod text;

pub use document::{transform_records, DocumentBuilder, EntityStats, OpenIeDocument, TransformedSet, Triple};
pub use text::{escape_xml_illegal, is_xml_legal, normalize_passage};
