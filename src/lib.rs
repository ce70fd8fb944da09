/*!
 * # openie-harvest
 *
 * A Rust library for turning a paginated record API into OpenIE documents.
 *
 * ## Features
 *
 * - Fetch a tag dictionary and page through a remote record list
 *   until a stop id or an empty page
 * - Retry every HTTP call with exponential backoff
 * - Map tag codes to labels and build passage, entities and triples
 * - Escape characters that are not legal in XML text
 * - Write size-bounded JSON segment files with entity statistics
 * - Split an existing JSON collection into balanced chunk files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `api`: Remote API access:
 *   - `api::client`: reqwest client with retry
 *   - `api::mock`: scripted source for tests
 *   - `api::models`: wire types
 * - `retry`: Retry policy and backoff loop
 * - `tags`: Tag dictionary
 * - `pagination`: Paginated fetch loop
 * - `transform`: Text normalization, escaping and document building
 * - `segment`: Segment file writer
 * - `chunker`: Collection chunk splitter
 * - `file_utils`: File system operations
 * - `prompt`: Interactive prompts
 * - `app_controller`: Main application controller
 * - `logging`: Terminal logger
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod api;
pub mod app_config;
pub mod app_controller;
pub mod chunker;
pub mod errors;
pub mod file_utils;
pub mod logging;
pub mod pagination;
pub mod prompt;
pub mod retry;
pub mod segment;
pub mod tags;
pub mod transform;

// Re-export main types for easier usage
pub use api::{ApiClient, MockSource, RawRecord, RecordSource};
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{AppError, FetchError, OutputError, TransformError};
pub use retry::RetryPolicy;
pub use tags::TagDictionary;
pub use transform::{OpenIeDocument, Triple};
