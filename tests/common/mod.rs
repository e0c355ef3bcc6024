// Common test utilities and fixtures

pub mod fixtures;

// Re-export commonly used items
// Note: These may appear unused in some test binaries but are used in others
#[allow(unused_imports)]
pub use fixtures::{article, CorpusDir, TestArticle};
#[allow(unused_imports)]
pub use helpers::{build_index, create_test_services, ids, record, test_store_config};
