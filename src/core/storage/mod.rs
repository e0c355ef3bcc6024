//! Storage layer: a persistent tantivy index over article records.
//!
//! # Architecture
//!
//! - **schema**: fixed field layout and field kinds
//! - **analyzer**: abstract-field text analysis
//! - **descriptor**: `descriptor.json` with schema, analyzer and counters
//! - **store**: `IndexStore` lifecycle and `IndexHandle` sessions
//!
//! # Index Structure
//!
//! ```text
//! {index_path}/
//! ├── descriptor.json     # Field kinds, analyzer, counters
//! └── tantivy/            # Tantivy index
//!     ├── .managed.json
//!     ├── meta.json
//!     └── [segment files]
//! ```

pub mod analyzer;
pub mod descriptor;
pub mod schema;
mod store;

pub use descriptor::IndexDescriptor;
pub use schema::FieldKind;
pub use store::{IndexHandle, IndexState, IndexStore, StoreConfig, StoreStats};
