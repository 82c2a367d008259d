//! Contact storage layer.
//! - One async storage contract (`storage::ContactStorage`) with memory, JSON file
//!   and Elasticsearch backends behind it.
//! - `serializer::SerializedStorage` is the single lock every caller goes through.
//! - Name enrichment used before a contact is inserted.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod serializer;
pub mod backend;
pub mod enrich;
