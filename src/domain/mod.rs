//! Domain model of the client registry: entities, value objects, the
//! identifier validator and formatter, the field registry and the list query
//! descriptor.

pub mod client;
pub mod document;
pub mod fields;
pub mod format;
pub mod query;
pub mod types;
