//! # unigraph core
//!
//! Parses a UniProt entry and maps it onto graph nodes and relationships.
//!
//! The pipeline is linear: [`record::load_entry`] turns the XML document
//! into a nested [`record::Value`], [`record::Entry::from_value`] checks the
//! required fields, and [`mapper::map_entry`] issues the writes against any
//! [`store::GraphStore`].

pub mod error;
pub mod mapper;
pub mod record;
pub mod store;

pub use error::{IngestError, IngestResult, MappingError};
pub use mapper::{ingest_file, map_entry, AnchorPolicy, IngestReport, MappingOptions};
pub use record::Entry;
pub use store::{GraphStore, Label, MemoryStore, NewNode, NodeId, RelType};
