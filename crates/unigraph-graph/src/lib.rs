//! # unigraph graph
//!
//! Neo4j backend for unigraph: connection handling, the [`Neo4jStore`]
//! implementation of `unigraph_core::GraphStore`, and graph-wide
//! maintenance (counts, clearing).

pub mod client;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphCounts};
pub use store::Neo4jStore;
