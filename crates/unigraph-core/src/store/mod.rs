//! Graph store interface.
//!
//! The mapper only ever creates nodes and relationships; everything it
//! needs from a backend is the [`GraphStore`] trait below.

pub mod memory;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::IngestResult;

pub use memory::MemoryStore;

/// Node labels written by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Protein,
    FullName,
    Feature,
    Gene,
    Organism,
    Lineage,
    Reference,
    Citation,
    Author,
    DbReference,
}

impl Label {
    pub const ALL: [Label; 10] = [
        Label::Protein,
        Label::FullName,
        Label::Feature,
        Label::Gene,
        Label::Organism,
        Label::Lineage,
        Label::Reference,
        Label::Citation,
        Label::Author,
        Label::DbReference,
    ];

    /// The graph label for this node type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Protein => "Protein",
            Label::FullName => "FullName",
            Label::Feature => "Feature",
            Label::Gene => "Gene",
            Label::Organism => "Organism",
            Label::Lineage => "Lineage",
            Label::Reference => "Reference",
            Label::Citation => "Citation",
            Label::Author => "Author",
            Label::DbReference => "DBReference",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship types written by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelType {
    HasFullName,
    HasFeature,
    Encodes,
    InOrganism,
    HasLineage,
    HasReference,
    HasCitation,
    HasAuthor,
    HasDbReference,
}

impl RelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelType::HasFullName => "HAS_FULLNAME",
            RelType::HasFeature => "HAS_FEATURE",
            RelType::Encodes => "ENCODES",
            RelType::InOrganism => "IN_ORGANISM",
            RelType::HasLineage => "HAS_LINEAGE",
            RelType::HasReference => "HAS_REFERENCE",
            RelType::HasCitation => "HAS_CITATION",
            RelType::HasAuthor => "HAS_AUTHOR",
            RelType::HasDbReference => "HAS_DB_REFERENCE",
        }
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned node identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node to be created: a label plus string properties.
///
/// Properties that are not set are absent on the stored node, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub label: Label,
    pub properties: BTreeMap<&'static str, String>,
}

impl NewNode {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.properties.insert(key, value.into());
        self
    }

    pub fn with_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }
}

/// Create-only graph backend.
///
/// Each call is an individually committed write; there is no transaction
/// spanning several calls.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create a node and return its identity.
    async fn create_node(&self, node: &NewNode) -> IngestResult<NodeId>;

    /// Create a directed relationship `from -[rel]-> to`.
    async fn create_relationship(&self, from: &NodeId, rel: RelType, to: &NodeId) -> IngestResult<()>;

    /// Delete every node and relationship.
    async fn clear(&self) -> IngestResult<()>;
}
