//! In-process graph store.
//!
//! Records every write in creation order. Backs `ingest --dry-run` and the
//! mapper tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{IngestError, IngestResult};
use super::{GraphStore, Label, NewNode, NodeId, RelType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNode {
    pub id: NodeId,
    pub label: Label,
    pub properties: BTreeMap<&'static str, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRelationship {
    pub from: NodeId,
    pub rel: RelType,
    pub to: NodeId,
}

#[derive(Default)]
struct Inner {
    nodes: Vec<StoredNode>,
    relationships: Vec<StoredRelationship>,
    next_id: u64,
    writes: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that accepts `writes` node/relationship writes and then
    /// reports itself unavailable.
    pub fn failing_after(writes: usize) -> Self {
        Self {
            inner: Mutex::default(),
            fail_after: Some(writes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_write(&self, inner: &mut Inner) -> IngestResult<()> {
        if let Some(limit) = self.fail_after {
            if inner.writes >= limit {
                return Err(IngestError::store(format!(
                    "memory store refused write #{}",
                    inner.writes + 1
                )));
            }
        }
        inner.writes += 1;
        Ok(())
    }

    pub fn nodes(&self) -> Vec<StoredNode> {
        self.lock().nodes.clone()
    }

    pub fn relationships(&self) -> Vec<StoredRelationship> {
        self.lock().relationships.clone()
    }

    pub fn node(&self, id: &NodeId) -> Option<StoredNode> {
        self.lock().nodes.iter().find(|n| &n.id == id).cloned()
    }

    pub fn nodes_with_label(&self, label: Label) -> Vec<StoredNode> {
        self.lock()
            .nodes
            .iter()
            .filter(|n| n.label == label)
            .cloned()
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.lock().relationships.len()
    }

    pub fn count_label(&self, label: Label) -> usize {
        self.lock().nodes.iter().filter(|n| n.label == label).count()
    }

    pub fn count_rel(&self, rel: RelType) -> usize {
        self.lock()
            .relationships
            .iter()
            .filter(|r| r.rel == rel)
            .count()
    }

    /// Relationships ending at `id`.
    pub fn incoming(&self, id: &NodeId) -> Vec<StoredRelationship> {
        self.lock()
            .relationships
            .iter()
            .filter(|r| &r.to == id)
            .cloned()
            .collect()
    }

    /// Relationships starting at `id`.
    pub fn outgoing(&self, id: &NodeId) -> Vec<StoredRelationship> {
        self.lock()
            .relationships
            .iter()
            .filter(|r| &r.from == id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn create_node(&self, node: &NewNode) -> IngestResult<NodeId> {
        let mut inner = self.lock();
        self.begin_write(&mut inner)?;

        inner.next_id += 1;
        let id = NodeId::new(format!("mem:{}", inner.next_id));
        inner.nodes.push(StoredNode {
            id: id.clone(),
            label: node.label,
            properties: node.properties.clone(),
        });
        Ok(id)
    }

    async fn create_relationship(&self, from: &NodeId, rel: RelType, to: &NodeId) -> IngestResult<()> {
        let mut inner = self.lock();
        self.begin_write(&mut inner)?;

        for end in [from, to] {
            if !inner.nodes.iter().any(|n| &n.id == end) {
                return Err(IngestError::UnknownNode(end.to_string()));
            }
        }
        inner.relationships.push(StoredRelationship {
            from: from.clone(),
            rel,
            to: to.clone(),
        });
        Ok(())
    }

    async fn clear(&self) -> IngestResult<()> {
        let mut inner = self.lock();
        inner.nodes.clear();
        inner.relationships.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_link() {
        let store = MemoryStore::new();
        let protein = store
            .create_node(&NewNode::new(Label::Protein).with("accession", "P1"))
            .await
            .unwrap();
        let gene = store.create_node(&NewNode::new(Label::Gene)).await.unwrap();
        store
            .create_relationship(&protein, RelType::Encodes, &gene)
            .await
            .unwrap();

        assert_eq!(store.node_count(), 2);
        assert_eq!(store.count_rel(RelType::Encodes), 1);
        assert_eq!(store.incoming(&gene)[0].from, protein);
        assert_eq!(store.outgoing(&protein).len(), 1);
        assert_eq!(store.node(&protein).unwrap().properties["accession"], "P1");
    }

    #[tokio::test]
    async fn test_relationship_requires_nodes() {
        let store = MemoryStore::new();
        let a = store.create_node(&NewNode::new(Label::Author)).await.unwrap();
        let err = store
            .create_relationship(&a, RelType::HasAuthor, &NodeId::new("mem:99"))
            .await
            .unwrap_err();
        assert!(matches!(&err, IngestError::UnknownNode(id) if id == "mem:99"));
        assert!(!err.is_retryable());
        assert_eq!(store.relationship_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_after_keeps_earlier_writes() {
        let store = MemoryStore::failing_after(1);
        store.create_node(&NewNode::new(Label::Protein)).await.unwrap();
        let err = store.create_node(&NewNode::new(Label::Gene)).await.unwrap_err();
        assert!(matches!(err, IngestError::StoreUnavailable(_)));
        assert_eq!(store.node_count(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store.create_node(&NewNode::new(Label::Lineage)).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.relationship_count(), 0);
    }
}
