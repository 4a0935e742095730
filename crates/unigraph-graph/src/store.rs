//! [`GraphStore`] backed by Neo4j.
//!
//! Every call is its own auto-commit query; a failed run leaves whatever
//! was already written in place.

use std::collections::HashMap;

use async_trait::async_trait;
use neo4rs::Query;
use tracing::trace;

use unigraph_core::{GraphStore, IngestError, IngestResult, Label, NewNode, NodeId, RelType};

use crate::GraphClient;

/// Writes mapped entries into Neo4j through a [`GraphClient`].
#[derive(Clone)]
pub struct Neo4jStore {
    client: GraphClient,
}

impl Neo4jStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GraphClient {
        &self.client
    }
}

/// Cypher creating one node with the given label.
///
/// Labels cannot be query parameters, so they come from the closed
/// [`Label`] enum only.
pub fn create_node_cypher(label: Label) -> String {
    format!(
        "CREATE (n:{}) SET n = $props RETURN elementId(n) AS id",
        label.as_str()
    )
}

/// Cypher linking two existing nodes by element id.
pub fn create_relationship_cypher(rel: RelType) -> String {
    format!(
        "MATCH (a), (b) WHERE elementId(a) = $from AND elementId(b) = $to
         CREATE (a)-[r:{}]->(b)
         RETURN count(r) AS created",
        rel.as_str()
    )
}

fn unavailable(err: anyhow::Error) -> IngestError {
    IngestError::store(format!("{:#}", err))
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn create_node(&self, node: &NewNode) -> IngestResult<NodeId> {
        let props: HashMap<String, String> = node
            .properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        let query = Query::new(create_node_cypher(node.label)).param("props", props);

        let id: Option<String> = self
            .client
            .query_scalar(query, "id")
            .await
            .map_err(unavailable)?;
        let id = id.ok_or_else(|| {
            IngestError::store(format!("CREATE {} returned no element id", node.label))
        })?;

        trace!(label = %node.label, id = %id, "Node written");
        Ok(NodeId::new(id))
    }

    async fn create_relationship(&self, from: &NodeId, rel: RelType, to: &NodeId) -> IngestResult<()> {
        let query = Query::new(create_relationship_cypher(rel))
            .param("from", from.as_str())
            .param("to", to.as_str());

        let created: i64 = self
            .client
            .query_scalar(query, "created")
            .await
            .map_err(unavailable)?
            .unwrap_or(0);

        // MATCH found no pair: one of the nodes vanished since it was created
        if created == 0 {
            return Err(IngestError::UnknownNode(format!("{} or {} ({})", from, to, rel)));
        }
        Ok(())
    }

    async fn clear(&self) -> IngestResult<()> {
        self.client.delete_all().await.map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_cypher_uses_label() {
        assert_eq!(
            create_node_cypher(Label::DbReference),
            "CREATE (n:DBReference) SET n = $props RETURN elementId(n) AS id"
        );
    }

    #[test]
    fn test_relationship_cypher_uses_type() {
        let cypher = create_relationship_cypher(RelType::HasFullName);
        assert!(cypher.contains("CREATE (a)-[r:HAS_FULLNAME]->(b)"));
        assert!(cypher.contains("elementId(a) = $from"));
        assert!(cypher.contains("elementId(b) = $to"));
    }

    #[test]
    fn test_every_label_and_type_is_a_plain_identifier() {
        let plain = |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        for label in Label::ALL {
            assert!(plain(label.as_str()));
        }
        for rel in [
            RelType::HasFullName,
            RelType::HasFeature,
            RelType::Encodes,
            RelType::InOrganism,
            RelType::HasLineage,
            RelType::HasReference,
            RelType::HasCitation,
            RelType::HasAuthor,
            RelType::HasDbReference,
        ] {
            assert!(plain(rel.as_str()));
        }
    }
}
