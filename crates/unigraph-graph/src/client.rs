//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
        }
    }
}

/// Client for Neo4j graph operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the connection pool; the `RETURN 1`
    /// ping forces a bolt handshake so an unreachable server fails here
    /// rather than on the first write.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(1)
            .fetch_size(20)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .with_context(|| format!("Neo4j at {} is not responding to queries", config.uri))?;

        info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<Row>> {
        let mut result = self.graph.execute(query).await
            .context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result row")? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> Result<Option<T>> {
        let rows = self.query(query).await?;
        if let Some(row) = rows.into_iter().next() {
            let val: T = row.get(field)
                .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", field, e))?;
            Ok(Some(val))
        } else {
            Ok(None)
        }
    }

    /// Get node and relationship counts for status display.
    pub async fn get_counts(&self) -> Result<GraphCounts> {
        let node_query = Query::new("MATCH (n) RETURN count(n) as count".to_string());
        let rel_query = Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string());

        let node_count: i64 = self.query_scalar(node_query, "count").await?
            .unwrap_or(0);
        let rel_count: i64 = self.query_scalar(rel_query, "count").await?
            .unwrap_or(0);

        Ok(GraphCounts {
            nodes: node_count as usize,
            relationships: rel_count as usize,
        })
    }

    /// Count nodes per label.
    pub async fn label_counts(&self) -> Result<Vec<(String, usize)>> {
        let query = Query::new(
            "MATCH (n) UNWIND labels(n) AS label
             RETURN label, count(*) AS count
             ORDER BY label"
                .to_string(),
        );

        let rows = self.query(query).await?;
        rows.iter().map(label_count).collect()
    }

    /// Delete every node and relationship in the database.
    pub async fn delete_all(&self) -> Result<()> {
        self.execute(Query::new("MATCH (n) DETACH DELETE n".to_string()))
            .await
            .context("Failed to clear the graph")
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

fn label_count(row: &Row) -> Result<(String, usize)> {
    let label: String = row
        .get("label")
        .map_err(|e| anyhow::anyhow!("Failed to get field 'label': {:?}", e))?;
    let count: i64 = row
        .get("count")
        .map_err(|e| anyhow::anyhow!("Failed to get field 'count': {:?}", e))?;
    Ok((label, count as usize))
}
