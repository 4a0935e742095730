//! Record-to-graph mapping.
//!
//! Turns one [`Entry`] into create-node / create-relationship calls against
//! a [`GraphStore`], in a fixed order:
//!
//! 1. a Protein per accession, each with its FullName nodes
//! 2. Feature nodes
//! 3. Gene nodes
//! 4. Organism nodes, each with its Lineage chain
//! 5. Reference nodes with Citation, Author and DBReference chains
//!
//! Steps 2-5 hang off the anchor Protein(s) chosen by [`AnchorPolicy`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::IngestResult;
use crate::record::{load_entry, Citation, Entry, Reference};
use crate::store::{GraphStore, Label, NewNode, NodeId, RelType};

/// Which Protein nodes the entry-level edges (features, genes, organisms,
/// references) start from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Only the Protein of the first (primary) accession.
    #[default]
    Primary,
    /// Every accession's Protein. Entry-level nodes are still created once.
    EveryAccession,
}

#[derive(Debug, Clone, Default)]
pub struct MappingOptions {
    pub anchor: AnchorPolicy,
}

/// Result of mapping one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub nodes: BTreeMap<Label, usize>,
    pub relationships: BTreeMap<RelType, usize>,
}

impl IngestReport {
    pub fn nodes_created(&self) -> usize {
        self.nodes.values().sum()
    }

    pub fn relationships_created(&self) -> usize {
        self.relationships.values().sum()
    }

    pub fn count(&self, label: Label) -> usize {
        self.nodes.get(&label).copied().unwrap_or(0)
    }

    pub fn count_rel(&self, rel: RelType) -> usize {
        self.relationships.get(&rel).copied().unwrap_or(0)
    }
}

/// Counts every write it forwards to the store.
struct Writer<'a, S: GraphStore + ?Sized> {
    store: &'a S,
    report: IngestReport,
}

impl<'a, S: GraphStore + ?Sized> Writer<'a, S> {
    async fn node(&mut self, node: NewNode) -> IngestResult<NodeId> {
        let id = self.store.create_node(&node).await?;
        debug!(label = %node.label, id = %id, "Created node");
        *self.report.nodes.entry(node.label).or_default() += 1;
        Ok(id)
    }

    async fn link(&mut self, from: &NodeId, rel: RelType, to: &NodeId) -> IngestResult<()> {
        self.store.create_relationship(from, rel, to).await?;
        *self.report.relationships.entry(rel).or_default() += 1;
        Ok(())
    }

    /// Create `node` and link it from every anchor.
    async fn child(&mut self, anchors: &[NodeId], rel: RelType, node: NewNode) -> IngestResult<NodeId> {
        let id = self.node(node).await?;
        for anchor in anchors {
            self.link(anchor, rel, &id).await?;
        }
        Ok(id)
    }
}

/// Map a parsed entry into the graph store.
pub async fn map_entry<S: GraphStore + ?Sized>(
    store: &S,
    entry: &Entry,
    options: &MappingOptions,
) -> IngestResult<IngestReport> {
    let mut writer = Writer {
        store,
        report: IngestReport::default(),
    };

    let proteins = map_proteins(&mut writer, entry).await?;
    let anchors = match options.anchor {
        AnchorPolicy::Primary => &proteins[..proteins.len().min(1)],
        AnchorPolicy::EveryAccession => &proteins[..],
    };

    for feature in &entry.features {
        writer
            .child(anchors, RelType::HasFeature, NewNode::new(Label::Feature).with("type", feature))
            .await?;
    }

    for gene in &entry.genes {
        let node = NewNode::new(Label::Gene)
            .with("name", &gene.name)
            .with("type", &gene.kind);
        writer.child(anchors, RelType::Encodes, node).await?;
    }

    for organism in &entry.organisms {
        let organism_id = writer
            .child(anchors, RelType::InOrganism, NewNode::new(Label::Organism).with("name", organism))
            .await?;
        for taxon in &entry.lineage {
            let lineage = NewNode::new(Label::Lineage).with("name", taxon);
            writer
                .child(std::slice::from_ref(&organism_id), RelType::HasLineage, lineage)
                .await?;
        }
    }

    for reference in &entry.references {
        map_reference(&mut writer, anchors, reference).await?;
    }

    info!(
        entry = %entry.name,
        nodes = writer.report.nodes_created(),
        rels = writer.report.relationships_created(),
        "Entry mapped"
    );
    Ok(writer.report)
}

/// Create one Protein per accession with its names; returns the Protein
/// ids in accession order.
async fn map_proteins<S: GraphStore + ?Sized>(
    writer: &mut Writer<'_, S>,
    entry: &Entry,
) -> IngestResult<Vec<NodeId>> {
    let mut proteins = Vec::with_capacity(entry.accessions.len());

    for accession in &entry.accessions {
        let protein = writer
            .node(
                NewNode::new(Label::Protein)
                    .with("accession", accession)
                    .with("name", &entry.name),
            )
            .await?;

        let names = entry
            .short_names
            .iter()
            .chain(std::iter::once(&entry.full_name))
            .chain(&entry.alternative_full_names);
        for name in names {
            writer
                .child(
                    std::slice::from_ref(&protein),
                    RelType::HasFullName,
                    NewNode::new(Label::FullName).with("name", name),
                )
                .await?;
        }

        proteins.push(protein);
    }

    Ok(proteins)
}

async fn map_reference<S: GraphStore + ?Sized>(
    writer: &mut Writer<'_, S>,
    anchors: &[NodeId],
    reference: &Reference,
) -> IngestResult<()> {
    let reference_id = writer
        .child(
            anchors,
            RelType::HasReference,
            NewNode::new(Label::Reference).with("key", &reference.key),
        )
        .await?;

    let citation_id = writer
        .child(
            std::slice::from_ref(&reference_id),
            RelType::HasCitation,
            citation_node(&reference.citation),
        )
        .await?;
    let citation_anchor = std::slice::from_ref(&citation_id);

    for author in &reference.citation.authors {
        writer
            .child(citation_anchor, RelType::HasAuthor, NewNode::new(Label::Author).with("name", author))
            .await?;
    }

    for db_ref in &reference.citation.db_references {
        let node = NewNode::new(Label::DbReference)
            .with("type", &db_ref.kind)
            .with("id", &db_ref.id);
        writer.child(citation_anchor, RelType::HasDbReference, node).await?;
    }

    Ok(())
}

fn citation_node(citation: &Citation) -> NewNode {
    NewNode::new(Label::Citation)
        .with("type", &citation.kind)
        .with_opt("volume", citation.volume.as_deref())
        .with_opt("date", citation.date.as_deref())
        .with_opt("first", citation.first.as_deref())
        .with_opt("last", citation.last.as_deref())
        .with("title", &citation.title)
}

/// Read, parse and map the entry stored in a UniProt XML file.
pub async fn ingest_file<S: GraphStore + ?Sized>(
    store: &S,
    path: &Path,
    options: &MappingOptions,
) -> IngestResult<IngestReport> {
    info!(path = %path.display(), "Loading entry");
    let value = load_entry(path)?;
    let entry = Entry::from_value(&value)?;
    info!(
        entry = %entry.name,
        accessions = entry.accessions.len(),
        references = entry.references.len(),
        "Entry parsed"
    );
    map_entry(store, &entry, options).await
}
