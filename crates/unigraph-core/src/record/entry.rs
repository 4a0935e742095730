//! Typed view of a parsed UniProt entry.
//!
//! Extraction walks the nested mapping once and fails on the first missing
//! required field, so a malformed entry is rejected before anything is
//! written to the graph.

use crate::error::MappingError;
use super::Value;

/// One UniProt protein record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub accessions: Vec<String>,
    pub name: String,
    pub short_names: Vec<String>,
    pub full_name: String,
    /// Full names of alternative names; alternatives without one are dropped.
    pub alternative_full_names: Vec<String>,
    /// Feature `type` attributes, in document order.
    pub features: Vec<String>,
    pub genes: Vec<GeneName>,
    pub organisms: Vec<String>,
    /// Taxa of the organism lineage, shared by every organism name.
    pub lineage: Vec<String>,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneName {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub key: String,
    pub citation: Citation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub kind: String,
    pub volume: Option<String>,
    pub date: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    pub db_references: Vec<DbReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbReference {
    pub kind: String,
    pub id: String,
}

/// A value together with the dotted path it was reached by, for errors.
#[derive(Clone)]
struct Cursor<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Cursor<'a> {
    fn field(&self, key: &str) -> Result<Cursor<'a>, MappingError> {
        self.opt_field(key)
            .ok_or_else(|| MappingError::missing(format!("{}.{}", self.path, key)))
    }

    fn opt_field(&self, key: &str) -> Option<Cursor<'a>> {
        self.value.get(key).map(|value| Cursor {
            value,
            path: format!("{}.{}", self.path, key),
        })
    }

    fn seq(&self) -> Vec<Cursor<'a>> {
        match self.value {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, value)| Cursor {
                    value,
                    path: format!("{}[{}]", self.path, i),
                })
                .collect(),
            _ => vec![self.clone()],
        }
    }

    fn text(&self) -> Result<String, MappingError> {
        self.value
            .text()
            .map(str::to_string)
            .ok_or_else(|| MappingError::expected_text(self.path.clone()))
    }

    fn text_at(&self, key: &str) -> Result<String, MappingError> {
        self.field(key)?.text()
    }

    fn opt_text_at(&self, key: &str) -> Result<Option<String>, MappingError> {
        self.opt_field(key).map(|c| c.text()).transpose()
    }

    fn texts(&self) -> Result<Vec<String>, MappingError> {
        self.seq().iter().map(Cursor::text).collect()
    }
}

impl Entry {
    /// Extract a typed entry from the parsed `entry` mapping.
    pub fn from_value(value: &Value) -> Result<Self, MappingError> {
        let entry = Cursor {
            value,
            path: "entry".to_string(),
        };

        let accessions = entry.field("accession")?.texts()?;
        let name = entry.text_at("name")?;

        let protein = entry.field("protein")?;
        let recommended = protein.field("recommendedName")?;
        let short_names = recommended.field("shortName")?.texts()?;
        let full_name = recommended.text_at("fullName")?;

        let mut alternative_full_names = Vec::new();
        for alternative in protein.field("alternativeName")?.seq() {
            if let Some(full) = alternative.opt_field("fullName") {
                alternative_full_names.push(full.text()?);
            }
        }

        let features = entry
            .field("feature")?
            .seq()
            .iter()
            .map(|f| f.text_at("@type"))
            .collect::<Result<Vec<_>, _>>()?;

        let genes = entry
            .field("gene")?
            .field("name")?
            .seq()
            .iter()
            .map(|g| {
                Ok(GeneName {
                    name: g.text()?,
                    kind: g.text_at("@type")?,
                })
            })
            .collect::<Result<Vec<_>, MappingError>>()?;

        let organism = entry.field("organism")?;
        let organisms = organism.field("name")?.texts()?;
        let lineage = organism.field("lineage")?.field("taxon")?.texts()?;

        let references = entry
            .field("reference")?
            .seq()
            .iter()
            .map(parse_reference)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            accessions,
            name,
            short_names,
            full_name,
            alternative_full_names,
            features,
            genes,
            organisms,
            lineage,
            references,
        })
    }
}

fn parse_reference(reference: &Cursor<'_>) -> Result<Reference, MappingError> {
    let key = reference.text_at("@key")?;
    let citation = reference.field("citation")?;

    let mut authors = Vec::new();
    if let Some(person) = citation.opt_field("authorList").and_then(|a| a.opt_field("person")) {
        for p in person.seq() {
            authors.push(p.text_at("@name")?);
        }
    }

    let mut db_references = Vec::new();
    if let Some(db_refs) = citation.opt_field("dbReference") {
        for db_ref in db_refs.seq() {
            db_references.push(DbReference {
                kind: db_ref.text_at("@type")?,
                id: db_ref.text_at("@id")?,
            });
        }
    }

    Ok(Reference {
        key,
        citation: Citation {
            kind: citation.text_at("@type")?,
            volume: citation.opt_text_at("@volume")?,
            date: citation.opt_text_at("@date")?,
            first: citation.opt_text_at("@first")?,
            last: citation.opt_text_at("@last")?,
            title: citation.text_at("title")?,
            authors,
            db_references,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::xml::{parse_document, select_entry};

    fn entry_from(xml: &str) -> Result<Entry, MappingError> {
        let value = select_entry(parse_document(xml).unwrap()).unwrap();
        Entry::from_value(&value)
    }

    const MINIMAL: &str = include_str!("../../testdata/minimal_entry.xml");
    const FULL: &str = include_str!("../../testdata/full_entry.xml");

    #[test]
    fn test_minimal_entry() {
        let entry = entry_from(MINIMAL).unwrap();
        assert_eq!(entry.accessions, vec!["Q9Y261"]);
        assert_eq!(entry.name, "FOXA2_HUMAN");
        assert_eq!(entry.short_names, vec!["HNF-3-beta", "HNF-3B"]);
        assert_eq!(entry.full_name, "Hepatocyte nuclear factor 3-beta");
        assert!(entry.alternative_full_names.is_empty());
        assert_eq!(entry.features, vec!["chain"]);
        assert_eq!(
            entry.genes,
            vec![GeneName { name: "FOXA2".into(), kind: "primary".into() }]
        );
        assert_eq!(entry.organisms, vec!["Homo sapiens"]);
        assert_eq!(entry.lineage, vec!["Eukaryota", "Metazoa"]);
        assert_eq!(entry.references.len(), 1);

        let citation = &entry.references[0].citation;
        assert_eq!(citation.kind, "submission");
        assert_eq!(citation.date.as_deref(), Some("1998-11"));
        assert_eq!(citation.volume, None);
        assert_eq!(citation.first, None);
        assert_eq!(citation.last, None);
        assert!(citation.authors.is_empty());
        assert!(citation.db_references.is_empty());
    }

    #[test]
    fn test_full_entry() {
        let entry = entry_from(FULL).unwrap();
        assert_eq!(entry.accessions, vec!["Q9Y261", "Q8WUW4", "Q9Y4X8"]);
        assert_eq!(entry.alternative_full_names, vec!["Forkhead box protein A2"]);
        assert_eq!(entry.features.len(), 3);
        assert_eq!(entry.genes.len(), 2);
        assert_eq!(entry.genes[1].kind, "synonym");
        assert_eq!(entry.organisms, vec!["Homo sapiens", "Human"]);
        assert_eq!(entry.references.len(), 2);

        let journal = &entry.references[0].citation;
        assert_eq!(journal.kind, "journal article");
        assert_eq!(journal.volume.as_deref(), Some("12"));
        assert_eq!(journal.first.as_deref(), Some("3110"));
        assert_eq!(journal.last.as_deref(), Some("3120"));
        assert_eq!(journal.authors, vec!["Pani L.", "Overdier D.G.", "Porcella A."]);
        assert_eq!(
            journal.db_references,
            vec![
                DbReference { kind: "PubMed".into(), id: "1370305".into() },
                DbReference { kind: "DOI".into(), id: "10.1128/mcb.12.7.3110".into() },
            ]
        );
    }

    #[test]
    fn test_evidence_tagged_text() {
        let entry = entry_from(FULL).unwrap();
        // <fullName evidence="..">..</fullName> parses to a mapping with #text
        assert_eq!(entry.full_name, "Hepatocyte nuclear factor 3-beta");
    }

    #[test]
    fn test_missing_required_field_names_path() {
        let xml = MINIMAL.replace("<title>", "<subject>").replace("</title>", "</subject>");
        let err = entry_from(&xml).unwrap_err();
        assert_eq!(err.path, "entry.reference.citation.title");
    }

    #[test]
    fn test_missing_path_indexes_lists() {
        let err = entry_from(
            r#"<uniprot><entry>
                <accession>P1</accession><name>X</name>
                <protein>
                    <recommendedName><fullName>F</fullName><shortName>S</shortName></recommendedName>
                    <alternativeName><shortName>A</shortName></alternativeName>
                </protein>
                <gene><name type="primary">G</name></gene>
                <organism><name type="scientific">O</name><lineage><taxon>T</taxon></lineage></organism>
                <reference key="1"><citation type="book"><title>B</title></citation></reference>
                <feature type="chain"/>
                <feature description="no type"/>
            </entry></uniprot>"#,
        )
        .unwrap_err();
        assert_eq!(err.path, "entry.feature[1].@type");
    }

    #[test]
    fn test_gene_name_requires_type() {
        let xml = MINIMAL.replace(r#"<name type="primary">FOXA2</name>"#, "<name>FOXA2</name>");
        let err = entry_from(&xml).unwrap_err();
        assert_eq!(err, MappingError::missing("entry.gene.name.@type"));
    }
}
