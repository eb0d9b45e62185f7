//! Relation records consumed by the analysis core.
//!
//! A relation is an ordered pair "actor relates to entity" (a follower
//! following a marker). Loading, cleaning and filtering happen upstream; this
//! module only holds the records and reads them from delimited text with
//! named columns.

use crate::error::{FollownetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// One input row: an actor, an entity, and an optional entity label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationRecord {
    /// Actor identifier (the follower)
    pub actor: String,
    /// Entity identifier (the followed marker)
    pub entity: String,
    /// Categorical entity label, used only for reporting
    pub label: Option<String>,
}

impl RelationRecord {
    /// Record without an entity label.
    pub fn new(actor: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            entity: entity.into(),
            label: None,
        }
    }

    /// Attaches an entity label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Immutable input of one analysis run.
///
/// Holds relation rows in input order (duplicates preserved) plus a catalog
/// of entities that must exist even without relations.
///
/// # Examples
///
/// ```
/// use follownet::relation::RelationSet;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E1")]);
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.distinct_pairs(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationSet {
    records: Vec<RelationRecord>,
    catalog: Vec<(String, Option<String>)>,
}

impl RelationSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from unlabeled (actor, entity) pairs.
    #[must_use]
    pub fn from_pairs<A: AsRef<str>, E: AsRef<str>>(pairs: &[(A, E)]) -> Self {
        Self {
            records: pairs
                .iter()
                .map(|(a, e)| RelationRecord::new(a.as_ref(), e.as_ref()))
                .collect(),
            catalog: Vec::new(),
        }
    }

    /// Builds a set from full records.
    #[must_use]
    pub fn from_records(records: Vec<RelationRecord>) -> Self {
        Self {
            records,
            catalog: Vec::new(),
        }
    }

    /// Appends a relation row.
    pub fn push(&mut self, record: RelationRecord) {
        self.records.push(record);
    }

    /// Registers an entity that must appear in the analysis even if no
    /// actor relates to it.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>, label: Option<String>) -> Self {
        self.catalog.push((entity.into(), label));
        self
    }

    /// Relation rows in input order.
    #[must_use]
    pub fn records(&self) -> &[RelationRecord] {
        &self.records
    }

    /// Catalog entities registered with [`RelationSet::with_entity`].
    #[must_use]
    pub fn catalog(&self) -> &[(String, Option<String>)] {
        &self.catalog
    }

    /// Number of relation rows, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no relation rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct (actor, entity) pairs.
    #[must_use]
    pub fn distinct_pairs(&self) -> usize {
        self.records
            .iter()
            .map(|r| (r.actor.as_str(), r.entity.as_str()))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Entity → label, first non-empty label wins. Catalog entries count.
    #[must_use]
    pub fn entity_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        let rows = self
            .records
            .iter()
            .map(|r| (&r.entity, r.label.as_ref()))
            .chain(self.catalog.iter().map(|(e, l)| (e, l.as_ref())));
        for (entity, label) in rows {
            if let Some(label) = label {
                labels
                    .entry(entity.clone())
                    .or_insert_with(|| label.clone());
            }
        }
        labels
    }
}

impl FromIterator<RelationRecord> for RelationSet {
    fn from_iter<I: IntoIterator<Item = RelationRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

/// Reads relation rows from delimited text with a header line.
///
/// # Examples
///
/// ```
/// use follownet::relation::RelationReader;
///
/// let data = "follower_id,twitter_name,type2\n1,brand_a,consumption\n2,brand_a,consumption\n";
/// let set = RelationReader::new()
///     .read(data.as_bytes())
///     .expect("columns present");
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.entity_labels()["brand_a"], "consumption");
/// ```
#[derive(Debug, Clone)]
pub struct RelationReader {
    actor_column: String,
    entity_column: String,
    label_column: Option<String>,
    delimiter: u8,
}

impl Default for RelationReader {
    fn default() -> Self {
        Self {
            actor_column: "follower_id".to_string(),
            entity_column: "twitter_name".to_string(),
            label_column: Some("type2".to_string()),
            delimiter: b',',
        }
    }
}

impl RelationReader {
    /// Reader with the default column names
    /// (`follower_id`, `twitter_name`, optional `type2`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the actor column name.
    #[must_use]
    pub fn actor_column(mut self, name: impl Into<String>) -> Self {
        self.actor_column = name.into();
        self
    }

    /// Sets the entity column name.
    #[must_use]
    pub fn entity_column(mut self, name: impl Into<String>) -> Self {
        self.entity_column = name.into();
        self
    }

    /// Sets the optional label column. A label column absent from the
    /// header is tolerated; labels are then `None`.
    #[must_use]
    pub fn label_column(mut self, name: Option<String>) -> Self {
        self.label_column = name;
        self
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads from a file path.
    ///
    /// # Errors
    ///
    /// I/O and parse failures, or [`FollownetError::Validation`] when a
    /// required column is missing.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<RelationSet> {
        let file = std::fs::File::open(path.as_ref())?;
        self.read(file)
    }

    /// Reads from any byte source.
    ///
    /// # Errors
    ///
    /// Parse failures, or [`FollownetError::Validation`] when a required
    /// column is missing or a required cell is empty.
    pub fn read<R: Read>(&self, source: R) -> Result<RelationSet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = [self.actor_column.as_str(), self.entity_column.as_str()]
            .into_iter()
            .filter(|c| position(c).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(FollownetError::validation(format!(
                "input must contain columns {missing:?}; found {:?}",
                headers.iter().collect::<Vec<_>>()
            )));
        }
        let actor_idx = position(&self.actor_column).unwrap_or_default();
        let entity_idx = position(&self.entity_column).unwrap_or_default();
        let label_idx = self.label_column.as_deref().and_then(position);

        let mut set = RelationSet::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let field = |idx: usize| row.get(idx).unwrap_or("");
            let actor = field(actor_idx);
            let entity = field(entity_idx);
            if actor.is_empty() || entity.is_empty() {
                return Err(FollownetError::validation(format!(
                    "row {} has an empty {} or {} value",
                    line + 2,
                    self.actor_column,
                    self.entity_column
                )));
            }
            let label = label_idx
                .map(field)
                .filter(|l| !l.is_empty())
                .map(str::to_string);
            set.push(RelationRecord {
                actor: actor.to_string(),
                entity: entity.to_string(),
                label,
            });
        }

        tracing::debug!(rows = set.len(), "relations loaded");
        Ok(set)
    }
}

#[cfg(test)]
mod tests;
