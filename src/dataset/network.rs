use std::collections::HashMap;

use crate::api::{ConceptId, Relationship};

use super::ids::IdIndex;

/// Undirected neighborhood lookup built from directed relationships.
///
/// Parallel relationships keep their duplicate entries, so a neighbor list's
/// length doubles as a rough local weight.
#[derive(Clone, Debug, Default)]
pub struct NetworkIndex {
    adjacency: HashMap<ConceptId, Vec<ConceptId>>,
}

impl NetworkIndex {
    pub fn build(relationships: &[Relationship]) -> Self {
        let mut adjacency: HashMap<ConceptId, Vec<ConceptId>> = HashMap::new();
        for relationship in relationships {
            adjacency
                .entry(relationship.source)
                .or_default()
                .push(relationship.target);
            adjacency
                .entry(relationship.target)
                .or_default()
                .push(relationship.source);
        }
        Self { adjacency }
    }

    pub fn neighbors(&self, id: ConceptId) -> &[ConceptId] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, id: ConceptId) -> usize {
        self.neighbors(id).len()
    }

    /// Neighbor point indices, skipping neighbors that are not loaded concepts.
    pub fn neighbor_indices(&self, id: ConceptId, ids: &IdIndex) -> Vec<usize> {
        self.neighbors(id)
            .iter()
            .filter_map(|&neighbor| ids.index_of(neighbor))
            .collect()
    }

    /// Number of concepts with at least one incident relationship.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
