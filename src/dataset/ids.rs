use crate::api::ConceptId;

/// Maps concept ids to point indices.
///
/// The point index of a concept is the rank of its id among all loaded ids in
/// ascending order. A dense id space `0..n` therefore maps every id onto
/// itself and buffers are addressed by id directly; sparse id spaces are
/// compacted so every buffer stays exactly `n` points long.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdIndex {
    ids: Vec<ConceptId>,
    dense: bool,
}

impl IdIndex {
    /// `ids` must be sorted ascending without duplicates.
    pub(crate) fn from_sorted(ids: Vec<ConceptId>) -> Self {
        debug_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        let dense = ids
            .last()
            .is_none_or(|&last| last.checked_add(1) == Some(ids.len() as u64));
        Self { ids, dense }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when every id equals its point index.
    pub fn is_dense(&self) -> bool {
        self.dense
    }

    pub fn index_of(&self, id: ConceptId) -> Option<usize> {
        if self.dense {
            let index = usize::try_from(id).ok()?;
            (index < self.ids.len()).then_some(index)
        } else {
            self.ids.binary_search(&id).ok()
        }
    }

    pub fn id_at(&self, index: usize) -> Option<ConceptId> {
        self.ids.get(index).copied()
    }

    pub fn ids(&self) -> &[ConceptId] {
        &self.ids
    }
}
