use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::warn;

use crate::api::Concept;

use super::ids::IdIndex;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LabelFormat {
    /// `12`
    #[default]
    Id,
    /// `12: physics`
    IdCategory,
    /// `12: Entropy`
    IdTitle,
}

impl LabelFormat {
    pub fn format(self, concept: &Concept) -> String {
        match self {
            Self::Id => concept.id.to_string(),
            Self::IdCategory => format!("{}: {}", concept.id, concept.category),
            Self::IdTitle => format!("{}: {}", concept.id, concept.title),
        }
    }
}

/// Label <-> point index maps kept in lockstep.
#[derive(Clone, Debug, Default)]
pub struct LabelRegistry {
    label_to_index: HashMap<String, usize>,
    index_to_label: HashMap<usize, String>,
}

impl LabelRegistry {
    pub fn build(concepts: &[Concept], ids: &IdIndex, format: LabelFormat) -> Self {
        Self::build_with(concepts, ids, |concept| format.format(concept))
    }

    /// The first concept to claim a label keeps it.
    pub fn build_with<F>(concepts: &[Concept], ids: &IdIndex, mut label: F) -> Self
    where
        F: FnMut(&Concept) -> String,
    {
        let mut registry = Self {
            label_to_index: HashMap::with_capacity(concepts.len()),
            index_to_label: HashMap::with_capacity(concepts.len()),
        };

        for concept in concepts {
            let Some(index) = ids.index_of(concept.id) else {
                continue;
            };
            if registry.index_to_label.contains_key(&index) {
                continue;
            }

            let text = label(concept);
            match registry.label_to_index.entry(text) {
                Entry::Occupied(entry) => {
                    warn!(
                        label = entry.key().as_str(),
                        id = concept.id,
                        "label already taken, concept left unlabelled"
                    );
                }
                Entry::Vacant(entry) => {
                    registry.index_to_label.insert(index, entry.key().clone());
                    entry.insert(index);
                }
            }
        }

        registry
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }

    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.index_to_label.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index_to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_label.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.index_to_label
            .iter()
            .map(|(index, label)| (*index, label.as_str()))
    }
}

/// Fractions of the concept count picked for persistent labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotableSelection {
    pub high_fraction: f64,
    pub low_fraction: f64,
}

impl Default for NotableSelection {
    fn default() -> Self {
        Self {
            high_fraction: 0.1,
            low_fraction: 0.0,
        }
    }
}

impl NotableSelection {
    /// `ceil(total * fraction)`, at least one when `fraction > 0`.
    pub fn group_len(total: usize, fraction: f64) -> usize {
        if total == 0 || fraction.is_nan() || fraction <= 0.0 {
            return 0;
        }
        // Snap to 1e-6 so products such as 0.7 * 10 = 7.000000000000001 do not
        // round up to the next whole point.
        let exact = ((total as f64 * fraction) * 1e6).round() / 1e6;
        (exact.ceil().max(1.0) as usize).min(total)
    }

    /// Labels of the most connected concepts followed by the least connected
    /// ones, each group in descending connectivity order. Ties go to the lower
    /// id.
    pub fn select(&self, concepts: &[Concept], registry: &LabelRegistry, ids: &IdIndex) -> Vec<String> {
        let mut ranked = concepts
            .iter()
            .filter_map(|concept| {
                let index = ids.index_of(concept.id)?;
                let label = registry.label_of(index)?;
                Some((concept.connectivity(), concept.id, label))
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        let total = ranked.len();
        let high = Self::group_len(total, self.high_fraction);
        let low = Self::group_len(total, self.low_fraction);

        let mut notable = ranked[..high]
            .iter()
            .map(|(_, _, label)| (*label).to_owned())
            .collect::<Vec<_>>();
        let low_start = total - low;
        for (_, _, label) in &ranked[low_start.max(high)..] {
            notable.push((*label).to_owned());
        }

        notable
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn concept(id: u64, degree: u32) -> Concept {
        Concept {
            id,
            title: format!("t{id}"),
            category: "cat".to_owned(),
            source_num: degree,
            ..Concept::default()
        }
    }

    fn dense(concepts: &[Concept]) -> IdIndex {
        let mut ids = concepts.iter().map(|concept| concept.id).collect::<Vec<_>>();
        ids.sort_unstable();
        IdIndex::from_sorted(ids)
    }

    #[test]
    fn label_formats() {
        let concept = concept(12, 0);
        assert_eq!(LabelFormat::Id.format(&concept), "12");
        assert_eq!(LabelFormat::IdCategory.format(&concept), "12: cat");
        assert_eq!(LabelFormat::IdTitle.format(&concept), "12: t12");
    }

    #[test]
    fn registry_round_trips() {
        let concepts = vec![concept(2, 0), concept(0, 0), concept(1, 0)];
        let ids = dense(&concepts);
        let registry = LabelRegistry::build(&concepts, &ids, LabelFormat::Id);

        assert_eq!(registry.len(), 3);
        for (index, label) in registry.iter() {
            assert_eq!(registry.index_of(label), Some(index));
        }
        assert_eq!(registry.index_of("2"), Some(2));
        assert_eq!(registry.label_of(0), Some("0"));
        assert_eq!(registry.index_of("7"), None);
    }

    #[test]
    fn colliding_labels_keep_first_owner() {
        let concepts = vec![concept(0, 0), concept(1, 0)];
        let ids = dense(&concepts);
        let registry = LabelRegistry::build_with(&concepts, &ids, |_| "same".to_owned());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.index_of("same"), Some(0));
        assert_eq!(registry.label_of(1), None);
    }

    #[test]
    fn top_connected_point_is_notable() {
        let concepts = vec![concept(0, 0), concept(1, 5), concept(2, 3), concept(3, 8)];
        let ids = dense(&concepts);
        let registry = LabelRegistry::build(&concepts, &ids, LabelFormat::Id);
        let selection = NotableSelection {
            high_fraction: 0.01,
            low_fraction: 0.0,
        };

        assert_eq!(selection.select(&concepts, &registry, &ids), vec!["3"]);
    }

    #[test]
    fn low_group_follows_high_group() {
        let concepts = (0..10).map(|id| concept(id, id as u32)).collect::<Vec<_>>();
        let ids = dense(&concepts);
        let registry = LabelRegistry::build(&concepts, &ids, LabelFormat::Id);
        let selection = NotableSelection {
            high_fraction: 0.2,
            low_fraction: 0.2,
        };

        assert_eq!(
            selection.select(&concepts, &registry, &ids),
            vec!["9", "8", "1", "0"]
        );
    }

    #[test]
    fn ties_break_on_lower_id() {
        let concepts = vec![concept(5, 2), concept(1, 2), concept(3, 2)];
        let ids = dense(&concepts);
        let registry = LabelRegistry::build(&concepts, &ids, LabelFormat::Id);
        let selection = NotableSelection {
            high_fraction: 1.0,
            low_fraction: 0.0,
        };

        assert_eq!(selection.select(&concepts, &registry, &ids), vec!["1", "3", "5"]);
    }

    #[test]
    fn overlapping_groups_do_not_repeat() {
        let concepts = vec![concept(0, 1), concept(1, 2)];
        let ids = dense(&concepts);
        let registry = LabelRegistry::build(&concepts, &ids, LabelFormat::Id);
        let selection = NotableSelection {
            high_fraction: 1.0,
            low_fraction: 1.0,
        };

        assert_eq!(selection.select(&concepts, &registry, &ids), vec!["1", "0"]);
    }

    #[test]
    fn group_len_rounds_up() {
        assert_eq!(NotableSelection::group_len(1000, 0.01), 10);
        assert_eq!(NotableSelection::group_len(1000, 0.1), 100);
        assert_eq!(NotableSelection::group_len(4, 0.1), 1);
        assert_eq!(NotableSelection::group_len(0, 0.5), 0);
        assert_eq!(NotableSelection::group_len(10, 0.0), 0);
        assert_eq!(NotableSelection::group_len(3, 5.0), 3);
    }

    #[test]
    fn group_len_is_exact_for_large_totals() {
        assert_eq!(NotableSelection::group_len(100_000, 0.1), 10_000);
        assert_eq!(NotableSelection::group_len(1_000_000, 0.1), 100_000);
        assert_eq!(NotableSelection::group_len(1_000_000, 0.01), 10_000);
        assert_eq!(NotableSelection::group_len(10, 0.7), 7);
        assert_eq!(NotableSelection::group_len(100_001, 0.1), 10_001);
    }
}
