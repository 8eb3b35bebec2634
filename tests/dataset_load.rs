//! End-to-end tests for dataset assembly.
//!
//! Each test feeds a fake [`GraphSource`] through `load_dataset` /
//! `load_and_publish` and checks the buffers the viewer would render.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use pretty_assertions::assert_eq;

use concept_graph::api::{Concept, ConceptId, Embedding, GraphSource, Relationship, parse_envelope};
use concept_graph::dataset::{
    Appearance, DataReady, GraphDataset, LabelFormat, LoadOptions, NotableSelection, Subscription,
    load_and_publish, load_dataset,
};

// ============================================================================
// Helpers
// ============================================================================

struct FakeSource {
    concepts: Result<Vec<Concept>, String>,
    relationships: Result<Vec<Relationship>, String>,
}

impl FakeSource {
    fn new(concepts: Vec<Concept>, relationships: Vec<Relationship>) -> Self {
        Self {
            concepts: Ok(concepts),
            relationships: Ok(relationships),
        }
    }
}

impl GraphSource for FakeSource {
    fn fetch_concepts(&self) -> Result<Vec<Concept>> {
        self.concepts.clone().map_err(|message| anyhow!(message))
    }

    fn fetch_relationships(&self) -> Result<Vec<Relationship>> {
        self.relationships.clone().map_err(|message| anyhow!(message))
    }
}

/// Replays raw response bodies through the envelope parser.
struct RawSource {
    concepts: &'static str,
    networks: &'static str,
}

impl GraphSource for RawSource {
    fn fetch_concepts(&self) -> Result<Vec<Concept>> {
        Ok(parse_envelope(self.concepts)?)
    }

    fn fetch_relationships(&self) -> Result<Vec<Relationship>> {
        Ok(parse_envelope(self.networks)?)
    }
}

fn concept(id: ConceptId, source_num: u32, target_num: u32) -> Concept {
    Concept {
        id,
        title: format!("concept {id}"),
        category: "physics".to_owned(),
        source_num,
        target_num,
        ..Concept::default()
    }
}

fn seeded() -> LoadOptions {
    LoadOptions {
        seed: Some(7),
        ..LoadOptions::default()
    }
}

fn assert_buffer_lengths(dataset: &GraphDataset, points: usize, links: usize) {
    assert_eq!(dataset.point_count(), points);
    assert_eq!(dataset.point_positions().len(), 2 * points);
    assert_eq!(dataset.point_colors().len(), 4 * points);
    assert_eq!(dataset.point_sizes().len(), points);
    assert_eq!(dataset.link_count(), links);
    assert_eq!(dataset.links().len(), 2 * links);
    assert_eq!(dataset.link_colors().len(), 4 * links);
    assert_eq!(dataset.link_widths().len(), links);
}

// ============================================================================
// Buffer assembly
// ============================================================================

#[test]
fn three_concepts_two_relationships() {
    let source = FakeSource::new(
        vec![concept(0, 1, 0), concept(1, 1, 1), concept(2, 0, 1)],
        vec![Relationship::new(0, 1), Relationship::new(1, 2)],
    );

    let dataset = load_dataset(&source, &seeded());

    assert_buffer_lengths(&dataset, 3, 2);
    assert_eq!(dataset.links(), &[0, 1, 1, 2]);
    let appearance = Appearance::default();
    assert_eq!(
        dataset.point_sizes(),
        &[appearance.point_size(1), appearance.point_size(2), appearance.point_size(1)]
    );
    assert!(dataset.link_widths().iter().all(|w| (0.1..=0.2).contains(w)));
    assert!(dataset.point_colors().chunks(4).all(|rgba| rgba[3] == 0.8));
    assert!(dataset.link_colors().chunks(4).all(|rgba| rgba[3] == 1.0));
}

#[test]
fn sizes_follow_concept_ids_not_response_order() {
    let source = FakeSource::new(vec![concept(2, 5, 5), concept(0, 0, 0), concept(1, 1, 0)], vec![]);

    let dataset = load_dataset(&source, &seeded());

    let appearance = Appearance::default();
    assert_eq!(
        dataset.point_sizes(),
        &[appearance.point_size(0), appearance.point_size(1), appearance.point_size(10)]
    );
    assert_eq!(dataset.point_sizes()[0], 2.0);
    assert_eq!(dataset.concept(2).map(|c| c.id), Some(2));
}

#[test]
fn sparse_ids_are_remapped_by_rank() {
    let source = FakeSource::new(
        vec![concept(10, 2, 0), concept(3, 0, 1), concept(7, 0, 1)],
        vec![Relationship::new(10, 3), Relationship::new(10, 7)],
    );

    let dataset = load_dataset(&source, &seeded());

    assert!(!dataset.ids().is_dense());
    assert_eq!(dataset.ids().index_of(3), Some(0));
    assert_eq!(dataset.ids().index_of(7), Some(1));
    assert_eq!(dataset.ids().index_of(10), Some(2));
    assert_eq!(dataset.links(), &[2, 0, 2, 1]);
    assert_eq!(dataset.labels().index_of("10"), Some(2));
    assert_eq!(dataset.concept_by_id(7).map(|c| c.id), Some(7));
}

#[test]
fn relationships_to_unknown_concepts_are_left_out() {
    let source = FakeSource::new(
        vec![concept(0, 1, 0), concept(1, 0, 1)],
        vec![Relationship::new(0, 1), Relationship::new(1, 99)],
    );

    let dataset = load_dataset(&source, &seeded());

    assert_buffer_lengths(&dataset, 2, 1);
    // The adjacency keeps every relationship it was given.
    assert_eq!(dataset.network().neighbors(99), &[1]);
}

#[test]
fn duplicate_concepts_keep_the_first_record() {
    let mut second = concept(0, 9, 9);
    second.title = "duplicate".to_owned();
    let source = FakeSource::new(vec![concept(0, 0, 0), second, concept(1, 0, 0)], vec![]);

    let dataset = load_dataset(&source, &seeded());

    assert_eq!(dataset.point_count(), 2);
    assert_eq!(dataset.concept(0).map(|c| c.title.as_str()), Some("concept 0"));
}

#[test]
fn empty_relationships_give_empty_link_buffers() {
    let source = FakeSource::new(vec![concept(0, 0, 0), concept(1, 0, 0)], vec![]);

    let dataset = load_dataset(&source, &seeded());

    assert_buffer_lengths(&dataset, 2, 0);
    assert!(dataset.network().is_empty());
}

#[test]
fn seeded_loads_are_reproducible() {
    let source = FakeSource::new(
        vec![concept(0, 1, 0), concept(1, 0, 1)],
        vec![Relationship::new(0, 1)],
    );

    let first = load_dataset(&source, &seeded());
    let second = load_dataset(&source, &seeded());

    assert_eq!(first.point_positions(), second.point_positions());
    assert_eq!(first.point_colors(), second.point_colors());
    assert_eq!(first.link_widths(), second.link_widths());
}

#[test]
fn embeddings_drive_positions() {
    let mut with_embedding = concept(0, 0, 0);
    with_embedding.embedding = Some(Embedding::Text("[0,0,0,0]".to_owned()));
    let source = FakeSource::new(vec![with_embedding], vec![]);

    let dataset = load_dataset(&source, &seeded());

    assert_eq!(dataset.point_positions(), &[200.0, 200.0]);
}

// ============================================================================
// Labels and notable selection
// ============================================================================

#[test]
fn labels_round_trip_for_every_point() {
    let concepts = (0..20).map(|id| concept(id, id as u32, 0)).collect::<Vec<_>>();
    let options = LoadOptions {
        label_format: LabelFormat::IdCategory,
        ..seeded()
    };

    let dataset = GraphDataset::build(concepts, &[], &options);

    assert_eq!(dataset.labels().len(), 20);
    for index in 0..dataset.point_count() {
        let label = dataset.labels().label_of(index).unwrap();
        assert_eq!(dataset.labels().index_of(label), Some(index));
    }
    assert_eq!(dataset.labels().label_of(4), Some("4: physics"));
}

#[test]
fn most_connected_concept_is_notable() {
    let source = FakeSource::new(
        vec![concept(0, 0, 0), concept(1, 5, 0), concept(2, 3, 0), concept(3, 4, 4)],
        vec![],
    );

    let dataset = load_dataset(&source, &seeded());

    assert_eq!(dataset.notable(), &["3".to_owned()]);
    assert_eq!(dataset.most_linked(), Some(3));
}

#[test]
fn notable_group_scales_with_fraction() {
    let concepts = (0..1000).map(|id| concept(id, id as u32, 0)).collect::<Vec<_>>();
    let options = LoadOptions {
        notable: NotableSelection {
            high_fraction: 0.01,
            low_fraction: 0.0,
        },
        ..seeded()
    };

    let dataset = GraphDataset::build(concepts, &[], &options);

    assert_eq!(dataset.notable().len(), 10);
    assert_eq!(dataset.notable()[0], "999");
    assert!(dataset.notable().iter().all(|label| dataset.labels().index_of(label).is_some()));
}

#[test]
fn default_fraction_is_exact_for_large_graphs() {
    let concepts = (0..100_000).map(|id| concept(id, (id % 1000) as u32, 0)).collect::<Vec<_>>();

    let dataset = GraphDataset::build(concepts, &[], &seeded());

    assert_eq!(dataset.notable().len(), 10_000);
}

#[test]
fn low_fraction_adds_the_least_connected() {
    let concepts = (0..10).map(|id| concept(id, id as u32, 0)).collect::<Vec<_>>();
    let options = LoadOptions {
        notable: NotableSelection {
            high_fraction: 0.1,
            low_fraction: 0.2,
        },
        ..seeded()
    };

    let dataset = GraphDataset::build(concepts, &[], &options);

    assert_eq!(dataset.notable(), &["9".to_owned(), "1".to_owned(), "0".to_owned()]);
}

// ============================================================================
// Network lookups
// ============================================================================

#[test]
fn adjacency_is_symmetric_and_neighborhood_resolves_indices() {
    let source = FakeSource::new(
        vec![concept(0, 2, 0), concept(1, 0, 1), concept(2, 0, 1)],
        vec![Relationship::new(0, 1), Relationship::new(0, 2)],
    );

    let dataset = load_dataset(&source, &seeded());

    assert_eq!(dataset.network().neighbors(0), &[1, 2]);
    assert_eq!(dataset.network().neighbors(1), &[0]);
    assert_eq!(dataset.network().neighbors(2), &[0]);
    assert_eq!(dataset.neighborhood(0), vec![1, 2]);
    assert!(dataset.network().neighbors(42).is_empty());
}

// ============================================================================
// Failure handling and ready signal
// ============================================================================

#[test]
fn failed_concept_fetch_still_publishes_an_empty_dataset() {
    let source = FakeSource {
        concepts: Err("connection refused".to_owned()),
        relationships: Ok(vec![Relationship::new(0, 1)]),
    };
    let received = Arc::new(Mutex::new(None));
    let mut ready = DataReady::new();
    let slot = Arc::clone(&received);
    assert_eq!(
        ready.subscribe(move |dataset: &Arc<GraphDataset>| {
            *slot.lock().unwrap() = Some(dataset.point_count());
        }),
        Subscription::Registered
    );

    let notified = load_and_publish(&source, &seeded(), &mut ready).unwrap();

    assert_eq!(notified, 1);
    assert_eq!(*received.lock().unwrap(), Some(0));
    let dataset = ready.get().unwrap();
    assert_buffer_lengths(dataset, 0, 0);
}

#[test]
fn error_envelope_is_treated_as_no_data() {
    let source = RawSource {
        concepts: r#"{"status":"error","message":"database offline"}"#,
        networks: r#"{"status":"success","data":[{"source_concept_id":0,"target_concept_id":1}]}"#,
    };

    let dataset = load_dataset(&source, &seeded());

    assert!(dataset.is_empty());
    assert_eq!(dataset.link_count(), 0);
}

#[test]
fn success_envelopes_load_end_to_end() {
    let source = RawSource {
        concepts: r#"{"status":"success","data":[
            {"id":0,"title":"Entropy","source_num":1,"target_num":0,"embedding":"[0.5,0.5]"},
            {"id":1,"title":"Heat","source_num":0,"target_num":1}
        ]}"#,
        networks: r#"{"status":"success","data":[{"source_concept_id":0,"target_concept_id":1}]}"#,
    };

    let dataset = load_dataset(&source, &seeded());

    assert_buffer_lengths(&dataset, 2, 1);
    assert_eq!(dataset.concept(0).map(|c| c.title.as_str()), Some("Entropy"));
}

#[test]
fn late_subscribers_are_not_replayed() {
    let source = FakeSource::new(vec![concept(0, 0, 0)], vec![]);
    let mut ready = DataReady::new();
    load_and_publish(&source, &seeded(), &mut ready).unwrap();

    let seen = Arc::new(Mutex::new(0usize));
    let slot = Arc::clone(&seen);
    let subscription = ready.subscribe(move |dataset: &Arc<GraphDataset>| {
        *slot.lock().unwrap() = dataset.point_count();
    });

    assert_eq!(subscription, Subscription::AlreadyFired);
    assert_eq!(*seen.lock().unwrap(), 0);
    assert_eq!(ready.get().map(|dataset| dataset.point_count()), Some(1));
    assert!(load_and_publish(&source, &seeded(), &mut ready).is_err());
}
