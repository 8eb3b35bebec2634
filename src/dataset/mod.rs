//! Turns backend records into the buffers the graph view renders.
//!
//! Everything here is rebuilt from scratch on every load; a [`GraphDataset`]
//! is never patched in place.

mod appearance;
mod ids;
mod labels;
mod network;
mod projection;
mod ready;

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::api::{Concept, ConceptId, GraphSource, Relationship};

pub use appearance::{Appearance, PALETTE, link_colors, link_widths, point_colors, point_sizes};
pub use ids::IdIndex;
pub use labels::{LabelFormat, LabelRegistry, NotableSelection};
pub use network::NetworkIndex;
pub use projection::{EMBEDDING_DIMENSIONS, ProjectionOptions, project_embedding, seed_positions};
pub use ready::{AlreadyPublished, DataReady, ReadyCallback, Subscription};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadOptions {
    pub label_format: LabelFormat,
    pub notable: NotableSelection,
    pub projection: ProjectionOptions,
    pub appearance: Appearance,
    /// Fixes colors, widths and projections when set.
    pub seed: Option<u64>,
}

impl LoadOptions {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Everything derived from one load. Buffers are indexed by point index
/// (see [`IdIndex`]).
#[derive(Clone, Debug, Default)]
pub struct GraphDataset {
    concepts: Vec<Concept>,
    ids: IdIndex,
    point_positions: Vec<f32>,
    point_colors: Vec<f32>,
    point_sizes: Vec<f64>,
    links: Vec<usize>,
    link_colors: Vec<f32>,
    link_widths: Vec<f32>,
    labels: LabelRegistry,
    notable: Vec<String>,
    network: NetworkIndex,
}

/// Point-side half of a load; links are derived only once this is final.
struct PointStage {
    concepts: Vec<Concept>,
    ids: IdIndex,
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f64>,
    labels: LabelRegistry,
    notable: Vec<String>,
}

impl PointStage {
    fn build(mut concepts: Vec<Concept>, options: &LoadOptions, rng: &mut StdRng) -> Self {
        concepts.sort_by_key(|concept| concept.id);
        let before = concepts.len();
        concepts.dedup_by_key(|concept| concept.id);
        if concepts.len() != before {
            warn!(
                dropped = before - concepts.len(),
                "duplicate concept ids, keeping the first record of each"
            );
        }

        let ids = IdIndex::from_sorted(concepts.iter().map(|concept| concept.id).collect());
        if !ids.is_dense() {
            debug!(concepts = ids.len(), "sparse concept ids, remapping to point indices");
        }

        let positions = seed_positions(&concepts, &options.projection, rng);
        let colors = point_colors(concepts.len(), options.appearance.point_alpha, rng);
        let sizes = point_sizes(&concepts, &ids, &options.appearance);
        let labels = LabelRegistry::build(&concepts, &ids, options.label_format);
        let notable = options.notable.select(&concepts, &labels, &ids);

        Self {
            concepts,
            ids,
            positions,
            colors,
            sizes,
            labels,
            notable,
        }
    }
}

impl GraphDataset {
    /// Builds every buffer from already fetched records.
    pub fn build(
        concepts: Vec<Concept>,
        relationships: &[Relationship],
        options: &LoadOptions,
    ) -> Self {
        let mut rng = options.rng();
        let points = PointStage::build(concepts, options, &mut rng);
        Self::with_links(points, relationships, options, &mut rng)
    }

    fn with_links(
        points: PointStage,
        relationships: &[Relationship],
        options: &LoadOptions,
        rng: &mut StdRng,
    ) -> Self {
        let mut links = Vec::with_capacity(relationships.len() * 2);
        let mut unknown = HashSet::new();
        for relationship in relationships {
            match (
                points.ids.index_of(relationship.source),
                points.ids.index_of(relationship.target),
            ) {
                (Some(source), Some(target)) => {
                    links.push(source);
                    links.push(target);
                }
                (source, target) => {
                    if source.is_none() {
                        unknown.insert(relationship.source);
                    }
                    if target.is_none() {
                        unknown.insert(relationship.target);
                    }
                }
            }
        }
        if !unknown.is_empty() {
            warn!(
                unknown_ids = unknown.len(),
                "relationships reference concepts that were not loaded; left out of the link buffer"
            );
        }

        let link_count = links.len() / 2;
        let link_colors = link_colors(link_count, options.appearance.link_alpha, rng);
        let link_widths = link_widths(link_count, &options.appearance, rng);
        let network = NetworkIndex::build(relationships);

        Self {
            concepts: points.concepts,
            ids: points.ids,
            point_positions: points.positions,
            point_colors: points.colors,
            point_sizes: points.sizes,
            links,
            link_colors,
            link_widths,
            labels: points.labels,
            notable: points.notable,
            network,
        }
    }

    pub fn point_count(&self) -> usize {
        self.ids.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Concepts ordered by point index.
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn concept(&self, index: usize) -> Option<&Concept> {
        self.concepts.get(index)
    }

    pub fn concept_by_id(&self, id: ConceptId) -> Option<&Concept> {
        self.ids.index_of(id).and_then(|index| self.concepts.get(index))
    }

    pub fn ids(&self) -> &IdIndex {
        &self.ids
    }

    pub fn point_positions(&self) -> &[f32] {
        &self.point_positions
    }

    pub fn point_colors(&self) -> &[f32] {
        &self.point_colors
    }

    pub fn point_sizes(&self) -> &[f64] {
        &self.point_sizes
    }

    /// Flat `(source, target)` point-index pairs.
    pub fn links(&self) -> &[usize] {
        &self.links
    }

    pub fn link_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.links.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn link_colors(&self) -> &[f32] {
        &self.link_colors
    }

    pub fn link_widths(&self) -> &[f32] {
        &self.link_widths
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn notable(&self) -> &[String] {
        &self.notable
    }

    pub fn network(&self) -> &NetworkIndex {
        &self.network
    }

    /// Point index of the first notable label.
    pub fn most_linked(&self) -> Option<usize> {
        self.notable
            .first()
            .and_then(|label| self.labels.index_of(label))
    }

    /// Neighbor point indices of the concept at `index`.
    pub fn neighborhood(&self, index: usize) -> Vec<usize> {
        self.ids
            .id_at(index)
            .map(|id| self.network.neighbor_indices(id, &self.ids))
            .unwrap_or_default()
    }
}

/// Runs the full load: concepts first, then relationships.
///
/// Never fails. A fetch error is logged and that side of the graph is empty.
pub fn load_dataset<S: GraphSource + ?Sized>(source: &S, options: &LoadOptions) -> GraphDataset {
    let mut rng = options.rng();

    let concepts = source.fetch_concepts().unwrap_or_else(|err| {
        error!(error = %format!("{err:#}"), "failed to fetch concepts");
        Vec::new()
    });
    let points = PointStage::build(concepts, options, &mut rng);
    debug!(
        points = points.ids.len(),
        notable = points.notable.len(),
        "point buffers ready"
    );

    let relationships = source.fetch_relationships().unwrap_or_else(|err| {
        error!(error = %format!("{err:#}"), "failed to fetch relationships");
        Vec::new()
    });
    let dataset = GraphDataset::with_links(points, &relationships, options, &mut rng);

    info!(
        concepts = dataset.point_count(),
        links = dataset.link_count(),
        notable = dataset.notable().len(),
        "graph dataset loaded"
    );
    dataset
}

/// Loads and fires `ready` once every buffer is final.
pub fn load_and_publish<S: GraphSource + ?Sized>(
    source: &S,
    options: &LoadOptions,
    ready: &mut DataReady<GraphDataset>,
) -> Result<usize, AlreadyPublished> {
    ready.publish(load_dataset(source, options))
}
