use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::api::Concept;

/// Native size of the backend's embedding model.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionOptions {
    pub max_dimensions: usize,
    pub scale: f32,
    pub offset: f32,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            max_dimensions: EMBEDDING_DIMENSIONS,
            scale: 100.0,
            offset: 200.0,
        }
    }
}

/// Random linear projection of one embedding onto the plane.
///
/// A fresh `d x 2` matrix with entries in `[-1, 1]` is drawn for every call.
/// NaN components propagate into the result.
pub fn project_embedding<R: Rng + ?Sized>(
    embedding: &[f32],
    options: &ProjectionOptions,
    rng: &mut R,
) -> Vec2 {
    let dimensions = embedding.len().min(options.max_dimensions);
    let mut x = 0.0_f32;
    let mut y = 0.0_f32;
    for &value in &embedding[..dimensions] {
        x += value * rng.random_range(-1.0_f32..=1.0);
        y += value * rng.random_range(-1.0_f32..=1.0);
    }

    vec2(
        x * options.scale + options.offset,
        y * options.scale + options.offset,
    )
}

/// Flat `(x, y)` seed buffer for concepts already ordered by point index.
///
/// Concepts without an embedding are scattered uniformly over `[1, n]`.
pub fn seed_positions<R: Rng + ?Sized>(
    concepts: &[Concept],
    options: &ProjectionOptions,
    rng: &mut R,
) -> Vec<f32> {
    let scatter_max = (concepts.len() as f32).max(1.0);
    let mut positions = Vec::with_capacity(concepts.len() * 2);

    for concept in concepts {
        let embedding = concept.embedding_values();
        let position = if embedding.is_empty() {
            vec2(
                rng.random_range(1.0..=scatter_max),
                rng.random_range(1.0..=scatter_max),
            )
        } else {
            project_embedding(&embedding, options, rng)
        };
        positions.push(position.x);
        positions.push(position.y);
    }

    positions
}
