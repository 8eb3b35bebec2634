use rand::Rng;

use crate::api::Concept;

use super::ids::IdIndex;

/// Blue `#2748A4`, sky blue `#88C6FF`, pale pink `#FF99D2`.
pub const PALETTE: [[f32; 3]; 3] = [
    [0.152_941_18, 0.282_352_95, 0.643_137_3],
    [0.533_333_36, 0.776_470_6, 1.0],
    [1.0, 0.6, 0.823_529_4],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub point_alpha: f32,
    pub link_alpha: f32,
    pub size_scale: f64,
    pub size_offset: f64,
    pub link_width_min: f32,
    pub link_width_max: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            point_alpha: 0.8,
            link_alpha: 1.0,
            size_scale: 1.2,
            size_offset: 2.0,
            link_width_min: 0.1,
            link_width_max: 0.2,
        }
    }
}

impl Appearance {
    /// Kept in `f64` so every connectivity a concept can report still maps to a
    /// distinct size.
    pub fn point_size(&self, connectivity: u64) -> f64 {
        connectivity as f64 * self.size_scale + self.size_offset
    }
}

fn palette_rgba<R: Rng + ?Sized>(count: usize, alpha: f32, rng: &mut R) -> Vec<f32> {
    let mut colors = Vec::with_capacity(count * 4);
    for _ in 0..count {
        let [r, g, b] = PALETTE[rng.random_range(0..PALETTE.len())];
        colors.extend_from_slice(&[r, g, b, alpha]);
    }
    colors
}

pub fn point_colors<R: Rng + ?Sized>(count: usize, alpha: f32, rng: &mut R) -> Vec<f32> {
    palette_rgba(count, alpha, rng)
}

pub fn link_colors<R: Rng + ?Sized>(count: usize, alpha: f32, rng: &mut R) -> Vec<f32> {
    palette_rgba(count, alpha, rng)
}

/// Writes each concept's size at its point index, never at its position in
/// `concepts`.
pub fn point_sizes(concepts: &[Concept], ids: &IdIndex, appearance: &Appearance) -> Vec<f64> {
    let mut sizes = vec![appearance.size_offset; ids.len()];
    for concept in concepts {
        if let Some(index) = ids.index_of(concept.id) {
            sizes[index] = appearance.point_size(concept.connectivity());
        }
    }
    sizes
}

pub fn link_widths<R: Rng + ?Sized>(count: usize, appearance: &Appearance, rng: &mut R) -> Vec<f32> {
    let low = appearance.link_width_min.min(appearance.link_width_max);
    let high = appearance.link_width_min.max(appearance.link_width_max);
    (0..count).map(|_| rng.random_range(low..=high)).collect()
}
