use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

const ALPHA_MIN: f32 = 0.001;

#[derive(Clone, Copy)]
pub(super) struct SimulationConfig {
    pub(super) link_distance: f32,
    pub(super) link_spring: f32,
    pub(super) repulsion: f32,
    pub(super) repulsion_radius: f32,
    pub(super) gravity: f32,
    pub(super) friction: f32,
    /// Ticks until the simulation cools down to rest.
    pub(super) decay_ticks: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            link_distance: 24.0,
            link_spring: 0.06,
            repulsion: 900.0,
            repulsion_radius: 140.0,
            gravity: 0.004,
            friction: 0.82,
            decay_ticks: 3000.0,
        }
    }
}

pub(super) struct Simulation {
    config: SimulationConfig,
    alpha: f32,
    decay: f32,
    center: Vec2,
    velocities: Vec<Vec2>,
    forces: Vec<Vec2>,
    buckets: HashMap<(i32, i32), Vec<usize>>,
}

impl Simulation {
    pub(super) fn new(config: SimulationConfig, positions: &[Vec2]) -> Self {
        let finite = positions.iter().filter(|p| p.x.is_finite() && p.y.is_finite());
        let (sum, count) = finite.fold((Vec2::ZERO, 0usize), |(sum, count), p| (sum + *p, count + 1));
        let center = if count > 0 { sum / count as f32 } else { Vec2::ZERO };

        Self {
            config,
            alpha: 1.0,
            decay: ALPHA_MIN.powf(1.0 / config.decay_ticks.max(1.0)),
            center,
            velocities: vec![Vec2::ZERO; positions.len()],
            forces: Vec::with_capacity(positions.len()),
            buckets: HashMap::new(),
        }
    }

    pub(super) fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN
    }

    pub(super) fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
    }

    /// Advances one tick. Returns false once the layout has cooled down.
    pub(super) fn step(&mut self, positions: &mut [Vec2], links: &[(usize, usize)]) -> bool {
        if self.is_settled() || positions.len() < 2 {
            return false;
        }

        let count = positions.len();
        let config = self.config;
        self.velocities.resize(count, Vec2::ZERO);
        self.forces.clear();
        self.forces.resize(count, Vec2::ZERO);

        let cell = config.repulsion_radius.max(1.0);
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for (index, position) in positions.iter().enumerate() {
            self.buckets
                .entry(cell_of(*position, cell))
                .or_default()
                .push(index);
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());

        let radius_sq = cell * cell;
        for index in 0..count {
            let position = positions[index];
            let (cx, cy) = cell_of(position, cell);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(bucket) = self.buckets.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    for &other in bucket {
                        if other == index {
                            continue;
                        }
                        let delta = position - positions[other];
                        let distance_sq = delta.length_sq().max(1.0);
                        if distance_sq > radius_sq {
                            continue;
                        }
                        self.forces[index] += delta / distance_sq.sqrt() * (config.repulsion / distance_sq);
                    }
                }
            }
        }

        for &(source, target) in links {
            if source >= count || target >= count || source == target {
                continue;
            }
            let delta = positions[target] - positions[source];
            let distance = delta.length();
            if distance <= 0.0001 {
                continue;
            }
            let pull = delta / distance * ((distance - config.link_distance) * config.link_spring);
            self.forces[source] += pull;
            self.forces[target] -= pull;
        }

        for (index, position) in positions.iter_mut().enumerate() {
            let force = self.forces[index] - (*position - self.center) * config.gravity;
            let velocity = (self.velocities[index] + force * self.alpha) * config.friction;
            self.velocities[index] = velocity;
            *position += velocity;
        }

        self.alpha *= self.decay;
        true
    }
}

fn cell_of(position: Vec2, cell: f32) -> (i32, i32) {
    ((position.x / cell).floor() as i32, (position.y / cell).floor() as i32)
}

/// Replaces non-finite seeds so one bad embedding cannot poison the layout.
pub(super) fn sanitize_seed(position: Vec2, index: usize, center: Vec2) -> Vec2 {
    if position.x.is_finite() && position.y.is_finite() {
        return position;
    }

    let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
    center + vec2(angle.cos(), angle.sin()) * (8.0 + (index % 17) as f32)
}
