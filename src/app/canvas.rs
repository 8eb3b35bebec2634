use std::collections::HashSet;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, pos2, vec2,
};
use tracing::debug;

use concept_graph::GraphDataset;
use concept_graph::overlay::ScreenProjector;

use super::ViewModel;
use super::render_utils::{
    GREYOUT_OPACITY, HOVER_RING, SEARCH_RING, SELECTED_RING, circle_visible, dim_color,
    draw_background, link_visible, rgba_color, screen_radius, screen_to_world, world_to_screen,
};
use super::simulation::{Simulation, SimulationConfig, sanitize_seed};

const MIN_ZOOM: f32 = 0.02;
const MAX_ZOOM: f32 = 12.0;
const FOCUS_ZOOM: f32 = 3.0;

/// The render engine side of the viewer: world positions, viewport and the
/// per-point/per-link styling copied out of the dataset.
pub(super) struct GraphCanvas {
    positions: Vec<Vec2>,
    sizes: Vec<f32>,
    colors: Vec<Color32>,
    links: Vec<(usize, usize)>,
    link_colors: Vec<Color32>,
    link_widths: Vec<f32>,
    simulation: Simulation,
    pan: Vec2,
    zoom: f32,
    rect: Rect,
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
}

impl GraphCanvas {
    pub(super) fn new(dataset: &GraphDataset) -> Self {
        let raw = dataset
            .point_positions()
            .chunks_exact(2)
            .map(|pair| vec2(pair[0], pair[1]))
            .collect::<Vec<_>>();
        let simulation = Simulation::new(SimulationConfig::default(), &raw);
        let center = raw
            .iter()
            .find(|p| p.x.is_finite() && p.y.is_finite())
            .copied()
            .unwrap_or(Vec2::ZERO);
        let invalid = raw
            .iter()
            .filter(|p| !(p.x.is_finite() && p.y.is_finite()))
            .count();
        if invalid > 0 {
            debug!(invalid, "points without a usable seed position");
        }

        let positions = raw
            .into_iter()
            .enumerate()
            .map(|(index, position)| sanitize_seed(position, index, center))
            .collect();

        Self {
            positions,
            sizes: dataset.point_sizes().iter().map(|&size| size as f32).collect(),
            colors: dataset.point_colors().chunks_exact(4).map(rgba_color).collect(),
            links: dataset.link_pairs().collect(),
            link_colors: dataset.link_colors().chunks_exact(4).map(rgba_color).collect(),
            link_widths: dataset.link_widths().to_vec(),
            simulation,
            pan: Vec2::ZERO,
            zoom: 1.0,
            rect: Rect::NOTHING,
            screen_positions: Vec::new(),
            screen_radii: Vec::new(),
        }
    }

    pub(super) fn point_count(&self) -> usize {
        self.positions.len()
    }

    pub(super) fn rect(&self) -> Rect {
        self.rect
    }

    pub(super) fn step(&mut self) -> bool {
        self.simulation.step(&mut self.positions, &self.links)
    }

    pub(super) fn restart(&mut self) {
        self.simulation.reheat(0.5);
    }

    pub(super) fn is_settled(&self) -> bool {
        self.simulation.is_settled()
    }

    pub(super) fn fit_view(&mut self) {
        if self.positions.is_empty() || !self.rect.is_positive() {
            return;
        }

        let mut min = pos2(f32::INFINITY, f32::INFINITY);
        let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for position in &self.positions {
            min = min.min(position.to_pos2());
            max = max.max(position.to_pos2());
        }

        let bounds = Rect::from_min_max(min, max).expand(40.0);
        self.zoom = (self.rect.width() / bounds.width())
            .min(self.rect.height() / bounds.height())
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = -bounds.center().to_vec2() * self.zoom;
    }

    pub(super) fn zoom_to_point(&mut self, index: usize) {
        let Some(position) = self.positions.get(index).copied() else {
            return;
        };
        self.zoom = self.zoom.max(FOCUS_ZOOM);
        self.pan = -position * self.zoom;
    }

    /// Points whose screen position falls inside `area`.
    pub(super) fn points_in_area(&self, area: Rect) -> Vec<usize> {
        (0..self.positions.len())
            .filter(|&index| area.contains(self.to_screen(index)))
            .collect()
    }

    fn to_screen(&self, index: usize) -> Pos2 {
        world_to_screen(self.rect, self.pan, self.zoom, self.positions[index])
    }

    fn handle_zoom(&mut self, ui: &Ui, response: &egui::Response) -> bool {
        if !response.hovered() {
            return false;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return false;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| self.rect.center());
        let world_before = screen_to_world(self.rect, self.pan, self.zoom, pointer);

        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - self.rect.center() - (world_before * self.zoom);
        true
    }

    fn handle_pan(&mut self, response: &egui::Response) -> bool {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
            return response.drag_delta() != Vec2::ZERO;
        }
        false
    }

    fn update_screen_space(&mut self) {
        self.screen_positions.clear();
        self.screen_radii.clear();
        for index in 0..self.positions.len() {
            self.screen_positions.push(self.to_screen(index));
            let size = self.sizes.get(index).copied().unwrap_or(2.0);
            self.screen_radii.push(screen_radius(size, self.zoom));
        }
    }

    fn hovered_index(&self, pointer: Option<Pos2>) -> Option<usize> {
        let pointer = pointer?;
        self.screen_positions
            .iter()
            .zip(&self.screen_radii)
            .enumerate()
            .filter(|(_, (position, radius))| position.distance(pointer) <= (**radius).max(4.0))
            .min_by(|a, b| {
                a.1.0
                    .distance(pointer)
                    .total_cmp(&b.1.0.distance(pointer))
            })
            .map(|(index, _)| index)
    }
}

impl ScreenProjector for GraphCanvas {
    fn screen_position(&self, index: usize) -> Option<Pos2> {
        if index >= self.positions.len() || !self.rect.is_positive() {
            return None;
        }
        let position = self.to_screen(index);
        let radius = screen_radius(self.sizes.get(index).copied().unwrap_or(2.0), self.zoom);
        circle_visible(self.rect, position, radius).then_some(position)
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let search_matches = self
            .search_matches()
            .iter()
            .copied()
            .collect::<HashSet<_>>();
        let canvas = &mut self.canvas;

        let mut viewport_changed = canvas.rect != rect;
        canvas.rect = rect;
        draw_background(&painter, rect, canvas.pan, canvas.zoom);

        if self.dataset.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No concepts loaded.",
                FontId::proportional(16.0),
                Color32::from_gray(200),
            );
            return;
        }

        if self.needs_fit {
            canvas.fit_view();
            self.needs_fit = false;
            viewport_changed = true;
        }

        viewport_changed |= canvas.handle_zoom(ui, &response);
        viewport_changed |= canvas.handle_pan(&response);

        let ticked = !self.paused && canvas.step();
        if ticked || response.dragged() {
            ui.ctx().request_repaint();
        }

        if ticked || viewport_changed {
            self.visible_labels = self.overlay.sync(&*canvas);
        }

        canvas.update_screen_space();
        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = canvas.hovered_index(pointer.filter(|p| rect.contains(*p)));
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let selection_active = !self.selection.is_empty();
        let zoom_sqrt = canvas.zoom.sqrt();

        for (link_index, &(source, target)) in canvas.links.iter().enumerate() {
            let start = canvas.screen_positions[source];
            let end = canvas.screen_positions[target];
            if !link_visible(rect, start, end, 2.5) {
                continue;
            }

            let width = canvas.link_widths.get(link_index).copied().unwrap_or(0.1);
            let mut color = canvas
                .link_colors
                .get(link_index)
                .copied()
                .unwrap_or(Color32::GRAY);
            if selection_active
                && !(self.selection.contains(&source) && self.selection.contains(&target))
            {
                color = dim_color(color, GREYOUT_OPACITY);
            }
            painter.line_segment(
                [start, end],
                Stroke::new((width * 6.0 * zoom_sqrt).clamp(0.3, 3.0), color),
            );
        }

        for index in 0..canvas.point_count() {
            let position = canvas.screen_positions[index];
            let radius = canvas.screen_radii[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let mut color = canvas.colors.get(index).copied().unwrap_or(Color32::WHITE);
            if selection_active && !self.selection.contains(&index) {
                color = dim_color(color, GREYOUT_OPACITY);
            }
            painter.circle_filled(position, radius, color);

            if self.selected == Some(index) {
                painter.circle_stroke(position, radius + 3.0, Stroke::new(2.0, SELECTED_RING));
            } else if search_matches.contains(&index) {
                painter.circle_stroke(position, radius + 2.0, Stroke::new(1.5, SEARCH_RING));
            }
        }

        for element in self.overlay.visible() {
            let (Some(index), Some(position)) = (element.index, element.position) else {
                continue;
            };
            let radius = canvas.screen_radii.get(index).copied().unwrap_or(2.0);
            painter.text(
                position + vec2(0.0, -(radius + 4.0)),
                Align2::CENTER_BOTTOM,
                element.text.as_str(),
                FontId::proportional(12.0),
                Color32::from_gray(235),
            );
        }

        if let Some(index) = hovered {
            let position = canvas.screen_positions[index];
            let radius = canvas.screen_radii[index];
            painter.circle_stroke(position, radius + 2.5, Stroke::new(2.0, HOVER_RING));
            if let Some(concept) = self.dataset.concept(index) {
                painter.text(
                    position + vec2(radius + 6.0, 0.0),
                    Align2::LEFT_CENTER,
                    concept.title.as_str(),
                    FontId::proportional(13.0),
                    Color32::from_gray(250),
                );
            }
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            match hovered {
                Some(index) => self.focus_point(index),
                None => self.clear_selection(),
            }
        }
    }
}
