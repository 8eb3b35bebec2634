use eframe::egui::{Rect, pos2, vec2};
use rand::Rng;
use tracing::debug;

use super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn select_point(&mut self, index: Option<usize>) {
        self.selected = index;
        self.selection.clear();
        if let Some(index) = index {
            self.selection.insert(index);
        }
    }

    pub(in crate::app) fn clear_selection(&mut self) {
        self.selected = None;
        self.selection.clear();
    }

    /// Click behaviour: select the point, zoom to it and open its details.
    pub(in crate::app) fn focus_point(&mut self, index: usize) {
        self.select_point(Some(index));
        self.canvas.zoom_to_point(index);
        self.overlay_dirty();
    }

    pub(in crate::app) fn toggle_pause(&mut self) {
        if self.paused {
            self.paused = false;
            self.canvas.restart();
        } else {
            self.paused = true;
        }
    }

    pub(in crate::app) fn fit_view(&mut self) {
        self.canvas.fit_view();
        self.overlay_dirty();
    }

    pub(in crate::app) fn zoom_random_point(&mut self) {
        let Some(index) = self.random_index() else {
            return;
        };
        self.canvas.zoom_to_point(index);
        self.select_point(Some(index));
        self.paused = true;
        self.overlay_dirty();
    }

    pub(in crate::app) fn select_random_point(&mut self) {
        let Some(index) = self.random_index() else {
            return;
        };
        self.select_point(Some(index));
        self.canvas.fit_view();
        self.paused = true;
        self.overlay_dirty();
    }

    /// Selects whatever lies inside a random quarter-sized window of the canvas.
    pub(in crate::app) fn select_points_in_area(&mut self) {
        let rect = self.canvas.rect();
        if !rect.is_positive() {
            return;
        }

        let size = vec2(rect.width() / 4.0, rect.height() / 4.0);
        let left = rect.left() + self.rng.random_range(0.0..=(rect.width() - size.x));
        let top = rect.top() + self.rng.random_range(0.0..=(rect.height() - size.y));
        let area = Rect::from_min_size(pos2(left, top), size);

        let hits = self.canvas.points_in_area(area);
        debug!(count = hits.len(), "points selected by area");
        self.selected = None;
        self.selection = hits.into_iter().collect();
        self.paused = true;
    }

    pub(in crate::app) fn select_most_linked_point(&mut self) {
        let Some(index) = self.dataset.most_linked() else {
            return;
        };
        self.focus_point(index);
        self.paused = true;
    }

    /// Picks a random notable point and selects it together with its
    /// neighbours, then zooms onto it.
    pub(in crate::app) fn select_most_linked_network(&mut self) {
        let notable = self.dataset.notable();
        if notable.is_empty() {
            return;
        }

        let pick = self.rng.random_range(0..notable.len());
        let Some(root) = self.dataset.labels().index_of(&notable[pick]) else {
            return;
        };

        self.selection = self.dataset.neighborhood(root).into_iter().collect();
        self.selection.insert(root);
        self.selected = Some(root);
        self.canvas.zoom_to_point(root);
        self.paused = true;
        self.overlay_dirty();
    }

    fn random_index(&mut self) -> Option<usize> {
        let count = self.dataset.point_count();
        (count > 0).then(|| self.rng.random_range(0..count))
    }

    fn overlay_dirty(&mut self) {
        self.visible_labels = self.overlay.sync(&self.canvas);
    }
}
