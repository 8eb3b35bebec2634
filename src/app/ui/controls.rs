use eframe::egui::{self, RichText, Ui};

use concept_graph::util::short_text;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Actions");
        ui.add_space(4.0);

        let pause_text = if self.paused { "Start" } else { "Pause" };
        if ui.button(pause_text).clicked() {
            self.toggle_pause();
        }
        if ui.button("Fit view").clicked() {
            self.fit_view();
        }
        if ui.button("Zoom to a point by id").clicked() {
            self.zoom_random_point();
        }
        if ui.button("Select a point by id").clicked() {
            self.select_random_point();
        }
        if ui.button("Select points in a rectangular area").clicked() {
            self.select_points_in_area();
        }
        if ui.button("Select most linked point").clicked() {
            self.select_most_linked_point();
        }
        if ui.button("Select most linked network").clicked() {
            self.select_most_linked_network();
        }

        if !self.selection.is_empty() {
            ui.horizontal(|ui| {
                ui.label(format!("{} selected", self.selection.len()));
                if ui.small_button("Clear").clicked() {
                    self.clear_selection();
                }
            });
        }

        ui.separator();
        ui.label(RichText::new("Search").strong());
        if ui.text_edit_singleline(&mut self.search).changed() {
            self.search_cache = None;
        }

        let matches = self.search_matches();
        if self.search.trim().is_empty() {
            return;
        }
        if matches.is_empty() {
            ui.label("No matching concepts.");
            return;
        }

        ui.small(format!("{} matches", matches.len()));
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 20.0, matches.len(), |ui, row_range| {
                for row in row_range {
                    let Some(&index) = matches.get(row) else {
                        continue;
                    };
                    let Some(concept) = self.dataset.concept(index) else {
                        continue;
                    };
                    let text = format!("{}  {}", concept.id, short_text(&concept.title, 40));
                    let selected = self.selected == Some(index);
                    if ui.selectable_label(selected, text).clicked() {
                        clicked = Some(index);
                    }
                }
            });

        if let Some(index) = clicked {
            self.focus_point(index);
        }
    }
}
