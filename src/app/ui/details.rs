use eframe::egui::{self, RichText, Ui};

use concept_graph::util::{clean_keywords, short_text};

use super::super::ViewModel;

const MAX_NEIGHBOR_ROWS: usize = 64;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(concept) = self.dataset.concept(index) else {
            ui.label("Selected concept no longer exists.");
            return;
        };

        let mut close = false;
        let mut jump_to = None;

        ui.horizontal(|ui| {
            ui.heading(RichText::new(concept.title.as_str()).strong());
            if ui.small_button("x").on_hover_text("Close").clicked() {
                close = true;
            }
        });
        ui.small(format!("id {}", concept.id));
        ui.add_space(6.0);

        let keywords = clean_keywords(&concept.keywords);
        if !keywords.is_empty() {
            ui.label(RichText::new("Keywords").strong());
            ui.label(keywords);
        }
        if !concept.data_name.is_empty() {
            ui.label(format!("Source: {}", concept.data_name));
        }
        if !concept.category.is_empty() {
            ui.label(format!("Category: {}", concept.category));
        }
        ui.label(format!(
            "Connectivity: {} ({} out / {} in)",
            concept.connectivity(),
            concept.source_num,
            concept.target_num
        ));

        if !concept.summary.is_empty() {
            ui.separator();
            ui.label(RichText::new("Summary").strong());
            egui::ScrollArea::vertical()
                .id_salt("summary_scroll")
                .max_height(220.0)
                .show(ui, |ui| ui.label(concept.summary.as_str()));
        }

        ui.separator();
        let neighbors = self.dataset.neighborhood(index);
        ui.label(RichText::new(format!("Linked concepts ({})", neighbors.len())).strong());
        if neighbors.is_empty() {
            ui.label("No links recorded for this concept.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("neighbor_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for &neighbor in neighbors.iter().take(MAX_NEIGHBOR_ROWS) {
                        let Some(linked) = self.dataset.concept(neighbor) else {
                            continue;
                        };
                        let text = format!("{}  {}", linked.id, short_text(&linked.title, 36));
                        if ui.link(text).clicked() {
                            jump_to = Some(neighbor);
                        }
                    }
                    if neighbors.len() > MAX_NEIGHBOR_ROWS {
                        ui.small(format!("and {} more", neighbors.len() - MAX_NEIGHBOR_ROWS));
                    }
                });
        }

        if close {
            self.clear_selection();
        } else if let Some(neighbor) = jump_to {
            self.focus_point(neighbor);
        }
    }
}
