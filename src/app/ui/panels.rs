use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout};
use rand::rngs::StdRng;

use concept_graph::{GraphDataset, LabelOverlay};

use super::super::ViewModel;
use super::super::canvas::GraphCanvas;

impl ViewModel {
    pub(in crate::app) fn new(dataset: Arc<GraphDataset>, rng: StdRng) -> Self {
        let canvas = GraphCanvas::new(&dataset);
        let mut overlay = LabelOverlay::new();
        overlay.track(dataset.labels(), dataset.notable());

        Self {
            dataset,
            canvas,
            overlay,
            selected: None,
            selection: HashSet::new(),
            search: String::new(),
            search_cache: None,
            paused: false,
            needs_fit: true,
            rng,
            visible_labels: 0,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        api_base: &str,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Concept graph");
                    ui.separator();
                    ui.label(format!("api: {api_base}"));
                    ui.label(format!("concepts: {}", self.dataset.point_count()));
                    ui.label(format!("links: {}", self.dataset.link_count()));
                    ui.label(format!(
                        "labels: {} / {}",
                        self.visible_labels,
                        self.dataset.notable().len()
                    ));
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if is_reloading {
                        ui.spinner();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.fps_display_text());
                        if !self.paused && !self.canvas.is_settled() {
                            ui.label("simulating");
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
