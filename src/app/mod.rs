use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use rand::rngs::StdRng;
use tracing::{error, info};

use concept_graph::dataset::{DataReady, GraphDataset, LoadOptions, load_and_publish};
use concept_graph::{HttpSource, LabelOverlay};

mod actions;
mod canvas;
mod render_utils;
mod simulation;
mod ui;

use canvas::GraphCanvas;

pub struct ConceptGraphApp {
    api_base: String,
    options: LoadOptions,
    state: AppState,
    reload_rx: Option<Receiver<Arc<GraphDataset>>>,
}

enum AppState {
    Loading { rx: Receiver<Arc<GraphDataset>> },
    Ready(Box<ViewModel>),
}

struct ViewModel {
    dataset: Arc<GraphDataset>,
    canvas: GraphCanvas,
    overlay: LabelOverlay,
    selected: Option<usize>,
    selection: HashSet<usize>,
    search: String,
    search_cache: Option<SearchCache>,
    paused: bool,
    needs_fit: bool,
    rng: StdRng,
    visible_labels: usize,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

struct SearchCache {
    query: String,
    matches: Arc<Vec<usize>>,
}

impl ConceptGraphApp {
    pub fn new(cc: &eframe::CreationContext<'_>, api_base: String, options: LoadOptions) -> Self {
        let rx = Self::spawn_load(&cc.egui_ctx, api_base.clone(), options.clone());
        Self {
            api_base,
            options,
            state: AppState::Loading { rx },
            reload_rx: None,
        }
    }

    /// Subscribers are registered before the worker starts so none can miss
    /// the signal.
    fn spawn_load(
        ctx: &Context,
        api_base: String,
        options: LoadOptions,
    ) -> Receiver<Arc<GraphDataset>> {
        let (tx, rx) = mpsc::channel();
        let mut ready = DataReady::new();
        ready.subscribe(move |dataset: &Arc<GraphDataset>| {
            let _ = tx.send(Arc::clone(dataset));
        });
        let repaint = ctx.clone();
        ready.subscribe(move |_: &Arc<GraphDataset>| repaint.request_repaint());

        thread::spawn(move || {
            let published = match HttpSource::new(api_base.as_str()) {
                Ok(source) => load_and_publish(&source, &options, &mut ready),
                Err(err) => {
                    error!(error = %format!("{err:#}"), "cannot reach concept API");
                    ready.publish(GraphDataset::default())
                }
            };
            if let Err(err) = published {
                error!(%err, "load finished twice");
            }
        });

        rx
    }
}

impl eframe::App for ConceptGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(dataset) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            dataset,
                            self.options.rng(),
                        ))));
                    }
                    Err(TryRecvError::Disconnected) => {
                        error!("background load worker disconnected");
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            Arc::new(GraphDataset::default()),
                            self.options.rng(),
                        ))));
                    }
                    Err(TryRecvError::Empty) => {}
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading concept graph...");
                        ui.add_space(8.0);
                        ui.label(self.api_base.as_str());
                        ui.spinner();
                    });
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.api_base, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!("reloading concept graph");
                    self.reload_rx = Some(Self::spawn_load(
                        ctx,
                        self.api_base.clone(),
                        self.options.clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(dataset) => {
                            transition = Some(AppState::Ready(Box::new(ViewModel::new(
                                dataset,
                                self.options.rng(),
                            ))));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            error!("background reload worker disconnected");
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl Drop for ViewModel {
    fn drop(&mut self) {
        self.overlay.teardown();
    }
}
