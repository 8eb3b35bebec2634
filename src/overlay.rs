//! Persistent on-screen labels for notable points.
//!
//! The overlay does not know how points are drawn. Whatever renders the graph
//! implements [`ScreenProjector`], and the overlay asks it where each tracked
//! point currently is after every simulation step or viewport change.

use eframe::egui::Pos2;
use tracing::{debug, warn};

use crate::dataset::LabelRegistry;

pub trait ScreenProjector {
    /// Current screen position of a point, or `None` when it is not visible.
    fn screen_position(&self, index: usize) -> Option<Pos2>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Uninitialized,
    Tracking,
    TornDown,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelElement {
    /// `None` when the notable label did not resolve to a point.
    pub index: Option<usize>,
    pub text: String,
    /// `None` while hidden.
    pub position: Option<Pos2>,
}

impl LabelElement {
    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }
}

#[derive(Debug)]
pub struct LabelOverlay {
    state: OverlayState,
    elements: Vec<LabelElement>,
}

impl LabelOverlay {
    pub fn new() -> Self {
        Self {
            state: OverlayState::Uninitialized,
            elements: Vec::new(),
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Starts tracking the points behind `notable`, replacing any previous set.
    pub fn track(&mut self, registry: &LabelRegistry, notable: &[String]) {
        let mut unresolved = 0usize;
        self.elements = notable
            .iter()
            .map(|label| match registry.index_of(label) {
                Some(index) => LabelElement {
                    index: Some(index),
                    text: registry.label_of(index).unwrap_or(label).to_owned(),
                    position: None,
                },
                None => {
                    unresolved += 1;
                    LabelElement {
                        index: None,
                        text: label.clone(),
                        position: None,
                    }
                }
            })
            .collect();

        if unresolved > 0 {
            warn!(unresolved, "notable labels without a point, they will not be shown");
        }
        debug!(tracked = self.elements.len(), "label overlay tracking");
        self.state = OverlayState::Tracking;
    }

    /// Indices to hand the render engine for position tracking.
    pub fn tracked_indices(&self) -> Vec<usize> {
        self.elements
            .iter()
            .filter_map(|element| element.index)
            .collect()
    }

    /// Re-projects every tracked point. Returns how many labels are visible.
    pub fn sync<P: ScreenProjector + ?Sized>(&mut self, projector: &P) -> usize {
        if self.state != OverlayState::Tracking {
            return 0;
        }

        let mut visible = 0usize;
        for element in &mut self.elements {
            element.position = element
                .index
                .and_then(|index| projector.screen_position(index))
                .filter(|position| position.x.is_finite() && position.y.is_finite());
            if element.position.is_some() {
                visible += 1;
            }
        }
        visible
    }

    pub fn elements(&self) -> &[LabelElement] {
        &self.elements
    }

    pub fn visible(&self) -> impl Iterator<Item = &LabelElement> {
        self.elements.iter().filter(|element| element.is_visible())
    }

    pub fn teardown(&mut self) {
        self.elements.clear();
        self.state = OverlayState::TornDown;
    }
}

impl Default for LabelOverlay {
    fn default() -> Self {
        Self::new()
    }
}
