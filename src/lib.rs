//! Data assembly and label overlay for a concept knowledge-graph viewer.
//!
//! [`api`] fetches concept and relationship records, [`dataset`] turns them
//! into point/link buffers plus label and adjacency lookups, and [`overlay`]
//! keeps notable-point labels glued to a moving canvas.

pub mod api;
pub mod dataset;
pub mod overlay;
pub mod util;

pub use api::{Concept, ConceptId, GraphSource, HttpSource, Relationship};
pub use dataset::{DataReady, GraphDataset, LoadOptions, load_dataset};
pub use overlay::{LabelOverlay, ScreenProjector};
