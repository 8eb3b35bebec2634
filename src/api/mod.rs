mod client;
mod parse;
mod records;

pub use client::{DEFAULT_API_BASE, GraphSource, HttpSource};
pub use parse::{ApiError, parse_envelope};
pub use records::{Concept, ConceptId, Embedding, Relationship, parse_embedding};
