use serde::{Deserialize, Serialize};

pub type ConceptId = u64;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Concept {
    pub id: ConceptId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data_name: String,
    #[serde(default)]
    pub source_num: u32,
    #[serde(default)]
    pub target_num: u32,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub embedding: Option<Embedding>,
}

impl Concept {
    /// Total number of relationships touching this concept, as counted by the backend.
    pub fn connectivity(&self) -> u64 {
        u64::from(self.source_num) + u64::from(self.target_num)
    }

    pub fn embedding_values(&self) -> Vec<f32> {
        self.embedding
            .as_ref()
            .map(Embedding::values)
            .unwrap_or_default()
    }
}

/// Embeddings arrive either as pgvector text (`"[0.1,0.2]"`) or as a JSON array.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Embedding {
    Values(Vec<f32>),
    Text(String),
}

impl Embedding {
    pub fn values(&self) -> Vec<f32> {
        match self {
            Self::Values(values) => values.clone(),
            Self::Text(text) => parse_embedding(text),
        }
    }
}

/// Tokens that are not numbers become NaN; the caller gets a NaN coordinate
/// for that point instead of an error.
pub fn parse_embedding(text: &str) -> Vec<f32> {
    let trimmed = text
        .trim()
        .trim_start_matches(['[', '{', '('])
        .trim_end_matches([']', '}', ')'])
        .trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split(',')
        .map(|token| token.trim().parse::<f32>().unwrap_or(f32::NAN))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Relationship {
    #[serde(rename = "source_concept_id", alias = "source")]
    pub source: ConceptId,
    #[serde(rename = "target_concept_id", alias = "target")]
    pub target: ConceptId,
}

impl Relationship {
    pub fn new(source: ConceptId, target: ConceptId) -> Self {
        Self { source, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bracketed_text_embedding() {
        assert_eq!(parse_embedding("[1.0, 2.5,-3]"), vec![1.0, 2.5, -3.0]);
        assert_eq!(parse_embedding("1.0,2.0,3.0"), vec![1.0, 2.0, 3.0]);
        assert!(parse_embedding("  ").is_empty());
    }

    #[test]
    fn malformed_embedding_tokens_become_nan() {
        let values = parse_embedding("1.0,abc,3.0");
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
    }

    #[test]
    fn concept_accepts_both_embedding_shapes() {
        let text: Concept =
            serde_json::from_str(r#"{"id": 1, "embedding": "[0.5,0.25]"}"#).unwrap();
        let array: Concept =
            serde_json::from_str(r#"{"id": 2, "embedding": [0.5, 0.25]}"#).unwrap();
        let missing: Concept = serde_json::from_str(r#"{"id": 3}"#).unwrap();

        assert_eq!(text.embedding_values(), vec![0.5, 0.25]);
        assert_eq!(array.embedding_values(), vec![0.5, 0.25]);
        assert!(missing.embedding_values().is_empty());
        assert_eq!(missing.title, "");
    }

    #[test]
    fn relationship_reads_backend_field_names() {
        let edge: Relationship =
            serde_json::from_str(r#"{"source_concept_id": 4, "target_concept_id": 9}"#).unwrap();
        assert_eq!(edge, Relationship::new(4, 9));

        let short: Relationship = serde_json::from_str(r#"{"source": 1, "target": 2}"#).unwrap();
        assert_eq!(short, Relationship::new(1, 2));
    }
}
