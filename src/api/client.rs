use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use tracing::debug;

use super::parse::parse_envelope;
use super::records::{Concept, Relationship};

pub const DEFAULT_API_BASE: &str = "http://localhost:8112";

const CONCEPTS_PATH: &str = "/api/concepts";
const NETWORKS_PATH: &str = "/api/networks";

/// Where concept and relationship records come from.
pub trait GraphSource {
    fn fetch_concepts(&self) -> Result<Vec<Concept>>;
    fn fetch_relationships(&self) -> Result<Vec<Relationship>>;
}

pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "fetching");

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("failed to read body from {url}"))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(anyhow!("{url} answered HTTP {status}: {body}"))
        }
    }
}

impl GraphSource for HttpSource {
    fn fetch_concepts(&self) -> Result<Vec<Concept>> {
        let raw = self.get_text(CONCEPTS_PATH)?;
        parse_envelope(&raw).context("failed to decode concepts response")
    }

    fn fetch_relationships(&self) -> Result<Vec<Relationship>> {
        let raw = self.get_text(NETWORKS_PATH)?;
        parse_envelope(&raw).context("failed to decode networks response")
    }
}
