use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend answered with status {status:?}: {message}")]
    Status { status: String, message: String },
    #[error("invalid JSON from backend")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    message: Option<String>,
    data: Option<Vec<T>>,
}

/// Decodes a `{status, message?, data}` response body.
///
/// A `"success"` envelope without `data` is an empty collection.
pub fn parse_envelope<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(raw)?;
    if envelope.status != SUCCESS_STATUS {
        return Err(ApiError::Status {
            status: envelope.status,
            message: envelope
                .message
                .unwrap_or_else(|| "no message".to_owned()),
        });
    }

    Ok(envelope.data.unwrap_or_default())
}
