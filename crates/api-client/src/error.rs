use reqwest::StatusCode;
use serde::Deserialize;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Backend-reported failure: non-2xx with a parsed `detail` message.
    /// The detail is surfaced to the user verbatim.
    #[error("{detail}")]
    Http { status: StatusCode, detail: String },

    /// Transport failure: the request never produced a response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A local video file could not be read for upload.
    #[error("could not read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Pull the `detail` message out of an error body, falling back to the HTTP
/// status text when the body is not the expected JSON shape.
pub(crate) fn extract_detail(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        })
}
