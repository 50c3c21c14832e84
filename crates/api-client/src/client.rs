use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use tracing::{debug, warn};

use vidsage_api::*;

use crate::error::{extract_detail, ApiError, Result};

/// Typed HTTP client for the vidsage backend.
///
/// One method per endpoint. The bearer token is held by the client instance
/// (`set_token` / `clear_token`) rather than any process-wide state; absence
/// of a token simply issues anonymous requests. No request timeout is
/// configured — completion is driven by the remote response alone.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    // ── Health / Status ───────────────────────────────────────────────────

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.auth(self.client.get(self.url("/health"))).send().await?;
        parse_response(resp).await
    }

    pub async fn service_status(&self) -> Result<ServiceStatusResponse> {
        let resp = self
            .auth(self.client.get(self.url("/video/status")))
            .send()
            .await?;
        parse_response(resp).await
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    pub async fn sign_in(&self, req: &SignInRequest) -> Result<AuthResponse> {
        let resp = self
            .auth(self.client.post(self.url("/auth/signin")))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<AuthResponse> {
        let resp = self
            .auth(self.client.post(self.url("/auth/signup")))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    // ── Video processing ──────────────────────────────────────────────────

    /// Submit a video for analysis. Multipart form with either a
    /// `youtube_url` field or a `video_file` upload.
    pub async fn process_video(&self, source: &VideoSource) -> Result<ProcessVideoResponse> {
        let form = match source {
            VideoSource::YoutubeUrl(url) => Form::new().text("youtube_url", url.clone()),
            VideoSource::LocalFile(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::File {
                    path: path.display().to_string(),
                    source: e,
                })?;
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("video.mp4")
                    .to_string();
                Form::new().part("video_file", Part::bytes(bytes).file_name(file_name))
            }
        };

        debug!(source = %source.label(), "submitting video for processing");
        let resp = self
            .auth(self.client.post(self.url("/video/process")))
            .multipart(form)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn video_history(&self, limit: usize) -> Result<VideoHistoryResponse> {
        let resp = self
            .auth(
                self.client
                    .get(self.url(&format!("/video/history?limit={limit}"))),
            )
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn video_details(&self, video_id: &str) -> Result<ProcessVideoResponse> {
        let resp = self
            .auth(
                self.client
                    .get(self.url(&format!("/video/details/{video_id}"))),
            )
            .send()
            .await?;
        parse_response(resp).await
    }

    // ── Chat ──────────────────────────────────────────────────────────────

    pub async fn start_chat(&self, req: &ChatStartRequest) -> Result<ChatStartResponse> {
        let resp = self
            .auth(self.client.post(self.url("/analysis/chat/start")))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn send_chat_message(
        &self,
        req: &ChatMessageRequest,
    ) -> Result<ChatMessageResponse> {
        let resp = self
            .auth(self.client.post(self.url("/analysis/chat/message")))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }
}

/// Parse an HTTP response: deserialize the body on 2xx, otherwise extract
/// the backend `detail` message (falling back to the status text).
async fn parse_response<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.bytes().await.unwrap_or_default();
        let detail = extract_detail(status, &body);
        warn!(%status, detail, "backend call failed");
        return Err(ApiError::Http { status, detail });
    }
    Ok(resp.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn token_is_settable_and_clearable() {
        let mut client = ApiClient::new("http://localhost:8000");
        assert!(client.token().is_none());
        client.set_token("tok-123".to_string());
        assert_eq!(client.token(), Some("tok-123"));
        client.clear_token();
        assert!(client.token().is_none());
    }
}
