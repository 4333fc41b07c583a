use std::time::Duration;

use futures_util::StreamExt;
use predict_core::PredictionResponse;
use predict_logging::{predict_debug, predict_trace};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::{FailureKind, FetchError, PredictionRequest};

pub const PREDICTIONS_PATH: &str = "api/predictions";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec!["application/json".to_string()],
        }
    }
}

#[async_trait::async_trait]
pub trait PredictionFetcher: Send + Sync {
    async fn fetch_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, FetchError>;

    /// Loads the image a response refers to; `Ok` when it is reachable and is an image.
    async fn check_image(&self, path: &str) -> Result<(), FetchError>;
}

/// `{base}/api/predictions?domain=..&queryType=..`, both values URL-encoded.
pub fn prediction_url(base_url: &str, domain: &str, query: &str) -> Result<Url, FetchError> {
    let mut url = parse_base(base_url)?
        .join(PREDICTIONS_PATH)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    url.query_pairs_mut()
        .append_pair("domain", domain)
        .append_pair("queryType", query);
    Ok(url)
}

/// Absolute image URLs are used as-is, anything else is resolved against the backend.
pub fn resolve_image_url(base_url: &str, path: &str) -> Result<Url, FetchError> {
    if let Ok(url) = Url::parse(path) {
        return Ok(url);
    }
    parse_base(base_url)?
        .join(path)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn parse_base(base_url: &str) -> Result<Url, FetchError> {
    let mut base = Url::parse(base_url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(FetchError::new(FailureKind::InvalidUrl, base_url));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = essence(content_type);
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn check_length(&self, response: &reqwest::Response) -> Result<(), FetchError> {
        match response.content_length() {
            Some(content_len) if content_len > self.settings.max_bytes => Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            )),
            _ => Ok(()),
        }
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
            predict_trace!("read {} bytes", next_len);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl PredictionFetcher for ReqwestFetcher {
    async fn fetch_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, FetchError> {
        let url = prediction_url(&self.settings.base_url, &request.domain, &request.query)?;
        predict_debug!("GET {} (request {})", url, request.request_id);

        let mut builder = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        self.check_length(&response)?;

        if let Some(ct) = content_type(&response) {
            if !self.is_content_type_allowed(&ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType { content_type: ct },
                    "unsupported content type",
                ));
            }
        }

        let bytes = self.read_body(response).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::MalformedBody, err.to_string()))
    }

    async fn check_image(&self, path: &str) -> Result<(), FetchError> {
        let url = resolve_image_url(&self.settings.base_url, path)?;
        predict_debug!("GET image {}", url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        match content_type(&response) {
            Some(ct) if !essence(&ct).to_ascii_lowercase().starts_with("image/") => Err(
                FetchError::new(
                    FailureKind::UnsupportedContentType { content_type: ct },
                    "not an image",
                ),
            ),
            _ => Ok(()),
        }
    }
}

fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_url_encodes_both_parameters() {
        let url = prediction_url(
            "http://localhost:8080",
            "Gas Prices (Industry Trend Analysis)",
            "Gas Prices Query 1",
        )
        .unwrap();
        assert_eq!(url.path(), "/api/predictions");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "domain".to_string(),
                    "Gas Prices (Industry Trend Analysis)".to_string()
                ),
                ("queryType".to_string(), "Gas Prices Query 1".to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn prediction_url_keeps_base_path_prefix() {
        let url = prediction_url("http://host/predictai", "d", "q").unwrap();
        assert_eq!(url.path(), "/predictai/api/predictions");
    }

    #[test]
    fn image_paths_resolve_against_backend() {
        let base = "http://localhost:8080";
        assert_eq!(
            resolve_image_url(base, "/static/Assets/a.png").unwrap().as_str(),
            "http://localhost:8080/static/Assets/a.png"
        );
        assert_eq!(
            resolve_image_url(base, "https://cdn.example.com/b.png").unwrap().as_str(),
            "https://cdn.example.com/b.png"
        );
    }

    #[test]
    fn invalid_base_is_reported() {
        let err = prediction_url("not a url", "d", "q").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
