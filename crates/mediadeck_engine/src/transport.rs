use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use mediadeck_logging::deck_debug;

use crate::{
    ApiRequest, ApiResponse, ClientConfig, ClientError, FailureKind, HttpMethod, TransportError,
};

/// Sends one API request and returns the raw response.
///
/// Any HTTP status is a successful send; interpreting non-2xx is up to the caller.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.validate()?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransportError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?
            .pop_if_empty()
            .extend(request.segments());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint(request)?;
        let method = match request.method() {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(body) = request.body() {
            let payload = serde_json::to_vec(&body)
                .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        deck_debug!("{} -> {} ({} bytes)", request, status, body.len());

        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return TransportError::new(FailureKind::InvalidUrl, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
