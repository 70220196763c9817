use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use serde::Serialize;
use tracing::debug;

use super::queries::GraphQLRequest;
use crate::config::Credential;
use crate::error::{ApiError, ConfigError};

pub const LEETCODE_GRAPHQL: &str = "https://leetcode.com/graphql/";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CSRF_HEADER: &str = "x-csrftoken";
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Executes one GraphQL request and hands back the raw response body.
///
/// Implementations never retry; a failed call is reported to the caller as is.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn execute<V: Serialize + Sync>(
        &self,
        request: &GraphQLRequest<V>,
    ) -> Result<Vec<u8>, ApiError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(credential: &Credential) -> Result<Self, ConfigError> {
        Self::with_endpoint(credential, LEETCODE_GRAPHQL)
    }

    pub fn with_endpoint(credential: &Credential, endpoint: &str) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(REFERER, HeaderValue::from_static("https://leetcode.com/"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));

        let mut token = HeaderValue::from_str(credential.expose())
            .map_err(|_| ConfigError::InvalidCredential)?;
        token.set_sensitive(true);
        headers.insert(CSRF_HEADER, token);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    async fn execute<V: Serialize + Sync>(
        &self,
        request: &GraphQLRequest<V>,
    ) -> Result<Vec<u8>, ApiError> {
        let body = serde_json::to_vec(request).map_err(ApiError::Encode)?;
        debug!(operation = request.operation_name, "sending graphql request");

        let resp = self
            .client
            .post(&self.endpoint)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::Request(e)
                }
            })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Status(status));
        }

        let bytes = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Body(e)
            }
        })?;
        Ok(bytes.to_vec())
    }
}
