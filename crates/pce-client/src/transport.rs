use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, LOCATION};
use tracing::trace;

use crate::config::{Credentials, PceConfig};
use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request against the PCE API, with `path` relative to the API base.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Query parameters, encoded by the transport.
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Ask the server to defer the work to a background job.
    pub respond_async: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
            respond_async: false,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            respond_async: false,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn respond_async(mut self) -> Self {
        self.respond_async = true;
        self
    }
}

/// The parts of an HTTP response the job protocol looks at.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// `reqwest`-backed transport with basic auth.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(cfg: &PceConfig) -> Result<Self, ApiError> {
        cfg.validate()?;
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!cfg.verify_tls)
            .timeout(cfg.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.base_url(),
            credentials: cfg.credentials.clone(),
        })
    }

    fn url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let path = &request.path;
        let raw = if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };
        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::Config(format!("invalid request url '{raw}': {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request)?;
        trace!(method = ?request.method, %url, "sending pce request");

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        }
        .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
        .header(ACCEPT, "application/json");

        if request.respond_async {
            builder = builder.header("Prefer", "respond-async");
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(ApiResponse {
            status,
            location,
            body,
        })
    }
}
