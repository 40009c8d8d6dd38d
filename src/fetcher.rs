use http::header::ACCEPT;
use http::{Request, StatusCode, Uri};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::credential::CredentialDocument;
use crate::fetch_config::{ConfigError, FetchConfig};
use crate::http_client::{HttpClient, HttpClientError};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("fetching url `{url}`: {reason}")]
    Network { url: String, reason: String },
    #[error("received non-200 status code `{status}` from `{url}`")]
    UnexpectedStatus { status: u16, url: String },
    #[error("reading response body: `{0}`")]
    Io(String),
    #[error("response body is not a JSON object: `{0}`")]
    Parse(String),
    #[error("key `{key}` not found in the JSON response from `{url}`")]
    KeyNotFound { key: String, url: String },
    #[error("value for key `{key}` in the JSON response from `{url}` is a {found}, expected a string")]
    Type {
        key: String,
        url: String,
        found: &'static str,
    },
    #[error("encoding credential document: `{0}`")]
    Serialization(String),
}

/// Fetches a token from a metadata endpoint and turns it into a [`CredentialDocument`].
pub struct CredentialFetcher<C>
where
    C: HttpClient,
{
    http_client: C,
}

impl<C> CredentialFetcher<C>
where
    C: HttpClient,
{
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Issues a single GET request and extracts the configured key. Every failure is final.
    pub fn fetch(&self, config: &FetchConfig) -> Result<CredentialDocument, FetchError> {
        let request = build_request(config)?;

        debug!(url = config.url(), "requesting token");
        let response = self.http_client.send(request).map_err(|e| match e {
            HttpClientError::TransportError(reason) => FetchError::Network {
                url: config.url().to_string(),
                reason,
            },
            HttpClientError::ReadingResponse(reason)
            | HttpClientError::BuildingResponse(reason) => FetchError::Io(reason),
        })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: config.url().to_string(),
            });
        }

        let body: Map<String, Value> = serde_json::from_slice(response.body())
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let token = extract_token(&body, config)?;
        debug!(key = config.json_path(), "token extracted");

        Ok(CredentialDocument::new(token))
    }
}

pub(crate) fn build_request(config: &FetchConfig) -> Result<Request<Vec<u8>>, FetchError> {
    let uri = config
        .url()
        .parse::<Uri>()
        .map_err(|e| ConfigError::InvalidUrl(config.url().to_string(), e.to_string()))?;

    let mut request = Request::get(uri)
        .header(ACCEPT, "application/json")
        .body(Vec::new())
        .map_err(|e| ConfigError::InvalidUrl(config.url().to_string(), e.to_string()))?;

    if let Some(header) = config.extra_header() {
        request
            .headers_mut()
            .append(header.name().clone(), header.value().clone());
    }

    Ok(request)
}

fn extract_token(body: &Map<String, Value>, config: &FetchConfig) -> Result<String, FetchError> {
    match body.get(config.json_path()) {
        Some(Value::String(token)) => Ok(token.to_owned()),
        Some(other) => Err(FetchError::Type {
            key: config.json_path().to_string(),
            url: config.url().to_string(),
            found: json_kind(other),
        }),
        None => Err(FetchError::KeyNotFound {
            key: config.json_path().to_string(),
            url: config.url().to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
