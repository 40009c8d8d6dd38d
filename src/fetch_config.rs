use http::{HeaderName, HeaderValue};
use thiserror::Error;

/// Separator between the name and the value of a header given as a single string.
pub const HEADER_SEPARATOR: &str = ": ";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid header format: expected 'Key: Value', got `{0}`")]
    InvalidHeaderFormat(String),
    #[error("invalid header name `{0}`: `{1}`")]
    InvalidHeaderName(String, String),
    #[error("invalid value for header `{0}`")]
    InvalidHeaderValue(String),
    #[error("invalid url `{0}`: `{1}`")]
    InvalidUrl(String, String),
}

/// Additional header sent along with the token request.
///
/// Parsed from a `"Name: Value"` string, splitting on the first `": "` only, so the value may
/// itself contain the separator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl ExtraHeader {
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    pub fn value(&self) -> &HeaderValue {
        &self.value
    }
}

impl TryFrom<&str> for ExtraHeader {
    type Error = ConfigError;

    fn try_from(header: &str) -> Result<Self, Self::Error> {
        let (name, value) = header
            .split_once(HEADER_SEPARATOR)
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .ok_or_else(|| ConfigError::InvalidHeaderFormat(header.to_string()))?;

        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ConfigError::InvalidHeaderName(name.to_string(), e.to_string()))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::InvalidHeaderValue(name.to_string()))?;
        // Metadata servers are often guarded by secrets passed in this header.
        value.set_sensitive(true);

        Ok(Self { name, value })
    }
}

/// What to fetch and which key to read from the response. Supplied once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    url: String,
    json_path: String,
    extra_header: Option<ExtraHeader>,
}

impl FetchConfig {
    pub fn new(
        url: impl Into<String>,
        json_path: impl Into<String>,
        extra_header: Option<ExtraHeader>,
    ) -> Self {
        Self {
            url: url.into(),
            json_path: json_path.into(),
            extra_header,
        }
    }

    /// Builds a config from a raw header string. An empty string means no extra header.
    pub fn try_with_header_str(
        url: impl Into<String>,
        json_path: impl Into<String>,
        header: &str,
    ) -> Result<Self, ConfigError> {
        let extra_header = if header.is_empty() {
            None
        } else {
            Some(ExtraHeader::try_from(header)?)
        };
        Ok(Self::new(url, json_path, extra_header))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Top-level key holding the token. It is looked up verbatim, dots and slashes included.
    pub fn json_path(&self) -> &str {
        &self.json_path
    }

    pub fn extra_header(&self) -> Option<&ExtraHeader> {
        self.extra_header.as_ref()
    }
}
