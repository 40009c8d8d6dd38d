use std::time::Duration;

use clap::Parser;

use crate::credential::KindField;
use crate::fetch_config::{ConfigError, FetchConfig};
use crate::http::config::HttpConfig;

// per https://cloud.google.com/docs/authentication/rest#impersonated-sa
pub const DEFAULT_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
pub const DEFAULT_JSONPATH: &str = "access_token";
pub const DEFAULT_HEADER: &str = "Metadata-Flavor: Google";
/// Served by `python3 -m http.server -d demos`.
pub const DEV_URL: &str = "http://127.0.0.1:8000/meta-server-response.json";

/// Prints a metadata server token as a client.authentication.k8s.io ExecCredential.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "metadata-exec-credential", version)]
pub struct Cli {
    /// Url to get token credential
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Top-level key holding the token in the url json content
    #[arg(long, default_value = DEFAULT_JSONPATH)]
    pub jsonpath: String,

    /// Any header to send, as 'Name: Value'. An empty value sends no extra header
    #[arg(long, default_value = DEFAULT_HEADER)]
    pub header: String,

    /// Url override to use the local serving path for dev
    #[arg(long)]
    pub dev: bool,

    /// Deadline in seconds for the whole request. No deadline when omitted
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Deadline in seconds for establishing the connection. No deadline when omitted
    #[arg(long, value_name = "SECONDS")]
    pub connect_timeout: Option<u64>,

    /// Write the document kind under the `kind` key instead of `ExecCredential`
    #[arg(long)]
    pub kind_field: bool,

    /// Log debug information to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    pub fn effective_url(&self) -> &str {
        if self.dev { DEV_URL } else { self.url.as_str() }
    }

    pub fn fetch_config(&self) -> Result<FetchConfig, ConfigError> {
        FetchConfig::try_with_header_str(self.effective_url(), &self.jsonpath, &self.header)
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(
            self.timeout.map(Duration::from_secs),
            self.connect_timeout.map(Duration::from_secs),
        )
    }

    pub fn kind_field(&self) -> KindField {
        if self.kind_field {
            KindField::Kind
        } else {
            KindField::ExecCredential
        }
    }
}
