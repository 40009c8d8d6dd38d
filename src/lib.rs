pub mod commands;
pub mod credential;
pub mod fetch_config;
pub mod fetcher;
pub mod http;
pub mod http_client;
pub mod logging;
pub mod parameters;

pub use credential::CredentialDocument;
pub use fetch_config::FetchConfig;
pub use fetcher::{CredentialFetcher, FetchError};
