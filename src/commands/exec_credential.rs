use std::io::Write;

use thiserror::Error;
use tracing::debug;

use crate::credential::KindField;
use crate::fetch_config::FetchConfig;
use crate::fetcher::{CredentialFetcher, FetchError};
use crate::http_client::HttpClient;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("writing credential document: `{0}`")]
    Output(#[from] std::io::Error),
}

/// Fetches the credential and writes it, as one JSON line, to the given sink.
pub struct ExecCredentialCommand<C>
where
    C: HttpClient,
{
    fetcher: CredentialFetcher<C>,
    kind_field: KindField,
}

impl<C> ExecCredentialCommand<C>
where
    C: HttpClient,
{
    pub fn new(fetcher: CredentialFetcher<C>) -> Self {
        Self {
            fetcher,
            kind_field: KindField::default(),
        }
    }

    pub fn with_kind_field(self, kind_field: KindField) -> Self {
        Self { kind_field, ..self }
    }

    pub fn run<W: Write>(&self, config: &FetchConfig, out: &mut W) -> Result<(), CommandError> {
        let document = self
            .fetcher
            .fetch(config)?
            .with_kind_field(self.kind_field);

        let serialized = document
            .to_json()
            .map_err(|e| FetchError::Serialization(e.to_string()))?;

        writeln!(out, "{serialized}")?;
        out.flush()?;
        debug!("credential document written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::http::client::HttpClient as ReqwestHttpClient;
    use crate::http::config::HttpConfig;
    use crate::http_client::tests::MockHttpClient;
    use assert_matches::assert_matches;
    use http::Response;
    use httpmock::{Method::GET, MockServer};
    use serde_json::{Value, json};
    use std::io;

    fn reqwest_command() -> ExecCredentialCommand<ReqwestHttpClient> {
        let client = ReqwestHttpClient::new(HttpConfig::default()).unwrap();
        ExecCredentialCommand::new(CredentialFetcher::new(client))
    }

    #[test]
    fn writes_document_from_metadata_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/computeMetadata/v1/instance/service-accounts/default/token")
                .header("accept", "application/json")
                .header("metadata-flavor", "Google");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"tok123","expires_in":3599,"token_type":"Bearer"}"#);
        });
        let config = FetchConfig::try_with_header_str(
            server.url("/computeMetadata/v1/instance/service-accounts/default/token"),
            "access_token",
            "Metadata-Flavor: Google",
        )
        .unwrap();

        let mut out = Vec::new();
        reqwest_command().run(&config, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.ends_with('\n'));
        let value: Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(
            value,
            json!({
                "apiVersion": "client.authentication.k8s.io/v1beta1",
                "ExecCredential": "ExecCredential",
                "status": {"token": "tok123"}
            })
        );
        mock.assert();
    }

    #[test]
    fn writes_kind_key_when_requested() {
        let mut client = MockHttpClient::new();
        client.expect_send().times(1).returning(|_| {
            Ok(Response::builder()
                .status(200)
                .body(br#"{"access_token":"tok"}"#.to_vec())
                .unwrap())
        });
        let command = ExecCredentialCommand::new(CredentialFetcher::new(client))
            .with_kind_field(KindField::Kind);
        let config = FetchConfig::new("http://localhost/token", "access_token", None);

        let mut out = Vec::new();
        command.run(&config, &mut out).unwrap();

        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["kind"], "ExecCredential");
        assert!(value.get("ExecCredential").is_none());
    }

    #[test]
    fn nothing_is_written_on_failure() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/token");
            then.status(403).body("forbidden");
        });
        let config = FetchConfig::new(server.url("/token"), "access_token", None);

        let mut out = Vec::new();
        let error = reqwest_command().run(&config, &mut out).unwrap_err();

        assert_matches!(
            error,
            CommandError::Fetch(FetchError::UnexpectedStatus { status: 403, .. })
        );
        assert!(out.is_empty());
        mock.assert();
    }

    #[test]
    fn missing_key_against_metadata_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/token");
            then.status(200).body(r#"{"other":"x"}"#);
        });
        let config = FetchConfig::new(server.url("/token"), "access_token", None);

        let error = reqwest_command().run(&config, &mut Vec::new()).unwrap_err();

        assert_matches!(
            error,
            CommandError::Fetch(FetchError::KeyNotFound { key, .. }) => assert_eq!(key, "access_token")
        );
        mock.assert();
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_failure_is_reported() {
        let mut client = MockHttpClient::new();
        client.expect_send().times(1).returning(|_| {
            Ok(Response::builder()
                .status(200)
                .body(br#"{"access_token":"tok"}"#.to_vec())
                .unwrap())
        });
        let command = ExecCredentialCommand::new(CredentialFetcher::new(client));
        let config = FetchConfig::new("http://localhost/token", "access_token", None);

        let error = command.run(&config, &mut BrokenPipe).unwrap_err();

        assert_matches!(error, CommandError::Output(_));
    }
}
