use crate::http::config::HttpConfig;
use crate::http_client::{HttpClient as CredentialHttpClient, HttpClientError};
use http::{Request, Response, StatusCode};
use reqwest::blocking::{Client, Response as BlockingResponse};

/// Blocking `reqwest` client backing the credential fetcher.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self, HttpBuildError> {
        let builder = Client::builder()
            .use_rustls_tls()
            .tls_built_in_native_certs(true)
            .timeout(config.timeout)
            .connect_timeout(config.conn_timeout);

        let client = builder
            .build()
            .map_err(|err| HttpBuildError::ClientBuilder(err.to_string()))?;

        Ok(Self { client })
    }
}

fn try_build_response(res: BlockingResponse) -> Result<Response<Vec<u8>>, HttpClientError> {
    let status = res.status();
    let version = res.version();
    let headers = res.headers().clone();

    // Only a 200 carries a token. Other bodies are dropped unread together with the connection.
    let body: Vec<u8> = if status == StatusCode::OK {
        res.bytes()
            .map_err(|err| HttpClientError::ReadingResponse(err.to_string()))?
            .into()
    } else {
        Vec::new()
    };

    let mut response = http::Response::builder()
        .status(status)
        .version(version)
        .body(body)
        .map_err(|err| HttpClientError::BuildingResponse(err.to_string()))?;
    *response.headers_mut() = headers;

    Ok(response)
}

impl CredentialHttpClient for HttpClient {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HttpClientError> {
        let req = self
            .client
            .request(request.method().clone(), request.uri().to_string().as_str())
            .headers(request.headers().clone())
            .body(request.body().to_vec());

        let res = req
            .send()
            .map_err(|err| HttpClientError::TransportError(err.to_string()))?;

        try_build_response(res)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum HttpBuildError {
    #[error("could not build the http client: {0}")]
    ClientBuilder(String),
}
