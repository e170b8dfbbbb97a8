use std::error::Error as _;
use std::future::Future;
use std::time::Duration;

use scrapfly_core::{HttpMethod, RawResponse, TransportFailure};

use crate::settings::ClientConfig;

/// A fully resolved request: absolute URL with the query (and API key) applied.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Performs one HTTP exchange. Implementations must not retry.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportFailure>> + Send;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportFailure> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| map_reqwest_error(e, config.timeout))?;
        Ok(Self {
            http,
            timeout: config.timeout,
        })
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Head => reqwest::Method::HEAD,
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportFailure> {
        let mut builder = self.http.request(method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = resp
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// Map a `reqwest` failure onto a [`TransportFailure`].
///
/// The request URL is stripped first: it carries the API key and
/// user-supplied query text, neither of which may leak into messages or
/// steer the classification. Only the error flags and the URL-less source
/// chain are inspected.
///
/// A refused or failed connection through a locally configured proxy
/// (`HTTP_PROXY` and friends) is reported as `Connect`, since it concerns the
/// path to the API host rather than the scraped site.
pub fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> TransportFailure {
    if err.is_timeout() {
        return TransportFailure::Timeout(timeout);
    }
    let is_connect = err.is_connect();
    let err = err.without_url();

    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    let lower = chain.to_ascii_lowercase();

    if lower.contains("certificate") || lower.contains("tls handshake") || lower.contains("invalid peer") {
        TransportFailure::Tls(chain)
    } else if is_connect {
        TransportFailure::Connect(chain)
    } else {
        TransportFailure::Other(chain)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
