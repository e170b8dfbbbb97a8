use std::net::TcpListener;

use scrapfly_core::{ErrorKind, ProxyPool, ScrapeConfig, classify_transport};

use super::*;
use crate::client::ScrapflyClient;

const SECRET: &str = "scp-live-SECRET";

/// A local port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn transport(timeout: Duration) -> ReqwestTransport {
    let config = ClientConfig {
        timeout,
        ..ClientConfig::new(SECRET)
    };
    ReqwestTransport::new(&config).unwrap()
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
        body: None,
    }
}

#[tokio::test]
async fn test_refused_connect_ignores_query_text() {
    let url = format!(
        "http://127.0.0.1:{}/scrape?key={SECRET}&url=https%3A%2F%2Fproxy-list.org%2Ftls-certificate&proxy_pool=public_residential_pool",
        closed_port()
    );
    let failure = transport(Duration::from_secs(10))
        .send(get(url))
        .await
        .unwrap_err();

    let TransportFailure::Connect(message) = &failure else {
        panic!("expected a connect failure, got {failure:?}");
    };
    assert!(!message.contains(SECRET), "key leaked: {message}");
    assert!(!message.contains("proxy_pool"), "query leaked: {message}");

    let err = classify_transport(&failure);
    assert_eq!(err.kind(), ErrorKind::UpstreamServer);
    assert_eq!(err.detail().code, "ERR::TRANSPORT::CONNECT");
    assert!(!err.to_string().contains(SECRET));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    // Accepted by the kernel backlog but never answered.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!(
        "http://{}/scrape?key={SECRET}",
        listener.local_addr().unwrap()
    );
    let failure = transport(Duration::from_millis(200))
        .send(get(url))
        .await
        .unwrap_err();
    assert_eq!(failure, TransportFailure::Timeout(Duration::from_millis(200)));
    drop(listener);
}

#[tokio::test]
async fn test_client_connect_failure_with_proxy_pool() {
    let config = ClientConfig {
        host: format!("http://127.0.0.1:{}", closed_port()),
        ..ClientConfig::new(SECRET)
    };
    let client = ScrapflyClient::new(config).unwrap();
    let scrape = ScrapeConfig {
        proxy_pool: Some(ProxyPool::PublicResidential),
        tags: vec!["proxy".into(), "tls".into()],
        ..ScrapeConfig::new("https://proxy-list.org/")
    };

    let err = client.scrape(&scrape).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamServer);
    assert_eq!(err.detail().code, "ERR::TRANSPORT::CONNECT");
    assert_eq!(err.detail().http_status_code, 0);
    assert!(!err.detail().message.contains(SECRET), "key leaked: {}", err.detail().message);
}

#[test]
fn test_method_mapping() {
    assert_eq!(method(HttpMethod::Get), reqwest::Method::GET);
    assert_eq!(method(HttpMethod::Post), reqwest::Method::POST);
    assert_eq!(method(HttpMethod::Head), reqwest::Method::HEAD);
}
