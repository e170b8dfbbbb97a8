use std::time::Duration;

use scrapfly_core::{ErrorKind, HttpMethod, RawResponse};

use super::*;
use crate::mock_transport::{MockReply, MockTransport, query_param, test_client, test_client_with_timeout};

#[tokio::test]
async fn test_scrape_success() {
    let client = test_client(MockTransport::scrape_ok());
    let result = client
        .scrape(&ScrapeConfig::new("https://web-scraping.dev/product/1"))
        .await
        .unwrap();

    assert_eq!(result.uuid, "uuid-https://web-scraping.dev/product/1");
    assert_eq!(result.upstream_status(), 200);

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, HttpMethod::Get);
    assert!(req.url.starts_with("https://api.scrapfly.io/scrape?"));
    assert_eq!(query_param(req, "key").as_deref(), Some("scp-test-key"));
    assert_eq!(
        query_param(req, "url").as_deref(),
        Some("https://web-scraping.dev/product/1")
    );
}

#[tokio::test]
async fn test_host_trailing_slash() {
    let config = ClientConfig {
        api_key: "k".into(),
        host: "http://localhost:8080/".into(),
        ..ClientConfig::default()
    };
    let client = ScrapflyClient::with_transport(config, MockTransport::scrape_ok());
    client.scrape(&ScrapeConfig::new("https://example.com")).await.unwrap();
    assert!(client.transport().requests()[0].url.starts_with("http://localhost:8080/scrape?key=k&"));
}

#[tokio::test]
async fn test_invalid_extraction_config_never_sends() {
    let client = test_client(MockTransport::scrape_ok());
    let config = ExtractionConfig {
        extraction_prompt: Some("get the price".into()),
        ..ExtractionConfig::new(Vec::new(), "text/html")
    };
    let err = client.extract(&config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExtractionConfig);
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn test_invalid_scrape_config_never_sends() {
    let client = test_client(MockTransport::scrape_ok());
    let config = ScrapeConfig {
        auto_scroll: true,
        ..ScrapeConfig::new("https://web-scraping.dev/products")
    };
    let err = client.scrape(&config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScrapeConfig);
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn test_missing_api_key() {
    let client = ScrapflyClient::with_transport(ClientConfig::default(), MockTransport::scrape_ok());
    let err = client
        .scrape(&ScrapeConfig::new("https://example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadApiKey);
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn test_error_status_is_classified() {
    let client = test_client(MockTransport::new(|_| {
        MockReply::json(
            429,
            r#"{"code": "ERR::THROTTLE::MAX_REQUEST_RATE_EXCEEDED", "message": "slow down", "http_code": 429, "retry_after_ms": 3000}"#,
        )
    }));
    let err = client
        .scrape(&ScrapeConfig::new("https://example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooManyRequests);
    assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn test_unauthorized_without_body() {
    let client = test_client(MockTransport::new(|_| {
        MockReply::Respond(RawResponse::new(401, Vec::new()))
    }));
    let err = client.account().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnhandledApiResponse);
    assert_eq!(err.detail().http_status_code, 401);
}

#[tokio::test]
async fn test_embedded_scrape_error() {
    let body = r#"{
        "uuid": "u-404",
        "result": {
            "success": false,
            "status_code": 404,
            "url": "https://web-scraping.dev/missing",
            "error": {"code": "ERR::SCRAPE::BAD_UPSTREAM_RESPONSE", "message": "Target returned 404"}
        }
    }"#;
    let client = test_client(MockTransport::new(move |_| MockReply::json(200, body)));
    let err = client
        .scrape(&ScrapeConfig::new("https://web-scraping.dev/missing"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamClient);
    assert_eq!(err.detail().api_response.as_ref().unwrap().uuid, "u-404");
}

#[tokio::test]
async fn test_transport_failures() {
    let client = test_client(MockTransport::new(|req| {
        if query_param(req, "url").is_some_and(|u| u.contains("proxy")) {
            MockReply::Fail(TransportFailure::Proxy("tunnel failed".into()))
        } else {
            MockReply::Fail(TransportFailure::Connect("connection refused".into()))
        }
    }));

    let err = client
        .scrape(&ScrapeConfig::new("https://example.com/proxy"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProxyFailed);

    let err = client
        .scrape(&ScrapeConfig::new("https://example.com/"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamServer);
    assert_eq!(err.detail().code, "ERR::TRANSPORT::CONNECT");
    assert_eq!(err.detail().http_status_code, 0);
}

#[tokio::test]
async fn test_request_deadline() {
    let transport = MockTransport::new(|req| {
        MockReply::json(200, &crate::mock_transport::scrape_body(&query_param(req, "url").unwrap_or_default()))
            .after(Duration::from_secs(5))
    });
    let client = test_client_with_timeout(transport, Duration::from_millis(50));
    let err = client
        .scrape(&ScrapeConfig::new("https://example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamServer);
    assert_eq!(err.detail().code, "ERR::TRANSPORT::TIMEOUT");
}

#[tokio::test]
async fn test_already_cancelled() {
    let client = test_client(MockTransport::scrape_ok());
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = client
        .execute_with_cancel(&ScrapeConfig::new("https://example.com"), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.detail().code, "ERR::TRANSPORT::CANCELLED");
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn test_cancel_in_flight() {
    let transport = MockTransport::new(|_| {
        MockReply::json(200, "{}").after(Duration::from_secs(10))
    });
    let client = test_client(transport);
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = client
        .execute_with_cancel(&ScrapeConfig::new("https://example.com"), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.detail().code, "ERR::TRANSPORT::CANCELLED");
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn test_screenshot() {
    let client = test_client(MockTransport::new(|_| {
        MockReply::Respond(
            RawResponse::new(200, vec![0xFF, 0xD8, 0xFF])
                .with_header("content-type", "image/jpeg"),
        )
    }));
    let shot = client
        .screenshot(&ScreenshotConfig::new("https://web-scraping.dev/"))
        .await
        .unwrap();
    assert_eq!(shot.extension(), "jpg");
    assert_eq!(shot.url, "https://web-scraping.dev/");
    let req = &client.transport().requests()[0];
    assert!(req.url.contains("/screenshot?"));
}

#[tokio::test]
async fn test_extraction_sends_document() {
    let client = test_client(MockTransport::new(|_| {
        MockReply::json(200, r#"{"data": {"price": "$9.99"}, "content_type": "application/json"}"#)
    }));
    let config = ExtractionConfig {
        extraction_prompt: Some("get the price".into()),
        ..ExtractionConfig::new("<p>$9.99</p>", "text/html")
    };
    let result = client.extract(&config).await.unwrap();
    assert_eq!(result.data["price"], "$9.99");

    let req = &client.transport().requests()[0];
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.body.as_deref(), Some(b"<p>$9.99</p>".as_slice()));
    assert!(req.headers.contains(&("content-type".to_string(), "text/html".to_string())));
}

#[tokio::test]
async fn test_account() {
    let client = test_client(MockTransport::new(|_| {
        MockReply::json(
            200,
            r#"{"subscription": {"plan_name": "PRO", "usage": {"scrape": {"remaining": 42}}}}"#,
        )
    }));
    let account = client.account().await.unwrap();
    assert_eq!(account.subscription.plan_name, "PRO");
    assert_eq!(account.remaining_scrapes(), 42);
    assert!(client.transport().requests()[0].url.contains("/account?key="));
}
