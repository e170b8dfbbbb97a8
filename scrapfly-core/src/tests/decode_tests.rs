use super::*;

const SCRAPE_OK: &str = r#"{
    "uuid": "01HZX0000000000000000000",
    "config": {"url": "https://web-scraping.dev/product/1", "render_js": false},
    "context": {"asp": false, "cost": {"total": 1}},
    "result": {
        "content": "<html><head><title>Box of Chocolate Candy</title></head></html>",
        "status_code": 200,
        "success": true,
        "url": "https://web-scraping.dev/product/1",
        "format": "text",
        "content_type": "text/html; charset=utf-8",
        "reason": "OK",
        "status": "DONE",
        "response_headers": {"content-type": "text/html; charset=utf-8"},
        "duration": 1.42,
        "log_url": "https://scrapfly.io/dashboard/monitoring/log/01HZX"
    }
}"#;

#[test]
fn test_decode_scrape() {
    let result = decode_scrape(SCRAPE_OK.as_bytes()).unwrap();
    assert_eq!(result.uuid, "01HZX0000000000000000000");
    assert_eq!(result.upstream_status(), 200);
    assert!(result.result.success);
    assert!(result.content().contains("Box of Chocolate Candy"));
    assert_eq!(result.result.reason.as_deref(), Some("OK"));
    assert_eq!(result.config["render_js"], serde_json::json!(false));
    assert!(result.embedded_error().is_none());
}

#[test]
fn test_decode_scrape_result_not_an_object() {
    let err = decode_scrape(br#"{"result": "not an object"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnhandledApiResponse);
    assert_eq!(
        err.detail().raw_body.as_deref(),
        Some(r#"{"result": "not an object"}"#)
    );
}

#[test]
fn test_decode_scrape_missing_result() {
    let err = decode_scrape(br#"{"uuid": "x"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnhandledApiResponse);
}

#[test]
fn test_decode_scrape_not_json() {
    let err = decode_scrape(b"<html>maintenance</html>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnhandledApiResponse);
    assert!(err.detail().message.contains("scrape"));
}

#[test]
fn test_decode_scrape_outcome_embedded_error() {
    let body = br#"{
        "uuid": "u-1",
        "result": {
            "success": false,
            "status_code": 404,
            "error": {
                "code": "ERR::SCRAPE::BAD_UPSTREAM_RESPONSE",
                "message": "The website returned 404",
                "http_code": 0
            }
        }
    }"#;
    let response = RawResponse::new(200, body.to_vec());
    let err = decode_scrape_outcome(&response).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamClient);
    assert_eq!(err.detail().http_status_code, 404);
    assert_eq!(err.detail().api_response.as_ref().unwrap().uuid, "u-1");
}

#[test]
fn test_decode_scrape_outcome_failure_without_error_is_ok() {
    let body = br#"{"result": {"success": false, "status_code": 200}}"#;
    let response = RawResponse::new(200, body.to_vec());
    let result = decode_scrape_outcome(&response).unwrap();
    assert!(!result.result.success);
}

#[test]
fn test_decode_screenshot() {
    let response = RawResponse::new(200, vec![0x89, b'P', b'N', b'G'])
        .with_header("Content-Type", "image/png")
        .with_header("X-Scrapfly-Upstream-Url", "https://web-scraping.dev/");
    let shot = decode_screenshot(&response).unwrap();
    assert_eq!(shot.image, vec![0x89, b'P', b'N', b'G']);
    assert_eq!(shot.url, "https://web-scraping.dev/");
    assert_eq!(shot.extension(), "png");
}

#[test]
fn test_decode_screenshot_rejects_non_image() {
    let response = RawResponse::new(200, b"{}".to_vec()).with_header("content-type", "application/json");
    let err = decode_screenshot(&response).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContentType);
    assert_eq!(err.detail().http_status_code, 200);
}

#[test]
fn test_screenshot_extension() {
    let mut shot = crate::result::ScreenshotResult {
        content_type: "image/jpeg".into(),
        ..Default::default()
    };
    assert_eq!(shot.extension(), "jpg");
    shot.content_type = "image/webp; q=0.8".into();
    assert_eq!(shot.extension(), "webp");
    shot.content_type = "application/octet-stream".into();
    assert_eq!(shot.extension(), "bin");
}

#[test]
fn test_decode_extraction() {
    let body = br#"{"data": {"title": "Box of Chocolate Candy", "price": 9.99}, "content_type": "application/json"}"#;
    let result = decode_extraction(body).unwrap();
    assert_eq!(result.content_type, "application/json");
    assert_eq!(result.data["title"], "Box of Chocolate Candy");
}

#[test]
fn test_decode_account() {
    let body = br#"{
        "account": {"account_id": "acc-1", "currency": "USD", "timezone": "UTC", "suspended": false},
        "project": {"name": "default", "concurrency_limit": 5, "scrape_request_count": 120},
        "subscription": {
            "plan_name": "FREE",
            "max_concurrency": 5,
            "period": {"start": "2024-01-01 00:00:00", "end": "2024-02-01 00:00:00"},
            "usage": {
                "scrape": {"current": 120, "limit": 1000, "remaining": 880},
                "spider": {"current": 0, "limit": 0}
            },
            "billing": {"plan_price": {"currency": "USD", "amount": 0.0}}
        }
    }"#;
    let account = decode_account(body).unwrap();
    assert_eq!(account.account.account_id, "acc-1");
    assert_eq!(account.project.concurrency_limit, Some(5));
    assert_eq!(account.remaining_scrapes(), 880);
    assert_eq!(account.subscription.billing.plan_price.currency, "USD");
}
