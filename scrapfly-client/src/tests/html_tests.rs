use scrapfly_core::{ErrorKind, ResultData};

use super::*;

const PAGE: &str = r#"<html>
<head><title>  Web Scraping Dev
</title></head>
<body>
  <div class="product"><h3><a href="/product/1">Box of Chocolate Candy</a></h3><span class="price">$9.99</span></div>
  <div class="product"><h3><a href="/product/2">Dark Red Energy Potion</a></h3><span class="price">$4.99</span></div>
  <div class="product"><h3>Teal Potion</h3></div>
</body>
</html>"#;

fn result() -> ScrapeResult {
    ScrapeResult {
        result: ResultData {
            content: PAGE.to_string(),
            success: true,
            status_code: 200,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_title() {
    let html = parse(&result());
    assert_eq!(title(&html).as_deref(), Some("Web Scraping Dev"));
    assert_eq!(title(&Html::parse_document("<p>no title</p>")), None);
}

#[test]
fn test_select_text() {
    let html = parse(&result());
    assert_eq!(
        select_text(&html, ".product .price").unwrap(),
        vec!["$9.99", "$4.99"]
    );
    assert_eq!(select_text(&html, "h3").unwrap().len(), 3);
}

#[test]
fn test_select_attr() {
    let html = parse(&result());
    assert_eq!(
        select_attr(&html, ".product a", "href").unwrap(),
        vec!["/product/1", "/product/2"]
    );
}

#[test]
fn test_invalid_selector() {
    let html = parse(&result());
    let err = select_text(&html, "div[[").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScrapeConfig);
}
