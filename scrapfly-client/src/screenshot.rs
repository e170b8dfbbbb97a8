use std::io;
use std::path::{Path, PathBuf};

use scrapfly_core::ScreenshotResult;

/// Write a screenshot to `dir/<name>.<ext>`, creating `dir` as needed.
///
/// The extension follows the image content type. Returns the written path.
pub fn save_screenshot(shot: &ScreenshotResult, dir: &Path, name: &str) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", sanitize_file_name(name), shot.extension()));
    std::fs::write(&path, &shot.image)?;
    log::debug!("Saved {} byte screenshot to {}", shot.image.len(), path.display());
    Ok(path)
}

/// File-system safe stem derived from an arbitrary string such as a URL.
pub fn sanitize_file_name(name: &str) -> String {
    let name = name
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let mut out: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();
    while out.ends_with(['_', '.']) {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("screenshot");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(
            sanitize_file_name("https://web-scraping.dev/product/1?x=2"),
            "web-scraping.dev_product_1_x_2"
        );
        assert_eq!(sanitize_file_name("https://example.com/"), "example.com");
        assert_eq!(sanitize_file_name("///"), "screenshot");
    }

    #[test]
    fn test_save_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let shot = ScreenshotResult {
            image: vec![1, 2, 3],
            content_type: "image/png".into(),
            url: "https://example.com".into(),
        };
        let path = save_screenshot(&shot, &dir.path().join("shots"), "https://example.com").unwrap();
        assert_eq!(path, dir.path().join("shots").join("example.com.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
