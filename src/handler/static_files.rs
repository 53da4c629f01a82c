//! Static file serving module
//!
//! Handles file loading, MIME type detection, and response building for
//! resolved filesystem paths.

use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::http::{self, mime};
use crate::logger;

/// Serve a resolved regular file
pub async fn serve_file(path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match load_file(path).await {
        Some((content, content_type)) => http::build_file_response(content, content_type, is_head),
        None => http::build_404_response(),
    }
}

/// Load a file's bytes and detect its content type
///
/// Read failures map to None; the caller answers 404 without exposing
/// the filesystem path to the client.
pub async fn load_file(path: &Path) -> Option<(Vec<u8>, &'static str)> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {}", path.display(), e));
            return None;
        }
    };

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nocache_static_{name}_{}",
            std::process::id()
        ));
        std_fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_file_returns_exact_bytes() {
        let dir = test_dir("bytes");
        let path = dir.join("data.bin");
        std_fs::write(&path, [0u8, 1, 2, 255]).unwrap();

        let (content, content_type) = load_file(&path).await.unwrap();
        assert_eq!(content, vec![0u8, 1, 2, 255]);
        assert_eq!(content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_file_detects_type() {
        let dir = test_dir("mime");
        let path = dir.join("page.html");
        std_fs::write(&path, b"<html></html>").unwrap();

        let (_, content_type) = load_file(&path).await.unwrap();
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = test_dir("missing");
        assert!(load_file(&dir.join("absent.txt")).await.is_none());
    }

    #[tokio::test]
    async fn test_serve_file_head_has_empty_body() {
        use http_body_util::BodyExt;

        let dir = test_dir("head");
        let path = dir.join("page.txt");
        std_fs::write(&path, b"content").unwrap();

        let response = serve_file(&path, true).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Length"], "7");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
