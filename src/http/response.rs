//! HTTP response building module
//!
//! Provides builders for the status codes this server emits, decoupled
//! from path resolution and file loading.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 301 redirect response
///
/// Used for directory requests lacking a trailing slash.
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 response for a loaded file
///
/// HEAD requests get the same headers with an empty body; Content-Length
/// always reflects the full file size.
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_response() {
        let response = build_404_response();
        assert_eq!(response.status(), 404);
        assert_eq!(response.headers()["Content-Type"], "text/plain");
    }

    #[test]
    fn test_405_allows_get_and_head() {
        let response = build_405_response();
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["Allow"], "GET, HEAD");
    }

    #[test]
    fn test_redirect_response() {
        let response = build_redirect_response("/docs/");
        assert_eq!(response.status(), 301);
        assert_eq!(response.headers()["Location"], "/docs/");
        assert_eq!(response.headers()["Content-Length"], "0");
    }

    #[test]
    fn test_file_response_sets_length() {
        let response = build_file_response(b"hello".to_vec(), "text/plain; charset=utf-8", false);
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Length"], "5");
        assert_eq!(
            response.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_head_keeps_full_content_length() {
        let response = build_file_response(b"hello".to_vec(), "text/plain; charset=utf-8", true);
        assert_eq!(response.headers()["Content-Length"], "5");
    }
}
