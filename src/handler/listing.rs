//! Directory listing module
//!
//! Renders an HTML listing of a directory's immediate entries when no
//! index file is present. Entry names are HTML-escaped for display and
//! percent-encoded for hrefs; directories get a trailing slash.

use std::fmt::Write as _;
use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::http;
use crate::logger;

/// Serve an HTML listing for a directory
pub async fn serve_listing(dir: &Path, url_path: &str, is_head: bool) -> Response<Full<Bytes>> {
    match render_listing(dir, url_path).await {
        Some(html) => http::build_html_response(html, is_head),
        None => http::build_404_response(),
    }
}

/// Render the listing document, or None when the directory is unreadable
async fn render_listing(dir: &Path, url_path: &str) -> Option<String> {
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {}",
                dir.display(),
                e
            ));
            return None;
        }
    };

    // (display name, href) pairs; display names of directories end in '/'
    let mut entries: Vec<(String, String)> = Vec::new();
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map_or(false, |file_type| file_type.is_dir());

        let display = if is_dir {
            format!("{name}/")
        } else {
            name.clone()
        };
        let href = if is_dir {
            format!("{}/", percent_encode(&name))
        } else {
            percent_encode(&name)
        };
        entries.push((display, href));
    }

    entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    let title = format!("Directory listing for {}", html_escape(url_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{title}</h1>");
    html.push_str("<hr>\n<ul>\n");
    for (display, href) in &entries {
        let _ = writeln!(html, "<li><a href=\"{href}\">{}</a></li>", html_escape(display));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Some(html)
}

/// Escape text for embedding in HTML
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a path segment for use in an href
///
/// Unreserved characters and `/` stay literal; everything else is
/// encoded byte-wise.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nocache_listing_{name}_{}",
            std::process::id()
        ));
        std_fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("a b.txt"), "a%20b.txt");
        assert_eq!(percent_encode("safe-name_1.html"), "safe-name_1.html");
        assert_eq!(percent_encode("caf\u{e9}"), "caf%C3%A9");
    }

    #[tokio::test]
    async fn test_render_listing_contains_entries() {
        let dir = test_dir("entries");
        std_fs::write(dir.join("b.txt"), b"b").unwrap();
        std_fs::write(dir.join("A.txt"), b"a").unwrap();
        std_fs::create_dir_all(dir.join("sub")).unwrap();

        let html = render_listing(&dir, "/").await.unwrap();
        assert!(html.contains("Directory listing for /"));
        assert!(html.contains("<a href=\"A.txt\">A.txt</a>"));
        assert!(html.contains("<a href=\"b.txt\">b.txt</a>"));
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));

        // Case-insensitive ordering: A.txt before b.txt
        let a_pos = html.find("A.txt").unwrap();
        let b_pos = html.find("b.txt").unwrap();
        assert!(a_pos < b_pos);
    }

    #[tokio::test]
    async fn test_render_listing_escapes_names() {
        let dir = test_dir("escaped");
        std_fs::write(dir.join("a b.txt"), b"x").unwrap();

        let html = render_listing(&dir, "/").await.unwrap();
        assert!(html.contains("href=\"a%20b.txt\""));
        assert!(html.contains(">a b.txt</a>"));
    }

    #[tokio::test]
    async fn test_render_listing_missing_dir() {
        let dir = test_dir("gone").join("not_created");
        assert!(render_listing(&dir, "/gone/").await.is_none());
    }
}
