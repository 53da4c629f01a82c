//! URL path resolution module
//!
//! Maps request paths onto the served root directory. Containment is
//! enforced on the canonicalized path, so `..` segments and symlinks
//! pointing outside the root never resolve to a servable file.

use std::path::{Path, PathBuf};

use crate::logger;

/// Outcome of mapping a URL path onto the filesystem
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Regular file to serve
    File(PathBuf),
    /// Directory without an index file; render a listing
    Listing(PathBuf),
    /// Directory requested without a trailing slash; 301 to this location
    Redirect(String),
    /// Nonexistent, unreadable, or escaping the served root
    NotFound,
}

/// Resolve a URL path against the served root
///
/// `root` must already be canonical (see `AppState`). Directory requests
/// probe `index_files` in order before falling back to a listing.
pub fn resolve_path(root: &Path, url_path: &str, index_files: &[String]) -> Resolved {
    let decoded = percent_decode(url_path);

    // NUL never appears in a legitimate file name
    if decoded.contains('\0') {
        return Resolved::NotFound;
    }

    let relative = decoded.trim_start_matches('/');
    let candidate = root.join(relative);

    // Canonicalize also fails for nonexistent paths, which covers the
    // plain 404 case
    let Ok(canonical) = candidate.canonicalize() else {
        return Resolved::NotFound;
    };

    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            url_path,
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    if canonical.is_dir() {
        // Directory URLs must end with a slash before being served
        if !url_path.ends_with('/') {
            return Resolved::Redirect(format!("{url_path}/"));
        }

        for index_file in index_files {
            let index_path = canonical.join(index_file);
            if index_path.is_file() {
                return Resolved::File(index_path);
            }
        }

        return Resolved::Listing(canonical);
    }

    Resolved::File(canonical)
}

/// Decode percent-encoded bytes in a URL path
///
/// Invalid escapes pass through unchanged; decoded bytes that are not
/// valid UTF-8 are replaced lossily. `+` is left alone, as it has no
/// special meaning in a path.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn test_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nocache_resolve_{name}_{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir.canonicalize().unwrap()
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b.txt"), "/a b.txt");
        assert_eq!(percent_decode("/%2e%2e/etc"), "/../etc");
        assert_eq!(percent_decode("/plain"), "/plain");
        // Invalid escapes pass through
        assert_eq!(percent_decode("/%zz"), "/%zz");
        assert_eq!(percent_decode("/x%4"), "/x%4");
        // Plus is not decoded in paths
        assert_eq!(percent_decode("/a+b"), "/a+b");
    }

    #[test]
    fn test_resolve_existing_file() {
        let root = test_root("file");
        fs::write(root.join("a.txt"), b"hello").unwrap();

        match resolve_path(&root, "/a.txt", &index_files()) {
            Resolved::File(path) => assert_eq!(path, root.join("a.txt")),
            other => panic!("Expected File, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_file() {
        let root = test_root("missing");
        assert_eq!(
            resolve_path(&root, "/nope.txt", &index_files()),
            Resolved::NotFound
        );
    }

    #[test]
    fn test_traversal_is_blocked() {
        let outer = test_root("traversal");
        let root = outer.join("served");
        fs::create_dir_all(&root).unwrap();
        let root = root.canonicalize().unwrap();
        fs::write(outer.join("secret.txt"), b"secret").unwrap();

        assert_eq!(
            resolve_path(&root, "/../secret.txt", &index_files()),
            Resolved::NotFound
        );
        // Encoded traversal decodes to the same thing
        assert_eq!(
            resolve_path(&root, "/%2e%2e/secret.txt", &index_files()),
            Resolved::NotFound
        );
    }

    #[test]
    fn test_directory_without_slash_redirects() {
        let root = test_root("redirect");
        fs::create_dir_all(root.join("docs")).unwrap();

        assert_eq!(
            resolve_path(&root, "/docs", &index_files()),
            Resolved::Redirect("/docs/".to_string())
        );
    }

    #[test]
    fn test_directory_with_index_serves_index() {
        let root = test_root("index");
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs").join("index.html"), b"<html>").unwrap();

        match resolve_path(&root, "/docs/", &index_files()) {
            Resolved::File(path) => assert_eq!(path, root.join("docs").join("index.html")),
            other => panic!("Expected File, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_without_index_lists() {
        let root = test_root("listing");
        fs::create_dir_all(root.join("bare")).unwrap();

        match resolve_path(&root, "/bare/", &index_files()) {
            Resolved::Listing(path) => assert_eq!(path, root.join("bare")),
            other => panic!("Expected Listing, got {other:?}"),
        }
    }

    #[test]
    fn test_root_itself_resolves() {
        let root = test_root("root_itself");
        match resolve_path(&root, "/", &index_files()) {
            Resolved::Listing(path) => assert_eq!(path, root),
            other => panic!("Expected Listing, got {other:?}"),
        }
    }

    #[test]
    fn test_percent_encoded_name_resolves() {
        let root = test_root("encoded");
        fs::write(root.join("a b.txt"), b"spaced").unwrap();

        match resolve_path(&root, "/a%20b.txt", &index_files()) {
            Resolved::File(path) => assert_eq!(path, root.join("a b.txt")),
            other => panic!("Expected File, got {other:?}"),
        }
    }
}
