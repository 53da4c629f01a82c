//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from
//! path resolution and file loading.

pub mod mime;
pub mod nocache;
pub mod response;

// Re-export commonly used functions
pub use nocache::apply_no_cache;
pub use response::{
    build_404_response, build_405_response, build_413_response, build_file_response,
    build_html_response, build_redirect_response,
};
