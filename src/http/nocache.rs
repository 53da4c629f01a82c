//! Cache-disabling header module
//!
//! Every response this server transmits carries the same three headers
//! telling clients and intermediaries not to cache the content. The
//! headers are applied as a post-processing step over the finished
//! response, so no individual handler can forget them.

use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::Response;

/// Exact value of the Cache-Control header on every response
pub const CACHE_CONTROL_VALUE: &str = "no-store, no-cache, must-revalidate";
/// Exact value of the Pragma header on every response
pub const PRAGMA_VALUE: &str = "no-cache";
/// Exact value of the Expires header on every response
pub const EXPIRES_VALUE: &str = "0";

/// Set the cache-disabling header triple on a finished response
///
/// Runs after status and body are finalized, for every status code.
/// Existing values for these headers are replaced, never appended to.
pub fn apply_no_cache<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.insert(PRAGMA, HeaderValue::from_static(PRAGMA_VALUE));
    headers.insert(EXPIRES, HeaderValue::from_static(EXPIRES_VALUE));
}
