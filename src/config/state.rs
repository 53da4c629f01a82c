// Application state module
// Holds the immutable per-process state shared by all connection tasks

use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Application state
///
/// Constructed once in `main` and passed to the listener behind an `Arc`.
/// There is no runtime mutation; requests only ever read from it.
pub struct AppState {
    pub config: Config,
    /// Canonicalized served root. Path containment checks compare against
    /// this value, so it must stay in canonical form.
    pub root: PathBuf,
}

impl AppState {
    /// Create `AppState` from a loaded configuration
    ///
    /// Fails when the configured root directory does not exist or cannot
    /// be canonicalized; that is a startup error, not a per-request one.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = PathBuf::from(&config.server.root).canonicalize()?;
        Ok(Self { config, root })
    }
}
