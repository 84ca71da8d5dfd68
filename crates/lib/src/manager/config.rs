//! Store configuration and per-update options.

use serde::{Deserialize, Serialize};

/// Default number of undo steps kept by a store.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Default number of parsed paths kept by a store.
pub const DEFAULT_PATH_CACHE_CAPACITY: usize = 1024;

/// Configuration for a [`StateManager`](super::StateManager).
///
/// # Example
///
/// ```
/// use showstate::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.max_history, 50);
///
/// // Or with specific settings
/// let config = StoreConfig {
///     max_history: 200,
///     ..Default::default()
/// };
///
/// // Configs round-trip through JSON, e.g. from a preferences file
/// let parsed: StoreConfig = serde_json::from_str(r#"{ "max_history": 200 }"#)?;
/// assert_eq!(parsed, config);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of undo steps. Zero disables history.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Number of parsed dotted paths to keep.
    ///
    /// The cache is emptied when it is full. Zero disables caching.
    #[serde(default = "default_path_cache_capacity")]
    pub path_cache_capacity: usize,
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

fn default_path_cache_capacity() -> usize {
    DEFAULT_PATH_CACHE_CAPACITY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            path_cache_capacity: DEFAULT_PATH_CACHE_CAPACITY,
        }
    }
}

/// Flags for a single update.
///
/// Undo and redo ignore these: they always notify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Do not record the previous tree for undo.
    ///
    /// Used for high-frequency transient state such as the playhead. A later
    /// undo returns to the tree before the last recorded edit, which also
    /// drops every unrecorded edit made since.
    #[serde(default)]
    pub skip_history: bool,

    /// Do not notify subscribers of this commit.
    #[serde(default)]
    pub skip_notify: bool,
}

impl UpdateOptions {
    /// Record history and notify: the same as `UpdateOptions::default()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Neither recorded nor notified.
    pub fn ephemeral() -> Self {
        Self {
            skip_history: true,
            skip_notify: true,
        }
    }

    /// Only `skip_history` set.
    pub fn skip_history() -> Self {
        Self {
            skip_history: true,
            skip_notify: false,
        }
    }

    /// Only `skip_notify` set.
    pub fn skip_notify() -> Self {
        Self {
            skip_history: false,
            skip_notify: true,
        }
    }
}
