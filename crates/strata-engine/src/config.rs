//! Engine configuration.

use strata_core::storage::DEFAULT_MAX_CHUNK_SIZE;

/// Defaults applied to tables and scans created through a
/// [`StrataDB`](crate::StrataDB).
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum rows per chunk before tables roll over to a new chunk.
    pub max_chunk_size: u32,

    /// Advisory cap on the output positions a scan accumulates before it
    /// emits a result chunk.
    ///
    /// The default never splits: each scanned chunk produces at most one
    /// result chunk.
    pub target_pos_list_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            target_pos_list_size: u32::MAX as usize,
        }
    }
}

impl Config {
    /// Creates the default in-memory configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk roll-over threshold.
    #[must_use]
    pub fn with_max_chunk_size(mut self, max_chunk_size: u32) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    /// Sets the advisory scan output cap.
    #[must_use]
    pub fn with_target_pos_list_size(mut self, target: usize) -> Self {
        self.target_pos_list_size = target;
        self
    }
}
