//! Per-call search limits: `SearchLimits` bundles a timeout, a node
//! budget, and the requested max ply for a single `search_async` call.
//!
//! A wall-clock-plus-node-cap model with no increments, move-to-go,
//! pondering, or XBoard time controls.

/// Bundles the two per-state budget fields (`timeout`, `max_fin_cnt`) with
/// the requested maximum ply for a single `search_async` call.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    pub max_ply: i32,
    pub timeout_secs: f64,
    pub max_fin_cnt: u64,
}

impl SearchLimits {
    #[must_use]
    pub fn new(max_ply: i32) -> Self {
        SearchLimits {
            max_ply,
            timeout_secs: 5.0,
            max_fin_cnt: 20_000,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub fn with_max_fin_cnt(mut self, max_fin_cnt: u64) -> Self {
        self.max_fin_cnt = max_fin_cnt;
        self
    }
}
