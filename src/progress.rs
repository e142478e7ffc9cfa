//! Progress counters for the overall load and both stages.

/// Snapshot of one counter: `total == remaining + loaded` at all times,
/// and `finished` flips once `loaded == total` for a settled stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub remaining: usize,
    pub loaded: usize,
    pub finished: bool,
}

impl Progress {
    /// Account for newly requested resources.
    pub(crate) fn add_requested(&mut self, count: usize) {
        self.total += count;
        self.remaining += count;
        self.finished = false;
    }

    /// Reset to a fresh counter of `total` requested resources.
    pub(crate) fn reset(&mut self, total: usize) {
        *self = Progress {
            total,
            remaining: total,
            loaded: 0,
            finished: false,
        };
    }

    /// Account for one successful load.
    pub(crate) fn mark_loaded(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        self.loaded += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.loaded == self.total
    }
}

/// Snapshot of both stage counters, handed to the staging callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StagedProgress {
    pub critical: Progress,
    pub deferred: Progress,
}
