//! Caller-facing event surface: completion, error, progress and staging
//! callbacks supplied at loader construction.

use std::sync::Arc;

use crate::manifest::ResourceKind;
use crate::progress::{Progress, StagedProgress};

/// Staging transition reported through `on_staging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingEvent {
    CriticalComplete,
    DeferredComplete,
}

impl StagingEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StagingEvent::CriticalComplete => "critical_complete",
            StagingEvent::DeferredComplete => "deferred_complete",
        }
    }
}

impl std::fmt::Display for StagingEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type LoadFn = dyn Fn() + Send + Sync;
pub type ErrorFn = dyn Fn(&str) + Send + Sync;
pub type ProgressFn = dyn Fn(Progress, ResourceKind, &str) + Send + Sync;
pub type StagingFn = dyn Fn(StagingEvent, StagedProgress) + Send + Sync;

/// The four callbacks, with log-based defaults for callers that only
/// care about some of them.
#[derive(Clone)]
pub(crate) struct Callbacks {
    pub on_load: Arc<LoadFn>,
    pub on_error: Arc<ErrorFn>,
    pub on_progress: Arc<ProgressFn>,
    pub on_staging: Arc<StagingFn>,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            on_load: Arc::new(|| log::debug!("all resources loaded")),
            on_error: Arc::new(|name| log::warn!("error while loading {name}")),
            on_progress: Arc::new(|_, _, _| {}),
            on_staging: Arc::new(|_, _| {}),
        }
    }
}
