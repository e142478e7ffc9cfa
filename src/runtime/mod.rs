//! Async runtime abstraction.
//!
//! The loader needs one runtime capability: spawning the deferred stage
//! as a background task. This trait keeps the crate runtime-agnostic;
//! tests use [`MockSpawner`], applications typically use [`TokioSpawner`].

pub mod mock;
#[cfg(feature = "runtime-tokio")]
pub mod tokio_impl;

use std::fmt::Debug;
use std::future::Future;

/// Opaque handle to a spawned background task.
///
/// Type-erased so spawners can wrap their native join handles.
#[derive(Debug)]
pub struct TaskHandle {
    inner: Box<dyn std::any::Any + Send>,
}

impl TaskHandle {
    pub fn new<T: Send + 'static>(handle: T) -> Self {
        Self {
            inner: Box::new(handle),
        }
    }

    /// Recover the spawner-native handle, if the type matches.
    pub fn downcast<T: 'static>(self) -> Option<T> {
        self.inner.downcast::<T>().ok().map(|b| *b)
    }
}

/// Fire-and-forget task spawner.
///
/// The loader observes completion of spawned work through its own
/// callbacks, not through the returned handle.
pub trait AsyncSpawner: Send + Sync + Clone + Debug + 'static {
    /// Spawn a background task.
    fn spawn<F>(&self, task: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static;

    /// Runtime name, for diagnostics.
    fn runtime_name(&self) -> &'static str;
}

pub use mock::MockSpawner;

#[cfg(feature = "runtime-tokio")]
pub use tokio_impl::TokioSpawner;
