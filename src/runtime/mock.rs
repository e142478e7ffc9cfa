//! Mock spawner for tests: run spawned work inline, or drop it.

use super::{AsyncSpawner, TaskHandle};
use std::future::Future;

/// What [`MockSpawner`] does with spawned tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSpawnBehavior {
    /// Drop tasks without running them. Useful to observe the state of
    /// the world before background work happens.
    Drop,
    /// Run tasks to completion inline with a simple executor.
    BlockSync,
}

/// Deterministic spawner for tests.
#[derive(Clone, Debug)]
pub struct MockSpawner {
    behavior: MockSpawnBehavior,
}

impl Default for MockSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSpawner {
    /// A spawner that drops tasks.
    pub fn new() -> Self {
        Self {
            behavior: MockSpawnBehavior::Drop,
        }
    }

    pub fn with_behavior(behavior: MockSpawnBehavior) -> Self {
        Self { behavior }
    }

    /// A spawner that runs tasks inline.
    pub fn blocking() -> Self {
        Self {
            behavior: MockSpawnBehavior::BlockSync,
        }
    }
}

impl AsyncSpawner for MockSpawner {
    fn spawn<F>(&self, task: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.behavior {
            MockSpawnBehavior::Drop => drop(task),
            MockSpawnBehavior::BlockSync => futures::executor::block_on(task),
        }
        TaskHandle::new(())
    }

    fn runtime_name(&self) -> &'static str {
        "Mock"
    }
}
