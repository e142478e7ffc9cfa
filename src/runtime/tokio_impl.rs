//! Tokio-backed spawner.

use super::{AsyncSpawner, TaskHandle};
use std::future::Future;

/// Spawns background work on the ambient Tokio runtime.
///
/// Must be used from within a Tokio runtime context.
#[derive(Clone, Debug, Default, Copy)]
pub struct TokioSpawner;

impl TokioSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl AsyncSpawner for TokioSpawner {
    fn spawn<F>(&self, task: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        TaskHandle::new(tokio::spawn(task))
    }

    fn runtime_name(&self) -> &'static str {
        "Tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn spawns_on_tokio() {
        let spawner = TokioSpawner::new();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        let handle = spawner.spawn(async move {
            ran_clone.store(true, Ordering::SeqCst);
        });

        let join = handle
            .downcast::<tokio::task::JoinHandle<()>>()
            .expect("tokio handle");
        join.await.unwrap();

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn runtime_name() {
        assert_eq!(TokioSpawner::new().runtime_name(), "Tokio");
    }
}
