//! The staged loading pipeline: state tracking, batch fan-out, stage
//! orchestration and cooperative abort.
//!
//! One [`Loader`] instance owns its load states, resource store and
//! progress counters for its whole lifetime; all bookkeeping is
//! serialized behind a single mutex, so completions observed from
//! background tasks cannot race. `load()` settles when the critical
//! stage settles; the deferred stage continues in the background.

mod callbacks;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::classify::classify;
use crate::error::{FetchError, StageError};
use crate::handler::{HandlerTable, ResourceValue};
use crate::manifest::{Locator, ResourceKind, ResourceManifest};
use crate::progress::{Progress, StagedProgress};
use crate::runtime::AsyncSpawner;

pub use callbacks::StagingEvent;
use callbacks::Callbacks;

/// Sentinel name passed to `on_error` when the critical stage itself
/// fails to start, as opposed to an individual resource failing.
pub const CRITICAL_LOAD_SENTINEL: &str = "critical_load";

/// Staging policy for one `load()` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    /// Run the critical stage. When false it is vacuously complete.
    pub critical: bool,
    /// Run the deferred stage.
    pub deferred: bool,
    /// Run the deferred stage concurrently with the critical stage
    /// instead of after it.
    pub parallel_deferred: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            critical: true,
            deferred: true,
            parallel_deferred: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Critical,
    Deferred,
}

/// Per-loader bookkeeping, all behind one mutex.
#[derive(Default)]
struct Tracker {
    /// (kind, name) -> loaded-successfully. An entry exists from the
    /// moment a load is requested; failed loads stay `false` forever.
    states: HashMap<ResourceKind, HashMap<String, bool>>,
    /// Resolved values, absent until loaded.
    store: HashMap<ResourceKind, HashMap<String, Arc<ResourceValue>>>,
    overall: Progress,
    critical: Progress,
    deferred: Progress,
    /// Latch so `on_load` fires at most once per `load()` invocation.
    load_fired: bool,
}

struct Shared {
    handlers: HandlerTable,
    callbacks: Callbacks,
    tracker: Mutex<Tracker>,
    aborted: AtomicBool,
}

/// Staged, cancellable resource loader.
///
/// Construct with [`Loader::new`] or [`Loader::builder`], then call
/// [`Loader::load`]. The returned future settles once the critical stage
/// settles; deferred resources keep loading in the background and are
/// observable through the progress and staging callbacks.
pub struct Loader<S: AsyncSpawner> {
    shared: Arc<Shared>,
    spawner: S,
}

impl<S: AsyncSpawner> Clone for Loader<S> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            spawner: self.spawner.clone(),
        }
    }
}

/// Builder attaching callbacks to a [`Loader`].
pub struct LoaderBuilder<S: AsyncSpawner> {
    handlers: HandlerTable,
    spawner: S,
    callbacks: Callbacks,
}

impl<S: AsyncSpawner> LoaderBuilder<S> {
    /// Fires once per `load()` invocation when every requested resource
    /// has loaded.
    pub fn on_load(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_load = Arc::new(f);
        self
    }

    /// Fires once per failed resource with its name, and once with
    /// [`CRITICAL_LOAD_SENTINEL`] if the critical stage cannot start.
    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.callbacks.on_error = Arc::new(f);
        self
    }

    /// Fires per successful resource with the aggregate counter snapshot.
    pub fn on_progress(
        mut self,
        f: impl Fn(Progress, ResourceKind, &str) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_progress = Arc::new(f);
        self
    }

    /// Fires on staging transitions with both stage counters.
    pub fn on_staging(
        mut self,
        f: impl Fn(StagingEvent, StagedProgress) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_staging = Arc::new(f);
        self
    }

    pub fn build(self) -> Loader<S> {
        Loader {
            shared: Arc::new(Shared {
                handlers: self.handlers,
                callbacks: self.callbacks,
                tracker: Mutex::new(Tracker::default()),
                aborted: AtomicBool::new(false),
            }),
            spawner: self.spawner,
        }
    }
}

impl<S: AsyncSpawner> Loader<S> {
    /// A loader with default (log-based) callbacks.
    pub fn new(handlers: HandlerTable, spawner: S) -> Self {
        Self::builder(handlers, spawner).build()
    }

    pub fn builder(handlers: HandlerTable, spawner: S) -> LoaderBuilder<S> {
        LoaderBuilder {
            handlers,
            spawner,
            callbacks: Callbacks::default(),
        }
    }

    /// Load a manifest under the given staging policy.
    ///
    /// Classifies the manifest, runs the critical batch, and schedules
    /// the deferred batch per `config`. Resolves once the critical stage
    /// has settled: individual resource failures are reported through
    /// `on_error` and do not fail the call. Only a structural fault in
    /// starting the critical stage returns an error, after firing
    /// `on_error(CRITICAL_LOAD_SENTINEL)`.
    pub async fn load(
        &self,
        manifest: &ResourceManifest,
        config: StageConfig,
    ) -> Result<(), StageError> {
        let (critical, deferred) = classify(manifest);

        {
            let mut t = self.shared.tracker.lock();
            // Overall counters accumulate across invocations; staged
            // counters describe only the current one.
            t.overall.add_requested(critical.len() + deferred.len());
            t.critical.reset(critical.len());
            t.deferred.reset(deferred.len());
            t.load_fired = false;
        }

        let run_deferred = config.deferred;
        if run_deferred && config.parallel_deferred {
            self.spawn_deferred(deferred.clone());
        }

        if config.critical {
            if let Err(err) = self.shared.check_handlers(&critical) {
                log::error!("critical stage could not start: {err}");
                (self.shared.callbacks.on_error)(CRITICAL_LOAD_SENTINEL);
                return Err(err);
            }
            self.shared.run_batch(&critical, Stage::Critical).await;
            self.shared.finish_stage(Stage::Critical);
        }

        if run_deferred && !config.parallel_deferred {
            self.spawn_deferred(deferred);
        }

        self.shared.maybe_fire_load();
        Ok(())
    }

    fn spawn_deferred(&self, manifest: ResourceManifest) {
        let shared = self.shared.clone();
        self.spawner.spawn(async move {
            if let Err(err) = shared.check_handlers(&manifest) {
                log::warn!("deferred stage could not start: {err}");
                return;
            }
            shared.run_batch(&manifest, Stage::Deferred).await;
            shared.finish_stage(Stage::Deferred);
            shared.maybe_fire_load();
        });
    }

    /// The resolved value for a loaded resource. `None` while pending or
    /// after a failed load; an unrequested name logs a warning.
    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<Arc<ResourceValue>> {
        let t = self.shared.tracker.lock();
        let requested = t
            .states
            .get(&kind)
            .is_some_and(|m| m.contains_key(name));
        let value = t.store.get(&kind).and_then(|m| m.get(name)).cloned();
        drop(t);

        if !requested {
            log::warn!("unknown resource {kind}/{name}");
        }
        value
    }

    /// Whether a resource has loaded. `None` if the name was never
    /// requested.
    pub fn loaded(&self, kind: ResourceKind, name: &str) -> Option<bool> {
        let state = self
            .shared
            .tracker
            .lock()
            .states
            .get(&kind)
            .and_then(|m| m.get(name))
            .copied();
        if state.is_none() {
            log::warn!("unknown resource {kind}/{name}");
        }
        state
    }

    /// Aggregate progress across all stages and invocations.
    pub fn progress(&self) -> Progress {
        self.shared.tracker.lock().overall
    }

    pub fn critical_progress(&self) -> Progress {
        self.shared.tracker.lock().critical
    }

    pub fn deferred_progress(&self) -> Progress {
        self.shared.tracker.lock().deferred
    }

    /// Abort the loader. Idempotent and one-way: resource loads that have
    /// not started yet fail with an aborted fault, in-flight ones run to
    /// completion.
    pub fn abort(&self) {
        if !self.shared.aborted.swap(true, Ordering::SeqCst) {
            log::info!("asset loader aborted");
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::SeqCst)
    }
}

impl Shared {
    /// Structural precondition: every kind in the manifest has a handler.
    fn check_handlers(&self, manifest: &ResourceManifest) -> Result<(), StageError> {
        for kind in manifest.kinds() {
            if !self.handlers.contains(kind) {
                return Err(StageError::NoHandler(kind));
            }
        }
        Ok(())
    }

    /// Fan out every resource in the sub-manifest and wait for all of
    /// them to settle. Never fails; individual faults are reported and
    /// swallowed.
    async fn run_batch(&self, manifest: &ResourceManifest, stage: Stage) {
        let loads = manifest
            .iter()
            .map(|(kind, name, locator)| self.load_one(kind, name, locator, stage));
        join_all(loads).await;
    }

    async fn load_one(&self, kind: ResourceKind, name: &str, locator: &Locator, stage: Stage) {
        self.tracker
            .lock()
            .states
            .entry(kind)
            .or_default()
            .insert(name.to_string(), false);

        // Cooperative cancellation: checked before the handler starts,
        // never mid-flight.
        let result = if self.aborted.load(Ordering::SeqCst) {
            Err(FetchError::Aborted)
        } else if let Some(handler) = self.handlers.get(kind) {
            handler.fetch(name, locator).await
        } else {
            // check_handlers runs before every batch, so this is a
            // registration bug rather than a live path.
            log::error!("no handler registered for {kind}");
            (self.callbacks.on_error)(name);
            return;
        };

        match result {
            Ok(value) => self.complete_one(kind, name, value, stage),
            Err(err) => {
                if err.is_aborted() {
                    log::debug!("skipped {kind}/{name}: loader aborted");
                } else {
                    log::warn!("failed to load {kind}/{name}: {err}");
                }
                (self.callbacks.on_error)(name);
            }
        }
    }

    fn complete_one(&self, kind: ResourceKind, name: &str, value: ResourceValue, stage: Stage) {
        let snapshot = {
            let mut t = self.tracker.lock();
            t.store
                .entry(kind)
                .or_default()
                .insert(name.to_string(), Arc::new(value));
            t.states
                .entry(kind)
                .or_default()
                .insert(name.to_string(), true);
            t.overall.mark_loaded();
            match stage {
                Stage::Critical => t.critical.mark_loaded(),
                Stage::Deferred => t.deferred.mark_loaded(),
            }
            t.overall
        };
        (self.callbacks.on_progress)(snapshot, kind, name);
        self.maybe_fire_load();
    }

    /// Mark a stage settled and emit its staging event.
    fn finish_stage(&self, stage: Stage) {
        let (event, staged) = {
            let mut t = self.tracker.lock();
            let event = match stage {
                Stage::Critical => {
                    t.critical.finished = true;
                    StagingEvent::CriticalComplete
                }
                Stage::Deferred => {
                    t.deferred.finished = true;
                    StagingEvent::DeferredComplete
                }
            };
            (
                event,
                StagedProgress {
                    critical: t.critical,
                    deferred: t.deferred,
                },
            )
        };
        (self.callbacks.on_staging)(event, staged);
    }

    /// Fire `on_load` once the aggregate counter is complete. Runs after
    /// every successful load, not only at batch boundaries.
    fn maybe_fire_load(&self) {
        let fire = {
            let mut t = self.tracker.lock();
            if t.overall.is_complete() {
                t.overall.finished = true;
                if !t.load_fired {
                    t.load_fired = true;
                    true
                } else {
                    false
                }
            } else {
                false
            }
        };
        if fire {
            (self.callbacks.on_load)();
        }
    }
}
