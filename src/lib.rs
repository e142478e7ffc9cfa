//! staged_assets - staged, cancellable resource loading for interactive
//! applications
//!
//! # Features
//! - Critical/deferred staging: become interactive before everything
//!   has loaded
//! - Concurrent per-resource fan-out with settle-all batches
//! - Progress, error and staging callbacks
//! - Cooperative abort
//! - Async runtime abstraction (Tokio or custom spawners)
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use staged_assets::{FsFetcher, HandlerTable, Loader, ResourceManifest, StageConfig, TokioSpawner};
//!
//! let table = HandlerTable::standard(Arc::new(FsFetcher::new("assets")), audio);
//! let loader = Loader::builder(table, TokioSpawner::new())
//!     .on_progress(|p, kind, name| println!("{}/{} {kind}/{name}", p.loaded, p.total))
//!     .build();
//!
//! let manifest = ResourceManifest::new()
//!     .texture("hex", "textures/hex.jpg")
//!     .geometry("ship.feisar", "geometries/ship.glb");
//!
//! // Resolves once first-frame-blocking resources are in; the rest
//! // keeps loading in the background.
//! loader.load(&manifest, StageConfig::default()).await?;
//! ```
//!
//! # Feature Flags
//!
//! - `runtime-tokio` (default): Tokio spawner and filesystem byte source

pub mod classify;
pub mod handler;
pub mod loader;
pub mod manifest;
pub mod progress;
pub mod runtime;

mod error;
pub use error::{FetchError, StageError};

pub use classify::classify;
pub use handler::{
    AnalysisMap, AudioService, ByteFetcher, CubemapAsset, GeometryAsset, HandlerTable, ImageAsset,
    MockAudio, MockFetcher, ResourceHandler, ResourceValue, SoundHandle, TextureAsset,
    TextureFormat,
};
pub use loader::{Loader, LoaderBuilder, StageConfig, StagingEvent, CRITICAL_LOAD_SENTINEL};
pub use manifest::{
    expand_cube_faces, Locator, ResourceKind, ResourceManifest, SoundSpec, CUBE_FACES,
};
pub use progress::{Progress, StagedProgress};
pub use runtime::{AsyncSpawner, MockSpawner, TaskHandle};

#[cfg(feature = "runtime-tokio")]
pub use handler::FsFetcher;
#[cfg(feature = "runtime-tokio")]
pub use runtime::TokioSpawner;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
