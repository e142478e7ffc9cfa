//! Error types for the loading pipeline.
//!
//! Faults come in two families with deliberately different propagation:
//! a [`FetchError`] belongs to one resource and is swallowed at the batch
//! level (the batch keeps going), while a [`StageError`] means the stage
//! mechanism itself could not start and fails the whole `load()` call.

use crate::manifest::ResourceKind;
use thiserror::Error;

/// A fault in fetching or decoding a single resource.
///
/// An aborted load is a distinguishable variant of the same family: the
/// caller sees it through `on_error` like any other per-resource fault.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The loader was aborted before this load started.
    #[error("load aborted")]
    Aborted,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("geometry error: {0}")]
    Geometry(#[from] gltf::Error),

    #[error("audio error: {0}")]
    Audio(String),

    /// The locator shape does not match the handler's kind, e.g. a sound
    /// record handed to the texture handler.
    #[error("locator does not fit a {kind} resource")]
    LocatorMismatch { kind: ResourceKind },
}

impl FetchError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }
}

/// A structural fault: the batch or stage could not start at all.
#[derive(Error, Debug)]
pub enum StageError {
    /// The manifest names a kind with no registered handler.
    #[error("no handler registered for {0} resources")]
    NoHandler(ResourceKind),
}
