//! Sound registration and the playback handle stored for each sound.
//!
//! The loader does not decode audio itself; it registers each sound with
//! an [`AudioService`] and stores a [`SoundHandle`] that forwards
//! playback control to that service by name.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ResourceHandler, ResourceValue};
use crate::error::FetchError;
use crate::manifest::{Locator, ResourceKind, SoundSpec};

/// Audio registration and playback collaborator.
///
/// Uses async-trait for dyn compatibility.
#[async_trait]
pub trait AudioService: Send + Sync {
    /// Fetch and register a sound under `name`. Resolves once the sound
    /// is playable.
    async fn register(&self, name: &str, spec: &SoundSpec) -> Result<(), FetchError>;

    fn play(&self, name: &str);
    fn stop(&self, name: &str);
    fn set_volume(&self, name: &str, volume: f32);
}

/// Playback control for one registered sound.
#[derive(Clone)]
pub struct SoundHandle {
    name: String,
    service: Arc<dyn AudioService>,
}

impl SoundHandle {
    pub fn new(name: impl Into<String>, service: Arc<dyn AudioService>) -> Self {
        Self {
            name: name.into(),
            service,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn play(&self) {
        self.service.play(&self.name);
    }

    pub fn stop(&self) {
        self.service.stop(&self.name);
    }

    pub fn set_volume(&self, volume: f32) {
        self.service.set_volume(&self.name, volume);
    }
}

impl std::fmt::Debug for SoundHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Handler for [`ResourceKind::Sound`] resources.
pub struct SoundHandler {
    audio: Arc<dyn AudioService>,
}

impl SoundHandler {
    pub fn new(audio: Arc<dyn AudioService>) -> Self {
        Self { audio }
    }
}

#[async_trait]
impl ResourceHandler for SoundHandler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Sound
    }

    async fn fetch(&self, name: &str, locator: &Locator) -> Result<ResourceValue, FetchError> {
        let Locator::Sound(spec) = locator else {
            return Err(FetchError::LocatorMismatch { kind: self.kind() });
        };
        self.audio.register(name, spec).await?;
        Ok(ResourceValue::Sound(SoundHandle::new(
            name,
            self.audio.clone(),
        )))
    }
}

/// What a [`MockAudio`] was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Register(String, SoundSpec),
    Play(String),
    Stop(String),
    Volume(String, f32),
}

/// Recording audio service for tests; registration can be scripted to
/// fail per name.
#[derive(Default)]
pub struct MockAudio {
    calls: parking_lot::Mutex<Vec<AudioCall>>,
    failing: parking_lot::Mutex<std::collections::HashSet<String>>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `register` fail for `name`.
    pub fn fail_registration(&self, name: impl Into<String>) {
        self.failing.lock().insert(name.into());
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AudioService for MockAudio {
    async fn register(&self, name: &str, spec: &SoundSpec) -> Result<(), FetchError> {
        if self.failing.lock().contains(name) {
            return Err(FetchError::Audio(format!("registration failed for {name}")));
        }
        self.calls
            .lock()
            .push(AudioCall::Register(name.into(), spec.clone()));
        Ok(())
    }

    fn play(&self, name: &str) {
        self.calls.lock().push(AudioCall::Play(name.into()));
    }

    fn stop(&self, name: &str) {
        self.calls.lock().push(AudioCall::Stop(name.into()));
    }

    fn set_volume(&self, name: &str, volume: f32) {
        self.calls.lock().push(AudioCall::Volume(name.into(), volume));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_registers_and_returns_handle() {
        let audio = Arc::new(MockAudio::new());
        let handler = SoundHandler::new(audio.clone());
        let spec = SoundSpec::new("audio/bg.ogg", true, false);

        let value =
            futures::executor::block_on(handler.fetch("bg", &Locator::Sound(spec.clone())))
                .unwrap();

        let handle = value.as_sound().unwrap();
        assert_eq!(handle.name(), "bg");
        assert_eq!(audio.calls(), vec![AudioCall::Register("bg".into(), spec)]);
    }

    #[test]
    fn handle_forwards_playback_calls() {
        let audio = Arc::new(MockAudio::new());
        let handle = SoundHandle::new("crash", audio.clone());

        handle.play();
        handle.set_volume(0.5);
        handle.stop();

        assert_eq!(
            audio.calls(),
            vec![
                AudioCall::Play("crash".into()),
                AudioCall::Volume("crash".into(), 0.5),
                AudioCall::Stop("crash".into()),
            ]
        );
    }

    #[test]
    fn scripted_registration_failure() {
        let audio = Arc::new(MockAudio::new());
        audio.fail_registration("wind");

        let handler = SoundHandler::new(audio);
        let result = futures::executor::block_on(handler.fetch(
            "wind",
            &Locator::Sound(SoundSpec::new("audio/wind.ogg", true, true)),
        ));
        assert!(matches!(result, Err(FetchError::Audio(_))));
    }

    #[test]
    fn handler_rejects_url_locator() {
        let handler = SoundHandler::new(Arc::new(MockAudio::new()));
        let err = futures::executor::block_on(handler.fetch("bg", &Locator::url("bg.ogg")))
            .unwrap_err();
        assert!(matches!(err, FetchError::LocatorMismatch { .. }));
    }
}
