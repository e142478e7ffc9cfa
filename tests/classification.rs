//! Integration tests for the critical/deferred classification table and
//! the sound pipeline through the standard handler set.

use std::sync::Arc;

use staged_assets::{
    classify, HandlerTable, Loader, MockAudio, MockFetcher, ResourceKind, ResourceManifest,
    ResourceValue, SoundSpec, StageConfig, TokioSpawner,
};

fn full_manifest() -> ResourceManifest {
    ResourceManifest::new()
        .texture("hex", "textures/hex.jpg")
        .texture("ship.feisar.diffuse", "textures/ship.jpg")
        .texture("ship.feisar.specular", "textures/ship_s.jpg")
        .texture("spark", "textures/spark.png")
        .texture("debug.grid", "textures/grid.png")
        .cubemap("skybox.dawnclouds", "textures/skybox/%1.jpg")
        .geometry("ship.feisar", "geometries/ship.glb")
        .geometry("track.cityscape", "geometries/track.glb")
        .geometry("bonus.base", "geometries/bonus.glb")
        .analysis_map("track.cityscape.collision", "textures/collision.png")
        .analysis_map("track.cityscape.height", "textures/height.png")
        .image("hud.bg", "textures/hud/bg.png")
        .sound("bg", SoundSpec::new("audio/bg.ogg", true, false))
        .sound("crash", SoundSpec::new("audio/crash.ogg", false, true))
}

#[test]
fn partitions_are_disjoint_and_subset_of_input() {
    let manifest = full_manifest();
    let (critical, deferred) = classify(&manifest);

    for (kind, name, _) in critical.iter() {
        assert!(manifest.contains(kind, name));
        assert!(!deferred.contains(kind, name), "{kind}/{name} in both");
    }
    for (kind, name, _) in deferred.iter() {
        assert!(manifest.contains(kind, name));
    }

    // debug.grid matches neither table, so the union is a strict subset.
    assert!(!critical.contains(ResourceKind::Texture, "debug.grid"));
    assert!(!deferred.contains(ResourceKind::Texture, "debug.grid"));
    assert_eq!(critical.len() + deferred.len(), manifest.len() - 1);
}

#[test]
fn bg_is_critical_and_crash_is_deferred() {
    // Placement comes from the static table, not from loop flags.
    let manifest = ResourceManifest::new()
        .sound("bg", SoundSpec::new("audio/bg.ogg", false, true))
        .sound("crash", SoundSpec::new("audio/crash.ogg", true, false));
    let (critical, deferred) = classify(&manifest);

    assert!(critical.contains(ResourceKind::Sound, "bg"));
    assert!(!critical.contains(ResourceKind::Sound, "crash"));
    assert!(deferred.contains(ResourceKind::Sound, "crash"));
    assert!(!deferred.contains(ResourceKind::Sound, "bg"));
}

#[tokio::test]
async fn sounds_flow_through_the_standard_table() {
    let audio = Arc::new(MockAudio::new());
    let table = HandlerTable::standard(Arc::new(MockFetcher::new()), audio.clone());
    let loader = Loader::new(table, TokioSpawner::new());

    let manifest = ResourceManifest::new()
        .sound("bg", SoundSpec::new("audio/bg.ogg", true, false))
        .sound("crash", SoundSpec::new("audio/crash.ogg", false, true));

    loader.load(&manifest, StageConfig::default()).await.unwrap();
    assert_eq!(loader.loaded(ResourceKind::Sound, "bg"), Some(true));

    // The stored value is a playback handle wired to the audio service.
    let value = loader.get(ResourceKind::Sound, "bg").unwrap();
    let ResourceValue::Sound(handle) = value.as_ref() else {
        panic!("expected a sound handle");
    };
    handle.play();

    let calls = audio.calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, staged_assets::handler::AudioCall::Play(name) if name == "bg")));
}
