//! Partition of a manifest into critical and deferred stages.
//!
//! The partition is a static configuration table, not derived logic:
//! each kind carries an allow-list of names that block the first frame
//! and a separate allow-list that loads in the background. A name
//! matching neither list is omitted from both outputs and never loaded.

use crate::manifest::{ResourceKind, ResourceManifest};

/// Names that must be loaded before the application becomes interactive:
/// base diffuse maps, playable ship and track geometry, the collision and
/// elevation maps, HUD imagery, and the background music.
const CRITICAL: &[(ResourceKind, &[&str])] = &[
    (
        ResourceKind::Texture,
        &[
            "hex",
            "ship.feisar.diffuse",
            "booster.diffuse",
            "booster.sprite",
            "track.cityscape.diffuse",
            "track.cityscape.scrapers1.diffuse",
            "track.cityscape.scrapers2.diffuse",
            "track.cityscape.start.diffuse",
            "track.cityscape.start.banner",
        ],
    ),
    (
        ResourceKind::Geometry,
        &[
            "ship.feisar",
            "booster",
            "track.cityscape",
            "track.cityscape.scrapers1",
            "track.cityscape.scrapers2",
            "track.cityscape.start",
            "track.cityscape.start.banner",
        ],
    ),
    (
        ResourceKind::AnalysisMap,
        &["track.cityscape.collision", "track.cityscape.height"],
    ),
    (ResourceKind::Image, &["hud.bg", "hud.speed", "hud.shield"]),
    (ResourceKind::Sound, &["bg"]),
];

/// Names that load in the background after critical readiness: detail
/// maps, the skybox, bonus geometry, and sound effects.
const DEFERRED: &[(ResourceKind, &[&str])] = &[
    (
        ResourceKind::Texture,
        &[
            "spark",
            "cloud",
            "ship.feisar.specular",
            "ship.feisar.normal",
            "track.cityscape.specular",
            "track.cityscape.normal",
            "track.cityscape.scrapers1.specular",
            "track.cityscape.scrapers1.normal",
            "track.cityscape.scrapers2.specular",
            "track.cityscape.scrapers2.normal",
            "track.cityscape.start.specular",
            "track.cityscape.start.normal",
            "bonus.base.diffuse",
            "bonus.base.normal",
            "bonus.base.specular",
        ],
    ),
    (ResourceKind::Cubemap, &["skybox.dawnclouds"]),
    (
        ResourceKind::Geometry,
        &["bonus.base", "track.cityscape.bonus.speed"],
    ),
    (ResourceKind::Sound, &["crash", "destroyed", "boost", "wind"]),
];

fn extract(manifest: &ResourceManifest, table: &[(ResourceKind, &[&str])]) -> ResourceManifest {
    let mut out = ResourceManifest::new();
    for (kind, names) in table {
        for name in *names {
            if let Some(locator) = manifest.get(*kind, name) {
                out.insert(*kind, *name, locator.clone());
            }
        }
    }
    out
}

/// Split a manifest into its critical and deferred sub-manifests.
///
/// Pure and infallible. The two outputs are disjoint and their union is a
/// subset of the input; entries absent from both tables are dropped.
pub fn classify(manifest: &ResourceManifest) -> (ResourceManifest, ResourceManifest) {
    (extract(manifest, CRITICAL), extract(manifest, DEFERRED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::SoundSpec;

    fn sample_manifest() -> ResourceManifest {
        ResourceManifest::new()
            .texture("hex", "textures/hex.jpg")
            .texture("ship.feisar.diffuse", "textures/ship.jpg")
            .texture("spark", "textures/spark.png")
            .cubemap("skybox.dawnclouds", "textures/skybox/%1.jpg")
            .geometry("ship.feisar", "geometries/ship.glb")
            .geometry("bonus.base", "geometries/bonus.glb")
            .analysis_map("track.cityscape.collision", "textures/collision.png")
            .image("hud.bg", "textures/hud/bg.png")
            .sound("bg", SoundSpec::new("audio/bg.ogg", true, false))
            .sound("crash", SoundSpec::new("audio/crash.ogg", false, true))
    }

    #[test]
    fn partitions_are_disjoint() {
        let manifest = sample_manifest();
        let (critical, deferred) = classify(&manifest);

        for (kind, name, _) in critical.iter() {
            assert!(!deferred.contains(kind, name), "{kind}/{name} in both stages");
        }
    }

    #[test]
    fn union_is_subset_of_input() {
        let manifest = sample_manifest();
        let (critical, deferred) = classify(&manifest);

        for (kind, name, _) in critical.iter().chain(deferred.iter()) {
            assert!(manifest.contains(kind, name));
        }
    }

    #[test]
    fn known_names_land_in_their_stage() {
        let (critical, deferred) = classify(&sample_manifest());

        assert!(critical.contains(ResourceKind::Texture, "hex"));
        assert!(critical.contains(ResourceKind::Geometry, "ship.feisar"));
        assert!(critical.contains(ResourceKind::AnalysisMap, "track.cityscape.collision"));
        assert!(critical.contains(ResourceKind::Image, "hud.bg"));
        assert!(critical.contains(ResourceKind::Sound, "bg"));

        assert!(deferred.contains(ResourceKind::Texture, "spark"));
        assert!(deferred.contains(ResourceKind::Cubemap, "skybox.dawnclouds"));
        assert!(deferred.contains(ResourceKind::Geometry, "bonus.base"));
        assert!(deferred.contains(ResourceKind::Sound, "crash"));
    }

    #[test]
    fn sound_staging_ignores_loop_flag() {
        // bg is critical because of its name, not because it loops.
        let manifest = ResourceManifest::new()
            .sound("bg", SoundSpec::new("audio/bg.ogg", false, false))
            .sound("crash", SoundSpec::new("audio/crash.ogg", true, true));
        let (critical, deferred) = classify(&manifest);

        assert!(critical.contains(ResourceKind::Sound, "bg"));
        assert!(deferred.contains(ResourceKind::Sound, "crash"));
    }

    #[test]
    fn unlisted_names_are_dropped() {
        let manifest = ResourceManifest::new().texture("debug.grid", "textures/grid.png");
        let (critical, deferred) = classify(&manifest);

        assert!(critical.is_empty());
        assert!(deferred.is_empty());
    }

    #[test]
    fn missing_kinds_are_skipped() {
        let manifest = ResourceManifest::new().texture("hex", "textures/hex.jpg");
        let (critical, deferred) = classify(&manifest);

        assert_eq!(critical.len(), 1);
        assert!(deferred.is_empty());
    }
}
