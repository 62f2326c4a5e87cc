use std::collections::BTreeMap;
use std::path::PathBuf;

use marr_core::{PairMatrix, SchemaVersion, SessionProvenance};
use marr_engine::hash::{rdm_hash, round_f64, stable_hash_string};
use marr_engine::{SessionConfig, SessionManifest};

fn sample_rdm() -> PairMatrix {
    let mut rdm = PairMatrix::new(3);
    rdm.set(0, 1, 0.75).unwrap();
    rdm.set(1, 2, 1.25).unwrap();
    rdm
}

#[test]
fn manifests_round_trip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artefacts").join("manifest.json");

    let manifest = SessionManifest {
        schema_version: SchemaVersion::default(),
        provenance: SessionProvenance {
            config_hash: "abc123".to_string(),
            seed: Some(17),
            created_at: "2026-08-07T00:00:00Z".to_string(),
            tool_versions: BTreeMap::from([("marr-sim".to_string(), "0.1.0".to_string())]),
        },
        config: SessionConfig::new(3),
        trial_count: 4,
        rdm_hash: rdm_hash(&sample_rdm()).unwrap(),
        metrics_file: Some(PathBuf::from("metrics.csv")),
    };

    manifest.write(&path).unwrap();
    let restored = SessionManifest::load(&path).unwrap();

    assert_eq!(restored.trial_count, 4);
    assert_eq!(restored.rdm_hash, manifest.rdm_hash);
    assert_eq!(restored.config.item_count, 3);
    assert_eq!(restored.provenance.seed, Some(17));
}

#[test]
fn rdm_hashes_are_stable_against_last_bit_noise() {
    let mut wobbly = PairMatrix::new(3);
    wobbly.set(0, 1, 0.75 + 1e-13).unwrap();
    wobbly.set(1, 2, 1.25 - 1e-13).unwrap();

    assert_eq!(
        rdm_hash(&sample_rdm()).unwrap(),
        rdm_hash(&wobbly).unwrap()
    );
    assert_eq!(round_f64(0.123_456_789_4), 0.123_456_789);
}

#[test]
fn distinct_payloads_hash_differently() {
    let a = stable_hash_string(&("session", 1)).unwrap();
    let b = stable_hash_string(&("session", 2)).unwrap();
    assert_ne!(a, b);
    assert_eq!(a.len(), 64);
}
