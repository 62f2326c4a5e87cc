use marr_engine::hash::rdm_hash;
use marr_engine::SessionConfig;
use marr_sim::{run_session, write_rdm_csv, SimRunConfig, SimulatedParticipant};

fn base_config(seed: u64) -> SimRunConfig {
    let mut session = SessionConfig::new(5);
    // A short timeout bounds the trial count: each simulated trial costs at
    // least two seconds, so the session always terminates well under the cap.
    session.timeout_millis = 60_000;
    SimRunConfig {
        session,
        seed,
        noise: 0.05,
        max_trials: 64,
    }
}

#[test]
fn same_seed_reproduces_the_same_session() {
    let first = run_session(&base_config(17)).unwrap();
    let second = run_session(&base_config(17)).unwrap();

    assert_eq!(first.trials, second.trials);
    assert_eq!(
        rdm_hash(&first.result.rdm).unwrap(),
        rdm_hash(&second.result.rdm).unwrap()
    );
}

#[test]
fn different_seeds_draw_different_embeddings() {
    let a = SimulatedParticipant::new(6, 0.05, 1);
    let b = SimulatedParticipant::new(6, 0.05, 2);
    assert_ne!(a.ground_truth(), b.ground_truth());
}

#[test]
fn participants_place_exactly_the_requested_subset() {
    let participant = SimulatedParticipant::new(6, 0.05, 9);
    let placements = participant.arrange(&[1, 3, 4], 0);

    assert_eq!(placements.keys().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
    for coord in placements.values() {
        assert!(coord.x.abs() <= 0.5);
        assert!(coord.y.abs() <= 0.5);
    }
}

#[test]
fn simulated_sessions_write_readable_artefacts() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_session(&base_config(23)).unwrap();

    let rdm_path = dir.path().join("rdm.csv");
    write_rdm_csv(&outcome.result.rdm, &rdm_path).unwrap();

    let contents = std::fs::read_to_string(&rdm_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "item,item_0,item_1,item_2,item_3,item_4"
    );
    assert_eq!(lines.count(), 5);
}

#[test]
fn invalid_sim_configs_are_rejected() {
    let mut config = base_config(1);
    config.noise = -0.5;
    assert!(config.validate().is_err());

    let mut config = base_config(1);
    config.max_trials = 0;
    assert!(config.validate().is_err());
}
