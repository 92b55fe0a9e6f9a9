use sequential_learning::prelude::*;

use super::{concrete, strength_request};

#[test]
fn test_result_json_round_trip() {
    let result = ExperimentConductor::run(&concrete(), &strength_request()).unwrap();

    let json = result.to_json().unwrap();
    assert!(json.contains("\"utility\""));
    assert!(json.contains("\"Target: strength\""));

    let dir = std::env::temp_dir().join(format!("sl-result-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("result.json");
    result.save(&path).unwrap();
    let loaded = ExperimentResult::load(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(loaded.len(), result.len());
    assert_eq!(loaded.target_names(), result.target_names());
    for (a, b) in loaded.rows().iter().zip(result.rows()) {
        assert_eq!(a.row, b.row);
        assert_eq!(a.rank, b.rank);
        assert!((a.utility - b.utility).abs() < 1e-12);
        assert!((a.novelty - b.novelty).abs() < 1e-12);
    }
    assert_eq!(loaded.normalized_features().n_columns(), 0);
}

#[test]
fn test_nan_novelty_survives_save_and_load() {
    // Every candidate repeats a labeled row, so novelty is 0/0.
    let dataset = Dataset::new("coincident")
        .with_column("x", [0.0, 10.0, 0.0, 10.0])
        .unwrap()
        .with_column("Target: y", [Some(1.0), Some(2.0), None, None])
        .unwrap();
    let request = ExperimentRequest::builder()
        .features(["x"])
        .target("Target: y", 1.0, "max", None)
        .build();
    let result = ExperimentConductor::run(&dataset, &request).unwrap();
    assert!(result.rows().iter().all(|c| c.novelty.is_nan()));

    let dir = std::env::temp_dir().join(format!("sl-nan-novelty-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("result.json");
    result.save(&path).unwrap();
    let loaded = ExperimentResult::load(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(loaded.len(), result.len());
    for (a, b) in loaded.rows().iter().zip(result.rows()) {
        assert_eq!(a.row, b.row);
        assert!(a.novelty.is_nan());
        assert!((a.utility - b.utility).abs() < 1e-12);
    }
}

#[test]
fn test_model_configs_serialize() {
    let config = RandomForestConfig {
        n_trees: 12,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: RandomForestConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);

    let json = serde_json::to_string(&ModelKind::GaussianProcess).unwrap();
    assert_eq!(json, "\"GaussianProcess\"");
}
