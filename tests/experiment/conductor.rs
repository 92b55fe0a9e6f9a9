use sequential_learning::prelude::*;

use super::{STRENGTH, concrete, strength_request};

#[test]
fn test_end_to_end_is_bit_reproducible() {
    let dataset = concrete();
    let request = strength_request();

    let first = ExperimentConductor::run(&dataset, &request).expect("run should succeed");
    let second = ExperimentConductor::run(&dataset, &request).expect("run should succeed");

    assert_eq!(first.len(), 3);
    let bits = |r: &ExperimentResult| -> Vec<(usize, u64, u64)> {
        r.rows()
            .iter()
            .map(|c| (c.row.index(), c.utility.to_bits(), c.novelty.to_bits()))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_pipeline_stages_match_conductor() {
    let dataset = concrete();
    let experiment = preprocess(&dataset, &strength_request()).unwrap();

    let output = fit_and_predict(&experiment).unwrap();
    let utility = compute_utility(&experiment, &output).unwrap();
    let novelty = compute_novelty(&experiment).unwrap();
    let by_hand = postprocess(&experiment, &output, utility, novelty).unwrap();

    let conducted = ExperimentConductor::conduct(&experiment).unwrap();
    assert_eq!(by_hand, conducted);
}

#[test]
fn test_result_rows_cover_unlabeled_rows() {
    let result = ExperimentConductor::run(&concrete(), &strength_request()).unwrap();

    let mut rows: Vec<RowId> = result.rows().iter().map(|c| c.row).collect();
    rows.sort_unstable();
    assert_eq!(rows, vec![RowId(2), RowId(3), RowId(4)]);

    for (i, candidate) in result.rows().iter().enumerate() {
        assert_eq!(candidate.rank, i + 1);
        assert_eq!(candidate.predictions.len(), 1);
        assert_eq!(candidate.uncertainties.len(), 1);
        assert!(candidate.uncertainties[0] >= 0.0);
        assert!(candidate.novelty > 0.0 && candidate.novelty <= 1.0);
    }
    let utilities: Vec<f64> = result.rows().iter().map(|c| c.utility).collect();
    assert!(utilities.windows(2).all(|w| w[0] >= w[1]), "{utilities:?}");
    assert_eq!(result.target_names(), [STRENGTH]);
}

#[test]
fn test_gaussian_process_run() {
    let request = ExperimentRequest::builder()
        .features(["water", "cement"])
        .target(STRENGTH, 1.0, "max", None)
        .model("Gaussian Process")
        .build();
    let result = ExperimentConductor::run(&concrete(), &request).unwrap();

    assert_eq!(result.len(), 3);
    for candidate in result.rows() {
        assert!(candidate.utility.is_finite());
        assert!(candidate.predictions[0].is_finite());
        assert!(candidate.uncertainties[0] >= 0.0);
    }
}

#[test]
fn test_apriori_values_shift_utility() {
    let dataset = concrete();
    let without = ExperimentConductor::run(&dataset, &strength_request()).unwrap();
    let with = ExperimentConductor::run(
        &dataset,
        &ExperimentRequest::builder()
            .features(["water", "cement"])
            .target(STRENGTH, 1.0, "max", None)
            .apriori("co2", -0.01)
            .build(),
    )
    .unwrap();

    for candidate in with.rows() {
        let base = without.row(candidate.row).unwrap();
        let co2 = candidate.apriori[0];
        let expected = base.utility - 0.01 * co2;
        assert!(
            (candidate.utility - expected).abs() < 1e-9,
            "row {}: {} vs {expected}",
            candidate.row,
            candidate.utility
        );
    }
    assert_eq!(with.apriori_names(), ["co2"]);
}

#[test]
fn test_curiosity_rewards_uncertainty() {
    let dataset = concrete();
    let run = |curiosity: f64| {
        let request = ExperimentRequest::builder()
            .features(["water", "cement"])
            .target(STRENGTH, 1.0, "max", None)
            .curiosity(curiosity)
            .build();
        ExperimentConductor::run(&dataset, &request).unwrap()
    };
    let greedy = run(0.0);
    let curious = run(2.0);

    // Labels 48 and 41: sample std sqrt(24.5).
    let std = 24.5_f64.sqrt();
    for candidate in curious.rows() {
        let base = greedy.row(candidate.row).unwrap();
        let expected = base.utility + 2.0 * candidate.uncertainties[0] / std;
        assert!((candidate.utility - expected).abs() < 1e-9);
    }
}

#[test]
fn test_explicit_partition() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "min", None)
        .partition([RowId(0), RowId(1)], [RowId(4)])
        .build();
    let result = ExperimentConductor::run(&concrete(), &request).unwrap();
    assert_eq!(result.len(), 1);
    let best = result.best().unwrap();
    assert_eq!(best.row, RowId(4));
    assert_eq!(best.novelty, 1.0);
}

#[test]
fn test_summary_mentions_best_row() {
    let result = ExperimentConductor::run(&concrete(), &strength_request()).unwrap();
    let best = result.best().unwrap().row;
    let summary = result.to_string();
    assert!(summary.contains("3 candidates"));
    assert!(summary.contains(&format!("row {best}")));
}

#[test]
fn test_csv_export() {
    let result = ExperimentConductor::run(&concrete(), &strength_request()).unwrap();
    let mut buf = Vec::new();
    result.to_csv(&mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("row,rank,Utility,Novelty,Target: strength,Uncertainty (Target: strength)")
    );
    let first: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(first.len(), 6);
    assert_eq!(first[0], result.best().unwrap().row.to_string());
    assert_eq!(first[1], "1");
}
