use sequential_learning::prelude::*;
use sequential_learning::utility::{apriori_contribution, clip_prediction, label_stats};

fn experiment(targets: &[(&str, &str, Option<f64>)], labels: [[f64; 2]; 2]) -> Experiment {
    let mut dataset = Dataset::new("clip")
        .with_column("x", [0.0, 1.0, 2.0, 3.0, 4.0])
        .unwrap();
    for (i, (name, ..)) in targets.iter().enumerate() {
        let [a, b] = labels[i];
        dataset
            .push_column(
                *name,
                vec![a.into(), b.into(), Value::Missing, Value::Missing, Value::Missing],
            )
            .unwrap();
    }
    let mut builder = ExperimentRequest::builder().features(["x"]).curiosity(0.5);
    for &(name, direction, threshold) in targets {
        builder = builder.target(name, 2.0, direction, threshold);
    }
    preprocess(&dataset, &builder.build()).unwrap()
}

fn output(exp: &Experiment, columns: &[(&str, [f64; 3], [f64; 3])]) -> ModelOutput {
    let index = exp.nolabel_index().to_vec();
    let mean = columns
        .iter()
        .map(|(n, m, _)| ((*n).to_string(), m.to_vec()))
        .collect();
    let std = columns
        .iter()
        .map(|(n, _, s)| ((*n).to_string(), s.to_vec()))
        .collect();
    ModelOutput::new(
        Table::from_columns(index.clone(), mean).unwrap(),
        Table::from_columns(index, std).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_clipping_per_direction() {
    let exp = experiment(
        &[("a", "min", Some(5.0)), ("b", "max", Some(5.0))],
        [[1.0, 2.0], [3.0, 4.0]],
    );
    let out = output(
        &exp,
        &[("a", [1.0, 5.0, 9.0], [0.0; 3]), ("b", [1.0, 5.0, 9.0], [0.0; 3])],
    );
    let clipped = clip_prediction(&exp, out.prediction()).unwrap();
    assert_eq!(clipped.column("a").unwrap(), &[5.0, 5.0, 9.0]);
    assert_eq!(clipped.column("b").unwrap(), &[1.0, 5.0, 5.0]);
}

#[test]
fn test_no_threshold_is_identity() {
    let exp = experiment(&[("a", "min", None)], [[1.0, 2.0], [0.0, 0.0]]);
    let out = output(&exp, &[("a", [-1e9, 0.1, 1e9], [0.0; 3])]);
    let clipped = clip_prediction(&exp, out.prediction()).unwrap();
    assert_eq!(clipped.column("a").unwrap(), out.prediction().column("a").unwrap());
}

#[test]
fn test_constant_labels_use_unit_std() {
    let exp = experiment(&[("a", "max", None)], [[7.0, 7.0], [0.0, 0.0]]);
    let stats = label_stats(&exp).unwrap();
    assert_eq!(stats[0].mean, 7.0);
    assert_eq!(stats[0].std, 1.0);

    let out = output(&exp, &[("a", [6.0, 7.0, 9.0], [0.0, 0.0, 0.0])]);
    let scores = compute_utility(&exp, &out).unwrap();
    // (clipped - mean) * weight
    assert_eq!(scores.values, vec![-2.0, 0.0, 4.0]);
    assert!(scores.values.iter().all(|v| v.is_finite()));
}

#[test]
fn test_single_target_matches_formula() {
    let exp = experiment(&[("a", "max", Some(10.0))], [[2.0, 6.0], [0.0, 0.0]]);
    let out = output(&exp, &[("a", [3.0, 8.0, 12.0], [0.5, 1.0, 2.0])]);
    let scores = compute_utility(&exp, &out).unwrap();

    let std = 8.0_f64.sqrt();
    let expected: Vec<f64> = [(3.0, 0.5), (8.0, 1.0), (10.0, 2.0)]
        .iter()
        .map(|&(p, u)| 2.0 * (p - 4.0) / std + 0.5 * (2.0 * u / std))
        .collect();
    for (got, want) in scores.values.iter().zip(&expected) {
        assert!((got - want).abs() < 1e-12, "{got} vs {want}");
    }
}

#[test]
fn test_targets_sum() {
    let both = experiment(&[("a", "max", None), ("b", "min", None)], [[1.0, 3.0], [10.0, 30.0]]);
    let a_only = experiment(&[("a", "max", None)], [[1.0, 3.0], [0.0, 0.0]]);
    let b_only = experiment(&[("b", "min", None)], [[10.0, 30.0], [0.0, 0.0]]);

    let a = ("a", [2.0, 4.0, 0.0], [0.1, 0.2, 0.3]);
    let b = ("b", [15.0, 5.0, 40.0], [1.0, 2.0, 3.0]);
    let u_both = compute_utility(&both, &output(&both, &[a, b])).unwrap();
    let u_a = compute_utility(&a_only, &output(&a_only, &[a])).unwrap();
    let u_b = compute_utility(&b_only, &output(&b_only, &[b])).unwrap();

    for i in 0..3 {
        let sum = u_a.values[i] + u_b.values[i];
        assert!((u_both.values[i] - sum).abs() < 1e-12);
    }
}

#[test]
fn test_apriori_is_zero_without_columns() {
    let exp = experiment(&[("a", "max", None)], [[1.0, 2.0], [0.0, 0.0]]);
    assert_eq!(apriori_contribution(&exp).unwrap(), vec![0.0; 3]);
}

#[test]
fn test_normalized_features_do_not_change_utility() {
    let exp = experiment(&[("a", "max", None)], [[1.0, 2.0], [0.0, 0.0]]);
    let out = output(&exp, &[("a", [1.0, 2.0, 3.0], [0.1, 0.1, 0.1])]);
    let scores = compute_utility(&exp, &out).unwrap();

    let x = scores.normalized_features.column("x").unwrap();
    let mean = x.iter().sum::<f64>() / 5.0;
    assert!(mean.abs() < 1e-12);
    assert_eq!(exp.features().column("x").unwrap(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_normalized_features_cover_partially_measured_rows() {
    // Row 2 has only one of the two targets measured: it is neither labeled
    // nor unlabeled, but its features are still normalized.
    let dataset = Dataset::new("partial")
        .with_column("x", [0.0, 1.0, 2.0, 3.0, 4.0])
        .unwrap()
        .with_column("Target: a", [Some(1.0), Some(2.0), Some(5.0), None, None])
        .unwrap()
        .with_column("Target: b", [Some(1.0), Some(3.0), None, None, None])
        .unwrap();
    let request = ExperimentRequest::builder()
        .features(["x"])
        .target("Target: a", 1.0, "max", None)
        .target("Target: b", 1.0, "max", None)
        .build();
    let exp = preprocess(&dataset, &request).unwrap();
    assert_eq!(exp.label_index(), &[RowId(0), RowId(1)]);
    assert_eq!(exp.nolabel_index(), &[RowId(3), RowId(4)]);

    let index = exp.nolabel_index().to_vec();
    let columns = vec![
        ("Target: a".to_string(), vec![1.0, 2.0]),
        ("Target: b".to_string(), vec![1.0, 2.0]),
    ];
    let out = ModelOutput::new(
        Table::from_columns(index.clone(), columns.clone()).unwrap(),
        Table::from_columns(index, columns).unwrap(),
    )
    .unwrap();
    let scores = compute_utility(&exp, &out).unwrap();

    let normalized = &scores.normalized_features;
    assert_eq!(normalized.n_rows(), 5);
    // x = 0..=4: mean 2, sample std sqrt(2.5), so row 2 sits at zero.
    let x = normalized.column("x").unwrap();
    assert!(x[2].abs() < 1e-12);
    assert!((x[4] - 2.0 / 2.5_f64.sqrt()).abs() < 1e-12);
}
