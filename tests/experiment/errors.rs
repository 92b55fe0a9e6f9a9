use sequential_learning::prelude::*;

use super::{STRENGTH, concrete};

fn reason(err: &Error) -> &str {
    match err {
        Error::InvalidConfiguration { reason } => reason,
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    }
}

#[test]
fn test_weight_length_mismatch() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target_names([STRENGTH])
        .target_weights([1.0, 2.0])
        .target_max_or_min(["max"])
        .target_thresholds([None])
        .build();
    let err = preprocess(&concrete(), &request).unwrap_err();
    assert!(reason(&err).contains("target weights"), "{err}");
}

#[test]
fn test_direction_length_mismatch() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target_names([STRENGTH])
        .target_weights([1.0])
        .target_max_or_min(["max", "min"])
        .target_thresholds([None])
        .build();
    let err = ExperimentConductor::run(&concrete(), &request).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
}

#[test]
fn test_apriori_weight_mismatch() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", None)
        .apriori_names(["co2"])
        .apriori_weights([])
        .build();
    let err = preprocess(&concrete(), &request).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
}

#[test]
fn test_invalid_direction() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "maximum", None)
        .build();
    let err = ExperimentConductor::run(&concrete(), &request).unwrap_err();
    assert!(matches!(&err, Error::InvalidDirection(d) if d == "maximum"));
    assert_eq!(err.to_string(), "invalid value for max_or_min, got maximum");
}

#[test]
fn test_unsupported_model() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", None)
        .model("Linear Regression")
        .build();
    let err = ExperimentConductor::run(&concrete(), &request).unwrap_err();
    assert!(matches!(&err, Error::UnsupportedModel(m) if m == "Linear Regression"));
}

#[test]
fn test_model_selector_spellings() {
    for model in ["Random Forest", "random_forest", "Gaussian Process", "gaussian-process"] {
        let request = ExperimentRequest::builder()
            .features(["water"])
            .target(STRENGTH, 1.0, "max", None)
            .model(model)
            .build();
        assert!(preprocess(&concrete(), &request).is_ok(), "{model}");
    }
}

#[test]
fn test_overlapping_partition() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", None)
        .partition([RowId(0), RowId(1)], [RowId(1), RowId(2)])
        .build();
    let err = preprocess(&concrete(), &request).unwrap_err();
    assert!(reason(&err).contains("more than once"), "{err}");
}

#[test]
fn test_empty_partitions() {
    let no_labels = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", None)
        .partition([], [RowId(2)])
        .build();
    assert!(matches!(
        preprocess(&concrete(), &no_labels),
        Err(Error::InvalidConfiguration { .. })
    ));

    let nothing_to_predict = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", None)
        .partition([RowId(0), RowId(1)], [])
        .build();
    assert!(matches!(
        preprocess(&concrete(), &nothing_to_predict),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_all_rows_measured() {
    let dataset = Dataset::new("done")
        .with_column("x", [1.0, 2.0])
        .unwrap()
        .with_column(STRENGTH, [1.0, 2.0])
        .unwrap();
    let request = ExperimentRequest::builder()
        .features(["x"])
        .target(STRENGTH, 1.0, "max", None)
        .build();
    let err = preprocess(&dataset, &request).unwrap_err();
    assert!(reason(&err).contains("no unlabeled rows"), "{err}");
}

#[test]
fn test_unknown_columns() {
    for (features, target, apriori) in [
        ("slag", STRENGTH, None),
        ("water", "Target: slump", None),
        ("water", STRENGTH, Some("price")),
    ] {
        let mut builder = ExperimentRequest::builder()
            .features([features])
            .target(target, 1.0, "max", None);
        if let Some(name) = apriori {
            builder = builder.apriori(name, 1.0);
        }
        let err = preprocess(&concrete(), &builder.build()).unwrap_err();
        assert!(reason(&err).contains("is not in dataset"), "{err}");
    }
}

#[test]
fn test_labeled_row_without_target_value() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", None)
        .partition([RowId(0), RowId(2)], [RowId(3)])
        .build();
    let err = preprocess(&concrete(), &request).unwrap_err();
    assert!(reason(&err).contains("labeled row 2"), "{err}");
}

#[test]
fn test_negative_curiosity() {
    let request = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", None)
        .curiosity(-1.0)
        .build();
    assert!(matches!(
        preprocess(&concrete(), &request),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_non_finite_settings() {
    let weight = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, f64::NAN, "max", None)
        .build();
    assert!(preprocess(&concrete(), &weight).is_err());

    let threshold = ExperimentRequest::builder()
        .features(["water"])
        .target(STRENGTH, 1.0, "max", Some(f64::INFINITY))
        .build();
    assert!(preprocess(&concrete(), &threshold).is_err());
}
