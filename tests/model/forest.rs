use sequential_learning::model::{RandomForest, RandomForestConfig, Regressor, Surrogate};

use super::grid;

fn forest(n_trees: usize, seed: u64) -> RandomForest {
    RandomForest::new(RandomForestConfig {
        n_trees,
        seed,
        ..Default::default()
    })
}

#[test]
fn test_forest_is_deterministic() {
    let (x, y) = grid();
    let queries = vec![vec![0.3, 0.5], vec![1.9, 2.0], vec![5.0, -1.0]];

    let a = forest(50, 7).fit_predict(&x, &y, &queries).unwrap();
    let b = forest(50, 7).fit_predict(&x, &y, &queries).unwrap();
    let bits = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a.mean), bits(&b.mean));
    assert_eq!(bits(&a.std), bits(&b.std));
}

#[test]
fn test_seed_changes_ensemble() {
    let (x, y) = grid();
    let q = vec![vec![1.1, 1.0]];
    let a = forest(20, 1).fit_predict(&x, &y, &q).unwrap();
    let b = forest(20, 2).fit_predict(&x, &y, &q).unwrap();
    assert!(a.mean[0] != b.mean[0] || a.std[0] != b.std[0]);
}

#[test]
fn test_predictions_stay_in_label_range() {
    let (x, y) = grid();
    let lo = y.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let queries: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i) * 0.15, 1.0]).collect();

    let p = forest(30, 42).fit_predict(&x, &y, &queries).unwrap();
    for (m, s) in p.mean.iter().zip(&p.std) {
        assert!(*m >= lo - 1e-9 && *m <= hi + 1e-9, "{m} outside [{lo}, {hi}]");
        assert!(*s >= 0.0);
    }
}

#[test]
fn test_forest_tracks_the_trend() {
    let (x, y) = grid();
    let p = forest(100, 42)
        .fit_predict(&x, &y, &[vec![0.0, 0.0], vec![2.0, 2.0]])
        .unwrap();
    assert!(p.mean[1] > p.mean[0] + 3.0, "{:?}", p.mean);
}

#[test]
fn test_max_depth_one_gives_stumps() {
    let (x, y) = grid();
    let stumps = RandomForest::new(RandomForestConfig {
        n_trees: 1,
        max_depth: Some(1),
        ..Default::default()
    })
    .fit(&x, &y)
    .unwrap();
    let mut distinct: Vec<u64> = x
        .iter()
        .map(|row| stumps.predict(row).unwrap().0.to_bits())
        .collect();
    distinct.sort_unstable();
    distinct.dedup();
    assert!(distinct.len() <= 2);
}

#[test]
fn test_malformed_training_data() {
    let f = forest(5, 0);
    assert!(f.fit(&[], &[]).is_err());
    assert!(f.fit(&[vec![1.0], vec![2.0]], &[1.0]).is_err());
}

#[test]
fn test_query_of_wrong_width_is_an_error() {
    let (x, y) = grid();
    let f = forest(5, 0);
    assert!(f.fit_predict(&x, &y, &[vec![1.0]]).is_err());
    let fitted = f.fit(&x, &y).unwrap();
    assert_eq!(fitted.n_features(), 2);
    assert!(fitted.predict(&[1.0]).is_err());
}

#[test]
fn test_regressor_enum_uses_forest_settings() {
    let (x, y) = grid();
    let direct = forest(10, 3).fit_predict(&x, &y, &[vec![1.0, 1.0]]).unwrap();
    let wrapped = Regressor::RandomForest(forest(10, 3))
        .fit_predict(&x, &y, &[vec![1.0, 1.0]])
        .unwrap();
    assert_eq!(direct, wrapped);
}
