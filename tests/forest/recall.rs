//! Candidate quality on synthetic data.

use approx::assert_abs_diff_eq;

use rbforest::eval::{accuracy, nearest_label, plurality_label};
use rbforest::testing::{clustered_rows, perturb, random_store, self_recall};
use rbforest::{ForestTrainer, RbfConfig};

#[test]
fn self_recall_with_twenty_trees() {
    let config = RbfConfig::builder()
        .num_rows(2_000)
        .num_features(32)
        .num_features_to_compare(6)
        .num_trees(20)
        .build()
        .unwrap();
    let forest = ForestTrainer::new(config).train(random_store(2_000, 32, 8)).unwrap();
    let recall = self_recall(&forest);
    assert!(recall >= 0.95, "self recall {recall}");
    assert_abs_diff_eq!(recall, 1.0);
}

#[test]
fn perturbed_queries_recover_their_cluster() {
    let data = clustered_rows(8, 50, 16, 6, 123);
    let config = RbfConfig::builder()
        .num_rows(data.num_rows)
        .num_features(data.num_features)
        .num_features_to_compare(4)
        .num_trees(20)
        .leaf_size(8)
        .build()
        .unwrap();
    let forest = ForestTrainer::new(config).train(data.store()).unwrap();
    let engine = forest.query_engine();

    let mut by_nearest = Vec::new();
    let mut by_plurality = Vec::new();
    let mut expected = Vec::new();
    for row in (0..data.num_rows).step_by(5) {
        let query = perturb(data.row(row), 3, row as u64);
        let neighbors = engine.query_nearest(&query, Some(5)).unwrap();
        let all = engine.query_all(&query).unwrap();
        by_nearest.push(nearest_label(&neighbors, &data.labels, 1).unwrap());
        by_plurality.push(plurality_label(&all, &data.labels).unwrap());
        expected.push(data.labels[row]);
    }

    let nearest_acc = accuracy(&by_nearest, &expected).unwrap();
    let plurality_acc = accuracy(&by_plurality, &expected).unwrap();
    assert!(nearest_acc >= 0.9, "nearest-label accuracy {nearest_acc}");
    assert!(plurality_acc >= 0.8, "plurality accuracy {plurality_acc}");
}
