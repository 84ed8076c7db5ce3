//! Config serialization.

use rbforest::{RbfConfig, SplitStrategy, Verbosity};

#[test]
fn config_round_trips_through_json() {
    let config = RbfConfig::builder()
        .num_rows(1_000)
        .num_features(64)
        .num_features_to_compare(8)
        .split_strategy(SplitStrategy::MajorityVote)
        .verbosity(Verbosity::Info)
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back: RbfConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn optional_fields_default_when_missing() {
    let json = r#"{
        "num_trees": 5, "tree_depth": 10, "leaf_size": 4,
        "num_rows": 100, "num_features": 8, "num_features_to_compare": 2, "seed": 1
    }"#;
    let config: RbfConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.split_strategy, SplitStrategy::BestFeature);
    assert_eq!(config.n_threads, 0);
    assert!(config.validate().is_ok());

    let bad: RbfConfig = serde_json::from_str(&json.replace("\"num_features_to_compare\": 2", "\"num_features_to_compare\": 9")).unwrap();
    assert!(bad.validate().is_err());
}
