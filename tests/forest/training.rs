//! Structural invariants of trained forests.

use proptest::prelude::*;
use rstest::rstest;

use rbforest::data::FeatureStore;
use rbforest::testing::{assert_forest_invariants, random_store, self_recall};
use rbforest::{ForestTrainer, RandomBinaryForest, RbfConfig, SplitStrategy, TrainError};

fn train(store: FeatureStore, compare: usize, depth: usize, leaf: usize, strategy: SplitStrategy) -> RandomBinaryForest {
    let config = RbfConfig::builder()
        .num_rows(store.num_rows())
        .num_features(store.num_features())
        .num_features_to_compare(compare)
        .num_trees(8)
        .tree_depth(depth)
        .leaf_size(leaf)
        .split_strategy(strategy)
        .build()
        .unwrap();
    ForestTrainer::new(config).train(store).unwrap()
}

#[rstest]
#[case::best_feature(SplitStrategy::BestFeature)]
#[case::majority_vote(SplitStrategy::MajorityVote)]
fn every_tree_partitions_all_rows(#[case] strategy: SplitStrategy) {
    let forest = train(random_store(500, 12, 3), 4, 12, 6, strategy);
    assert_eq!(forest.n_trees(), 8);
    assert_forest_invariants(&forest);
    for tree in forest.trees() {
        let covered: usize = tree.leaves().map(|(_, _, rows)| rows.len()).sum();
        assert_eq!(covered, 500);
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn depth_limit_is_respected(#[case] depth: usize) {
    let forest = train(random_store(400, 6, 11), 3, depth, 1, SplitStrategy::BestFeature);
    for tree in forest.trees() {
        assert!(tree.max_depth() as usize <= depth);
    }
    assert_forest_invariants(&forest);
}

#[test]
fn identical_rows_end_in_one_leaf() {
    // 20 copies of one record, then 20 of another
    let mut rows = vec![7u8, 7, 7].repeat(20);
    rows.extend([200u8, 1, 9].repeat(20));
    let store = FeatureStore::from_row_major(&rows, 40, 3).unwrap();
    let forest = train(store, 1, 10, 2, SplitStrategy::BestFeature);
    assert_forest_invariants(&forest);
    for tree in forest.trees() {
        let mut sizes: Vec<usize> = tree.leaves().map(|(_, _, rows)| rows.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![20, 20]);
    }
}

#[test]
fn thread_count_does_not_change_trees() {
    let store = random_store(600, 10, 5);
    let build = |n_threads: usize| {
        let config = RbfConfig::builder()
            .num_rows(600)
            .num_features(10)
            .num_features_to_compare(3)
            .num_trees(12)
            .seed(99)
            .n_threads(n_threads)
            .build()
            .unwrap();
        ForestTrainer::new(config).train(store.clone()).unwrap()
    };
    let sequential = build(1);
    for n_threads in [0, 2, 4] {
        let parallel = build(n_threads);
        assert!(sequential.trees().eq(parallel.trees()), "n_threads={n_threads}");
    }
}

#[test]
fn seeds_change_trees() {
    let store = random_store(300, 10, 5);
    let build = |seed: u64| {
        let config = RbfConfig::builder()
            .num_rows(300)
            .num_features(10)
            .num_features_to_compare(2)
            .num_trees(4)
            .seed(seed)
            .build()
            .unwrap();
        ForestTrainer::new(config).train(store.clone()).unwrap()
    };
    assert!(!build(1).trees().eq(build(2).trees()));
}

#[test]
fn shape_disagreement_is_rejected() {
    let config = RbfConfig::builder()
        .num_rows(10)
        .num_features(4)
        .num_features_to_compare(2)
        .build()
        .unwrap();
    let err = ForestTrainer::new(config).train(random_store(11, 4, 0)).unwrap_err();
    assert!(matches!(err, TrainError::StoreShapeMismatch { rows: 11, .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // Narrow value range forces duplicate rows and ties.
    #[test]
    fn small_forests_hold_invariants(
        (num_rows, num_features, data) in (1usize..40, 1usize..6).prop_flat_map(|(r, f)| {
            (Just(r), Just(f), proptest::collection::vec(0u8..4, r * f))
        }),
        compare_seed in any::<usize>(),
        depth in 1usize..8,
        leaf in 1usize..5,
        majority in any::<bool>(),
    ) {
        let store = FeatureStore::from_row_major(&data, num_rows, num_features).unwrap();
        let compare = compare_seed % num_features + 1;
        let strategy = if majority { SplitStrategy::MajorityVote } else { SplitStrategy::BestFeature };
        let forest = train(store, compare, depth, leaf, strategy);
        assert_forest_invariants(&forest);
        prop_assert_eq!(self_recall(&forest), 1.0);
    }
}
