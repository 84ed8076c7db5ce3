//! Query behaviour: aggregation, batching and reranking.

use rstest::{fixture, rstest};

use rbforest::testing::{random_store, two_cluster_example};
use rbforest::{api, l2_square_dist, ForestTrainer, Neighbor, Parallelism, QueryEngine, RandomBinaryForest, RbfConfig};

#[fixture]
fn forest() -> RandomBinaryForest {
    let config = RbfConfig::builder()
        .num_rows(800)
        .num_features(16)
        .num_features_to_compare(4)
        .num_trees(10)
        .build()
        .unwrap();
    ForestTrainer::new(config).train(random_store(800, 16, 77)).unwrap()
}

#[test]
fn two_cluster_queries_land_in_their_cluster() {
    let forest = two_cluster_example();
    let engine = forest.query_engine();

    let far = engine.query_dedup(&[10, 10]).unwrap();
    assert_eq!(far.rows(), &[2]);
    assert_eq!(far.hits(), &[5]);

    assert_eq!(engine.query_nearest(&[0, 0], Some(1)).unwrap()[0].row, 0);
    assert_eq!(engine.query_nearest(&[0, 1], Some(1)).unwrap()[0].row, 1);
    for row in engine.query_dedup(&[10, 11]).unwrap().rows() {
        assert!(*row >= 2);
    }
}

#[rstest]
fn dedup_matches_union_of_trees(forest: RandomBinaryForest) {
    let engine = QueryEngine::new(&forest);
    for row in (0..800).step_by(37) {
        let point = forest.store().row(row).to_vec();
        let all = engine.query_all(&point).unwrap();
        let dedup = engine.query_dedup(&point).unwrap();
        assert_eq!(all.n_trees(), 10);

        let mut union: Vec<u32> = all.as_flat().to_vec();
        union.sort_unstable();
        union.dedup();
        let mut rows = dedup.rows().to_vec();
        rows.sort_unstable();
        assert_eq!(rows, union);
    }
}

#[rstest]
#[case(Parallelism::Sequential)]
#[case(Parallelism::Parallel(2))]
#[case(Parallelism::Parallel(8))]
fn batch_equals_single_queries(forest: RandomBinaryForest, #[case] parallelism: Parallelism) {
    let num_queries = 100;
    let points: Vec<u8> = (0..num_queries)
        .flat_map(|i| forest.store().row(i * 7).to_vec())
        .collect();
    let engine = QueryEngine::new(&forest).with_parallelism(parallelism);

    let dedup = engine.batch_query_dedup(&points, num_queries).unwrap();
    let nearest = engine.batch_query_nearest(&points, num_queries, Some(4)).unwrap();
    for (i, point) in points.chunks_exact(16).enumerate() {
        assert_eq!(dedup[i], engine.query_dedup(point).unwrap());
        assert_eq!(nearest[i], engine.query_nearest(point, Some(4)).unwrap());
    }
}

#[rstest]
fn nearest_is_sorted_exact_distance(forest: RandomBinaryForest) {
    let point = vec![128u8; 16];
    let neighbors = api::query_forest_dedup_results_sorted(&forest, &point, None).unwrap();
    let dedup = api::query_forest_dedup_results(&forest, &point).unwrap();
    assert_eq!(neighbors.len(), dedup.len());
    assert!(neighbors.windows(2).all(|w| w[0] <= w[1]));
    for n in &neighbors {
        let row = forest.store().row(n.row as usize).to_vec();
        assert_eq!(n.distance, l2_square_dist(&point, &row).unwrap());
    }

    let top = api::query_forest_dedup_results_sorted(&forest, &point, Some(3)).unwrap();
    assert_eq!(top.as_slice(), &neighbors[..3.min(neighbors.len())]);
}

#[test]
fn neighbors_order_by_distance_then_row() {
    let mut ns = vec![
        Neighbor { distance: 4, row: 1 },
        Neighbor { distance: 1, row: 9 },
        Neighbor { distance: 4, row: 0 },
    ];
    ns.sort();
    assert_eq!(ns.iter().map(|n| n.row).collect::<Vec<_>>(), vec![9, 0, 1]);
}
