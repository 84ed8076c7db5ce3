use rand::prelude::*;

use crate::data::FeatureStore;

/// Generate uniform random bytes, `rows x cols` row-major.
pub fn random_rows(rows: usize, cols: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows * cols).map(|_| rng.gen::<u8>()).collect()
}

/// A [`FeatureStore`] of uniform random bytes.
pub fn random_store(rows: usize, cols: usize, seed: u64) -> FeatureStore {
    let data = random_rows(rows, cols, seed);
    match FeatureStore::from_row_major(&data, rows, cols) {
        Ok(store) => store,
        Err(e) => panic!("generated buffer does not fit {rows}x{cols}: {e}"),
    }
}

/// Labelled points scattered around random cluster centers.
#[derive(Debug, Clone)]
pub struct ClusteredData {
    /// `num_rows x num_features` row-major.
    pub row_major: Vec<u8>,
    /// Cluster index of each row.
    pub labels: Vec<u8>,
    pub num_rows: usize,
    pub num_features: usize,
}

impl ClusteredData {
    pub fn row(&self, row: usize) -> &[u8] {
        &self.row_major[row * self.num_features..(row + 1) * self.num_features]
    }

    pub fn store(&self) -> FeatureStore {
        match FeatureStore::from_row_major(&self.row_major, self.num_rows, self.num_features) {
            Ok(store) => store,
            Err(e) => panic!("clustered data is malformed: {e}"),
        }
    }
}

/// Generate `num_clusters * per_cluster` points, each within `spread` of its
/// cluster center on every feature. Rows are interleaved across clusters.
pub fn clustered_rows(
    num_clusters: usize,
    per_cluster: usize,
    num_features: usize,
    spread: u8,
    seed: u64,
) -> ClusteredData {
    assert!(num_clusters <= 256, "labels are bytes");
    assert!(spread < 128);
    let mut rng = StdRng::seed_from_u64(seed);
    let lo = spread;
    let hi = u8::MAX - spread;
    let centers: Vec<Vec<u8>> = (0..num_clusters)
        .map(|_| (0..num_features).map(|_| rng.gen_range(lo..=hi)).collect())
        .collect();

    let num_rows = num_clusters * per_cluster;
    let mut row_major = Vec::with_capacity(num_rows * num_features);
    let mut labels = Vec::with_capacity(num_rows);
    for _ in 0..per_cluster {
        for (label, center) in centers.iter().enumerate() {
            row_major.extend(center.iter().map(|&c| jitter(&mut rng, c, spread)));
            labels.push(label as u8);
        }
    }

    ClusteredData {
        row_major,
        labels,
        num_rows,
        num_features,
    }
}

/// Copy of `point` with every feature moved by at most `amount`, clamped to `u8`.
pub fn perturb(point: &[u8], amount: u8, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    point.iter().map(|&v| jitter(&mut rng, v, amount)).collect()
}

fn jitter<R: Rng>(rng: &mut R, value: u8, amount: u8) -> u8 {
    let offset = rng.gen_range(-(amount as i16)..=amount as i16);
    (value as i16 + offset).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_store_has_requested_shape() {
        let store = random_store(10, 3, 1);
        assert_eq!(store.num_rows(), 10);
        assert_eq!(store.num_features(), 3);
        assert_eq!(random_rows(10, 3, 1), store.to_row_major());
    }

    #[test]
    fn clustered_points_stay_near_their_center() {
        let data = clustered_rows(3, 20, 4, 5, 9);
        assert_eq!(data.num_rows, 60);
        assert_eq!(data.labels.len(), 60);
        // rows 0, 3, 6, ... share cluster 0
        for row in (0..60).step_by(3) {
            assert_eq!(data.labels[row], 0);
            for (a, b) in data.row(row).iter().zip(data.row(0)) {
                assert!(a.abs_diff(*b) <= 10);
            }
        }
    }

    #[test]
    fn perturb_is_bounded() {
        let point = [0u8, 128, 255];
        let moved = perturb(&point, 3, 4);
        for (a, b) in moved.iter().zip(point.iter()) {
            assert!(a.abs_diff(*b) <= 3);
        }
    }
}
