use proptest::prelude::*;
use simsearch::{
    cosine_distance, euclidean_distance, l2_norm, nearest_neighbors, Metric, VectorBatch,
    VectorGenerator,
};

// Strategy: mantissa times a power of ten, so squared sums both overflow
// and underflow across cases
fn arb_component() -> impl Strategy<Value = f64> {
    (-10.0..10.0f64, -200i32..200).prop_map(|(m, e)| m * 10f64.powi(e))
}

fn arb_vector(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_component(), dim)
}

fn arb_nonzero_vector(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    arb_vector(dim).prop_filter("non-zero vector", |v| v.iter().any(|&x| x != 0.0))
}

fn arb_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..64).prop_flat_map(|dim| (arb_nonzero_vector(dim), arb_nonzero_vector(dim)))
}

fn arb_workload() -> impl Strategy<Value = (Vec<f64>, Vec<Vec<f64>>, usize)> {
    (1usize..16, 1usize..60).prop_flat_map(|(dim, n)| {
        (
            arb_nonzero_vector(dim),
            prop::collection::vec(arb_nonzero_vector(dim), n),
            1usize..80,
        )
    })
}

fn arb_metric() -> impl Strategy<Value = Metric> {
    prop_oneof![Just(Metric::Euclidean), Just(Metric::Cosine)]
}

proptest! {
    #[test]
    fn prop_self_distance((v, _) in arb_pair()) {
        prop_assert_eq!(euclidean_distance(&v, &v).unwrap(), 0.0);
        prop_assert!(cosine_distance(&v, &v).unwrap().abs() < 1e-9);
    }

    #[test]
    fn prop_symmetry((a, b) in arb_pair()) {
        prop_assert_eq!(euclidean_distance(&a, &b).unwrap(), euclidean_distance(&b, &a).unwrap());
        prop_assert_eq!(cosine_distance(&a, &b).unwrap(), cosine_distance(&b, &a).unwrap());
    }

    #[test]
    fn prop_non_negative((a, b) in arb_pair()) {
        let e = euclidean_distance(&a, &b).unwrap();
        prop_assert!(e.is_finite() && e >= 0.0);

        let c = cosine_distance(&a, &b).unwrap();
        prop_assert!((0.0..=2.0).contains(&c));
    }

    #[test]
    fn prop_broadcast_consistency((query, rows, _) in arb_workload(), metric in arb_metric()) {
        let batch = VectorBatch::from_rows(&rows).unwrap();
        let batched = metric.distances(&query, &batch).unwrap();

        prop_assert_eq!(batched.len(), rows.len());
        for (i, row) in rows.iter().enumerate() {
            prop_assert_eq!(batched[i], metric.distance(&query, row).unwrap());
        }
    }

    #[test]
    fn prop_matches_stable_argsort((query, rows, k) in arb_workload(), metric in arb_metric()) {
        let batch = VectorBatch::from_rows(&rows).unwrap();

        let distances: Vec<f64> = rows
            .iter()
            .map(|row| metric.distance(&query, row).unwrap())
            .collect();
        let mut expected: Vec<usize> = (0..rows.len()).collect();
        expected.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));
        expected.truncate(k);

        let actual: Vec<usize> = nearest_neighbors(&query, &batch, k, metric)
            .unwrap()
            .iter()
            .map(|n| n.index)
            .collect();

        prop_assert_eq!(actual.len(), k.min(rows.len()));
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_generated_vectors_unit_norm(seed in any::<u64>(), count in 0usize..50, dim in 1usize..128) {
        let batch = VectorGenerator::seeded(seed, true).generate(count, dim).unwrap();

        prop_assert_eq!(batch.len(), count);
        for row in batch.rows() {
            prop_assert!((l2_norm(row) - 1.0).abs() < 1e-6);
        }
    }
}
