use simsearch::{
    find_nearest_neighbors, nearest_neighbors, Metric, VectorBatch, VectorError, VectorGenerator,
};

/// Reference ranking: score every row with the pairwise function, then
/// stable-sort the row indices by distance.
fn naive_argsort(query: &[f64], candidates: &VectorBatch, metric: Metric) -> Vec<usize> {
    let distances: Vec<f64> = candidates
        .rows()
        .map(|row| metric.distance(query, row).unwrap())
        .collect();

    let mut indices: Vec<usize> = (0..distances.len()).collect();
    indices.sort_by(|&a, &b| distances[a].partial_cmp(&distances[b]).unwrap());
    indices
}

fn random_workload(seed: u64) -> (VectorBatch, Vec<f64>) {
    let mut generator = VectorGenerator::seeded(seed, false);
    let candidates = generator.generate(1000, 32).unwrap();
    let query = generator.generate_one(32).unwrap();
    (candidates, query)
}

#[test]
fn test_knn_matches_naive_argsort() {
    for seed in [1, 2, 3] {
        let (candidates, query) = random_workload(seed);

        for metric in Metric::ALL {
            let expected: Vec<usize> = naive_argsort(&query, &candidates, metric)
                .into_iter()
                .take(10)
                .collect();

            let neighbors = nearest_neighbors(&query, &candidates, 10, metric).unwrap();
            let actual: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
            assert_eq!(actual, expected, "metric {} seed {}", metric, seed);

            // Distances are non-decreasing
            for pair in neighbors.windows(2) {
                assert!(pair[0].distance <= pair[1].distance);
            }

            // Rows come back in the same order as the indices
            let rows = find_nearest_neighbors(&query, &candidates, 10, metric).unwrap();
            assert_eq!(rows, candidates.select(&expected).unwrap());
        }
    }
}

#[test]
fn test_knn_returns_true_minimum() {
    let (candidates, query) = random_workload(11);

    for metric in Metric::ALL {
        let neighbors = nearest_neighbors(&query, &candidates, 10, metric).unwrap();
        let worst_returned = neighbors.last().unwrap().distance;

        // Every row left out is at least as far as the farthest one returned
        let returned: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        for (i, row) in candidates.rows().enumerate() {
            if !returned.contains(&i) {
                assert!(metric.distance(&query, row).unwrap() >= worst_returned);
            }
        }
    }
}

#[test]
fn test_ties_break_by_row_index() {
    // Duplicate rows guarantee exact ties
    let candidates = VectorBatch::from_rows(vec![
        vec![5.0, 5.0],
        vec![1.0, 2.0],
        vec![9.0, 9.0],
        vec![1.0, 2.0],
        vec![1.0, 2.0],
    ])
    .unwrap();

    for metric in Metric::ALL {
        let neighbors = nearest_neighbors(&[1.0, 2.0], &candidates, 3, metric).unwrap();
        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1, 3, 4], "metric {}", metric);
    }
}

#[test]
fn test_k_larger_than_candidates_returns_all() {
    let mut generator = VectorGenerator::seeded(5, true);
    let candidates = generator.generate(5, 8).unwrap();
    let query = generator.generate_one(8).unwrap();

    for metric in Metric::ALL {
        let rows = find_nearest_neighbors(&query, &candidates, 1000, metric).unwrap();
        assert_eq!(rows.len(), 5);

        let expected = naive_argsort(&query, &candidates, metric);
        assert_eq!(rows, candidates.select(&expected).unwrap());
    }
}

#[test]
fn test_default_k_is_one() {
    let (candidates, query) = random_workload(21);
    let config = simsearch::SearchConfig::default();

    let rows = config.search(&query, &candidates).unwrap();
    assert_eq!(rows.len(), 1);

    let expected = naive_argsort(&query, &candidates, Metric::Euclidean)[0];
    assert_eq!(rows.row(0), candidates.row(expected));
}

#[test]
fn test_dimension_mismatch_reported() {
    let candidates = VectorGenerator::seeded(3, true).generate(10, 5).unwrap();
    let query = [0.1, 0.2, 0.3];

    for metric in Metric::ALL {
        let result = find_nearest_neighbors(&query, &candidates, 3, metric);
        assert_eq!(
            result,
            Err(VectorError::DimensionMismatch {
                expected: 5,
                actual: 3
            })
        );
    }
}

#[test]
fn test_unknown_metric_reported() {
    let result = "manhattan".parse::<Metric>();
    assert_eq!(result, Err(VectorError::InvalidMetric("manhattan".to_string())));
}
