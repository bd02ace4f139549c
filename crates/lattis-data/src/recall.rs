//! Recall scoring against precomputed ground truth.

/// Fraction of true top-k neighbors recovered, averaged over all queries.
///
/// `ground_truth` rows must be sorted ascending (as
/// [`load_groundtruth_rows`](crate::dataset::load_groundtruth_rows)
/// produces them); `results` rows are the returned ids per query, in any
/// order. Rows are paired by index; `results` may cover a prefix of the
/// queries.
pub fn recall_at_k(results: &[Vec<u32>], ground_truth: &[Vec<u32>], k: usize) -> f64 {
    if results.is_empty() || k == 0 {
        return 0.0;
    }

    let mut hits = 0usize;
    for (found, truth) in results.iter().zip(ground_truth) {
        hits += found
            .iter()
            .take(k)
            .filter(|id| truth.binary_search(id).is_ok())
            .count();
    }

    hits as f64 / (results.len() * k) as f64
}
