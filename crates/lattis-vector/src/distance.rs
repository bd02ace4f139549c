//! Distance kernels.
//!
//! Scoring dominates every operation in the workspace: a single search
//! evaluates the metric on the order of (graph size x search breadth)
//! times. Each kernel therefore makes one pass over the vector pair with
//! four independent accumulator lanes, which release builds collapse to
//! SIMD, and allocates nothing. All metrics return lower-is-closer scores.

/// Supported distance functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceFunction {
    /// Euclidean (L2) distance.
    Euclidean,
    /// Cosine distance `1 - cos(angle)`, in `[0, 2]`.
    Cosine,
    /// Negated dot product. Scores are negative for well-aligned pairs;
    /// lower still means closer.
    InnerProduct,
}

impl DistanceFunction {
    /// Score a vector pair under this metric.
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Euclidean => euclidean_distance(a, b),
            Self::Cosine => cosine_distance(a, b),
            Self::InnerProduct => -inner_product(a, b),
        }
    }
}

/// Fold a vector pair into four accumulator lanes plus a scalar tail.
///
/// `op` maps one element pair to the value added to a lane. Keeping the
/// lanes independent is what lets the optimizer vectorize the loop.
#[inline]
fn lane_fold(a: &[f32], b: &[f32], op: impl Fn(f32, f32) -> f32) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vector lengths must match");

    let mut lanes = [0.0f32; 4];
    let mut xa = a.chunks_exact(4);
    let mut xb = b.chunks_exact(4);
    for (ca, cb) in xa.by_ref().zip(xb.by_ref()) {
        for i in 0..4 {
            lanes[i] += op(ca[i], cb[i]);
        }
    }

    let mut tail = 0.0f32;
    for (&x, &y) in xa.remainder().iter().zip(xb.remainder()) {
        tail += op(x, y);
    }

    lanes.iter().sum::<f32>() + tail
}

/// Euclidean (L2) distance.
///
/// # Example
///
/// ```
/// use lattis_vector::euclidean_distance;
///
/// let d = euclidean_distance(&[0.0, 0.0], &[7.0, 24.0]);
/// assert!((d - 25.0).abs() < 1e-4);
/// ```
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    euclidean_distance_squared(a, b).sqrt()
}

/// Squared Euclidean distance. Ranks identically to [`euclidean_distance`]
/// without the square root, so comparison-only paths prefer it.
#[inline]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    lane_fold(a, b, |x, y| {
        let d = x - y;
        d * d
    })
}

/// Dot product. Higher means more aligned; negate for use as a distance.
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    lane_fold(a, b, |x, y| x * y)
}

/// Cosine distance: `1 - cos(angle)` between the two vectors.
///
/// A zero vector has no direction and is scored as orthogonal (1.0). The
/// dot product and both squared norms come out of a single fused pass.
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vector lengths must match");

    let mut dot = [0.0f32; 4];
    let mut norm_a = [0.0f32; 4];
    let mut norm_b = [0.0f32; 4];
    let mut xa = a.chunks_exact(4);
    let mut xb = b.chunks_exact(4);
    for (ca, cb) in xa.by_ref().zip(xb.by_ref()) {
        for i in 0..4 {
            dot[i] += ca[i] * cb[i];
            norm_a[i] += ca[i] * ca[i];
            norm_b[i] += cb[i] * cb[i];
        }
    }

    let mut dot = dot.iter().sum::<f32>();
    let mut norm_a = norm_a.iter().sum::<f32>();
    let mut norm_b = norm_b.iter().sum::<f32>();
    for (&x, &y) in xa.remainder().iter().zip(xb.remainder()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom < f32::EPSILON {
        return 1.0;
    }
    1.0 - (dot / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random vector, length `n`.
    fn wave_vector(n: usize, phase: f32) -> Vec<f32> {
        (0..n).map(|i| (i as f32 * 0.7 + phase).sin()).collect()
    }

    fn naive_l2_squared(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    fn naive_dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_euclidean_known_values() {
        assert!((euclidean_distance(&[0.0, 0.0], &[7.0, 24.0]) - 25.0).abs() < 1e-4);
        let v = [3.0, -1.0, 2.5];
        assert_eq!(euclidean_distance(&v, &v), 0.0);
    }

    #[test]
    fn test_kernels_match_naive_across_lengths() {
        // Exercises the lane body and every tail length.
        for n in [1, 2, 3, 4, 5, 7, 8, 13, 128] {
            let a = wave_vector(n, 0.0);
            let b = wave_vector(n, 1.3);

            let l2 = euclidean_distance_squared(&a, &b);
            assert!(
                (l2 - naive_l2_squared(&a, &b)).abs() < 1e-4,
                "l2 mismatch at n={}",
                n
            );

            let ip = inner_product(&a, &b);
            assert!(
                (ip - naive_dot(&a, &b)).abs() < 1e-4,
                "dot mismatch at n={}",
                n
            );
        }
    }

    #[test]
    fn test_squared_is_square_of_euclidean() {
        let a = wave_vector(31, 0.0);
        let b = wave_vector(31, 2.1);
        let d = euclidean_distance(&a, &b);
        assert!((d * d - euclidean_distance_squared(&a, &b)).abs() < 1e-3);
    }

    #[test]
    fn test_cosine_extremes() {
        let x = [2.0, 0.0, 0.0];
        assert!(cosine_distance(&x, &[5.0, 0.0, 0.0]).abs() < 1e-6); // parallel
        assert!((cosine_distance(&x, &[0.0, 3.0, 0.0]) - 1.0).abs() < 1e-6); // orthogonal
        assert!((cosine_distance(&x, &[-1.0, 0.0, 0.0]) - 2.0).abs() < 1e-6); // opposite
        assert!((cosine_distance(&[0.0; 3], &x) - 1.0).abs() < 1e-6); // zero vector
    }

    #[test]
    fn test_inner_product_metric_is_negated() {
        // Aligned pairs must score lower (closer) than orthogonal ones.
        let aligned = DistanceFunction::InnerProduct.distance(&[1.0, 0.0], &[4.0, 0.0]);
        let orthogonal = DistanceFunction::InnerProduct.distance(&[1.0, 0.0], &[0.0, 4.0]);
        assert_eq!(aligned, -4.0);
        assert_eq!(orthogonal, 0.0);
        assert!(aligned < orthogonal);
    }

    #[test]
    fn test_all_metrics_symmetric() {
        let a = wave_vector(29, 0.0);
        let b = wave_vector(29, 0.9);
        for metric in [
            DistanceFunction::Euclidean,
            DistanceFunction::Cosine,
            DistanceFunction::InnerProduct,
        ] {
            let ab = metric.distance(&a, &b);
            let ba = metric.distance(&b, &a);
            assert!((ab - ba).abs() < 1e-6, "{:?} not symmetric", metric);
        }
    }
}
