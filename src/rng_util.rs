/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Draw `len` row positions from `0..len` with replacement (bootstrap sample).
pub(crate) fn bootstrap(rng: &mut fastrand::Rng, len: usize) -> Vec<usize> {
    (0..len).map(|_| rng.usize(0..len)).collect()
}

/// Select `k` random indices from `0..n` using partial Fisher-Yates shuffle.
pub(crate) fn partial_shuffle(rng: &mut fastrand::Rng, n: usize, k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let k = k.min(n);
    for i in 0..k {
        let j = rng.usize(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}
