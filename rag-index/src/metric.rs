use space::Metric;

/// Half of `u32::MAX`: cosine distance lives in `[0, 2]`.
pub(crate) const DISTANCE_SCALE: f32 = u32::MAX as f32 / 2.0;

/// `1 - cosine_similarity`, scaled to `u32` so HNSW can order it.
/// Zero vectors are maximally distant from everything.
pub(crate) struct CosineDistance;

impl Metric<Box<[f32]>> for CosineDistance {
    type Unit = u32;

    fn distance(&self, a: &Box<[f32]>, b: &Box<[f32]>) -> u32 {
        let (a, b): (&[f32], &[f32]) = (a, b);
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let mag_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b = b.iter().map(|y| y * y).sum::<f32>().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return u32::MAX;
        }

        let distance = (1.0 - dot / (mag_a * mag_b)).clamp(0.0, 2.0);
        (distance * DISTANCE_SCALE) as u32
    }
}

/// Convert a scaled distance back to a similarity in `[0, 1]`.
pub(crate) fn similarity(distance: u32) -> f32 {
    (1.0 - distance as f32 / DISTANCE_SCALE).clamp(0.0, 1.0)
}
