//! Small vector-math module with pinned numeric semantics: embeddings are
//! stored as f32, dot products and magnitudes accumulate in f64, and any
//! zero-magnitude operand makes the cosine 0.0 instead of dividing.

/// Magnitude below which a vector is treated as zero.
const EPSILON: f64 = 1e-12;

pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

pub fn magnitude(v: &[f32]) -> f64 {
    v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt()
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns a value in [-1, 1]; 0.0 when either operand has (near-)zero
/// magnitude. Length checking is the caller's responsibility — the search
/// layer rejects mismatched corpora before scoring.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let denom = magnitude(a) * magnitude(b);
    if denom < EPSILON {
        return 0.0;
    }
    // Clamp: f64 rounding can push a self-similarity a hair past 1.
    (dot(a, b) / denom).clamp(-1.0, 1.0) as f32
}

/// Scale a vector to unit length; a zero vector is returned unchanged.
pub fn normalize(v: &mut [f32]) {
    let mag = magnitude(v);
    if mag < EPSILON {
        return;
    }
    for x in v.iter_mut() {
        *x = (f64::from(*x) / mag) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.3, -1.2, 4.5, 0.0];
        let sim = cosine(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let sim = cosine(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let sim = cosine(&[2.0, 1.0], &[-2.0, -1.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero_not_nan() {
        let zero = vec![0.0; 4];
        assert_eq!(cosine(&[1.0, 2.0, 3.0, 4.0], &zero), 0.0);
        assert_eq!(cosine(&zero, &zero), 0.0);
    }

    #[test]
    fn test_cosine_within_bounds() {
        let a = vec![3.7, -0.1, 12.0, 5.5];
        let b = vec![-8.2, 4.4, 0.003, -1.0];
        let sim = cosine(&a, &b);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_cosine_is_magnitude_independent() {
        let a = vec![1.0, 2.0, 3.0];
        let scaled: Vec<f32> = a.iter().map(|x| x * 40.0).collect();
        assert!((cosine(&a, &scaled) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((magnitude(&v) - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        let mut v = vec![0.0, 0.0, 0.0];
        normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }
}
