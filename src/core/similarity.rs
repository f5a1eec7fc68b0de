/// Cosine similarity between two vectors
///
/// `dot(a, b) / (|a| * |b|)`. Defined as 0.0 when either vector has zero
/// magnitude, the dimensions disagree, or a component is not finite.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }

    let similarity = dot / denom;
    if !similarity.is_finite() {
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0)
}

/// Map a similarity to an integer percentage
///
/// Negative similarities count as 0%; the result is rounded to the nearest
/// integer.
#[inline]
pub fn match_percentage(similarity: f32) -> u8 {
    if similarity.is_nan() {
        return 0;
    }
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_components() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_identical_vectors() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_magnitude_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_match_percentage_bounds() {
        assert_eq!(match_percentage(-0.4), 0);
        assert_eq!(match_percentage(0.0), 0);
        assert_eq!(match_percentage(0.424), 42);
        assert_eq!(match_percentage(0.426), 43);
        assert_eq!(match_percentage(1.0), 100);
        assert_eq!(match_percentage(1.3), 100);
        assert_eq!(match_percentage(f32::NAN), 0);
    }
}
