//! Set and vector similarity measures.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::StatsError;

/// Jaccard similarity between two sets: `|A ∩ B| / |A ∪ B|`.
///
/// Two empty sets are identical (1.0); exactly one empty set shares
/// nothing (0.0).
pub fn jaccard_similarity<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Cosine similarity between two feature vectors.
///
/// Mismatched lengths are a feature-vector construction bug and return
/// [`StatsError::LengthMismatch`]. A zero-magnitude vector has no direction,
/// so the similarity is 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (mag_a * mag_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(items: &[i32]) -> HashSet<i32> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_jaccard_both_empty() {
        assert_eq!(jaccard_similarity::<i32>(&set(&[]), &set(&[])), 1.0);
    }

    #[test]
    fn test_jaccard_one_empty() {
        assert_eq!(jaccard_similarity(&set(&[]), &set(&[1])), 0.0);
        assert_eq!(jaccard_similarity(&set(&[1]), &set(&[])), 0.0);
    }

    #[test]
    fn test_jaccard_overlap() {
        // {1,2,3} vs {2,3,4}: intersection 2, union 4
        let sim = jaccard_similarity(&set(&[1, 2, 3]), &set(&[2, 3, 4]));
        assert!((sim - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_identical() {
        let sim = jaccard_similarity(&set(&[1, 2, 3]), &set(&[1, 2, 3]));
        assert_eq!(sim, 1.0);
    }

    #[test]
    fn test_cosine_identical_direction() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_magnitude() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_error() {
        let err = cosine_similarity(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatsError::LengthMismatch { left: 1, right: 2 });
    }

    proptest! {
        #[test]
        fn prop_jaccard_in_unit_interval(
            a in proptest::collection::hash_set(0i32..100, 0..20),
            b in proptest::collection::hash_set(0i32..100, 0..20),
        ) {
            let sim = jaccard_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&sim));
        }

        #[test]
        fn prop_cosine_bounded(
            v in proptest::collection::vec(-1e3f64..1e3, 1..10),
            w in proptest::collection::vec(-1e3f64..1e3, 1..10),
        ) {
            if v.len() == w.len() {
                let sim = cosine_similarity(&v, &w).unwrap();
                prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&sim));
            } else {
                prop_assert!(cosine_similarity(&v, &w).is_err());
            }
        }
    }
}
