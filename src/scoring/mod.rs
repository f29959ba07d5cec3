//! Similarity scoring.
//!
//! `matchingRate = round(cosine_similarity * 100, 2)`. The score is not
//! clamped: opposed embeddings produce negative rates.


use crate::constants::{SCORE_DECIMALS, SCORE_SCALE};

/// Cosine of the angle between `a` and `b`.
///
/// Returns `0.0` for mismatched lengths, empty vectors, or a zero-norm
/// operand, so the result is always finite.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() { similarity } else { 0.0 }
}

/// Scales a similarity to a percentage rounded to two decimals.
///
/// Exact ties round to even, so `0.03125` becomes `3.12`.
#[inline]
pub fn matching_rate(similarity: f32) -> f64 {
    round_to(f64::from(similarity) * SCORE_SCALE, SCORE_DECIMALS)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
