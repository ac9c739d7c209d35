use docqa_core::types::ScoredMatch;

use crate::score::normalize;

/// Weight of the best-match similarity, in percent.
const SIMILARITY_WEIGHT: u64 = 70;
/// Weight of the filled fraction of `k`, in percent.
const AGREEMENT_WEIGHT: u64 = 30;

/// Fuses best-match similarity with result-count agreement into a
/// confidence in [0, 1], rounded to two decimals.
///
/// `matches` must be sorted ascending by distance; only the first one feeds
/// the similarity term. Agreement is `len / k`, capped at 1. The sum is
/// evaluated in exact hundredths and rounded half-up, so `0.215` becomes
/// `0.22` rather than drifting to `0.21` through binary floating point.
pub fn estimate(matches: &[ScoredMatch], k: usize) -> f32 {
    let Some(best) = matches.first() else { return 0.0 };
    if k == 0 { return 0.0; }

    let similarity_pct = (normalize(best.distance) * 100.0).round() as u64;
    let k = k as u64;
    let filled = (matches.len() as u64).min(k);

    // confidence * 100 == num / den
    let num = SIMILARITY_WEIGHT * similarity_pct * k + AGREEMENT_WEIGHT * 100 * filled;
    let den = 100 * k;
    let hundredths = (2 * num + den) / (2 * den);
    hundredths as f32 / 100.0
}
