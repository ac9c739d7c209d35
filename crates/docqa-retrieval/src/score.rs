//! Distance-to-confidence calibration.
//!
//! Breakpoints were calibrated against L2 distances of normalized
//! `text-embedding-3-small` vectors; they are fixed constants.

/// `(upper bound inclusive, similarity)` pairs, checked in order.
const BANDS: [(f32, f32); 4] = [(0.8, 0.90), (1.0, 0.75), (1.2, 0.60), (1.5, 0.40)];
const FLOOR: f32 = 0.20;

/// Maps an index distance (lower is closer) to a similarity in [0, 1].
///
/// Non-increasing step function over `BANDS`; anything above the last
/// breakpoint gets `FLOOR`. Inputs are expected to be finite and
/// non-negative; validating them is the caller's job.
pub fn normalize(distance: f32) -> f32 {
    BANDS
        .iter()
        .find(|(upper, _)| distance <= *upper)
        .map_or(FLOOR, |(_, similarity)| *similarity)
}
