use crate::models::{PreferenceProfile, WeightMap};

/// Rescales `weights` so the largest value is exactly 1.0
///
/// Empty and all-zero maps come back unchanged. Relative order is preserved,
/// and normalizing an already normalized map is a no-op.
pub fn normalize(weights: &WeightMap) -> WeightMap {
    let mut normalized = weights.clone();
    normalize_in_place(&mut normalized);
    normalized
}

pub(crate) fn normalize_in_place(weights: &mut WeightMap) {
    let Some(max) = weights.max() else {
        return;
    };
    if max <= 0.0 {
        return;
    }
    for weight in weights.values_mut() {
        *weight /= max;
    }
}

/// Normalizes both weight maps of a profile
pub(crate) fn normalize_profile(profile: &mut PreferenceProfile) {
    normalize_in_place(&mut profile.genre_weights);
    normalize_in_place(&mut profile.author_weights);
}
