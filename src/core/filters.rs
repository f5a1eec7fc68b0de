use crate::models::{FilterSet, Profile};

/// Check the age range (only when both bounds are present)
#[inline]
pub fn matches_age(profile: &Profile, filters: &FilterSet) -> bool {
    match (filters.age_min, filters.age_max) {
        (Some(min), Some(max)) => profile.age >= min && profile.age <= max,
        _ => true,
    }
}

/// Case-insensitive substring check on location
#[inline]
pub fn matches_location(profile: &Profile, filters: &FilterSet) -> bool {
    match &filters.location {
        Some(token) => profile
            .location
            .to_lowercase()
            .contains(&token.to_lowercase()),
        None => true,
    }
}

/// Exact relationship tag match
#[inline]
pub fn matches_relationship(profile: &Profile, filters: &FilterSet) -> bool {
    match filters.relationship_type {
        Some(tag) => profile.relationship_type == tag,
        None => true,
    }
}

/// Check a profile against every present filter
#[inline]
pub fn matches_filters(profile: &Profile, filters: &FilterSet) -> bool {
    matches_age(profile, filters)
        && matches_location(profile, filters)
        && matches_relationship(profile, filters)
}

/// Keep the candidates that pass every present filter, in input order
pub fn apply_filters(candidates: Vec<Profile>, filters: &FilterSet) -> Vec<Profile> {
    if filters.is_empty() {
        return candidates;
    }

    let before = candidates.len();
    let filtered: Vec<Profile> = candidates
        .into_iter()
        .filter(|profile| matches_filters(profile, filters))
        .collect();

    tracing::info!("Filtered {} profiles to {} profiles", before, filtered.len());
    filtered
}
