//! Bilingual degree-level normalization.
//!
//! Callers send education levels in Spanish or English, with spacing and
//! casing noise. The engine only ever sees the canonical enum; this runs
//! before evaluation as part of the serving layer.

use crate::profile::{FieldValue, Profile};

/// Canonical degree levels, lowest to highest.
pub const DEGREE_LEVELS: &[&str] = &[
    "none",
    "elementary",
    "middle_school",
    "high_school",
    "associate",
    "bachelor",
    "master",
    "doctorate",
];

/// Map a free-form degree string to its canonical form, or `None` if it is
/// not a recognized synonym. Whitespace is stripped so "high school" and
/// "highschool" are the same thing.
pub fn normalize_degree_level(input: &str) -> Option<&'static str> {
    let key: String = input
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let canonical = match key.as_str() {
        "none" | "ninguna" | "sinestudios" => "none",
        "primaria" | "elementary" => "elementary",
        "secundaria" | "middleschool" | "middle_school" => "middle_school",
        "preparatoria" | "highschool" | "high_school" => "high_school",
        "tecnico" | "técnico" | "technical" | "associate" => "associate",
        "licenciatura" | "bachelor" | "bsc" => "bachelor",
        "maestria" | "maestría" | "master" | "msc" => "master",
        "doctorado" | "phd" | "doctorate" => "doctorate",
        _ => return None,
    };
    Some(canonical)
}

/// Rewrite every `degreeLevel` field in the profile to canonical form.
/// Unrecognized values are left alone — validation has already rejected
/// them by the time this runs.
pub fn normalize_degree_fields(profile: &mut Profile) {
    let sections = [
        &mut profile.personal,
        &mut profile.employment,
        &mut profile.family_ties,
        &mut profile.preferences,
    ];
    for section in sections {
        let canonical = match section.get("degreeLevel") {
            Some(Some(FieldValue::Text(raw))) => normalize_degree_level(raw),
            _ => None,
        };
        if let Some(canonical) = canonical {
            section.insert(
                "degreeLevel".to_string(),
                Some(FieldValue::Text(canonical.to_string())),
            );
        }
    }
}
