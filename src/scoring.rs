//! Graduated criterion scoring.
//!
//! Converts a resolved profile value plus one field criterion into a 0–100
//! achievement score. Real applicants cluster near thresholds, so numeric
//! bounds earn proportional linear credit instead of a pass/fail cliff.
//! The function is total: missing, malformed, or mistyped values degrade
//! to 0, never to an error.

use crate::catalog::{CriterionValue, FieldCriterion};
use crate::profile::FieldValue;

/// Score one field criterion against its resolved value.
///
/// Dispatch order: exact `value` → `min`/`max` bounds → named
/// special-field curve → 0 for anything unknown.
pub fn score_field(criterion: &FieldCriterion, value: Option<&FieldValue>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    if let Some(expected) = &criterion.value {
        return if exact_matches(&criterion.key, expected, value) {
            100.0
        } else {
            0.0
        };
    }

    match (criterion.min, criterion.max) {
        (Some(min), None) => {
            let Some(n) = finite_number(value) else {
                return 0.0;
            };
            if n >= min {
                100.0
            } else {
                ratio_credit(n, min)
            }
        }
        (None, Some(max)) => {
            let Some(n) = finite_number(value) else {
                return 0.0;
            };
            if n <= max {
                100.0
            } else {
                ratio_credit(max, n)
            }
        }
        (Some(min), Some(max)) => {
            let Some(n) = finite_number(value) else {
                return 0.0;
            };
            if n >= min && n <= max {
                100.0
            } else if n < min {
                ratio_credit(n, min)
            } else {
                ratio_credit(max, n)
            }
        }
        (None, None) => special_curve(&criterion.key, value),
    }
}

/// Binary pass test used by required-criterion gates: equality for `value`
/// targets, hard bound checks for `min`/`max`. A missing value fails a
/// `min` bound but passes a `max` bound (only a present, exceeding value
/// fails it). A criterion with no bar at all always passes.
pub fn required_bar_met(criterion: &FieldCriterion, value: Option<&FieldValue>) -> bool {
    if let Some(expected) = &criterion.value {
        match value {
            Some(v) if exact_matches(&criterion.key, expected, v) => {}
            _ => return false,
        }
    }
    if let Some(min) = criterion.min {
        match value.and_then(finite_number) {
            Some(n) if n >= min => {}
            _ => return false,
        }
    }
    if let Some(max) = criterion.max {
        if let Some(n) = value.and_then(finite_number) {
            if n > max {
                return false;
            }
        }
    }
    true
}

/// Exact-match semantics shared by the scorer and the required gate.
///
/// One named exception: a `degreeLevel == "bachelor"` bar is satisfied by
/// any credential at bachelor's level or above.
fn exact_matches(key: &str, expected: &CriterionValue, value: &FieldValue) -> bool {
    match expected {
        CriterionValue::Bool(b) => value.as_bool() == Some(*b),
        CriterionValue::Text(s) => {
            if key == "degreeLevel" && s == "bachelor" {
                matches!(value.as_str(), Some("bachelor" | "master" | "doctorate"))
            } else {
                value.as_str() == Some(s.as_str())
            }
        }
    }
}

/// Linear proportional credit, clamped to 0–100 and hardened against
/// degenerate bounds.
fn ratio_credit(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    let credit = 100.0 * numerator / denominator;
    if credit.is_finite() {
        credit.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn finite_number(value: &FieldValue) -> Option<f64> {
    value.as_number().filter(|n| n.is_finite())
}

/// Curves for criteria that carry neither a target value nor bounds.
fn special_curve(key: &str, value: &FieldValue) -> f64 {
    let Some(n) = finite_number(value) else {
        return 0.0;
    };
    match key {
        // Self-assessed 0–100 signals pass through, clamped.
        "financialProof" | "academicRecord" | "tiesHomeCountry" | "englishProficiency" => {
            n.clamp(0.0, 100.0)
        }
        "salary" => salary_curve(n),
        "age" => age_curve(n),
        "visitDuration" => visit_duration_curve(n),
        _ => 0.0,
    }
}

fn salary_curve(salary: f64) -> f64 {
    if salary >= 80_000.0 {
        95.0
    } else if salary >= 50_000.0 {
        80.0
    } else if salary >= 25_000.0 {
        60.0
    } else if salary >= 15_000.0 {
        40.0
    } else if salary >= 10_000.0 {
        20.0
    } else {
        10.0
    }
}

/// Favors prime working age; the bands widen outward.
fn age_curve(age: f64) -> f64 {
    if (30.0..=35.0).contains(&age) {
        95.0
    } else if (25.0..=40.0).contains(&age) {
        80.0
    } else if (20.0..=50.0).contains(&age) {
        70.0
    } else if (18.0..=60.0).contains(&age) {
        50.0
    } else {
        35.0
    }
}

/// Shorter planned stays read as stronger nonimmigrant intent.
fn visit_duration_curve(days: f64) -> f64 {
    if days <= 30.0 {
        80.0
    } else if days <= 90.0 {
        60.0
    } else if days <= 180.0 {
        40.0
    } else {
        20.0
    }
}
