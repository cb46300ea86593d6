//! # Readiness Calculator
//! Pure, testable logic that maps `(profile, criteria)` → `ReadinessResult`.
//! No I/O, safe to run concurrently against the shared read-only catalog.
//!
//! Policy: a failed required criterion zeroes the whole visa immediately —
//! a treaty visa must not show a deceptively non-zero score when its hard
//! prerequisite is unmet. Everything else earns graduated partial credit,
//! aggregated by weight.

use serde::{Deserialize, Serialize};

use crate::catalog::Criterion;
use crate::profile::Profile;
use crate::professions::ProfessionMatcher;
use crate::scoring::{required_bar_met, score_field};

/// Achievement record for one evaluated criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    /// Field key, or the check tag for profession criteria.
    pub key: String,
    /// 0–100.
    pub achieved: f64,
    pub weight: f64,
}

/// Outcome of evaluating one visa definition's criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResult {
    /// Weighted percentage, rounded half-up to the nearest integer.
    pub percentage: u8,
    pub details: Vec<ScoreDetail>,
    /// True when a required criterion's bar was unmet. Details are
    /// discarded in that case; the flag is the whole story.
    pub required_failed: bool,
}

impl ReadinessResult {
    fn required_failure() -> Self {
        Self {
            percentage: 0,
            details: Vec::new(),
            required_failed: true,
        }
    }
}

/// Evaluate an ordered criteria list against a profile.
///
/// Criteria are independent; order only shapes the `details` output.
pub fn evaluate(
    profile: &Profile,
    criteria: &[Criterion],
    matcher: &ProfessionMatcher,
) -> ReadinessResult {
    let mut score = 0.0;
    let mut max = 0.0;
    let mut details = Vec::with_capacity(criteria.len());

    for criterion in criteria {
        // Hard gates first: no partial credit survives a failed
        // prerequisite, even credit already computed.
        if criterion.required() && !required_met(profile, criterion, matcher) {
            return ReadinessResult::required_failure();
        }

        let achieved = match criterion {
            Criterion::Field(c) => score_field(c, profile.resolve(&c.key)),
            Criterion::Profession(_) => f64::from(profession_match(profile, matcher).confidence),
        };

        details.push(ScoreDetail {
            key: criterion.label().to_string(),
            achieved,
            weight: criterion.weight(),
        });
        score += achieved * criterion.weight();
        max += 100.0 * criterion.weight();
    }

    let percentage = if max > 0.0 {
        (100.0 * score / max).round() as u8
    } else {
        0
    };

    ReadinessResult {
        percentage,
        details,
        required_failed: false,
    }
}

fn required_met(profile: &Profile, criterion: &Criterion, matcher: &ProfessionMatcher) -> bool {
    match criterion {
        Criterion::Field(c) => required_bar_met(c, profile.resolve(&c.key)),
        // The binary matcher verdict gates; confidence never does.
        Criterion::Profession(_) => profession_match(profile, matcher).is_match,
    }
}

fn profession_match(
    profile: &Profile,
    matcher: &ProfessionMatcher,
) -> crate::professions::ProfessionMatch {
    matcher.match_title(profile.resolve("jobTitle").and_then(|v| v.as_str()))
}
