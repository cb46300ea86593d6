//! # Eligibility Engine
//! Runs the readiness calculator across the whole visa catalog and ranks
//! the outcome. Pure and deterministic: identical profile in, identical
//! report out. The only shared inputs — catalog and profession data — are
//! read-only after startup, so concurrent evaluations need no locking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advisory;
use crate::catalog::VisaCatalog;
use crate::profile::Profile;
use crate::professions::ProfessionMatcher;
use crate::readiness::{self, ScoreDetail};

/// Minimum score for a visa to count as a realistic option.
pub const ELIGIBILITY_THRESHOLD: u8 = 50;

/// One ranked catalog entry in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaResult {
    pub code: String,
    pub name: String,
    pub score: u8,
    pub category: String,
    pub requirements: Vec<ScoreDetail>,
    pub next_steps: Vec<String>,
}

/// The full evaluation outcome, built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub overall_score: u8,
    pub eligible_visas: Vec<VisaResult>,
    pub all_visas: Vec<VisaResult>,
}

/// Human-readable preparedness band. The threshold values are the engine
/// contract; the labels are presentation data.
pub fn score_category(score: u8) -> &'static str {
    if score >= 90 {
        "Muy preparado"
    } else if score >= 70 {
        "Bien preparado"
    } else if score >= 50 {
        "Preparación moderada"
    } else if score >= 30 {
        "Preparación baja"
    } else {
        "No preparado"
    }
}

/// The scoring engine: the immutable catalog plus the profession matcher.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: VisaCatalog,
    matcher: ProfessionMatcher,
}

impl Engine {
    pub fn new(catalog: VisaCatalog, matcher: ProfessionMatcher) -> Self {
        Self { catalog, matcher }
    }

    /// Engine over the embedded reference data.
    pub fn from_defaults() -> Self {
        Self::new(VisaCatalog::embedded(), ProfessionMatcher::embedded())
    }

    pub fn catalog(&self) -> &VisaCatalog {
        &self.catalog
    }

    pub fn matcher(&self) -> &ProfessionMatcher {
        &self.matcher
    }

    /// Evaluate a profile against every visa definition.
    ///
    /// Never fails: missing or malformed sections mean "nothing satisfied",
    /// not an error.
    pub fn evaluate(&self, profile: &Profile) -> EligibilityReport {
        let mut all: Vec<VisaResult> = self
            .catalog
            .visas()
            .iter()
            .map(|visa| {
                let readiness = readiness::evaluate(profile, &visa.criteria, &self.matcher);
                VisaResult {
                    code: visa.code.clone(),
                    name: visa.name.clone(),
                    score: readiness.percentage,
                    category: score_category(readiness.percentage).to_string(),
                    next_steps: advisory::next_steps(visa, &readiness),
                    requirements: readiness.details,
                }
            })
            .collect();

        // Stable sort: ties keep catalog order.
        all.sort_by(|a, b| b.score.cmp(&a.score));

        let eligible_visas: Vec<VisaResult> = all
            .iter()
            .filter(|v| v.score >= ELIGIBILITY_THRESHOLD)
            .cloned()
            .collect();
        let overall_score = all.first().map(|v| v.score).unwrap_or(0);

        // Anonymized diagnostics only: a short hash stands in for the
        // profile, raw applicant data never reaches the logs.
        debug!(
            id = %anon_hash(profile),
            overall = overall_score,
            eligible = eligible_visas.len(),
            top = all.first().map(|v| v.code.as_str()).unwrap_or("-"),
            "eligibility evaluated"
        );

        EligibilityReport {
            overall_score,
            eligible_visas,
            all_visas: all,
        }
    }
}

/// Short anonymized identifier for a profile (first 6 digest bytes).
fn anon_hash(profile: &Profile) -> String {
    use sha2::{Digest, Sha256};
    let serialized = serde_json::to_vec(profile).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&serialized);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SectionName;

    fn engine() -> Engine {
        Engine::from_defaults()
    }

    fn strong_mexican_engineer() -> Profile {
        let mut p = Profile::default();
        p.set(SectionName::Personal, "nationality", "MX");
        p.set(SectionName::Personal, "age", 30);
        p.set(SectionName::Personal, "degreeLevel", "bachelor");
        p.set(SectionName::Personal, "englishProficiency", 80);
        p.set(SectionName::Employment, "jobTitle", "engineer");
        p.set(SectionName::Employment, "jobType", "specialty");
        p.set(SectionName::Employment, "hasJobOffer", true);
        p.set(SectionName::Employment, "salary", 70_000);
        p
    }

    #[test]
    fn all_scores_stay_in_bounds() {
        let report = engine().evaluate(&strong_mexican_engineer());
        assert!(report.overall_score <= 100);
        for v in &report.all_visas {
            assert!(v.score <= 100, "{} out of bounds: {}", v.code, v.score);
            for d in &v.requirements {
                assert!((0.0..=100.0).contains(&d.achieved), "{}: {}", v.code, d.achieved);
            }
        }
    }

    #[test]
    fn all_visas_sorted_descending_and_eligible_is_the_threshold_subset() {
        let report = engine().evaluate(&strong_mexican_engineer());

        for pair in report.all_visas.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        let expected: Vec<&VisaResult> = report
            .all_visas
            .iter()
            .filter(|v| v.score >= ELIGIBILITY_THRESHOLD)
            .collect();
        assert_eq!(report.eligible_visas.len(), expected.len());
        for (a, b) in report.eligible_visas.iter().zip(expected) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn overall_score_is_the_top_ranked_score() {
        let report = engine().evaluate(&strong_mexican_engineer());
        assert_eq!(report.overall_score, report.all_visas[0].score);
    }

    #[test]
    fn empty_profile_scores_zero_everywhere() {
        let report = engine().evaluate(&Profile::default());
        assert_eq!(report.overall_score, 0);
        assert!(report.eligible_visas.is_empty());
        assert_eq!(report.all_visas.len(), engine().catalog().len());
        assert!(report.all_visas.iter().all(|v| v.score == 0));
    }

    #[test]
    fn ties_preserve_catalog_order() {
        // Every visa scores 0 on an empty profile, so the ranking must be
        // exactly the catalog order.
        let report = engine().evaluate(&Profile::default());
        let catalog_codes: Vec<String> = engine()
            .catalog()
            .visas()
            .iter()
            .map(|v| v.code.clone())
            .collect();
        let ranked_codes: Vec<String> =
            report.all_visas.iter().map(|v| v.code.clone()).collect();
        assert_eq!(ranked_codes, catalog_codes);
    }

    #[test]
    fn category_labels_follow_the_threshold_table() {
        assert_eq!(score_category(95), "Muy preparado");
        assert_eq!(score_category(90), "Muy preparado");
        assert_eq!(score_category(89), "Bien preparado");
        assert_eq!(score_category(70), "Bien preparado");
        assert_eq!(score_category(69), "Preparación moderada");
        assert_eq!(score_category(50), "Preparación moderada");
        assert_eq!(score_category(49), "Preparación baja");
        assert_eq!(score_category(30), "Preparación baja");
        assert_eq!(score_category(29), "No preparado");
        assert_eq!(score_category(0), "No preparado");
    }

    #[test]
    fn evaluation_is_deterministic() {
        let e = engine();
        let p = strong_mexican_engineer();
        let a = serde_json::to_string(&e.evaluate(&p)).unwrap();
        let b = serde_json::to_string(&e.evaluate(&p)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn results_carry_categories_and_next_steps() {
        let report = engine().evaluate(&strong_mexican_engineer());
        for v in &report.all_visas {
            assert!(!v.category.is_empty());
            assert!(!v.next_steps.is_empty());
            assert!(v.next_steps.len() <= 8);
        }
    }
}
