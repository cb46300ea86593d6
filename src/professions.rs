//! # Profession Matcher
//!
//! Resolves a free-text job title (English or Spanish, with informal
//! variation and abbreviations) against the canonical USMCA/NAFTA
//! profession list.
//!
//! - Loads from JSON config (list + translations + variations + category
//!   keyword rules), with an embedded default.
//! - Case-insensitive lookup with whitespace normalization.
//! - Fallback order: exact → Spanish translation → bidirectional substring
//!   → variation/synonym table → category keyword heuristic → floor.
//! - Only the first four tiers count as a *match*; the heuristic tiers
//!   yield partial confidence with `is_match = false`.
//!
//! Confidence feeds the graduated scorer as an `achieved` value; `is_match`
//! is consulted solely by required-criterion gates.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::{fs, path::Path};
use tracing::warn;

pub const ENV_PROFESSIONS_CONFIG_PATH: &str = "PROFESSIONS_CONFIG_PATH";

const EMBEDDED_JSON: &str = include_str!("../config/professions.json");

static EMBEDDED: Lazy<ProfessionMatcher> = Lazy::new(|| {
    ProfessionMatcher::from_json_str(EMBEDDED_JSON).expect("valid embedded profession data")
});

/// Confidence levels per tier. Exact hits are authoritative; the fuzzy
/// tiers sit just below, far above the category heuristics.
const CONFIDENCE_EXACT: u8 = 100;
const CONFIDENCE_SUBSTRING: u8 = 95;
const CONFIDENCE_VARIATION: u8 = 90;
const CONFIDENCE_FLOOR_PROFESSIONAL: u8 = 30;
const CONFIDENCE_FLOOR_GENERIC: u8 = 20;

/// Entries shorter than this never participate in substring tests; "rn"
/// would otherwise hide inside "modern". Short forms still match exactly.
const MIN_SUBSTRING_LEN: usize = 3;

/// Raw reference data as stored in `config/professions.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfessionData {
    pub professions: Vec<String>,
    #[serde(default)]
    pub spanish: HashMap<String, String>,
    #[serde(default)]
    pub variations: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
    #[serde(default)]
    pub generic_labor: Vec<String>,
}

/// One partial-credit classification bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub confidence: u8,
    pub keywords: Vec<String>,
}

/// Result of a lookup: whether the title counts as a listed profession and
/// how much credit it earns either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfessionMatch {
    pub is_match: bool,
    pub confidence: u8,
}

impl ProfessionMatch {
    const NONE: ProfessionMatch = ProfessionMatch {
        is_match: false,
        confidence: 0,
    };

    fn hit(confidence: u8) -> Self {
        ProfessionMatch {
            is_match: true,
            confidence,
        }
    }

    fn partial(confidence: u8) -> Self {
        ProfessionMatch {
            is_match: false,
            confidence,
        }
    }
}

/// Compiled matcher: reference data plus an exact-membership set.
/// Immutable after construction and safe to share across evaluations.
#[derive(Debug, Clone)]
pub struct ProfessionMatcher {
    data: ProfessionData,
    exact: HashSet<String>,
}

impl ProfessionMatcher {
    /// Build from a JSON string, normalizing entries defensively.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let mut data: ProfessionData =
            serde_json::from_str(raw).context("parse profession reference data")?;
        if data.professions.is_empty() {
            anyhow::bail!("profession reference data: empty canonical list");
        }
        for p in &mut data.professions {
            *p = normalize(p);
        }
        data.professions.sort();
        data.professions.dedup();
        let exact = data.professions.iter().cloned().collect();
        Ok(Self { data, exact })
    }

    /// Matcher built from the embedded reference data.
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Load from `PROFESSIONS_CONFIG_PATH` if set, else the embedded data.
    /// A broken override logs and falls back rather than failing startup.
    pub fn load() -> Self {
        match std::env::var(ENV_PROFESSIONS_CONFIG_PATH) {
            Ok(path) => match Self::load_from_file(&path) {
                Ok(m) => m,
                Err(e) => {
                    warn!(%path, error = %e, "profession config override unusable, using embedded data");
                    Self::embedded()
                }
            },
            Err(_) => Self::embedded(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("read profession config at {}", path.as_ref().display())
        })?;
        Self::from_json_str(&raw)
    }

    /// Match a job title. `None`, empty, and whitespace-only titles earn
    /// nothing.
    pub fn match_title(&self, title: Option<&str>) -> ProfessionMatch {
        let Some(raw) = title else {
            return ProfessionMatch::NONE;
        };
        let t = normalize(raw);
        if t.is_empty() {
            return ProfessionMatch::NONE;
        }
        self.match_normalized(&t, 0)
    }

    fn match_normalized(&self, t: &str, depth: u8) -> ProfessionMatch {
        // 1) Exact membership in the canonical list.
        if self.exact.contains(t) {
            return ProfessionMatch::hit(CONFIDENCE_EXACT);
        }

        // 2) Spanish translation, then re-match the English term. Depth
        //    guard keeps a miswired table from looping.
        if depth < 2 {
            if let Some(en) = self.data.spanish.get(t) {
                return self.match_normalized(&normalize(en), depth + 1);
            }
        }

        // 3) Bidirectional substring against the canonical list: covers
        //    "senior software engineer" ⊇ "software engineer" and
        //    "engineer" ⊆ "mechanical engineer".
        if self
            .data
            .professions
            .iter()
            .any(|p| bidirectional_contains(t, p))
        {
            return ProfessionMatch::hit(CONFIDENCE_SUBSTRING);
        }

        // 4) Known synonyms/abbreviations per canonical profession.
        for synonyms in self.data.variations.values() {
            for syn in synonyms {
                let s = normalize(syn);
                if s == t || bidirectional_contains(t, &s) {
                    return ProfessionMatch::hit(CONFIDENCE_VARIATION);
                }
            }
        }

        // 5) Category keyword heuristic: partial credit, never a match.
        for cat in &self.data.categories {
            if cat.keywords.iter().any(|kw| t.contains(normalize(kw).as_str())) {
                return ProfessionMatch::partial(cat.confidence);
            }
        }

        // 6) Floor: generic-labor terms bottom out, anything else that
        //    looks like a real title keeps a sliver of credit.
        if self.data.generic_labor.iter().any(|g| t.contains(g.as_str())) {
            return ProfessionMatch::partial(CONFIDENCE_FLOOR_GENERIC);
        }
        if t.chars().count() > 3 {
            ProfessionMatch::partial(CONFIDENCE_FLOOR_PROFESSIONAL)
        } else {
            ProfessionMatch::partial(CONFIDENCE_FLOOR_GENERIC)
        }
    }

    /// Exact list membership, used by the metadata validation endpoint.
    pub fn is_listed(&self, title: &str) -> bool {
        self.exact.contains(normalize(title).as_str())
    }

    /// Canonical professions in sorted order.
    pub fn professions(&self) -> &[String] {
        &self.data.professions
    }

    /// Closest canonical professions for an unrecognized title, ranked by
    /// substring containment first and Levenshtein similarity second.
    pub fn suggestions(&self, input: &str, limit: usize) -> Vec<String> {
        let t = normalize(input);
        if t.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(f64, &String)> = self
            .data
            .professions
            .iter()
            .map(|p| {
                let score = if bidirectional_contains(&t, p) {
                    1.0
                } else {
                    strsim::normalized_levenshtein(&t, p)
                };
                (score, p)
            })
            .filter(|(score, _)| *score >= 0.5)
            .collect();

        ranked.sort_by(|(sa, pa), (sb, pb)| {
            sb.partial_cmp(sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| pa.cmp(pb))
        });
        ranked.into_iter().take(limit).map(|(_, p)| p.clone()).collect()
    }

    /// Display grouping for the metadata listing. Presentation only.
    pub fn display_category(profession: &str) -> &'static str {
        let p = profession;
        if p.contains("engineer") || p.contains("engineering") {
            "Engineering"
        } else if p.contains("doctor")
            || p.contains("physician")
            || p.contains("medical")
            || p.contains("nurse")
            || p.contains("dentist")
            || p.contains("therapist")
            || p.contains("pharma")
        {
            "Medical"
        } else if p.contains("scientist")
            || p.contains("research")
            || p.contains("biolog")
            || p.contains("chemist")
            || p.contains("physicist")
        {
            "Science"
        } else if p.contains("programmer")
            || p.contains("developer")
            || p.contains("analyst")
            || p.contains("computer")
            || p.contains("systems")
        {
            "Technology"
        } else if p.contains("manager")
            || p.contains("consultant")
            || p.contains("accountant")
            || p.contains("economist")
        {
            "Business"
        } else if p.contains("lawyer") || p.contains("attorney") || p.contains("counsel") {
            "Legal"
        } else if p.contains("teacher") || p.contains("professor") {
            "Education"
        } else if p.contains("designer") || p.contains("architect") {
            "Design"
        } else {
            "General"
        }
    }
}

/// Substring test in both directions, skipping entries too short to be
/// meaningful substrings.
fn bidirectional_contains(title: &str, entry: &str) -> bool {
    (entry.chars().count() >= MIN_SUBSTRING_LEN && title.contains(entry))
        || (title.chars().count() >= MIN_SUBSTRING_LEN && entry.contains(title))
}

/// Lowercase, trim, collapse internal whitespace.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
