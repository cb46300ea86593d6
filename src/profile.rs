//! Applicant profile: four named sections of optional scalar fields, plus
//! the field resolver with its documented section precedence.
//!
//! Absent and `null` are the same thing — "no value" — and both are
//! distinct from `0`/`false`. The profile is caller-owned, read-only input.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A scalar profile field. Criteria decide how to interpret it; a value of
/// the wrong shape simply earns no credit downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// One profile section. `Option` in the value position keeps explicit JSON
/// `null`s deserializable; the resolver treats them as absent.
pub type Section = HashMap<String, Option<FieldValue>>;

/// The full applicant profile. Every section and every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Accepts the legacy `personalInfo` spelling on input.
    #[serde(alias = "personalInfo")]
    pub personal: Section,
    pub employment: Section,
    pub family_ties: Section,
    pub preferences: Section,
}

impl Profile {
    /// Sections in resolution-precedence order.
    pub fn sections(&self) -> [&Section; 4] {
        [
            &self.personal,
            &self.employment,
            &self.family_ties,
            &self.preferences,
        ]
    }

    /// Look up `key` across sections: `personal` → `employment` →
    /// `familyTies` → `preferences`, first non-null value wins. A criterion
    /// may be declared without knowing which section the caller populated,
    /// so one deterministic order is the source of truth.
    pub fn resolve(&self, key: &str) -> Option<&FieldValue> {
        self.sections()
            .into_iter()
            .find_map(|section| section.get(key).and_then(|v| v.as_ref()))
    }

    /// Convenience for building profiles in tests and examples.
    pub fn set(&mut self, section: SectionName, key: &str, value: impl Into<FieldValue>) {
        let section = match section {
            SectionName::Personal => &mut self.personal,
            SectionName::Employment => &mut self.employment,
            SectionName::FamilyTies => &mut self.family_ties,
            SectionName::Preferences => &mut self.preferences,
        };
        section.insert(key.to_string(), Some(value.into()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionName {
    Personal,
    Employment,
    FamilyTies,
    Preferences,
}
