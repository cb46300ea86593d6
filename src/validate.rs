//! Request validation for the eligibility endpoint.
//!
//! The engine itself is total and never rejects input; this front door
//! enforces the documented shapes so callers get actionable 400s instead
//! of silently-zero scores. Field names in errors use `section.field`
//! paths.

use serde::Serialize;

use crate::countries;
use crate::normalize::normalize_degree_level;
use crate::profile::{FieldValue, Profile, Section};

const PERCENT_FIELDS: &[&str] = &[
    "englishProficiency",
    "financialProof",
    "academicRecord",
    "tiesHomeCountry",
    "ownershipPercent",
];

const NON_NEGATIVE_FIELDS: &[&str] = &[
    "salary",
    "financialSupport",
    "investmentUSD",
    "jobCreation",
    "proofOfFunds",
    "workedAbroad",
];

const BOOL_FIELDS: &[&str] = &[
    "hasJobOffer",
    "hasJobOfferUS",
    "priorUSExperience",
    "seasonal",
    "returnTicket",
    "previousVisaRecord",
    "marriedToUSCitizen",
    "proofGenuineMarriage",
    "proofOfRelationship",
    "engagedToUSCitizen",
    "metInPerson",
    "intentToMarryIn90Days",
    "jointResidencePlan",
    "hasI20",
    "sponsorProgram",
    "exchangeTypeEligible",
    "purposeValid",
    "treatyCountry",
    "businessViable",
    "businessValid",
    "sourceOfFundsValid",
    "employedByCompany",
    "extraordinaryAbility",
    "awardRecognition",
    "peerReview",
    "nationalityEligible",
    "currentlyInUS",
    "victimOfCrime",
    "cooperateWithAuthorities",
    "recognizedArtistOrAthlete",
    "religiousWorker",
];

const JOB_TYPES: &[&str] = &["agricultural", "nonagricultural", "specialty"];

const RELATIONSHIPS: &[&str] = &["child_single_citizen", "spouse_child_LPR", "child_adult_LPR"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validate a profile. An empty error list means the request may proceed.
pub fn validate_profile(profile: &Profile) -> Vec<FieldError> {
    let mut errors = Vec::new();

    // The personal section, when supplied, must identify the applicant.
    if !profile.personal.is_empty() {
        validate_nationality(&profile.personal, &mut errors);
        validate_age(&profile.personal, &mut errors);
        validate_degree(&profile.personal, &mut errors);
    }

    let sections: [(&str, &Section); 4] = [
        ("personal", &profile.personal),
        ("employment", &profile.employment),
        ("familyTies", &profile.family_ties),
        ("preferences", &profile.preferences),
    ];

    for (section_name, section) in sections {
        for (key, value) in section {
            let Some(value) = value else { continue };
            let path = || format!("{section_name}.{key}");

            if PERCENT_FIELDS.contains(&key.as_str()) {
                match value.as_number() {
                    Some(n) if (0.0..=100.0).contains(&n) => {}
                    Some(_) => errors.push(err(path(), "must be between 0 and 100")),
                    None => errors.push(err(path(), "must be a number")),
                }
            } else if NON_NEGATIVE_FIELDS.contains(&key.as_str()) {
                match value.as_number() {
                    Some(n) if n >= 0.0 => {}
                    Some(_) => errors.push(err(path(), "must not be negative")),
                    None => errors.push(err(path(), "must be a number")),
                }
            } else if key == "visitDuration" {
                match value.as_number() {
                    Some(n) if (0.0..=365.0).contains(&n) => {}
                    Some(_) => errors.push(err(path(), "must be between 0 and 365 days")),
                    None => errors.push(err(path(), "must be a number")),
                }
            } else if BOOL_FIELDS.contains(&key.as_str()) {
                if value.as_bool().is_none() {
                    errors.push(err(path(), "must be a boolean"));
                }
            } else if key == "jobType" {
                match value.as_str() {
                    Some(s) if JOB_TYPES.contains(&s) => {}
                    _ => errors.push(err(
                        path(),
                        "must be one of: agricultural, nonagricultural, specialty",
                    )),
                }
            } else if key == "relationship" {
                match value.as_str() {
                    Some(s) if RELATIONSHIPS.contains(&s) => {}
                    _ => errors.push(err(
                        path(),
                        "must be one of: child_single_citizen, spouse_child_LPR, child_adult_LPR",
                    )),
                }
            }
        }
    }

    errors
}

fn validate_nationality(personal: &Section, errors: &mut Vec<FieldError>) {
    match personal.get("nationality").and_then(|v| v.as_ref()) {
        Some(FieldValue::Text(code))
            if code.len() == 2
                && code.chars().all(|c| c.is_ascii_alphabetic())
                && countries::is_known_code(code) => {}
        Some(_) => errors.push(err(
            "personal.nationality".into(),
            "must be a known 2-letter country code",
        )),
        None => errors.push(err("personal.nationality".into(), "is required")),
    }
}

fn validate_age(personal: &Section, errors: &mut Vec<FieldError>) {
    match personal.get("age").and_then(|v| v.as_ref()) {
        Some(FieldValue::Number(n)) if (18.0..=99.0).contains(n) => {}
        Some(FieldValue::Number(_)) => {
            errors.push(err("personal.age".into(), "must be between 18 and 99"))
        }
        Some(_) => errors.push(err("personal.age".into(), "must be a number")),
        None => errors.push(err("personal.age".into(), "is required")),
    }
}

fn validate_degree(personal: &Section, errors: &mut Vec<FieldError>) {
    match personal.get("degreeLevel").and_then(|v| v.as_ref()) {
        Some(FieldValue::Text(raw)) if normalize_degree_level(raw).is_some() => {}
        Some(_) => errors.push(err(
            "personal.degreeLevel".into(),
            "must be a recognized education level",
        )),
        None => errors.push(err("personal.degreeLevel".into(), "is required")),
    }
}

fn err(field: String, message: &str) -> FieldError {
    FieldError {
        field,
        message: message.to_string(),
    }
}
