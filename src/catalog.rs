//! Visa definition catalog: criterion types, TOML schema, and the
//! compile-and-validate loading step.
//!
//! The catalog is static configuration — loaded once at startup, never
//! mutated, shared by reference across evaluations. Loading resolves
//! `VISA_CATALOG_PATH` first and falls back to the embedded default.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const ENV_VISA_CATALOG_PATH: &str = "VISA_CATALOG_PATH";

const EMBEDDED_TOML: &str = include_str!("../config/visas.toml");

static EMBEDDED: Lazy<VisaCatalog> = Lazy::new(|| {
    VisaCatalog::from_toml_str(EMBEDDED_TOML).expect("valid embedded visa catalog")
});

/// Exact-match target of a field criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Bool(bool),
    Text(String),
}

/// One rule inside a visa definition.
///
/// Data-driven criteria name a profile field; the profession variant
/// delegates to the matcher (the catalog's `check = "NAFTA_LIST"` tag).
/// A sum type here lets the scorer pattern-match exhaustively instead of
/// string-comparing a tag field.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Field(FieldCriterion),
    Profession(ProfessionCriterion),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldCriterion {
    pub key: String,
    pub value: Option<CriterionValue>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub weight: f64,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionCriterion {
    pub weight: f64,
    pub required: bool,
}

/// Wire tag of the profession check, kept for detail labels and config.
pub const PROFESSION_CHECK_TAG: &str = "NAFTA_LIST";

impl Criterion {
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::Field(c) => c.weight,
            Criterion::Profession(c) => c.weight,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            Criterion::Field(c) => c.required,
            Criterion::Profession(c) => c.required,
        }
    }

    /// Label used in score details: the field key, or the check tag.
    pub fn label(&self) -> &str {
        match self {
            Criterion::Field(c) => &c.key,
            Criterion::Profession(_) => PROFESSION_CHECK_TAG,
        }
    }
}

/// One visa category with its ordered criteria.
#[derive(Debug, Clone)]
pub struct VisaDefinition {
    pub code: String,
    pub name: String,
    pub criteria: Vec<Criterion>,
}

/// The full catalog, in file order. Ordering matters: it is the stable
/// tie-breaker when results are ranked.
#[derive(Debug, Clone)]
pub struct VisaCatalog {
    visas: Vec<VisaDefinition>,
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Deserialize)]
struct CatalogRoot {
    #[serde(rename = "visa")]
    visas: Vec<VisaCfg>,
}

#[derive(Debug, Deserialize)]
struct VisaCfg {
    code: String,
    name: String,
    #[serde(default)]
    criteria: Vec<CriterionCfg>,
}

#[derive(Debug, Deserialize)]
struct CriterionCfg {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    check: Option<String>,
    #[serde(default)]
    value: Option<CriterionValue>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    weight: f64,
    #[serde(default)]
    required: bool,
}

impl VisaCatalog {
    /// Parse and validate a TOML catalog.
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let root: CatalogRoot = toml::from_str(raw).context("parse visa catalog")?;
        if root.visas.is_empty() {
            anyhow::bail!("visa catalog: no visa definitions");
        }

        let visas = root
            .visas
            .into_iter()
            .map(compile_visa)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { visas })
    }

    /// The embedded default catalog.
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Load from `VISA_CATALOG_PATH` if set (an explicit but broken
    /// override fails startup), otherwise use the embedded default.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var(ENV_VISA_CATALOG_PATH) {
            Ok(path) => Self::load_from_file(&path),
            Err(_) => Ok(Self::embedded()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read visa catalog at {}", path.as_ref().display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn visas(&self) -> &[VisaDefinition] {
        &self.visas
    }

    pub fn len(&self) -> usize {
        self.visas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visas.is_empty()
    }
}

fn compile_visa(cfg: VisaCfg) -> anyhow::Result<VisaDefinition> {
    if cfg.code.trim().is_empty() {
        anyhow::bail!("visa definition with empty code");
    }
    if cfg.name.trim().is_empty() {
        anyhow::bail!("visa `{}`: empty name", cfg.code);
    }
    if cfg.criteria.is_empty() {
        anyhow::bail!("visa `{}`: no criteria", cfg.code);
    }

    let criteria = cfg
        .criteria
        .into_iter()
        .map(|c| compile_criterion(&cfg.code, c))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(VisaDefinition {
        code: cfg.code,
        name: cfg.name,
        criteria,
    })
}

fn compile_criterion(code: &str, cfg: CriterionCfg) -> anyhow::Result<Criterion> {
    if !(cfg.weight.is_finite() && cfg.weight >= 0.0) {
        anyhow::bail!("visa `{code}`: criterion weight must be a non-negative number");
    }

    match (cfg.key, cfg.check) {
        (Some(key), None) => {
            if key.trim().is_empty() {
                anyhow::bail!("visa `{code}`: criterion with empty key");
            }
            Ok(Criterion::Field(FieldCriterion {
                key,
                value: cfg.value,
                min: cfg.min,
                max: cfg.max,
                weight: cfg.weight,
                required: cfg.required,
            }))
        }
        (None, Some(check)) => {
            if check != PROFESSION_CHECK_TAG {
                anyhow::bail!("visa `{code}`: unknown check tag `{check}`");
            }
            Ok(Criterion::Profession(ProfessionCriterion {
                weight: cfg.weight,
                required: cfg.required,
            }))
        }
        (Some(_), Some(_)) => {
            anyhow::bail!("visa `{code}`: criterion declares both key and check")
        }
        (None, None) => anyhow::bail!("visa `{code}`: criterion needs a key or a check"),
    }
}
