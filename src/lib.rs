// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod advisory;
pub mod api;
pub mod catalog;
pub mod countries;
pub mod eligibility;
pub mod metrics;
pub mod normalize;
pub mod profile;
pub mod professions;
pub mod readiness;
pub mod scoring;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::catalog::{Criterion, VisaCatalog, VisaDefinition};
pub use crate::eligibility::{EligibilityReport, Engine, VisaResult, ELIGIBILITY_THRESHOLD};
pub use crate::profile::{FieldValue, Profile, SectionName};
pub use crate::professions::{ProfessionMatch, ProfessionMatcher};
pub use crate::readiness::{ReadinessResult, ScoreDetail};
