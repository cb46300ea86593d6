//! HTTP surface: a thin axum layer over the pure engine.
//!
//! Handlers validate, normalize, delegate, and wrap results in the
//! `{success, message, data}` envelope. All state is read-only `Arc`s, so
//! the router is freely cloneable across workers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::countries::{self, Country};
use crate::eligibility::{EligibilityReport, Engine};
use crate::normalize;
use crate::profile::Profile;
use crate::professions::ProfessionMatcher;
use crate::validate::{self, FieldError};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// State over the embedded reference data; handy for tests.
    pub fn from_defaults() -> Self {
        Self::new(Engine::from_defaults())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/visa/eligibility", post(calculate_eligibility))
        .route("/api/v1/metadata/professions", get(list_professions))
        .route(
            "/api/v1/metadata/professions/validate/{profession}",
            get(validate_profession),
        )
        .route("/api/v1/metadata/countries", get(list_countries))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/* ----------------------------
Response envelopes
---------------------------- */

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data,
        })
    }
}

#[derive(Serialize)]
struct ValidationFailure {
    success: bool,
    message: String,
    errors: Vec<FieldError>,
}

/* ----------------------------
Handlers
---------------------------- */

#[derive(Serialize)]
struct HealthOut {
    status: &'static str,
    timestamp: String,
}

async fn health() -> Json<HealthOut> {
    Json(HealthOut {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn calculate_eligibility(
    State(state): State<AppState>,
    Json(mut profile): Json<Profile>,
) -> Response {
    counter!("visa_eligibility_requests_total").increment(1);

    let errors = validate::validate_profile(&profile);
    if !errors.is_empty() {
        counter!("visa_eligibility_validation_failures_total").increment(1);
        let body = ValidationFailure {
            success: false,
            message: "Datos de solicitud inválidos".to_string(),
            errors,
        };
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    normalize::normalize_degree_fields(&mut profile);
    let report: EligibilityReport = state.engine.evaluate(&profile);

    ApiResponse::ok("Cálculo de elegibilidad completado", report).into_response()
}

#[derive(Serialize)]
struct ProfessionEntry {
    id: String,
    name: String,
    category: &'static str,
}

#[derive(Serialize)]
struct ProfessionsOut {
    professions: Vec<ProfessionEntry>,
    total: usize,
    categories: Vec<&'static str>,
}

async fn list_professions(State(state): State<AppState>) -> Response {
    let entries: Vec<ProfessionEntry> = state
        .engine
        .matcher()
        .professions()
        .iter()
        .map(|p| ProfessionEntry {
            id: p.clone(),
            name: capitalize(p),
            category: ProfessionMatcher::display_category(p),
        })
        .collect();

    let mut categories = Vec::new();
    for e in &entries {
        if !categories.contains(&e.category) {
            categories.push(e.category);
        }
    }

    let total = entries.len();
    ApiResponse::ok(
        "Valid professions retrieved",
        ProfessionsOut {
            professions: entries,
            total,
            categories,
        },
    )
    .into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfessionCheckOut {
    profession: String,
    is_valid: bool,
    suggestions: Vec<String>,
    message: &'static str,
}

async fn validate_profession(
    State(state): State<AppState>,
    Path(profession): Path<String>,
) -> Response {
    let matcher = state.engine.matcher();
    let is_valid = matcher.is_listed(&profession);
    let suggestions = if is_valid {
        Vec::new()
    } else {
        matcher.suggestions(&profession, 5)
    };

    let message = if is_valid {
        "This profession is eligible for NAFTA/USMCA visas"
    } else {
        "This profession is not recognized in the NAFTA/USMCA professional list"
    };

    ApiResponse::ok(
        "Profession validation result",
        ProfessionCheckOut {
            profession,
            is_valid,
            suggestions,
            message,
        },
    )
    .into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CountriesOut {
    countries: &'static [Country],
    total: usize,
    usmca_countries: usize,
}

async fn list_countries() -> Response {
    let usmca_countries = countries::COUNTRIES.iter().filter(|c| c.usmca).count();
    ApiResponse::ok(
        "Valid countries retrieved",
        CountriesOut {
            countries: countries::COUNTRIES,
            total: countries::COUNTRIES.len(),
            usmca_countries,
        },
    )
    .into_response()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
