// tests/catalog_config.rs
//
// Catalog and reference-data loading: embedded defaults, file overrides
// via env vars, and validation failures. Env-var tests are serialized
// because the variables are process-global.

use serial_test::serial;
use std::{env, fs};

use visa_readiness_engine::catalog::{Criterion, VisaCatalog, ENV_VISA_CATALOG_PATH};
use visa_readiness_engine::professions::{ProfessionMatcher, ENV_PROFESSIONS_CONFIG_PATH};

const MINI_CATALOG: &str = r#"
[[visa]]
code = "TN"
name = "Visa TN (test)"

[[visa.criteria]]
key = "nationality"
value = "MX"
weight = 0.5
required = true

[[visa.criteria]]
check = "NAFTA_LIST"
weight = 0.5
"#;

#[test]
fn embedded_catalog_is_complete() {
    let catalog = VisaCatalog::embedded();
    assert_eq!(catalog.len(), 20);
    assert_eq!(catalog.visas()[0].code, "TN");

    // Every definition carries at least one criterion with sane weights.
    for visa in catalog.visas() {
        assert!(!visa.criteria.is_empty(), "{} has no criteria", visa.code);
        for c in &visa.criteria {
            assert!(c.weight() >= 0.0, "{} has a negative weight", visa.code);
        }
    }
}

#[test]
fn mini_catalog_parses_into_typed_criteria() {
    let catalog = VisaCatalog::from_toml_str(MINI_CATALOG).expect("parse mini catalog");
    assert_eq!(catalog.len(), 1);

    let tn = &catalog.visas()[0];
    assert!(matches!(tn.criteria[0], Criterion::Field(_)));
    assert!(matches!(tn.criteria[1], Criterion::Profession(_)));
}

#[test]
#[serial]
fn catalog_env_override_is_honored() {
    let path = env::temp_dir().join("visa_catalog_override_test.toml");
    fs::write(&path, MINI_CATALOG).expect("write override catalog");

    env::set_var(ENV_VISA_CATALOG_PATH, &path);
    let loaded = VisaCatalog::load().expect("load override catalog");
    env::remove_var(ENV_VISA_CATALOG_PATH);
    let _ = fs::remove_file(&path);

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.visas()[0].name, "Visa TN (test)");
}

#[test]
#[serial]
fn broken_catalog_override_fails_startup_loudly() {
    let path = env::temp_dir().join("visa_catalog_broken_test.toml");
    fs::write(&path, "not really toml [[[").expect("write broken catalog");

    env::set_var(ENV_VISA_CATALOG_PATH, &path);
    let result = VisaCatalog::load();
    env::remove_var(ENV_VISA_CATALOG_PATH);
    let _ = fs::remove_file(&path);

    assert!(result.is_err(), "an explicit broken override must not be ignored");
}

#[test]
#[serial]
fn missing_env_falls_back_to_the_embedded_catalog() {
    env::remove_var(ENV_VISA_CATALOG_PATH);
    let catalog = VisaCatalog::load().expect("embedded fallback");
    assert_eq!(catalog.len(), 20);
}

#[test]
#[serial]
fn broken_professions_override_falls_back_to_embedded() {
    let path = env::temp_dir().join("professions_broken_test.json");
    fs::write(&path, "{ not json").expect("write broken professions file");

    env::set_var(ENV_PROFESSIONS_CONFIG_PATH, &path);
    let matcher = ProfessionMatcher::load();
    env::remove_var(ENV_PROFESSIONS_CONFIG_PATH);
    let _ = fs::remove_file(&path);

    // Reference data still works; the override was ignored.
    assert!(matcher.match_title(Some("engineer")).is_match);
}

#[test]
#[serial]
fn professions_override_is_honored() {
    let path = env::temp_dir().join("professions_override_test.json");
    fs::write(
        &path,
        r#"{"professions": ["blacksmith"], "generic_labor": ["cashier"]}"#,
    )
    .expect("write override professions file");

    env::set_var(ENV_PROFESSIONS_CONFIG_PATH, &path);
    let matcher = ProfessionMatcher::load();
    env::remove_var(ENV_PROFESSIONS_CONFIG_PATH);
    let _ = fs::remove_file(&path);

    assert!(matcher.match_title(Some("blacksmith")).is_match);
    assert!(!matcher.match_title(Some("engineer")).is_match);
}

#[test]
fn load_errors_name_the_offending_path() {
    let err = VisaCatalog::load_from_file("/nonexistent/visas.toml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/visas.toml"));
}
