//! Country reference table used by request validation and the metadata
//! endpoint. Static seed data, Latin-America focused like the rest of the
//! reference set.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub region: &'static str,
    pub usmca: bool,
}

pub const COUNTRIES: &[Country] = &[
    Country { code: "MX", name: "Mexico", region: "North America", usmca: true },
    Country { code: "CA", name: "Canada", region: "North America", usmca: true },
    Country { code: "US", name: "United States", region: "North America", usmca: true },
    Country { code: "AR", name: "Argentina", region: "South America", usmca: false },
    Country { code: "BR", name: "Brazil", region: "South America", usmca: false },
    Country { code: "CL", name: "Chile", region: "South America", usmca: false },
    Country { code: "CO", name: "Colombia", region: "South America", usmca: false },
    Country { code: "PE", name: "Peru", region: "South America", usmca: false },
    Country { code: "VE", name: "Venezuela", region: "South America", usmca: false },
    Country { code: "EC", name: "Ecuador", region: "South America", usmca: false },
    Country { code: "UY", name: "Uruguay", region: "South America", usmca: false },
    Country { code: "PY", name: "Paraguay", region: "South America", usmca: false },
    Country { code: "BO", name: "Bolivia", region: "South America", usmca: false },
    Country { code: "GT", name: "Guatemala", region: "Central America", usmca: false },
    Country { code: "CR", name: "Costa Rica", region: "Central America", usmca: false },
    Country { code: "PA", name: "Panama", region: "Central America", usmca: false },
    Country { code: "HN", name: "Honduras", region: "Central America", usmca: false },
    Country { code: "SV", name: "El Salvador", region: "Central America", usmca: false },
    Country { code: "NI", name: "Nicaragua", region: "Central America", usmca: false },
    Country { code: "DO", name: "Dominican Republic", region: "Caribbean", usmca: false },
    Country { code: "CU", name: "Cuba", region: "Caribbean", usmca: false },
    Country { code: "ES", name: "Spain", region: "Europe", usmca: false },
];

/// Case-insensitive membership test for validation.
pub fn is_known_code(code: &str) -> bool {
    COUNTRIES
        .iter()
        .any(|c| c.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_expected_size_and_usmca_members() {
        assert_eq!(COUNTRIES.len(), 22);
        assert_eq!(COUNTRIES.iter().filter(|c| c.usmca).count(), 3);
    }

    #[test]
    fn known_code_lookup_is_case_insensitive() {
        assert!(is_known_code("MX"));
        assert!(is_known_code("mx"));
        assert!(!is_known_code("ZZ"));
        assert!(!is_known_code("INVALID"));
    }
}
