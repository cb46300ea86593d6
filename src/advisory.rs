//! Next-step recommendations per visa result.
//!
//! Presentation logic, not scoring: improvement bullets for weak criteria
//! first, then visa-specific guidance split on a quality bar, then the
//! common closing steps. Output is capped at [`MAX_STEPS`].

use crate::catalog::VisaDefinition;
use crate::readiness::ReadinessResult;

pub const MAX_STEPS: usize = 8;

/// Details below this achievement level earn an improvement bullet.
const IMPROVEMENT_BAR: f64 = 50.0;

/// Percentage at or above which a visa gets "you are close, execute"
/// guidance instead of "build the basics" guidance.
const QUALITY_BAR: u8 = 70;

pub fn next_steps(visa: &VisaDefinition, result: &ReadinessResult) -> Vec<String> {
    let mut steps: Vec<String> = Vec::new();

    for detail in &result.details {
        if detail.achieved < IMPROVEMENT_BAR {
            if let Some(suggestion) = improvement_for(&detail.key) {
                let suggestion = suggestion.to_string();
                if !steps.contains(&suggestion) {
                    steps.push(suggestion);
                }
            }
        }
    }

    let prepared = result.percentage >= QUALITY_BAR;
    steps.extend(visa_guidance(&visa.code, prepared).iter().map(|s| s.to_string()));

    steps.push("Contacta a un asesor/consulado".to_string());
    steps.push("Prepara tus documentos".to_string());

    steps.truncate(MAX_STEPS);
    steps
}

/// Fixed criterion → suggestion table. Keys with nothing actionable
/// (nationality, relationship facts) are deliberately absent.
fn improvement_for(key: &str) -> Option<&'static str> {
    let suggestion = match key {
        "englishProficiency" => "Mejora tu nivel de inglés con un curso certificado (TOEFL/IELTS)",
        "financialProof" => "Mejora tu evidencia financiera: estados de cuenta, ingresos y ahorros",
        "academicRecord" => "Mejora tu expediente académico o apostilla tus certificados",
        "tiesHomeCountry" => "Documenta tus vínculos con tu país: empleo, propiedades, familia",
        "degreeLevel" => "Completa o revalida un título universitario (licenciatura o superior)",
        "hasJobOffer" | "hasJobOfferUS" => {
            "Consigue una oferta de trabajo formal de un empleador estadounidense"
        }
        "salary" => "Busca una oferta con salario más competitivo para tu categoría",
        "NAFTA_LIST" => "Verifica que tu profesión aparezca en la lista de profesiones USMCA/NAFTA",
        "proofOfFunds" => "Reúne comprobantes de fondos suficientes para tu estancia",
        "financialSupport" => "Asegura un patrocinador económico que cumpla el mínimo requerido",
        "visitDuration" => "Planea una estancia más corta y documenta tu fecha de regreso",
        "returnTicket" => "Reserva tu boleto de regreso antes de la entrevista",
        "investmentUSD" => "Incrementa el capital de inversión comprometido en el plan de negocio",
        "jobCreation" => "Amplía el plan de creación de empleos de tu inversión",
        "seasonal" => "Busca vacantes de temporada certificadas por el empleador",
        "workedAbroad" => "Acumula al menos un año continuo con tu empleador actual",
        _ => return None,
    };
    Some(suggestion)
}

/// Per-code guidance. `prepared` selects between execution steps and
/// foundation steps.
fn visa_guidance(code: &str, prepared: bool) -> &'static [&'static str] {
    match (code, prepared) {
        ("TN", true) => &[
            "Agenda tu cita consular para la visa TN",
            "Pide a tu empleador una carta detallando tu rol profesional NAFTA/USMCA",
        ],
        ("TN", false) => &[
            "Confirma que tu profesión califica bajo la lista NAFTA/USMCA",
            "Busca empleadores estadounidenses que contraten profesionales TN",
        ],
        ("H1B", true) => &[
            "Pide a tu empleador iniciar tu registro en la lotería H-1B",
            "Reúne evidencia de tu especialización y equivalencia de título",
        ],
        ("H1B", false) => &[
            "Busca empleadores dispuestos a patrocinar tu área de especialización",
            "Considera una maestría para fortalecer tu perfil de especialización",
        ],
        ("H2A", _) | ("H2B", _) => &[
            "Busca empleadores con certificación laboral temporal vigente",
            "Confirma que la vacante sea de temporada y con oferta formal",
        ],
        ("F1", true) => &[
            "Solicita tu formulario I-20 a la universidad o institución que te admitió",
            "Paga la cuota SEVIS y agenda tu entrevista consular",
        ],
        ("F1", false) => &[
            "Solicita admisión a una universidad o institución certificada",
            "Prepara tu examen de inglés y tu plan de financiamiento",
        ],
        ("J1", _) => &[
            "Encuentra un patrocinador de intercambio autorizado para tu programa",
        ],
        ("B1B2", true) => &[
            "Prepara un itinerario de viaje claro con fechas y reservas",
            "Lleva evidencia de tus vínculos y solvencia a la entrevista",
        ],
        ("B1B2", false) => &[
            "Fortalece tus vínculos documentables antes de solicitar",
            "Prepara un itinerario corto y un propósito de viaje concreto",
        ],
        ("IR1", _) | ("K1", _) => &[
            "Reúne evidencia de la relación: fotos, comunicaciones, declaraciones",
        ],
        ("E2", _) | ("EB5", _) => &[
            "Prepara un plan de negocio sólido y el rastreo del origen de los fondos",
        ],
        ("O1", _) => &[
            "Compila premios, publicaciones y cartas de expertos en tu campo",
        ],
        ("L1", _) => &[
            "Solicita a tu empresa la documentación de transferencia intracompañía",
        ],
        _ => &[
            "Consulta los requisitos específicos de esta categoría con el consulado",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::ScoreDetail;

    fn visa(code: &str) -> VisaDefinition {
        VisaDefinition {
            code: code.to_string(),
            name: format!("Visa {code}"),
            criteria: Vec::new(),
        }
    }

    fn result(percentage: u8, details: Vec<ScoreDetail>) -> ReadinessResult {
        ReadinessResult {
            percentage,
            details,
            required_failed: false,
        }
    }

    fn detail(key: &str, achieved: f64) -> ScoreDetail {
        ScoreDetail {
            key: key.to_string(),
            achieved,
            weight: 0.1,
        }
    }

    #[test]
    fn weak_details_produce_improvement_bullets_first() {
        let steps = next_steps(
            &visa("H1B"),
            &result(
                45,
                vec![
                    detail("englishProficiency", 30.0),
                    detail("financialProof", 40.0),
                    detail("academicRecord", 80.0),
                ],
            ),
        );
        assert!(steps[0].contains("inglés"));
        assert!(steps[1].contains("financiera"));
        let all = steps.join(" ").to_lowercase();
        assert!(all.contains("mejora"));
        // Strong criteria get no bullet.
        assert!(!all.contains("expediente"));
    }

    #[test]
    fn guidance_differs_across_the_quality_bar() {
        let high = next_steps(&visa("TN"), &result(85, Vec::new()));
        let low = next_steps(&visa("TN"), &result(40, Vec::new()));
        assert_ne!(high, low);
        let combined = high.iter().chain(low.iter()).cloned().collect::<Vec<_>>().join(" ");
        assert!(combined.to_lowercase().contains("nafta"));
    }

    #[test]
    fn visa_specific_guidance_varies_by_code() {
        let h1b = next_steps(&visa("H1B"), &result(60, Vec::new())).join(" ").to_lowercase();
        let f1 = next_steps(&visa("F1"), &result(60, Vec::new())).join(" ").to_lowercase();
        let b1b2 = next_steps(&visa("B1B2"), &result(60, Vec::new())).join(" ").to_lowercase();
        assert!(h1b.contains("especialización"));
        assert!(f1.contains("universidad") || f1.contains("institución"));
        assert!(b1b2.contains("itinerario") || b1b2.contains("vínculos"));
    }

    #[test]
    fn output_is_capped_at_eight_steps() {
        let details = [
            "englishProficiency",
            "financialProof",
            "academicRecord",
            "tiesHomeCountry",
            "degreeLevel",
            "hasJobOffer",
            "salary",
            "proofOfFunds",
            "returnTicket",
            "visitDuration",
        ]
        .iter()
        .map(|k| detail(k, 20.0))
        .collect();

        let steps = next_steps(&visa("B1B2"), &result(30, details));
        assert_eq!(steps.len(), MAX_STEPS);
    }

    #[test]
    fn common_closing_steps_appear_when_room_remains() {
        let steps = next_steps(&visa("U"), &result(60, Vec::new()));
        assert!(steps.iter().any(|s| s.contains("asesor/consulado")));
        assert!(steps.iter().any(|s| s.contains("documentos")));
        assert!(steps.len() <= MAX_STEPS);
        assert!(!steps.is_empty());
    }

    #[test]
    fn duplicate_suggestions_are_collapsed() {
        let steps = next_steps(
            &visa("K1"),
            &result(
                30,
                vec![detail("hasJobOffer", 10.0), detail("hasJobOfferUS", 10.0)],
            ),
        );
        let offers = steps
            .iter()
            .filter(|s| s.contains("oferta de trabajo"))
            .count();
        assert_eq!(offers, 1);
    }
}
