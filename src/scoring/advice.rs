//! Moderation guidance per risk tier.

use crate::scoring::{RiskTier, risk_level};

const DETECTED_PREFIX: &str = "Labels détectés : ";
const NONE_DETECTED: &str = "aucun";

const VERY_HIGH: [&str; 2] = [
    "Contenu très toxique probable : bloquer ou masquer + escalader (modération prioritaire).",
    "Conserver une trace (log) pour audit et amélioration du modèle.",
];

const HIGH: [&str; 2] = [
    "Contenu toxique possible : review humaine recommandée.",
    "Avertir l’utilisateur / demander reformulation (si plateforme).",
];

const MODERATE: [&str; 2] = [
    "Risque modéré : surveiller / appliquer filtres soft (ex: masquage partiel).",
    "Conserver l’événement pour statistiques.",
];

const LOW: [&str; 2] = [
    "Risque faible : aucune action automatique nécessaire.",
    "Vous pouvez quand même conserver un log pour monitoring.",
];

fn script(tier: RiskTier) -> [&'static str; 2] {
    match tier {
        RiskTier::VeryHigh => VERY_HIGH,
        RiskTier::High => HIGH,
        RiskTier::Moderate => MODERATE,
        RiskTier::Low => LOW,
    }
}

/// Three lines of guidance: the tier's fixed two-line script, then the
/// detected labels (or `aucun`).
pub fn recommendations<S: AsRef<str>>(score: f64, detected: &[S]) -> [String; 3] {
    let [first, second] = script(risk_level(score));
    let detected_txt = if detected.is_empty() {
        NONE_DETECTED.to_string()
    } else {
        detected
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(", ")
    };

    [
        first.to_string(),
        second.to_string(),
        format!("{DETECTED_PREFIX}{detected_txt}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_detected_labels_or_none() {
        let none: [&str; 0] = [];
        assert_eq!(recommendations(0.9, &none)[2], "Labels détectés : aucun");
        assert_eq!(
            recommendations(0.9, &["Toxic", "Insult"])[2],
            "Labels détectés : Toxic, Insult"
        );
    }

    #[test]
    fn each_tier_has_its_own_script() {
        let none: [&str; 0] = [];
        let very_high = recommendations(0.9, &none);
        assert!(very_high[0].starts_with("Contenu très toxique probable"));
        assert!(very_high[1].starts_with("Conserver une trace"));

        let high = recommendations(0.6, &none);
        assert_eq!(high[0], "Contenu toxique possible : review humaine recommandée.");

        let moderate = recommendations(0.3, &none);
        assert!(moderate[0].starts_with("Risque modéré"));
        assert_eq!(moderate[1], "Conserver l’événement pour statistiques.");

        let low = recommendations(0.0, &none);
        assert_eq!(low[0], "Risque faible : aucune action automatique nécessaire.");
    }

    #[test]
    fn accepts_owned_strings() {
        let detected = vec!["Threat".to_string()];
        assert_eq!(recommendations(0.1, detected.as_slice())[2], "Labels détectés : Threat");
    }
}
