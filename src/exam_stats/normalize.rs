//! Label normalization and default values for exam question fields

use crate::config::PediatricsPsychiatryRule;

/// Default values for fields that a row leaves blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    Specialty,
    Topic,
    Focus,
}

impl Sentinel {
    pub const fn value(self) -> &'static str {
        match self {
            Sentinel::Specialty => "Geral",
            Sentinel::Topic => "Outros",
            Sentinel::Focus => "Indefinido",
        }
    }
}

pub const CLINICA_MEDICA: &str = "Clínica Médica";
pub const GINECOLOGIA_OBSTETRICIA: &str = "Ginecologia e Obstetrícia";
pub const MEDICINA_PREVENTIVA: &str = "Medicina Preventiva";
pub const PEDIATRIA: &str = "Pediatria";
pub const PEDIATRIA_PSIQUIATRIA: &str = "Pediatria / Psiquiatria";

/// Spelling variants and synonyms, matched exactly after trimming
const AREA_ALIASES: &[(&str, &str)] = &[
    ("Clinica Medica", CLINICA_MEDICA),
    ("Clínica Medica", CLINICA_MEDICA),
    ("Clinica Médica", CLINICA_MEDICA),
    ("Clínica médica", CLINICA_MEDICA),
    ("Clinica medica", CLINICA_MEDICA),
    ("Ginecologia", GINECOLOGIA_OBSTETRICIA),
    ("Obstetrícia", GINECOLOGIA_OBSTETRICIA),
    ("Obstetricia", GINECOLOGIA_OBSTETRICIA),
    ("GO", GINECOLOGIA_OBSTETRICIA),
    ("Ginecologia/Obstetrícia", GINECOLOGIA_OBSTETRICIA),
    ("Preventiva", MEDICINA_PREVENTIVA),
    ("Medicina preventiva", MEDICINA_PREVENTIVA),
    ("Pediatria/Psiquiatria", PEDIATRIA_PSIQUIATRIA),
    ("Pediatria e Psiquiatria", PEDIATRIA_PSIQUIATRIA),
];

/// Normalize a raw area label. Returns `None` when nothing is left.
///
/// The combined pediatrics/psychiatry label is resolved by `rule`. The
/// default collapses it to "Pediatria", which loses the psychiatry signal.
pub fn normalize_area(raw: &str, rule: PediatricsPsychiatryRule) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let canonical = AREA_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map_or(trimmed, |(_, canonical)| *canonical);

    let area = match (canonical, rule) {
        (PEDIATRIA_PSIQUIATRIA, PediatricsPsychiatryRule::CollapseToPediatrics) => PEDIATRIA,
        (other, _) => other,
    };

    Some(area.to_string())
}

/// Strip bracket characters from a focus annotation ("[Conduta]" -> "Conduta")
pub fn clean_focus(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '[' | ']'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trimmed text or the sentinel when blank
pub fn or_sentinel(value: Option<&str>, sentinel: Sentinel) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(sentinel.value())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLAPSE: PediatricsPsychiatryRule = PediatricsPsychiatryRule::CollapseToPediatrics;

    #[test]
    fn test_accentless_clinica_medica() {
        assert_eq!(
            normalize_area("Clinica Medica", COLLAPSE).as_deref(),
            Some(CLINICA_MEDICA)
        );
        assert_eq!(
            normalize_area("  Clínica Medica ", COLLAPSE).as_deref(),
            Some(CLINICA_MEDICA)
        );
    }

    #[test]
    fn test_gyn_and_obstetrics_merge() {
        assert_eq!(
            normalize_area("Ginecologia", COLLAPSE).as_deref(),
            Some(GINECOLOGIA_OBSTETRICIA)
        );
        assert_eq!(
            normalize_area("Obstetrícia", COLLAPSE).as_deref(),
            Some(GINECOLOGIA_OBSTETRICIA)
        );
    }

    #[test]
    fn test_pediatrics_psychiatry_rule() {
        assert_eq!(
            normalize_area("Pediatria / Psiquiatria", COLLAPSE).as_deref(),
            Some(PEDIATRIA)
        );
        assert_eq!(
            normalize_area("Pediatria/Psiquiatria", COLLAPSE).as_deref(),
            Some(PEDIATRIA)
        );
        assert_eq!(
            normalize_area("Pediatria / Psiquiatria", PediatricsPsychiatryRule::KeepCombined)
                .as_deref(),
            Some(PEDIATRIA_PSIQUIATRIA)
        );
    }

    #[test]
    fn test_unknown_area_kept_trimmed() {
        assert_eq!(normalize_area(" Cirurgia ", COLLAPSE).as_deref(), Some("Cirurgia"));
    }

    #[test]
    fn test_blank_area() {
        assert_eq!(normalize_area("   ", COLLAPSE), None);
        assert_eq!(normalize_area("", COLLAPSE), None);
    }

    #[test]
    fn test_clean_focus() {
        assert_eq!(clean_focus("[Conduta]"), "Conduta");
        assert_eq!(clean_focus(" [ Quadro clínico ] "), "Quadro clínico");
        assert_eq!(clean_focus("Tratamento"), "Tratamento");
    }

    #[test]
    fn test_or_sentinel() {
        assert_eq!(or_sentinel(None, Sentinel::Specialty), "Geral");
        assert_eq!(or_sentinel(Some("  "), Sentinel::Topic), "Outros");
        assert_eq!(or_sentinel(Some(" Sepse "), Sentinel::Topic), "Sepse");
        assert_eq!(Sentinel::Focus.value(), "Indefinido");
    }
}
