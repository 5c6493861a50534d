//! Charlson comorbidity index.
//!
//! Weights follow the Quan/Deyo adaptation. Where a map flags both the mild
//! and the severe form of a condition only the severe form is counted.

/// Name of the map whose categories carry Charlson weights.
pub const CHARLSON_MAP: &str = "Charlson";

/// Whether scores computed from `map_name`'s categories are meaningful.
pub fn is_charlson_map(map_name: &str) -> bool {
    map_name.eq_ignore_ascii_case(CHARLSON_MAP)
}

/// Weight of one Charlson category; unknown categories weigh nothing.
pub fn charlson_weight(category: &str) -> u32 {
    match category.to_ascii_uppercase().as_str() {
        "MI" | "CHF" | "PVD" | "STROKE" | "DEMENTIA" | "PULMONARY" | "RHEUMATIC" | "PUD"
        | "LIVERMILD" | "DM" => 1,
        "DMCX" | "PARALYSIS" | "RENAL" | "CANCER" => 2,
        "LIVERSEVERE" => 3,
        "METS" | "HIV" => 6,
        _ => 0,
    }
}

/// Pairs of (superseded, superseding) categories.
const SUPERSEDED: [(&str, &str); 3] = [
    ("DM", "DMCX"),
    ("LIVERMILD", "LIVERSEVERE"),
    ("CANCER", "METS"),
];

/// Charlson index for one set of matched categories.
pub fn charlson_score<S: AsRef<str>>(categories: &[S]) -> u32 {
    let mut upper: Vec<String> = categories
        .iter()
        .map(|category| category.as_ref().to_ascii_uppercase())
        .collect();
    upper.sort();
    upper.dedup();
    let present = |name: &str| upper.iter().any(|category| category == name);
    upper
        .iter()
        .filter(|category| {
            !SUPERSEDED
                .iter()
                .any(|(mild, severe)| category.as_str() == *mild && present(*severe))
        })
        .map(|category| charlson_weight(category))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights() {
        assert_eq!(charlson_weight("CHF"), 1);
        assert_eq!(charlson_weight("Renal"), 2);
        assert_eq!(charlson_weight("LiverSevere"), 3);
        assert_eq!(charlson_weight("HIV"), 6);
        assert_eq!(charlson_weight("HTN"), 0);
        assert!(is_charlson_map("charlson"));
        assert!(!is_charlson_map("Elixhauser"));
    }

    #[test]
    fn severe_forms_supersede_mild_ones() {
        assert_eq!(charlson_score(&["DM", "DMcx"]), 2);
        assert_eq!(charlson_score(&["LiverMild", "LiverSevere", "CHF"]), 4);
        assert_eq!(charlson_score(&["Cancer", "Mets"]), 6);
        assert_eq!(charlson_score(&["Cancer", "MI"]), 3);
    }

    #[test]
    fn empty_record_scores_zero() {
        assert_eq!(charlson_score::<&str>(&[]), 0);
    }
}
