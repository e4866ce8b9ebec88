//! Specialty synonym normalization
//!
//! Patients describe specialists in plain words ("heart doctor") or in Hindi
//! and Marathi. The doctor-search backend matches canonical specialty names
//! best, so free text is mapped onto those before a search is issued.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Minimum similarity ratio accepted for a fuzzy alias match
const CLOSE_MATCH_CUTOFF: f32 = 0.75;

/// Canonical specialty names and the free-text aliases that map onto them
pub const SPECIALTY_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "Cardiologist",
        &[
            "cardiologist",
            "heart doctor",
            "heart specialist",
            "हृदय रोग विशेषज्ञ",
            "हृदयाचा डॉक्टर",
        ],
    ),
    (
        "Dermatologist",
        &[
            "dermatologist",
            "skin doctor",
            "skin specialist",
            "त्वचा रोग विशेषज्ञ",
            "त्वचेचा डॉक्टर",
        ],
    ),
    (
        "Gastroenterologist",
        &[
            "gastroenterologist",
            "gastro",
            "stomach doctor",
            "digestive doctor",
            "पोटाचा डॉक्टर",
            "पोटाचे डॉक्टर",
            "अन्ननलिका विशेषज्ञ",
        ],
    ),
    (
        "Pediatrician",
        &["pediatrician", "child doctor", "बालरोग तज्ञ", "बाळांचा डॉक्टर"],
    ),
    (
        "Neurologist",
        &["neurologist", "brain doctor", "न्यूरोलॉजिस्ट", "मेंदूचा डॉक्टर"],
    ),
    (
        "Orthopedic Surgeon",
        &["orthopedic", "bone doctor", "हाडांचा डॉक्टर", "ऑर्थोपेडिक"],
    ),
];

/// Lower-cased aliases in table order, paired with their canonical name
static ALIASES: LazyLock<Vec<(String, &'static str)>> = LazyLock::new(|| {
    SPECIALTY_SYNONYMS
        .iter()
        .flat_map(|(canonical, aliases)| {
            aliases
                .iter()
                .map(move |alias| (alias.to_lowercase(), *canonical))
        })
        .collect()
});

static ALIAS_TO_SPECIALTY: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    ALIASES
        .iter()
        .map(|(alias, canonical)| (alias.as_str(), *canonical))
        .collect()
});

/// Map a free-text specialty query onto a canonical backend-friendly term.
///
/// Tries, in order: an exact alias match, the closest alias by similarity
/// ratio, and the first alias contained in the query. Anything else is
/// returned unchanged.
pub fn normalize_specialty(raw_query: &str) -> String {
    let cleaned = raw_query.trim().to_lowercase();
    if cleaned.is_empty() {
        return raw_query.to_string();
    }

    if let Some(canonical) = ALIAS_TO_SPECIALTY.get(cleaned.as_str()) {
        return canonical.to_string();
    }

    let candidates: Vec<&str> = ALIASES.iter().map(|(alias, _)| alias.as_str()).collect();
    let close = similar::get_close_matches(cleaned.as_str(), &candidates, 1, CLOSE_MATCH_CUTOFF);
    if let Some(canonical) = close
        .first()
        .and_then(|best| ALIAS_TO_SPECIALTY.get(best))
    {
        return canonical.to_string();
    }

    ALIASES
        .iter()
        .find(|(alias, _)| cleaned.contains(alias.as_str()))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| raw_query.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_alias_ignores_case_and_whitespace() {
        assert_eq!(normalize_specialty("  Heart Doctor "), "Cardiologist");
        assert_eq!(normalize_specialty("SKIN SPECIALIST"), "Dermatologist");
        assert_eq!(normalize_specialty("gastro"), "Gastroenterologist");
    }

    #[test]
    fn devanagari_aliases_map_to_canonical() {
        assert_eq!(normalize_specialty("हाडांचा डॉक्टर"), "Orthopedic Surgeon");
        assert_eq!(normalize_specialty("बालरोग तज्ञ"), "Pediatrician");
        assert_eq!(normalize_specialty("मेंदूचा डॉक्टर"), "Neurologist");
    }

    #[test]
    fn canonical_name_maps_to_itself() {
        assert_eq!(normalize_specialty("pediatrician"), "Pediatrician");
        assert_eq!(normalize_specialty("Neurologist"), "Neurologist");
    }

    #[test]
    fn close_spelling_is_accepted() {
        assert_eq!(normalize_specialty("cardiology"), "Cardiologist");
        assert_eq!(normalize_specialty("dermatologyst"), "Dermatologist");
    }

    #[test]
    fn alias_inside_longer_text() {
        assert_eq!(
            normalize_specialty("I need a bone doctor in Pune"),
            "Orthopedic Surgeon"
        );
    }

    #[test]
    fn unknown_term_passes_through_unchanged() {
        assert_eq!(normalize_specialty("Dentist"), "Dentist");
        assert_eq!(normalize_specialty("Dr. Mehta"), "Dr. Mehta");
    }

    #[test]
    fn blank_input_is_returned_as_is() {
        assert_eq!(normalize_specialty(""), "");
        assert_eq!(normalize_specialty("   "), "   ");
    }

    #[test]
    fn normalization_is_deterministic() {
        let first = normalize_specialty("stomach doctor");
        for _ in 0..10 {
            assert_eq!(normalize_specialty("stomach doctor"), first);
        }
        assert_eq!(first, "Gastroenterologist");
    }

    #[test]
    fn alias_keys_are_unique() {
        assert_eq!(ALIASES.len(), ALIAS_TO_SPECIALTY.len());
    }
}
