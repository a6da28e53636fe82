//! Encoding of a bet's legs inside a single table cell
//!
//! Legs are written as a JSON array of strings. Cells written before the
//! array format are free text; those are split on newlines and commas.

/// Serialize legs for storage
pub fn serialize_legs(legs: &[String]) -> String {
    // Serializing a slice of strings cannot fail
    serde_json::to_string(legs).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a stored legs cell
pub fn parse_legs(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(trimmed) {
            Ok(legs) => return legs,
            Err(e) => {
                tracing::warn!(
                    "Legs cell looks like JSON but failed to parse ({}), using free text",
                    e
                );
            }
        }
    }

    parse_free_text(trimmed)
}

/// Split free-text legs ("Caps ML, Ovechkin to score")
pub fn parse_free_text(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|leg| !leg.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_serialize_legs() {
        assert_eq!(
            serialize_legs(&legs(&["Caps ML", "Ovechkin to score"])),
            r#"["Caps ML","Ovechkin to score"]"#
        );
        assert_eq!(serialize_legs(&[]), "[]");
    }

    #[test]
    fn test_roundtrip_with_awkward_characters() {
        let original = legs(&[
            "Caps ML, regulation",
            "Ovi \"The Great 8\" anytime goal",
            "Over 6.5\ngoals",
            "[alt] puck line",
            "",
        ]);
        assert_eq!(parse_legs(&serialize_legs(&original)), original);
    }

    #[test]
    fn test_parse_legacy_free_text() {
        assert_eq!(
            parse_legs("Caps ML, Ovechkin to score"),
            legs(&["Caps ML", "Ovechkin to score"])
        );
        assert_eq!(
            parse_legs("Caps ML\nOver 5.5\n\n"),
            legs(&["Caps ML", "Over 5.5"])
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_legs("").is_empty());
        assert!(parse_legs("   ").is_empty());
        assert!(parse_legs("[]").is_empty());
    }

    #[test]
    fn test_parse_malformed_json_falls_back() {
        assert_eq!(parse_legs("[Caps ML, Over 5.5"), legs(&["[Caps ML", "Over 5.5"]));
    }
}
