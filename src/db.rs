//! Codec for the TEXT columns holding JSON-encoded string lists
//! (profile services/regions/availability, job image keys).

/// Decode a stored list column. Malformed values read as an empty list
/// instead of failing the whole row.
pub fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let items = vec!["Elektriker".to_string(), "Installateur".to_string()];
        assert_eq!(decode_list(&encode_list(&items)), items);
    }

    #[test]
    fn empty_list() {
        assert_eq!(encode_list(&[]), "[]");
        assert!(decode_list("[]").is_empty());
    }

    #[test]
    fn malformed_input_degrades_to_empty() {
        assert!(decode_list("").is_empty());
        assert!(decode_list("not json").is_empty());
        assert!(decode_list("{\"a\":1}").is_empty());
        assert!(decode_list("[1, 2, 3]").is_empty());
    }

    #[test]
    fn unicode_survives() {
        let items = vec!["Gärtner".to_string(), "Maurer & Söhne".to_string()];
        assert_eq!(decode_list(&encode_list(&items)), items);
    }
}
