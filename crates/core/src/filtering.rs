//! Helpers shared by the per-resource filter criteria.

use serde::{Deserialize, Deserializer};

use crate::types::DbId;

/// Treat blank text predicates as "not requested".
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build an `ILIKE` pattern matching `needle` anywhere, escaping the LIKE
/// wildcards (`%`, `_`) and the escape character itself.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Deserialize `"1,2, 3"` into `[1, 2, 3]`. Blank input yields an empty list.
pub fn comma_separated_ids<'de, D>(deserializer: D) -> Result<Vec<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| serde::de::Error::custom(format!("invalid id '{s}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "comma_separated_ids")]
        ids: Vec<DbId>,
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" Matrix ")), Some("Matrix"));
    }

    #[test]
    fn contains_pattern_wraps_and_escapes() {
        assert_eq!(contains_pattern("Matrix"), "%Matrix%");
        assert_eq!(contains_pattern("100%_done\\"), "%100\\%\\_done\\\\%");
    }

    #[test]
    fn comma_separated_ids_parse() {
        let params: Params = serde_json::from_str(r#"{"ids": "1, 2,,3"}"#).unwrap();
        assert_eq!(params.ids, vec![1, 2, 3]);
    }

    #[test]
    fn missing_or_blank_ids_mean_no_restriction() {
        let params: Params = serde_json::from_str("{}").unwrap();
        assert!(params.ids.is_empty());

        let params: Params = serde_json::from_str(r#"{"ids": ""}"#).unwrap();
        assert!(params.ids.is_empty());
    }

    #[test]
    fn non_numeric_id_is_an_error() {
        let result: Result<Params, _> = serde_json::from_str(r#"{"ids": "1,x"}"#);
        assert!(result.is_err());
    }
}
