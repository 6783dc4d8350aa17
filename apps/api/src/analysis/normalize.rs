//! Response normalizer — turns untrusted model output into an `AnalysisResult`.
//!
//! Two phases:
//! 1. Parsing may fail (absent, empty or non-JSON content) and yields `None`.
//! 2. Once the payload is valid JSON every field is coerced on its own and
//!    nothing can fail: wrong types, missing keys and out-of-range numbers all
//!    collapse to safe defaults.

use serde_json::{Map, Value};
use tracing::debug;

use crate::analysis::models::{AnalysisResult, Weights};

/// Parses raw model content and normalizes it.
/// Returns `None` only when the content is absent, empty, or not JSON.
pub fn normalize(raw: Option<&str>) -> Option<AnalysisResult> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Some(normalize_value(&value)),
        Err(e) => {
            debug!(
                "Model content is not JSON ({e}): {}",
                preview(raw, 200)
            );
            None
        }
    }
}

/// Normalizes an already-parsed value. Never fails.
/// Non-object values carry no fields, so they normalize to all defaults.
pub fn normalize_value(value: &Value) -> AnalysisResult {
    AnalysisResult {
        score: coerce_percentage(value.get("score")),
        pros: normalize_list(value.get("pros")),
        cons: normalize_list(value.get("cons")),
        tips: normalize_list(value.get("tips")),
        weights: normalize_weights(value.get("weights")),
    }
}

/// Coerces a number or numeric string to an integer in `[0, 100]`.
/// Anything else, including unparseable strings, becomes 0.
pub fn coerce_percentage(value: Option<&Value>) -> u8 {
    let number = match value {
        // Out-of-range literals such as 1e400 keep their source text and parse to ±inf.
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .unwrap_or_else(|| parse_numeric(&n.to_string())),
        Some(Value::String(s)) if !s.trim().is_empty() => parse_numeric(s.trim()),
        _ => f64::NAN,
    };

    if number.is_nan() {
        return 0;
    }

    let rounded = number.clamp(0.0, 100.0).round();
    if rounded != number {
        debug!("Clamped percentage from {number} to {rounded}");
    }
    rounded as u8
}

/// Keeps the trimmed, non-empty string elements of an array, in order.
/// A non-array yields an empty list.
pub fn normalize_list(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let normalized: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if normalized.len() != items.len() {
        debug!(
            "Filtered list from {} to {} items",
            items.len(),
            normalized.len()
        );
    }
    normalized
}

/// Normalizes a `{skills, experience, education}` object.
/// Anything that is not a JSON object yields all zeros.
pub fn normalize_weights(value: Option<&Value>) -> Weights {
    match value {
        Some(Value::Object(map)) => weights_from_map(map),
        _ => Weights::default(),
    }
}

fn weights_from_map(map: &Map<String, Value>) -> Weights {
    Weights {
        skills: coerce_percentage(map.get("skills")),
        experience: coerce_percentage(map.get("experience")),
        education: coerce_percentage(map.get("education")),
    }
}

/// Parses a numeric string the way a lenient JSON producer would write one:
/// decimal and exponent forms, `0x`/`0o`/`0b` integer prefixes, and the exact
/// spelling `Infinity` with an optional sign. `inf`, `nan` and other words are not numbers.
fn parse_numeric(s: &str) -> f64 {
    let unsigned = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if unsigned == "Infinity" {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return f64::NAN;
    }

    let radix_parts = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in radix_parts {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// First `max_chars` characters of `s`, for log lines.
pub fn preview(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_well_formed(result: &AnalysisResult) {
        assert!(result.score <= 100);
        for list in [&result.pros, &result.cons, &result.tips] {
            for item in list {
                assert!(!item.is_empty());
                assert_eq!(item.trim(), item);
            }
        }
        assert!(result.weights.skills <= 100);
        assert!(result.weights.experience <= 100);
        assert!(result.weights.education <= 100);
    }

    // ── Parse phase ─────────────────────────────────────────────────────────

    #[test]
    fn test_absent_content_fails() {
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn test_empty_content_fails() {
        assert_eq!(normalize(Some("")), None);
        assert_eq!(normalize(Some("   \n")), None);
    }

    #[test]
    fn test_non_json_fails() {
        assert_eq!(normalize(Some("not json")), None);
        assert_eq!(normalize(Some("{\"score\": 80")), None);
    }

    #[test]
    fn test_well_formed_payload_passes_through() {
        let raw = r#"{
            "score": 82,
            "pros": ["5 years of Rust", "Led a platform team"],
            "cons": ["No Kubernetes"],
            "tips": ["Mention on-call experience"],
            "weights": {"skills": 50, "experience": 35, "education": 15}
        }"#;
        let result = normalize(Some(raw)).unwrap();
        assert_eq!(result.score, 82);
        assert_eq!(result.pros, vec!["5 years of Rust", "Led a platform team"]);
        assert_eq!(result.cons, vec!["No Kubernetes"]);
        assert_eq!(result.tips, vec!["Mention on-call experience"]);
        assert_eq!(
            result.weights,
            Weights {
                skills: 50,
                experience: 35,
                education: 15
            }
        );
    }

    // ── Score ───────────────────────────────────────────────────────────────

    #[test]
    fn test_score_clamps_above_range() {
        assert_eq!(normalize(Some(r#"{"score": 150}"#)).unwrap().score, 100);
    }

    #[test]
    fn test_score_clamps_below_range() {
        assert_eq!(normalize(Some(r#"{"score": -5}"#)).unwrap().score, 0);
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        assert_eq!(coerce_percentage(Some(&json!(72.4))), 72);
        assert_eq!(coerce_percentage(Some(&json!(72.5))), 73);
        assert_eq!(coerce_percentage(Some(&json!(99.6))), 100);
    }

    #[test]
    fn test_score_accepts_numeric_strings() {
        assert_eq!(coerce_percentage(Some(&json!("64"))), 64);
        assert_eq!(coerce_percentage(Some(&json!(" 12.7 "))), 13);
        assert_eq!(coerce_percentage(Some(&json!("1e2"))), 100);
        assert_eq!(coerce_percentage(Some(&json!("0x20"))), 32);
        assert_eq!(coerce_percentage(Some(&json!("-2.5e1"))), 0);
    }

    #[test]
    fn test_score_infinity_spelling() {
        assert_eq!(coerce_percentage(Some(&json!("Infinity"))), 100);
        assert_eq!(coerce_percentage(Some(&json!("+Infinity"))), 100);
        assert_eq!(coerce_percentage(Some(&json!("-Infinity"))), 0);
        assert_eq!(coerce_percentage(Some(&json!("inf"))), 0);
        assert_eq!(coerce_percentage(Some(&json!("infinity"))), 0);
        assert_eq!(coerce_percentage(Some(&json!("INF"))), 0);
        assert_eq!(coerce_percentage(Some(&json!("-inf"))), 0);
        assert_eq!(coerce_percentage(Some(&json!("NaN"))), 0);
    }

    #[test]
    fn test_out_of_range_number_is_still_valid_json() {
        let result = normalize(Some(r#"{"score": 1e400, "pros": ["kept"]}"#)).unwrap();
        assert_eq!(result.score, 100);
        assert_eq!(result.pros, vec!["kept"]);

        let result = normalize(Some(
            r#"{"score": -1e400, "weights": {"skills": 1e999, "experience": 12345678901234567890123}}"#,
        ))
        .unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.weights.skills, 100);
        assert_eq!(result.weights.experience, 100);
        assert_eq!(result.weights.education, 0);
    }

    #[test]
    fn test_score_rejects_non_numeric() {
        assert_eq!(coerce_percentage(Some(&json!("high"))), 0);
        assert_eq!(coerce_percentage(Some(&json!(""))), 0);
        assert_eq!(coerce_percentage(Some(&json!("   "))), 0);
        assert_eq!(coerce_percentage(Some(&json!(true))), 0);
        assert_eq!(coerce_percentage(Some(&json!(null))), 0);
        assert_eq!(coerce_percentage(Some(&json!([80]))), 0);
        assert_eq!(coerce_percentage(Some(&json!({"value": 80}))), 0);
        assert_eq!(coerce_percentage(None), 0);
    }

    // ── Lists ───────────────────────────────────────────────────────────────

    #[test]
    fn test_list_trims_and_drops_junk() {
        let result = normalize(Some(r#"{"pros": ["  ok  ", "", 42, null]}"#)).unwrap();
        assert_eq!(result.pros, vec!["ok"]);
    }

    #[test]
    fn test_list_preserves_order_and_duplicates() {
        let list = normalize_list(Some(&json!(["b", "a", "b", "  ", {"x": 1}, "c"])));
        assert_eq!(list, vec!["b", "a", "b", "c"]);
    }

    #[test]
    fn test_list_non_array_is_empty() {
        assert!(normalize_list(Some(&json!("one tip"))).is_empty());
        assert!(normalize_list(Some(&json!({"0": "tip"}))).is_empty());
        assert!(normalize_list(None).is_empty());
    }

    // ── Weights ─────────────────────────────────────────────────────────────

    #[test]
    fn test_weights_non_object_is_zero() {
        let result = normalize(Some(r#"{"weights": "not an object"}"#)).unwrap();
        assert_eq!(result.weights, Weights::default());
        assert_eq!(
            normalize_weights(Some(&json!([40, 40, 20]))),
            Weights::default()
        );
        assert_eq!(normalize_weights(Some(&json!(null))), Weights::default());
        assert_eq!(normalize_weights(None), Weights::default());
    }

    #[test]
    fn test_weights_normalize_each_key_independently() {
        let weights = normalize_weights(Some(&json!({
            "skills": "45.5",
            "experience": 250,
            "extra": 10
        })));
        assert_eq!(
            weights,
            Weights {
                skills: 46,
                experience: 100,
                education: 0
            }
        );
    }

    // ── Whole-record resilience ─────────────────────────────────────────────

    #[test]
    fn test_garbage_object_still_yields_result() {
        let raw = r#"{
            "score": "ninety",
            "pros": "great",
            "cons": [1, 2, "  real gap "],
            "tips": null,
            "weights": {"skills": [], "education": "-3"},
            "unexpected": {"nested": true}
        }"#;
        let result = normalize(Some(raw)).unwrap();
        assert_eq!(result.score, 0);
        assert!(result.pros.is_empty());
        assert_eq!(result.cons, vec!["real gap"]);
        assert!(result.tips.is_empty());
        assert_eq!(result.weights, Weights::default());
        assert_well_formed(&result);
    }

    #[test]
    fn test_any_valid_json_top_level_yields_result() {
        for raw in ["null", "42", "\"text\"", "[1, 2]", "true", "{}"] {
            let result = normalize(Some(raw)).unwrap_or_else(|| panic!("{raw} failed"));
            assert_eq!(result.score, 0);
            assert!(result.pros.is_empty());
            assert_eq!(result.weights, Weights::default());
        }
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("abc", 10), "abc");
    }
}
