//! 느슨한 JSON 값 추출
//!
//! 외부 결제/포상 웹훅은 숫자를 문자열로 보내기도 하므로
//! 숫자와 숫자 문자열을 모두 받아들이고, 해석할 수 없으면 `None`을 반환합니다.

use serde_json::{Map, Value};

/// 비어 있지 않은 문자열 필드
pub fn extract_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

pub fn extract_i64(map: &Map<String, Value>, key: &str) -> Option<i64> {
    match map.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn extract_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// 식별자 필드. 문자열과 정수를 모두 문자열 식별자로 받아들입니다.
pub fn extract_id(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => n.as_i64().map(|i| i.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_extract_i64_accepts_numbers_and_numeric_strings() {
        let data = map(json!({"a": 10, "b": "42", "c": " 7 ", "d": "x", "e": 3.9, "f": null}));

        assert_eq!(extract_i64(&data, "a"), Some(10));
        assert_eq!(extract_i64(&data, "b"), Some(42));
        assert_eq!(extract_i64(&data, "c"), Some(7));
        assert_eq!(extract_i64(&data, "d"), None);
        assert_eq!(extract_i64(&data, "e"), Some(3));
        assert_eq!(extract_i64(&data, "f"), None);
        assert_eq!(extract_i64(&data, "missing"), None);
    }

    #[test]
    fn test_extract_f64() {
        let data = map(json!({"amount": 15000, "text": "1500.50", "bad": "abc", "inf": "inf"}));

        assert_eq!(extract_f64(&data, "amount"), Some(15000.0));
        assert_eq!(extract_f64(&data, "text"), Some(1500.5));
        assert_eq!(extract_f64(&data, "bad"), None);
        assert_eq!(extract_f64(&data, "inf"), None);
    }

    #[test]
    fn test_extract_string_and_id() {
        let data = map(json!({"s": "  pay_1 ", "empty": "  ", "n": 12, "flag": true}));

        assert_eq!(extract_string(&data, "s"), Some("pay_1".to_string()));
        assert_eq!(extract_string(&data, "empty"), None);
        assert_eq!(extract_string(&data, "n"), None);

        assert_eq!(extract_id(&data, "s"), Some("pay_1".to_string()));
        assert_eq!(extract_id(&data, "n"), Some("12".to_string()));
        assert_eq!(extract_id(&data, "flag"), None);
    }
}
