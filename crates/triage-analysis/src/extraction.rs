//! 생성 응답에서 조언 추출.
//!
//! 응답 텍스트 앞뒤의 설명문과 마크다운 코드 펜스를 무시하고
//! 처음 나오는 균형 잡힌 `{...}` 블록만 파싱한다. 누락되거나 형식이 틀린 필드는
//! 템플릿 조언 값으로 채우고 신뢰도는 [0, 100]으로 자른다.

use serde_json::{Map, Value};

use triage_core::error::CoreError;
use triage_core::models::advice::{clamp_confidence, AdviceSource, RemediationAdvice, SuggestedFix};

/// 신뢰도가 없을 때 사용하는 보수적 기본값
pub const DEFAULT_DELEGATED_CONFIDENCE: u8 = 50;

/// 원문 미리보기 길이 (에러 메시지용)
const RAW_PREVIEW_CHARS: usize = 200;

/// 처음 나오는 균형 잡힌 JSON 객체 슬라이스
///
/// 문자열 리터럴 안의 중괄호와 이스케이프를 건너뛴다.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// 응답 텍스트 → 조언 (누락 필드는 `fallback`으로 채움)
pub fn parse_advice(text: &str, fallback: &RemediationAdvice) -> Result<RemediationAdvice, CoreError> {
    let json = extract_first_json_object(text).ok_or_else(|| {
        CoreError::ResponseParse(format!(
            "JSON 객체를 찾을 수 없음 (raw: {})",
            preview(text)
        ))
    })?;

    let value: Value = serde_json::from_str(json).map_err(|e| {
        CoreError::ResponseParse(format!("JSON 파싱 실패: {} (raw: {})", e, preview(json)))
    })?;
    let object = value
        .as_object()
        .ok_or_else(|| CoreError::ResponseParse("JSON 최상위가 객체가 아님".to_string()))?;

    let root_cause = field(object, "rootCause", "root_cause");
    let fix = field(object, "suggestedFix", "suggested_fix").and_then(Value::as_object);
    if root_cause.is_none() && fix.is_none() {
        return Err(CoreError::ResponseParse(
            "rootCause와 suggestedFix가 모두 없음".to_string(),
        ));
    }

    let suggested_fix = SuggestedFix {
        code: fix
            .and_then(|f| text_of(f.get("code")))
            .unwrap_or_else(|| fallback.suggested_fix.code.clone()),
        description: fix
            .and_then(|f| text_of(f.get("description")))
            .unwrap_or_else(|| fallback.suggested_fix.description.clone()),
        confidence: fix
            .and_then(|f| f.get("confidence"))
            .and_then(confidence_of)
            .unwrap_or(DEFAULT_DELEGATED_CONFIDENCE),
    };

    Ok(RemediationAdvice {
        root_cause: text_of(root_cause).unwrap_or_else(|| fallback.root_cause.clone()),
        explanation: text_of(object.get("explanation"))
            .unwrap_or_else(|| fallback.explanation.clone()),
        suggested_fix,
        prevention_tips: list_of(field(object, "preventionTips", "prevention_tips"))
            .unwrap_or_else(|| fallback.prevention_tips.clone()),
        similar_patterns: list_of(field(object, "similarPatterns", "similar_patterns"))
            .unwrap_or_else(|| fallback.similar_patterns.clone()),
        source: AdviceSource::Delegated,
    })
}

/// camelCase 우선, snake_case 허용
fn field<'a>(object: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    object.get(camel).or_else(|| object.get(snake))
}

/// 비어 있지 않은 문자열만
fn text_of(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 문자열 원소만 모은 목록 (비면 None)
fn list_of(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(|item| text_of(Some(item)))
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// 숫자 또는 숫자 문자열("87", "87%")
fn confidence_of(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(clamp_confidence(number))
}

fn preview(text: &str) -> String {
    text.chars().take(RAW_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;
    use triage_core::models::classification::ErrorType;
    use triage_core::models::report::ErrorReport;

    fn fallback() -> RemediationAdvice {
        templates::render(ErrorType::NullReference, &ErrorReport::new("boom"))
    }

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let text = "Here is my analysis:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope it helps {not json}";
        assert_eq!(extract_first_json_object(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"{"code": "if (x) { return \"}\"; }", "n": 1} trailing"#;
        assert_eq!(
            extract_first_json_object(text),
            Some(r#"{"code": "if (x) { return \"}\"; }", "n": 1}"#)
        );
    }

    #[test]
    fn unbalanced_or_missing_object() {
        assert_eq!(extract_first_json_object("no json here"), None);
        assert_eq!(extract_first_json_object("{\"a\": 1"), None);
    }

    #[test]
    fn handles_multibyte_text() {
        let text = "분석 결과: {\"rootCause\": \"널 참조\"} 끝";
        assert_eq!(extract_first_json_object(text), Some("{\"rootCause\": \"널 참조\"}"));
    }

    #[test]
    fn full_response_parses() {
        let text = r#"Sure! {
            "rootCause": "profile is undefined before the fetch resolves",
            "explanation": "The checkout renders before user data arrives.",
            "suggestedFix": {"code": "user?.profile", "description": "optional chaining", "confidence": 92},
            "preventionTips": ["strict null checks"],
            "similarPatterns": ["Cannot read property 'address' of undefined"]
        }"#;
        let advice = parse_advice(text, &fallback()).unwrap();
        assert_eq!(advice.root_cause, "profile is undefined before the fetch resolves");
        assert_eq!(advice.suggested_fix.code, "user?.profile");
        assert_eq!(advice.suggested_fix.confidence, 92);
        assert_eq!(advice.prevention_tips, vec!["strict null checks"]);
        assert_eq!(advice.source, AdviceSource::Delegated);
    }

    #[test]
    fn missing_fields_fall_back_to_template() {
        let base = fallback();
        let text = r#"{"root_cause": "stale cache", "preventionTips": [], "similarPatterns": [1, " ", "seen before"]}"#;
        let advice = parse_advice(text, &base).unwrap();
        assert_eq!(advice.root_cause, "stale cache");
        assert_eq!(advice.explanation, base.explanation);
        assert_eq!(advice.suggested_fix.code, base.suggested_fix.code);
        assert_eq!(advice.suggested_fix.confidence, DEFAULT_DELEGATED_CONFIDENCE);
        assert_eq!(advice.prevention_tips, base.prevention_tips);
        assert_eq!(advice.similar_patterns, vec!["seen before"]);
    }

    #[test]
    fn confidence_is_clamped_and_normalized() {
        let base = fallback();
        let cases = [
            (r#"{"suggestedFix": {"confidence": 250}}"#, 100),
            (r#"{"suggestedFix": {"confidence": -3}}"#, 0),
            (r#"{"suggestedFix": {"confidence": 0.8}}"#, 80),
            (r#"{"suggestedFix": {"confidence": "73%"}}"#, 73),
            (r#"{"suggestedFix": {"confidence": "high"}}"#, DEFAULT_DELEGATED_CONFIDENCE),
        ];
        for (text, expected) in cases {
            let advice = parse_advice(text, &base).unwrap();
            assert_eq!(advice.suggested_fix.confidence, expected, "{text}");
        }
    }

    #[test]
    fn garbage_is_an_error() {
        let base = fallback();
        assert!(matches!(
            parse_advice("I cannot help with that.", &base),
            Err(CoreError::ResponseParse(_))
        ));
        assert!(matches!(
            parse_advice("{not: valid}", &base),
            Err(CoreError::ResponseParse(_))
        ));
        // 알아볼 수 있는 필드가 하나도 없으면 실패
        assert!(matches!(
            parse_advice(r#"{"error": "overloaded"}"#, &base),
            Err(CoreError::ResponseParse(_))
        ));
    }
}
