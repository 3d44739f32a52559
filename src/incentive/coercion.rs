use serde::{Deserialize, Serialize};

/// 요청 페이로드에서 넘어오는 원시 값. 숫자, 문자열, 그 밖의 JSON 값을 모두 받는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// bool, null, 배열 등. 숫자로는 항상 0, 라벨로는 빈 문자열이다.
    Other(serde_json::Value),
}

impl FieldValue {
    /// 라벨(등급, 집열기 종류 등)로 읽을 때 사용한다.
    pub fn as_label(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Other(_) => String::new(),
        }
    }

    /// 빈 문자열/null 처럼 값이 없는 것으로 봐야 하는지 여부.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Other(v) => v.is_null(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// 임의의 입력 값을 f64로 변환한다. 실패는 모두 0이 된다.
pub fn coerce(input: Option<&FieldValue>) -> f64 {
    match input {
        Some(FieldValue::Number(n)) if n.is_finite() => *n,
        Some(FieldValue::Text(s)) => coerce_str(s),
        _ => 0.0,
    }
}

/// 로케일 형식 숫자 문자열("1.234,56", "1234,56", "12 kW" 등)을 f64로 변환한다.
///
/// 쉼표와 마침표가 함께 있으면 마침표는 천 단위 구분자, 쉼표는 소수점으로 본다.
/// 쉼표만 있으면 쉼표를 소수점으로 본다. 그 뒤 숫자, `.`, `-` 이외의 문자는 모두 버린다.
pub fn coerce_str(raw: &str) -> f64 {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return 0.0;
    }
    let normalized = if compact.contains(',') && compact.contains('.') {
        compact.replace('.', "").replace(',', ".")
    } else if compact.contains(',') {
        compact.replace(',', ".")
    } else {
        compact
    };
    let cleaned: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
