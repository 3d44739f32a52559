//! 로케일 숫자 문자열 변환 회귀 테스트.
use thermal_incentive_toolbox::incentive::{coerce, coerce_str, FieldValue};

#[test]
fn comma_and_period_decimal_forms_agree() {
    let expected = 1234.56;
    assert_eq!(coerce_str("1.234,56"), expected);
    assert_eq!(coerce_str("1234,56"), expected);
    assert_eq!(coerce_str("1234.56"), expected);
    assert_eq!(coerce(Some(&FieldValue::Number(1234.56))), expected);
}

#[test]
fn whitespace_and_units_are_stripped() {
    assert_eq!(coerce_str("  12 kW "), 12.0);
    assert_eq!(coerce_str("€ 1.000,00"), 1000.0);
    assert_eq!(coerce_str("-3,5"), -3.5);
    assert_eq!(coerce_str("1 234 567"), 1_234_567.0);
}

#[test]
fn unparsable_input_defaults_to_zero() {
    assert_eq!(coerce(None), 0.0);
    assert_eq!(coerce_str(""), 0.0);
    assert_eq!(coerce_str("   "), 0.0);
    assert_eq!(coerce_str("abc"), 0.0);
    assert_eq!(coerce_str("-"), 0.0);
    assert_eq!(coerce_str("1.2.3"), 0.0);
    assert_eq!(coerce(Some(&FieldValue::Other(serde_json::Value::Bool(true)))), 0.0);
    assert_eq!(coerce(Some(&FieldValue::Other(serde_json::Value::Null))), 0.0);
    assert_eq!(coerce(Some(&FieldValue::Number(f64::INFINITY))), 0.0);
}

#[test]
fn field_values_deserialize_from_any_json() {
    let values: Vec<FieldValue> =
        serde_json::from_str(r#"[5000, "5.000,00", null, true, {"x": 1}]"#).expect("parse");
    assert_eq!(values[0], FieldValue::Number(5000.0));
    assert_eq!(values[1], FieldValue::Text("5.000,00".to_string()));
    let numbers: Vec<f64> = values.iter().map(|v| coerce(Some(v))).collect();
    assert_eq!(numbers, vec![5000.0, 5000.0, 0.0, 0.0, 0.0]);
}

#[test]
fn formatted_percentage_reparses_within_half_a_tenth() {
    use thermal_incentive_toolbox::incentive::rounding::format_percent;
    for raw in [26.78346, 9.215502816, 40.0, 0.04, 65.0, 12.35] {
        let text = format_percent(raw);
        assert!((coerce_str(&text) - raw).abs() <= 0.05 + 1e-12, "{raw} -> {text}");
    }
}
