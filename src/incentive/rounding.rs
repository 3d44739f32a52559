/// 지정 소수 자릿수로 반올림한다(0.5는 0에서 먼 쪽).
///
/// 19.005처럼 2진수로 표현하면 경계 바로 아래로 떨어지는 값 때문에 1센트가
/// 틀어지지 않도록, 크기에 비례한 machine epsilon만큼 부호 방향으로 밀어준 뒤 반올림한다.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    let nudged = value + value.signum() * f64::EPSILON * value.abs().max(1.0);
    let scaled = nudged * factor;
    // 이 크기에서는 소수 자릿수가 이미 남아 있지 않다.
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    // -0.0 이 "-0.0" 으로 출력되지 않도록 한다.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// 금액용 소수 둘째 자리 반올림.
pub fn round_money(value: f64) -> f64 {
    round_to(value, 2)
}

/// 백분율을 소수 첫째 자리 문자열로 만든다. 예: 40 → "40.0"
pub fn format_percent(value: f64) -> String {
    format!("{:.1}", round_to(value, 1))
}
