use super::coercion::{coerce, FieldValue};

/// 보간 곡선의 한 점. x는 SCOP/COP, y는 배수이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// x가 엄격히 증가하는 점 목록을 구간별 선형 보간한다.
///
/// 범위 밖은 양 끝 값으로 고정하고, 빈 곡선은 중립 배수 1을 돌려준다.
/// 구간 경계에 정확히 걸리면 앞쪽 구간의 끝점 값을 쓴다.
pub fn interpolate(points: &[CurvePoint], x: f64) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 1.0,
    };
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }
    for win in points.windows(2) {
        let a = win[0];
        let b = win[1];
        if x >= a.x && x <= b.x {
            let frac = (x - a.x) / (b.x - a.x);
            return a.y + frac * (b.y - a.y);
        }
    }
    // NaN 입력만 여기에 도달한다.
    1.0
}

/// 원시 입력 값을 숫자로 변환한 뒤 보간한다.
pub fn interpolate_field(points: &[CurvePoint], x: Option<&FieldValue>) -> f64 {
    interpolate(points, coerce(x))
}

const fn cp(x: f64, y: f64) -> CurvePoint {
    CurvePoint::new(x, y)
}

/// 열펌프 SCOP → 배수 곡선.
pub const HEAT_PUMP_CURVE: &[CurvePoint] = &[
    cp(2.0, 0.6202),
    cp(3.0, 0.8269),
    cp(3.5, 0.886),
    cp(4.0, 0.9303),
    cp(5.16, 1.0),
    cp(6.0, 1.0337),
    cp(7.0, 1.0632),
    cp(10.0, 1.1163),
];

/// 하이브리드 시스템(열펌프 부분) SCOP → 배수 곡선.
pub const HYBRID_SYSTEM_CURVE: &[CurvePoint] = &[
    cp(2.0, 0.6931),
    cp(3.0, 0.9241),
    cp(3.5, 0.9901),
    cp(3.59, 1.0),
    cp(4.0, 1.0396),
    cp(5.0, 1.1089),
    cp(6.0, 1.1551),
    cp(10.0, 1.2475),
];
