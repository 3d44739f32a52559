use serde::{Deserialize, Serialize};

/// 기후대(A~F). 난방 도일 기준 지역 구분이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClimateZone {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl ClimateZone {
    /// 기후대를 알 수 없을 때 쓰는 기본값.
    pub const DEFAULT: ClimateZone = ClimateZone::E;

    /// 앞뒤 공백을 제거하고 대문자 한 글자로 해석한다.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "A" => Some(ClimateZone::A),
            "B" => Some(ClimateZone::B),
            "C" => Some(ClimateZone::C),
            "D" => Some(ClimateZone::D),
            "E" => Some(ClimateZone::E),
            "F" => Some(ClimateZone::F),
            _ => None,
        }
    }

    /// 해석할 수 없거나 비어 있으면 E로 대체한다.
    pub fn normalize(code: Option<&str>) -> Self {
        code.and_then(Self::parse).unwrap_or(Self::DEFAULT)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// 기후대별 계수 표. 기기 종류마다 하나씩 둔다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneTable {
    coefficients: [f64; 6],
}

impl ZoneTable {
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            coefficients: [a, b, c, d, e, f],
        }
    }

    pub fn coefficient(&self, zone: ClimateZone) -> f64 {
        self.coefficients[zone.index()]
    }

    /// 기후대 코드 문자열로 계수를 찾는다. 모르는 코드는 E 계수를 쓴다.
    pub fn lookup(&self, code: &str) -> f64 {
        self.coefficient(ClimateZone::normalize(Some(code)))
    }
}

pub const HEAT_PUMP_ZONES: ZoneTable =
    ZoneTable::new(116.09, 164.47, 212.84, 270.88, 328.93, 348.28);

pub const HYBRID_SYSTEM_ZONES: ZoneTable =
    ZoneTable::new(147.57, 209.06, 270.54, 344.33, 418.11, 442.71);
