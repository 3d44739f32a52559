use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::coercion::{coerce, FieldValue};

/// 인센티브 대상 기기 종류.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApplianceClass {
    /// 열펌프 온수기 (scaldacqua)
    WaterHeater,
    /// 태양열 (solare-termico)
    SolarThermal,
    /// 열펌프 (pompa-calore)
    HeatPump,
    /// 열펌프+콘덴싱 보일러 하이브리드 (sistema-ibrido)
    HybridSystem,
    /// 규칙이 없는 식별자. 요청 그대로 보관한다.
    Unsupported(String),
}

impl ApplianceClass {
    /// 카탈로그 식별자 또는 영문 별칭을 해석한다. 대소문자와 앞뒤 공백은 무시한다.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "scaldacqua" | "water-heater" => ApplianceClass::WaterHeater,
            "solare-termico" | "solar-thermal" => ApplianceClass::SolarThermal,
            "pompa-calore" | "heat-pump" => ApplianceClass::HeatPump,
            "sistema-ibrido" | "hybrid-system" => ApplianceClass::HybridSystem,
            _ => ApplianceClass::Unsupported(id.to_string()),
        }
    }

    /// 카탈로그 디렉터리 이름으로 쓰는 식별자.
    pub fn catalog_id(&self) -> &str {
        match self {
            ApplianceClass::WaterHeater => "scaldacqua",
            ApplianceClass::SolarThermal => "solare-termico",
            ApplianceClass::HeatPump => "pompa-calore",
            ApplianceClass::HybridSystem => "sistema-ibrido",
            ApplianceClass::Unsupported(id) => id,
        }
    }

    /// 송장 금액 대비 인센티브 비율(0~1).
    pub fn incentive_rate(&self) -> f64 {
        match self {
            ApplianceClass::WaterHeater => 0.40,
            ApplianceClass::SolarThermal
            | ApplianceClass::HeatPump
            | ApplianceClass::HybridSystem => 0.65,
            ApplianceClass::Unsupported(_) => 0.0,
        }
    }
}

/// 카탈로그에서 선택한 모델의 기술 사양 레코드.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicalRecord(BTreeMap<String, FieldValue>);

impl TechnicalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// 키 값을 숫자로 읽는다. 없거나 해석 불가면 0.
    pub fn number(&self, key: &str) -> f64 {
        coerce(self.get(key))
    }

    /// 키 값을 라벨 문자열로 읽는다. 없으면 빈 문자열.
    pub fn label(&self, key: &str) -> String {
        self.get(key).map(FieldValue::as_label).unwrap_or_default()
    }

    /// 후보 키 중 처음으로 값이 채워진 항목을 돌려준다.
    pub fn first_present(&self, keys: &[&str]) -> Option<&FieldValue> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .find(|v| !v.is_blank())
    }
}

/// 계산 요청. 전송 형식과 무관한 도메인 표현이다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// 요청 순서대로의 기기 식별자
    pub appliance_classes: Vec<String>,
    /// 식별자별 송장 금액(VAT 포함)
    pub invoice_amount: HashMap<String, FieldValue>,
    /// 식별자별 기술 사양. 키가 없으면 사양 없음이다.
    pub technical_fields: HashMap<String, TechnicalRecord>,
    /// 기후대 코드(A~F)
    pub climate_zone: Option<String>,
}

impl Request {
    pub fn technical_record(&self, class_id: &str) -> Option<&TechnicalRecord> {
        self.technical_fields.get(class_id)
    }

    pub fn invoice(&self, class_id: &str) -> Option<&FieldValue> {
        self.invoice_amount.get(class_id)
    }
}

/// 기기 하나에 대한 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// 송장 금액 [€]
    pub gross_invoice: f64,
    /// 총 인센티브 [€]
    pub gross_incentive: f64,
    /// 공제 후 순 인센티브 [€]
    pub net_incentive: f64,
    /// 실제 지원율(%), 소수 첫째 자리 문자열
    pub real_percentage: String,
    pub warning: Option<String>,
}
