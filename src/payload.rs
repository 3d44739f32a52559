//! `/calculate` 요청/응답 전송 형식과 양쪽 호스트가 공유하는 진입점.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::incentive::{
    self, Calculation, CalculationError, FieldValue, Request, ResultRow, TechnicalRecord,
};

/// 오프라인 대체 계산 결과에 덧붙는 문구.
pub const FALLBACK_LABEL: &str = "Calcolo eseguito offline (servizio non raggiungibile)";

/// 클라이언트가 보내는 계산 요청 본문.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationPayload {
    #[serde(default)]
    pub intervention: Intervention,
    #[serde(default)]
    pub value_vat: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub dati_tecnici: BTreeMap<String, TechnicalEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(default)]
    pub tipologia: Vec<String>,
}

/// 기기별 기술 사양. 보통 레코드 배열(첫 항목 사용)로 오지만 단일 객체도 받는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TechnicalEntry {
    Many(Vec<TechnicalRecord>),
    One(TechnicalRecord),
    /// 레코드로 해석할 수 없는 값. 사양 없음으로 취급한다.
    Other(serde_json::Value),
}

impl TechnicalEntry {
    pub fn record(&self) -> Option<&TechnicalRecord> {
        match self {
            TechnicalEntry::Many(records) => records.first(),
            TechnicalEntry::One(record) => Some(record),
            TechnicalEntry::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub immobile: Option<Immobile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Immobile {
    #[serde(default)]
    pub zona_climatica: Option<String>,
}

impl CalculationPayload {
    /// 기후대 코드를 설정한다. 주소 구조가 없으면 만든다.
    pub fn set_climate_zone(&mut self, zone: &str) {
        let property = self.property.get_or_insert_with(Property::default);
        let address = property.address.get_or_insert_with(Address::default);
        let immobile = address.immobile.get_or_insert_with(Immobile::default);
        immobile.zona_climatica = Some(zone.to_string());
    }

    /// 기기 식별자를 요청 목록 끝에 추가한다. 이미 있으면 무시한다.
    pub fn add_class(&mut self, class_id: &str) {
        if !self.intervention.tipologia.iter().any(|c| c == class_id) {
            self.intervention.tipologia.push(class_id.to_string());
        }
    }

    pub fn set_invoice(&mut self, class_id: &str, amount: impl Into<FieldValue>) {
        self.value_vat.insert(class_id.to_string(), amount.into());
    }

    /// 기기의 첫 번째 사양 레코드에 값을 넣는다. 레코드가 없으면 만든다.
    pub fn set_field(&mut self, class_id: &str, key: &str, value: impl Into<FieldValue>) {
        let entry = self
            .dati_tecnici
            .entry(class_id.to_string())
            .or_insert_with(|| TechnicalEntry::One(TechnicalRecord::new()));
        if let TechnicalEntry::Other(_) = entry {
            *entry = TechnicalEntry::One(TechnicalRecord::new());
        }
        match entry {
            TechnicalEntry::Many(records) => match records.first_mut() {
                Some(first) => first.insert(key, value),
                None => records.push(TechnicalRecord::new().with(key, value)),
            },
            TechnicalEntry::One(record) => record.insert(key, value),
            TechnicalEntry::Other(_) => {}
        }
    }

    pub fn climate_zone(&self) -> Option<&str> {
        self.property
            .as_ref()?
            .address
            .as_ref()?
            .immobile
            .as_ref()?
            .zona_climatica
            .as_deref()
    }

    /// 전송 형식을 엔진 요청으로 바꾼다.
    pub fn to_request(&self) -> Request {
        let technical_fields: HashMap<String, TechnicalRecord> = self
            .dati_tecnici
            .iter()
            .filter_map(|(id, entry)| entry.record().map(|r| (id.clone(), r.clone())))
            .collect();
        Request {
            appliance_classes: self.intervention.tipologia.clone(),
            invoice_amount: self
                .value_vat
                .iter()
                .map(|(id, v)| (id.clone(), v.clone()))
                .collect(),
            technical_fields,
            climate_zone: self.climate_zone().map(str::to_string),
        }
    }
}

/// 기기 하나의 응답 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPayload {
    pub totale_vat: f64,
    pub incentivo_lordo: f64,
    pub incentivo_netto: f64,
    pub percent_reale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<String>,
}

impl From<&ResultRow> for RowPayload {
    fn from(row: &ResultRow) -> Self {
        Self {
            totale_vat: row.gross_invoice,
            incentivo_lordo: row.gross_incentive,
            incentivo_netto: row.net_incentive,
            percent_reale: row.real_percentage.clone(),
            warnings: row.warning.clone(),
        }
    }
}

/// 계산 응답 본문.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, RowPayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CalculationResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// 모든 행의 경고에 오프라인 대체 문구를 덧붙인다.
    pub fn label_fallback(&mut self) {
        if let Some(rows) = self.data.as_mut() {
            for row in rows.values_mut() {
                row.warnings = Some(match row.warnings.take() {
                    Some(existing) => format!("{existing} | {FALLBACK_LABEL}"),
                    None => FALLBACK_LABEL.to_string(),
                });
            }
        }
    }
}

impl From<Result<Calculation, CalculationError>> for CalculationResponse {
    fn from(result: Result<Calculation, CalculationError>) -> Self {
        match result {
            Ok(rows) => Self {
                success: true,
                data: Some(
                    rows.iter()
                        .map(|(id, row)| (id.clone(), RowPayload::from(row)))
                        .collect(),
                ),
                error: None,
            },
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// 서버와 오프라인 대체 경로가 똑같이 호출하는 계산 진입점.
pub fn calculate(payload: &CalculationPayload) -> CalculationResponse {
    incentive::compute(&payload.to_request()).into()
}
