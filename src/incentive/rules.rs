//! 기기 종류별 인센티브 상한/비율 규칙.

use super::coercion::coerce;
use super::curve::{interpolate_field, HEAT_PUMP_CURVE, HYBRID_SYSTEM_CURVE};
use super::model::{ApplianceClass, Request, ResultRow, TechnicalRecord};
use super::rounding::{format_percent, round_money};
use super::zone::{ClimateZone, HEAT_PUMP_ZONES, HYBRID_SYSTEM_ZONES};

/// 총 인센티브에 적용하는 법정 공제 계수.
pub const NET_FACTOR: f64 = 0.9878;

const WATER_HEATER_CAP_A_PLUS: f64 = 700.0;
const WATER_HEATER_CAP_A: f64 = 500.0;

const SOLAR_FLAT_PLATE_FACTOR: f64 = 0.7;
const SOLAR_FACTORY_MADE_FACTOR: f64 = 0.1945;

const HEAT_PUMP_SCOP_KEYS: &[&str] = &["scop_sper_cop", "scop", "cop"];
const HYBRID_SCOP_KEYS: &[&str] = &["pdc_scop_sper_cop", "pdc_scop", "pdc_cop"];

/// 지원하지 않는 기기 식별자에 붙는 경고 문구.
pub fn unsupported_warning(class_id: &str) -> String {
    format!("Tipologia non supportata: {class_id}")
}

/// 요청에서 기기 하나의 결과를 계산한다. 입력이 어떻든 패닉하지 않는다.
pub fn compute_class(class_id: &str, request: &Request) -> ResultRow {
    let class = ApplianceClass::from_id(class_id);
    let total = coerce(request.invoice(class_id));

    if let ApplianceClass::Unsupported(id) = &class {
        return ResultRow {
            gross_invoice: round_money(total),
            gross_incentive: 0.0,
            net_incentive: 0.0,
            real_percentage: format_percent(0.0),
            warning: Some(unsupported_warning(id)),
        };
    }

    let zone = ClimateZone::normalize(request.climate_zone.as_deref());
    // 사양이 없으면 모든 상한 공식이 0이 된다.
    let cap = request
        .technical_record(class_id)
        .map_or(0.0, |tech| incentive_cap(&class, tech, zone));

    let gross = cap.min(class.incentive_rate() * total);
    let net = gross * NET_FACTOR;
    let percent = if total > 0.0 { gross / total * 100.0 } else { 0.0 };

    ResultRow {
        gross_invoice: round_money(total),
        gross_incentive: round_money(gross),
        net_incentive: round_money(net),
        real_percentage: format_percent(percent),
        warning: None,
    }
}

/// 기기 종류별 인센티브 상한 [€].
///
/// 음수 사양 값은 걸러내지 않으므로 상한이 음수가 될 수 있다.
/// 기후대는 열펌프/하이브리드에만 쓰인다.
pub fn incentive_cap(class: &ApplianceClass, tech: &TechnicalRecord, zone: ClimateZone) -> f64 {
    match class {
        ApplianceClass::WaterHeater => water_heater_cap(&tech.label("classe_energetica")),
        ApplianceClass::SolarThermal => {
            tech.number("energia_termica") * collector_factor(&tech.label("tipo_collettori"))
        }
        ApplianceClass::HeatPump => {
            tech.number("potenza_nominale")
                * (tech.number("efficienza_stagionale") / 100.0)
                * HEAT_PUMP_ZONES.coefficient(zone)
                * interpolate_field(HEAT_PUMP_CURVE, tech.first_present(HEAT_PUMP_SCOP_KEYS))
        }
        ApplianceClass::HybridSystem => {
            tech.number("pdc_potenza")
                * (tech.number("pdc_efficienza") / 100.0)
                * HYBRID_SYSTEM_ZONES.coefficient(zone)
                * interpolate_field(HYBRID_SYSTEM_CURVE, tech.first_present(HYBRID_SCOP_KEYS))
        }
        ApplianceClass::Unsupported(_) => 0.0,
    }
}

/// 에너지 등급 라벨로 온수기 상한을 정한다. "A+" 이상 700, "A" 500, 그 외 0.
pub fn water_heater_cap(energy_class: &str) -> f64 {
    let label: String = energy_class
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if label.starts_with("a+") {
        WATER_HEATER_CAP_A_PLUS
    } else if label.starts_with('a') {
        WATER_HEATER_CAP_A
    } else {
        0.0
    }
}

/// 집열기 종류별 에너지 환산 계수. 평판형 0.7, 공장 조립형 0.1945.
pub fn collector_factor(collector_type: &str) -> f64 {
    let kind = collector_type
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_");
    match kind.as_str() {
        "piani" | "flat_plate" => SOLAR_FLAT_PLATE_FACTOR,
        "factory_made" | "factory_assembled" => SOLAR_FACTORY_MADE_FACTOR,
        _ => 0.0,
    }
}
