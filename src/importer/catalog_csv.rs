//! GSE 카탈로그 CSV → `catalog/<종류>/<브랜드>.json` 변환.
//!
//! 원본 파일은 헤더 한 줄만 평범한 CSV이고, 데이터 행은 한 줄 전체가 따옴표로 감싸인
//! 내부 CSV 문자열이다(안쪽 따옴표는 `""`로 이중화). 예:
//! `"2.E,BRAND,MODEL,,EXT,INT,""12,28"",SI"`

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::{format_decimal_comma, ImportError};
use crate::incentive::{coerce_str, ApplianceClass};
use crate::provider::CatalogModel;

/// 헤더 이름 → 값.
pub type CsvRow = HashMap<String, String>;

const EXT_ID: &str = "Identificativo modello unità esterna";
const INT_ID: &str = "Identificativo modello unità interna";

/// COP(SCOP)를 계절 효율(%)로 환산하는 계수. η_s ≈ SCOP / 2.5 × 100
const PRIMARY_ENERGY_FACTOR: f64 = 2.5;

/// 파일을 읽어 행 목록을 만든다. UTF-8이 아닌 바이트는 대체 문자로 바꾼다.
pub fn read_wrapped_rows(path: &Path) -> Result<Vec<CsvRow>, ImportError> {
    if !path.is_file() {
        return Err(ImportError::MissingFile(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    parse_wrapped_rows(&String::from_utf8_lossy(&bytes))
}

/// 감싼 형식의 CSV 텍스트를 해석한다. 열 개수가 헤더와 다른 행은 건너뛴다.
pub fn parse_wrapped_rows(text: &str) -> Result<Vec<CsvRow>, ImportError> {
    let mut lines = text.lines();
    let header_line = lines.next().ok_or(ImportError::EmptyCsv)?;
    let mut header = split_record(header_line)?;
    if let Some(first) = header.first_mut() {
        *first = first.trim_start_matches('\u{feff}').to_string();
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let inner = line
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(line);
        let values = match split_record(&inner.replace("\"\"", "\"")) {
            Ok(values) if values.len() == header.len() => values,
            _ => {
                skipped += 1;
                continue;
            }
        };
        rows.push(header.iter().cloned().zip(values).collect());
    }
    if skipped > 0 {
        warn!(skipped, "malformed CSV lines skipped");
    }
    debug!(rows = rows.len(), "catalog CSV parsed");
    Ok(rows)
}

fn split_record(line: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(record.iter().map(str::to_string).collect())
    } else {
        Ok(Vec::new())
    }
}

/// 기기 종류에 맞는 변환으로 카탈로그 모델 목록을 만든다.
pub fn build_catalog(
    class: &ApplianceClass,
    rows: &[CsvRow],
) -> Result<Vec<CatalogModel>, ImportError> {
    let models = match class {
        ApplianceClass::HybridSystem => hybrid_system_models(rows),
        ApplianceClass::WaterHeater => water_heater_models(rows),
        ApplianceClass::HeatPump => heat_pump_models(rows),
        ApplianceClass::SolarThermal => solar_thermal_models(rows),
        ApplianceClass::Unsupported(id) => {
            return Err(ImportError::UnsupportedClass(id.clone()));
        }
    };
    Ok(models)
}

/// 후보 열 중 처음으로 비어 있지 않은 값(앞뒤 공백 제거).
fn col<'a>(row: &'a CsvRow, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .find(|v| !v.is_empty())
        .map(|v| v.trim())
        .unwrap_or("")
}

/// 다른 종류의 행인지. 종류 열이 비어 있으면 받아들인다.
fn other_type(tip: &str, code: &str) -> bool {
    !tip.is_empty() && tip != code
}

/// 0이면 빈 문자열, 아니면 쉼표 소수 문자열.
fn comma_or_blank(value: f64, decimals: usize) -> Value {
    if value != 0.0 {
        Value::from(format_decimal_comma(value, decimals))
    } else {
        Value::from("")
    }
}

fn seasonal_efficiency(cop: f64) -> f64 {
    if cop > 0.0 {
        cop / PRIMARY_ENERGY_FACTOR * 100.0
    } else {
        0.0
    }
}

fn scop_text(cop: f64, raw: &str) -> Value {
    if cop != 0.0 {
        Value::from(format_decimal_comma(cop, 2))
    } else {
        Value::from(raw)
    }
}

/// `"<브랜드> <모델>"` 뒤에 실외기/실내기 식별자를 붙인다.
fn label_with_unit_ids(label: String, ext_id: &str, int_id: &str) -> String {
    let mut ids = Vec::new();
    if !ext_id.is_empty() {
        ids.push(ext_id);
    }
    if !int_id.is_empty() && int_id != ext_id {
        ids.push(int_id);
    }
    if ids.is_empty() {
        label
    } else {
        format!("{label} ({})", ids.join("/"))
    }
}

fn brand_model_label(marca: &str, modello: &str) -> String {
    format!("{marca} {modello}").trim().to_string()
}

/// 영문 소문자/숫자 이외를 `_` 하나로 접는다.
fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// 중복 제거와 일련번호 부여.
#[derive(Default)]
struct ModelList {
    models: Vec<CatalogModel>,
    seen: HashSet<String>,
}

impl ModelList {
    fn first_seen(&mut self, parts: &[&str]) -> bool {
        self.seen.insert(parts.join("|").to_lowercase())
    }

    fn next_id(&self) -> usize {
        self.models.len() + 1
    }

    fn push(&mut self, id: usize, label: String, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.models.push(CatalogModel {
            id: Some(Value::from(id)),
            label,
            fields,
        });
    }
}

fn hybrid_system_models(rows: &[CsvRow]) -> Vec<CatalogModel> {
    let mut list = ModelList::default();
    for row in rows {
        if other_type(col(row, &["Tipologia intervento"]), "2.E") {
            continue;
        }
        let marca = col(row, &["Marca"]);
        let pdc_model = col(row, &["Modello pompa di calore"]);
        let caldaia_model = col(row, &["Modello caldaia a condensazione"]);
        let ext_id = col(row, &[EXT_ID]);
        let int_id = col(row, &[INT_ID]);
        let pdc_pot_raw = col(row, &["Potenza termica Pompa di Calore [kWt]"]);
        let cop_raw = col(row, &["COP"]);
        let caldaia_pot_raw = col(row, &["Potenza termica caldaia a condensazione"]);
        let caldaia_rend_raw = col(row, &["Rendimento termico utile caldaia"]);
        let inverter = col(row, &["Presenza inverter"]);

        if !list.first_seen(&[
            marca,
            pdc_model,
            caldaia_model,
            ext_id,
            int_id,
            pdc_pot_raw,
            cop_raw,
            caldaia_pot_raw,
            caldaia_rend_raw,
            inverter,
        ]) {
            continue;
        }

        let mut label = brand_model_label(marca, pdc_model);
        if !caldaia_model.is_empty() {
            label = format!("{label} + {caldaia_model}").trim().to_string();
        }
        let label = label_with_unit_ids(label, ext_id, int_id);

        let cop = coerce_str(cop_raw);
        let caldaia_rend = coerce_str(caldaia_rend_raw);
        let id = list.next_id();
        let fields = json!({
            "id": id,
            "marca": marca,
            "modello": label,
            "pdc_alimentazione": "elettrica",
            "pdc_tipologia_scambio": "aria_acqua_bassa",
            "pdc_denominazione": pdc_model,
            "pdc_potenza": comma_or_blank(coerce_str(pdc_pot_raw), 2),
            "pdc_efficienza": comma_or_blank(seasonal_efficiency(cop), 1),
            "pdc_scop_sper_cop": scop_text(cop, cop_raw),
            "pdc_emissione": "",
            "pdc_potenziale": "",
            "caldaia_tipologia": caldaia_model,
            "caldaia_potenza": comma_or_blank(coerce_str(caldaia_pot_raw), 2),
            "caldaia_rendimento": comma_or_blank(caldaia_rend, 1),
            "caldaia_efficienza": comma_or_blank(caldaia_rend, 1),
        });
        list.push(id, label, fields);
    }
    list.models
}

fn water_heater_models(rows: &[CsvRow]) -> Vec<CatalogModel> {
    let mut list = ModelList::default();
    for row in rows {
        if other_type(
            col(row, &["Tipologia di intervento", "Tipologia intervento"]),
            "2.D",
        ) {
            continue;
        }
        let marca = col(row, &["Marca"]);
        let modello = col(row, &["Modello"]);
        let ext_id = col(row, &[EXT_ID]);
        let int_id = col(row, &[INT_ID]);
        let potenza_raw = col(row, &["Potenza termica [kWt]"]);
        let cop_raw = col(row, &["COP"]);
        let capacita_raw = col(row, &["Capacità [litri]", "Capacita [litri]"]);

        if !list.first_seen(&[
            marca,
            modello,
            ext_id,
            int_id,
            potenza_raw,
            cop_raw,
            capacita_raw,
        ]) {
            continue;
        }

        let label = label_with_unit_ids(brand_model_label(marca, modello), ext_id, int_id);
        let capacity = match capacity_litres(capacita_raw) {
            0 => Value::from(""),
            litres => Value::from(litres),
        };
        // CSV에 에너지 등급이 없어 COP로 추정한다.
        let energy_class = if coerce_str(cop_raw) >= 3.0 { "a+" } else { "a" };

        let id = list.next_id();
        let fields = json!({
            "id": id,
            "marca": marca,
            "modello": modello,
            "classe_energetica": energy_class,
            "capacita_accumulo": capacity,
        });
        list.push(id, label, fields);
    }
    list.models
}

/// 용량(L) 정수부. 해석할 수 없으면 0.
fn capacity_litres(raw: &str) -> i64 {
    let s = raw.replace(',', ".");
    if s.is_empty() {
        return 0;
    }
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

/// 열교환 방식 표기를 프런트엔드 필터 값으로 맞춘다.
pub fn normalize_exchange_type(raw: &str) -> String {
    let s: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '\\' || c == '-' { '/' } else { c })
        .collect();
    if s.is_empty() {
        return s;
    }
    let mapped = match s.as_str() {
        "aria/aria" => "aria_aria",
        "acqua/aria" => "acqua_aria",
        "salamoia/aria" => "salamoia_aria",
        "aria/acqua" => "aria_acqua_bassa",
        "acqua/acqua" => "acqua_acqua",
        "salamoia/acqua" => "salamoia_acqua",
        _ => return slugify(&s),
    };
    mapped.to_string()
}

fn heat_pump_models(rows: &[CsvRow]) -> Vec<CatalogModel> {
    let mut list = ModelList::default();
    for row in rows {
        let tip = col(row, &["Tipologia", "Tipologia intervento"]);
        if other_type(tip, "2.A") {
            continue;
        }
        let tip_fun_raw = col(row, &["Tipologia funzionamento"]);
        let tip_sca_raw = col(row, &["Tipologia scambio"]);
        let nome_comm = col(row, &["Denominazione Commerciale"]);
        let marca = col(row, &["Marca"]);
        let modello = col(row, &["Modello"]);
        let ext_id = col(row, &[EXT_ID]);
        let int_id = col(row, &[INT_ID]);
        let potenza_raw = col(row, &["Potenza termica [kWt]"]);
        let inverter = col(row, &["Presenza inverter"]);
        let cop_raw = col(row, &["COP"]);
        let gue_raw = col(row, &["GUE"]);
        let nox_raw = col(row, &["Emissioni NO2", "Emissioni NOx"]);

        if !list.first_seen(&[
            tip,
            tip_fun_raw,
            tip_sca_raw,
            nome_comm,
            marca,
            modello,
            ext_id,
            int_id,
            potenza_raw,
            inverter,
            cop_raw,
            gue_raw,
            nox_raw,
        ]) {
            continue;
        }

        let label = label_with_unit_ids(brand_model_label(marca, modello), ext_id, int_id);
        let exchange = match normalize_exchange_type(tip_sca_raw) {
            s if s.is_empty() => tip_sca_raw.to_lowercase(),
            s => s,
        };
        let cop = coerce_str(cop_raw);

        let id = list.next_id();
        let fields = json!({
            "id": id,
            "marca": marca,
            "modello": modello,
            "tipologia_funzionamento": tip_fun_raw.to_lowercase(),
            "tipologia_scambio": exchange,
            "nome_commerciale": nome_comm,
            "potenza_nominale": comma_or_blank(coerce_str(potenza_raw), 2),
            "efficienza_stagionale": comma_or_blank(seasonal_efficiency(cop), 1),
            "scop_sper_cop": scop_text(cop, cop_raw),
            "emissione_nox": nox_raw,
            "potenziale_gwp": "",
        });
        list.push(id, label, fields);
    }
    list.models
}

/// 집열기 종류. `factory_made`(MJ/년 기준) 또는 `piani`(kWh/년 기준), 그 밖은 slug.
pub fn normalize_collector_type(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let s = lower.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.is_empty() {
        s
    } else if s.contains("factory") {
        "factory_made".to_string()
    } else if s.starts_with("piani") {
        "piani".to_string()
    } else {
        slugify(&s)
    }
}

/// 용도(온수/난방) 표기를 정리한다.
pub fn normalize_usage(raw: &str) -> String {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        return s;
    }
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.contains("acs") && compact.contains("riscald") {
        "acs_riscaldamento".to_string()
    } else if compact.contains("solo") && compact.contains("riscald") {
        "solo_riscaldamento".to_string()
    } else if compact.contains("acs") {
        "solo_acs".to_string()
    } else {
        slugify(&s)
    }
}

const QL_MJ: &str = "Energia QL [MJ/anno]";
const KWH_COLUMNS: [&str; 5] = [
    "Energia Qcol (50°C) [kWht/anno]",
    "Energia Qcol (75°C) [kWht/anno]",
    "Energia Qsol (50°C) [kWht/anno]",
    "Energia Qsol (75°C) [kWht/anno]",
    "Energia Qsol (150°C) [kWht/anno]",
];

fn solar_thermal_models(rows: &[CsvRow]) -> Vec<CatalogModel> {
    let mut list = ModelList::default();
    for row in rows {
        let tip = col(row, &["Tipologia intervento", "Tipologia di intervento"]);
        if other_type(tip, "2.C") {
            continue;
        }
        let collettori_raw = col(row, &["Tipologia di collettori"]);
        let utilizzo_raw = col(row, &["Utilizzo"]);
        let marca = col(row, &["Marca"]);
        let modello = col(row, &["Modello"]);
        let area_ag_raw = col(row, &["Area AG [m2]"]);
        let area_aa_raw = col(row, &["Area Aa [m2]"]);
        let ql_raw = col(row, &[QL_MJ]);
        let kwh_raw: Vec<&str> = KWH_COLUMNS.iter().map(|k| col(row, &[*k])).collect();

        let collector = normalize_collector_type(collettori_raw);
        // factory_made 는 MJ/년, 평판형은 kWh/년 값을 쓴다.
        let energy = if collector == "factory_made" {
            coerce_str(ql_raw)
        } else {
            kwh_raw
                .iter()
                .map(|raw| coerce_str(raw))
                .find(|v| *v != 0.0)
                .unwrap_or(0.0)
        };

        let energy = if energy != 0.0 {
            Value::from(energy)
        } else {
            Value::from("")
        };

        let mut key = vec![
            tip,
            collettori_raw,
            utilizzo_raw,
            marca,
            modello,
            area_ag_raw,
            area_aa_raw,
        ];
        key.extend(&kwh_raw);
        key.push(ql_raw);
        if !list.first_seen(&key) {
            continue;
        }

        let id = list.next_id();
        let fields = json!({
            "id": id,
            "marca": marca,
            "modello": modello,
            "tipo_collettori": collector,
            "utilizzo": normalize_usage(utilizzo_raw),
            "area_ag": comma_or_blank(coerce_str(area_ag_raw), 2),
            "area_aa": comma_or_blank(coerce_str(area_aa_raw), 2),
            "energia_termica": energy,
        });
        list.push(id, brand_model_label(marca, modello), fields);
    }
    list.models
}
