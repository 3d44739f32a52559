//! ISTAT 공개 자료 CSV 세 개를 합쳐 `geo/cities.json`을 만든다.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ImportError;

/// 원본 CSV 위치.
#[derive(Debug, Clone, PartialEq)]
pub struct CitySources {
    /// 도시 목록(이름, 도, 주, 좌표)
    pub main: PathBuf,
    /// 지적 코드(codice catastale/Belfiore)
    pub cadastral: PathBuf,
    /// 2021 인구
    pub population: PathBuf,
}

impl CitySources {
    /// 한 디렉터리 안의 기본 파일 이름들.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            main: dir.join("opendatasicilia_main.csv"),
            cadastral: dir.join("opendatasicilia_codici_catastali.csv"),
            population: dir.join("opendatasicilia_popolazione_2021.csv"),
        }
    }
}

/// `cities.json` 한 건. `provider::City`가 읽는 필드를 포함한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub comune: String,
    pub codice_belfiore: String,
    pub zona_climatica: Option<String>,
    pub altitudine: Option<f64>,
    pub gradi_giorno: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub abitanti: String,
    pub provincia: String,
    pub codice_provincia: String,
    pub regione: String,
    pub stato: String,
    pub codice_stato: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MainRow {
    pro_com_t: String,
    comune: String,
    den_prov: String,
    sigla: String,
    den_reg: String,
    lat: String,
    long: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CadastralRow {
    pro_com_t: String,
    codice_catastale: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PopulationRow {
    pro_com_t: String,
    pop_res_21: String,
}

/// ISTAT 코드를 6자리로 맞춘다(앞자리 0 채움).
fn pad_istat(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        String::new()
    } else {
        format!("{s:0>6}")
    }
}

/// 0 이거나 해석 불가면 None.
fn coordinate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != 0.0)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ImportError> {
    if !path.is_file() {
        return Err(ImportError::MissingFile(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// ISTAT 코드 → 값 표. 코드나 값이 비면 넣지 않는다.
fn code_map<T>(rows: Vec<T>, split: impl Fn(T) -> (String, String)) -> HashMap<String, String> {
    rows.into_iter()
        .map(split)
        .map(|(code, value)| (pad_istat(&code), value.trim().to_string()))
        .filter(|(code, value)| !code.is_empty() && !value.is_empty())
        .collect()
}

/// 세 CSV를 ISTAT 코드로 합친다. 이름 순(대소문자 무시)으로 정렬한다.
pub fn build_cities(sources: &CitySources) -> Result<Vec<CityRecord>, ImportError> {
    let cadastral = code_map(read_rows::<CadastralRow>(&sources.cadastral)?, |r| {
        (r.pro_com_t, r.codice_catastale)
    });
    let population = code_map(read_rows::<PopulationRow>(&sources.population)?, |r| {
        (r.pro_com_t, r.pop_res_21)
    });

    let mut cities: Vec<CityRecord> = read_rows::<MainRow>(&sources.main)?
        .into_iter()
        .filter_map(|row| {
            let istat = pad_istat(&row.pro_com_t);
            let comune = row.comune.trim();
            let sigla = row.sigla.trim();
            if istat.is_empty() || comune.is_empty() || sigla.is_empty() {
                return None;
            }
            Some(CityRecord {
                comune: comune.to_string(),
                codice_belfiore: cadastral.get(&istat).cloned().unwrap_or_default(),
                zona_climatica: None,
                altitudine: None,
                gradi_giorno: None,
                lat: coordinate(&row.lat),
                lng: coordinate(&row.long),
                abitanti: population.get(&istat).cloned().unwrap_or_default(),
                provincia: row.den_prov.trim().to_string(),
                codice_provincia: sigla.to_string(),
                regione: row.den_reg.trim().to_string(),
                stato: "Italia".to_string(),
                codice_stato: "IT".to_string(),
            })
        })
        .collect();
    cities.sort_by_cached_key(|c| c.comune.to_lowercase());
    Ok(cities)
}

/// `<data_dir>/geo/cities.json`에 쓰고 그 경로를 돌려준다.
pub fn write_cities(data_dir: &Path, cities: &[CityRecord]) -> Result<PathBuf, ImportError> {
    let dir = data_dir.join("geo");
    fs::create_dir_all(&dir)?;
    let path = dir.join("cities.json");
    fs::write(&path, serde_json::to_string(cities)?)?;
    info!(count = cities.len(), path = %path.display(), "cities written");
    Ok(path)
}
