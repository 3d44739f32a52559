use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::catalog::CatalogError;

/// 검색어 최소 길이.
pub const MIN_QUERY_LEN: usize = 2;

/// 도시(comune) 레코드. 파일의 나머지 필드는 무시한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub comune: String,
    #[serde(default)]
    pub codice_provincia: String,
    #[serde(default)]
    pub zona_climatica: Option<String>,
    #[serde(default)]
    pub regione: String,
    #[serde(default)]
    pub provincia: String,
}

/// 메모리에 올린 도시 목록과 검색.
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    cities: Vec<City>,
}

impl CityIndex {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// `<data_dir>/geo/cities.json`을 읽는다. 파일이 없으면 빈 목록이다.
    pub fn load(data_dir: &Path) -> Result<Self, CatalogError> {
        let path = data_dir.join("geo").join("cities.json");
        if !path.is_file() {
            warn!(path = %path.display(), "cities file missing, city search disabled");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let cities: Vec<City> = serde_json::from_str(&content)?;
        info!(count = cities.len(), "cities loaded");
        Ok(Self::new(cities))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// 이름 검색. 앞부분 일치를 먼저, 부분 일치를 뒤에 두며 각각 파일 순서를 따른다.
    pub fn search(&self, query: &str, limit: usize) -> Vec<City> {
        let q = query.trim().to_lowercase();
        if q.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let mut prefix = Vec::new();
        let mut contains = Vec::new();
        for city in &self.cities {
            let name = city.comune.to_lowercase();
            if name.starts_with(&q) {
                prefix.push(city);
            } else if name.contains(&q) {
                contains.push(city);
            }
        }
        prefix
            .into_iter()
            .chain(contains)
            .take(limit)
            .cloned()
            .collect()
    }

    /// 도시 이름(선택적으로 도 코드)으로 기후대 코드를 찾는다.
    pub fn resolve_zone(&self, comune: &str, codice_provincia: Option<&str>) -> Option<String> {
        let name = comune.trim();
        self.cities
            .iter()
            .filter(|c| c.comune.eq_ignore_ascii_case(name))
            .find(|c| {
                codice_provincia
                    .map(|p| c.codice_provincia.eq_ignore_ascii_case(p.trim()))
                    .unwrap_or(true)
            })
            .and_then(|c| c.zona_climatica.clone())
            .filter(|z| !z.trim().is_empty())
    }
}
