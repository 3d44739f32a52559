//! 외부 CSV 자료(GSE 카탈로그, ISTAT 도시 목록)를 `provider`가 읽는 JSON 파일로 바꾼다.

pub mod catalog_csv;
pub mod cities_csv;

use std::path::PathBuf;

use crate::provider::CatalogError;

pub use catalog_csv::{build_catalog, parse_wrapped_rows, read_wrapped_rows, CsvRow};
pub use cities_csv::{build_cities, write_cities, CityRecord, CitySources};

/// 가져오기 오류.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV non trovato: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("CSV vuoto")]
    EmptyCsv,
    #[error("Catalog type non supportato: {0}")]
    UnsupportedClass(String),
    #[error("CSV non valido: {0}")]
    Csv(#[from] csv::Error),
    #[error("errore di I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON non valido: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// 소수점 자리를 고정하고 쉼표를 소수점으로 쓴다. 예: 12.5 → "12,50"
pub fn format_decimal_comma(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}").replace('.', ",")
}
