use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 카탈로그의 모델 한 건. `fields`는 그대로 `dati_tecnici`로 넘어간다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub label: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// 카탈로그 조회 오류.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 경로에 쓸 수 없는 종류/브랜드 키
    #[error("chiave catalogo non valida: {0}")]
    InvalidKey(String),
    #[error("catalogo non trovato: {class}/{brand}")]
    NotFound { class: String, brand: String },
    #[error("errore di lettura del catalogo: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalogo non valido: {0}")]
    Json(#[from] serde_json::Error),
}

/// `<root>/<종류>/<브랜드>.json` 형태로 저장된 카탈로그를 읽는다.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    root: PathBuf,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 데이터 루트(`data_dir`) 아래 `catalog` 디렉터리를 쓴다.
    pub fn under_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("catalog"))
    }

    /// 파일 순서 그대로 모델 목록을 돌려준다.
    pub fn models(&self, class: &str, brand: &str) -> Result<Vec<CatalogModel>, CatalogError> {
        validate_key(class)?;
        validate_key(brand)?;
        let path = self.root.join(class).join(format!("{brand}.json"));
        if !path.is_file() {
            return Err(CatalogError::NotFound {
                class: class.to_string(),
                brand: brand.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;
        let models: Vec<CatalogModel> = serde_json::from_str(&content)?;
        debug!(class, brand, count = models.len(), "catalog loaded");
        Ok(models)
    }

    /// 모델 목록을 `<root>/<종류>/<브랜드>.json`에 쓰고 그 경로를 돌려준다.
    pub fn write_models(
        &self,
        class: &str,
        brand: &str,
        models: &[CatalogModel],
    ) -> Result<PathBuf, CatalogError> {
        validate_key(class)?;
        validate_key(brand)?;
        let dir = self.root.join(class);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{brand}.json"));
        fs::write(&path, serde_json::to_string(models)?)?;
        info!(class, brand, count = models.len(), "catalog written");
        Ok(path)
    }
}

fn validate_key(key: &str) -> Result<(), CatalogError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(CatalogError::InvalidKey(key.to_string()))
    }
}
