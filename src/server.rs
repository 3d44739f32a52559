//! 주 호스트: `/calculate`, `/catalog`, `/cities` 를 제공하는 HTTP 서버.

use axum::{
    body::Bytes,
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::payload::{self, CalculationPayload, CalculationResponse};
use crate::provider::{CatalogError, CatalogStore, CityIndex};

/// 핸들러가 공유하는 읽기 전용 상태.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub cities: Arc<CityIndex>,
    pub cities_limit: usize,
}

impl AppState {
    /// 설정의 데이터 디렉터리에서 카탈로그/도시 공급자를 준비한다.
    pub fn from_config(cfg: &ServerConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            catalog: Arc::new(CatalogStore::under_data_dir(&cfg.data_dir)),
            cities: Arc::new(CityIndex::load(&cfg.data_dir)?),
            cities_limit: cfg.cities_limit,
        })
    }
}

struct ServerError(StatusCode, String);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.0, Json(CalculationResponse::failure(self.1))).into_response()
    }
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> Self {
        let status = match &err {
            CatalogError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Io(_) | CatalogError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ServerError(status, err.to_string())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calculate", post(calculate))
        .route("/catalog/{class}/{brand}", get(catalog))
        .route("/cities", get(cities))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 설정된 주소에 바인드하고 종료될 때까지 요청을 처리한다.
pub async fn run_server(cfg: &ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(cfg)?;
    let cities = state.cities.len();
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    info!(addr = %listener.local_addr()?, cities, "calculation server ready");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// 본문을 직접 파싱해 형식 오류도 success:false 응답으로 돌려준다.
async fn calculate(body: Bytes) -> Result<Json<CalculationResponse>, ServerError> {
    let payload: CalculationPayload = serde_json::from_slice(&body).map_err(|e| {
        ServerError(StatusCode::BAD_REQUEST, format!("Richiesta non valida: {e}"))
    })?;
    let response = payload::calculate(&payload);
    debug!(
        classes = payload.intervention.tipologia.len(),
        success = response.success,
        "calculation served"
    );
    Ok(Json(response))
}

async fn catalog(
    State(state): State<AppState>,
    Path((class, brand)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    let models = state.catalog.models(&class, &brand)?;
    Ok(Json(models))
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    #[serde(default)]
    q: String,
}

async fn cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> impl IntoResponse {
    Json(state.cities.search(&query.q, state.cities_limit))
}
