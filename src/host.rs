//! 주 호스트 호출과 오프라인 대체 계산.
//!
//! 두 경로 모두 [`payload::calculate`]를 거치므로 숫자와 문구가 같다.
//! 다른 점은 대체 경로의 결과 행 경고에 [`payload::FALLBACK_LABEL`]이 붙는 것뿐이다.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::payload::{self, CalculationPayload, CalculationResponse};

/// 주 호스트 호출 실패.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// 연결 실패, 시간 초과 등
    #[error("servizio non raggiungibile: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("risposta HTTP {0}")]
    Status(u16),
    #[error("risposta non valida: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 결과를 만든 쪽.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionSource {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub response: CalculationResponse,
    pub source: ExecutionSource,
}

/// HTTP로 도달하는 주 호스트.
#[derive(Debug, Clone)]
pub struct RemoteHost {
    client: Client,
    endpoint: String,
}

impl RemoteHost {
    pub fn new(cfg: &ClientConfig) -> Result<Self, HostError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/calculate", cfg.primary_url.trim_end_matches('/')),
        })
    }

    pub async fn calculate(
        &self,
        payload: &CalculationPayload,
    ) -> Result<CalculationResponse, HostError> {
        let resp = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(HostError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// 같은 프로세스에서 계산하는 오프라인 대체 호스트.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHost;

impl LocalHost {
    /// 계산 후 결과 행에 대체 경로 문구를 붙인다.
    pub fn calculate(&self, payload: &CalculationPayload) -> CalculationResponse {
        let mut response = payload::calculate(payload);
        response.label_fallback();
        response
    }
}

/// 주 호스트를 먼저 시도하고 실패하면 조용히 로컬 계산으로 넘어간다.
#[derive(Debug, Clone)]
pub struct DualExecutor {
    primary: Option<RemoteHost>,
    fallback: LocalHost,
}

impl DualExecutor {
    pub fn new(cfg: &ClientConfig) -> Result<Self, HostError> {
        Ok(Self {
            primary: Some(RemoteHost::new(cfg)?),
            fallback: LocalHost,
        })
    }

    /// 주 호스트 없이 항상 로컬에서 계산한다.
    pub fn offline() -> Self {
        Self {
            primary: None,
            fallback: LocalHost,
        }
    }

    pub async fn calculate(&self, payload: &CalculationPayload) -> Execution {
        if let Some(primary) = &self.primary {
            match primary.calculate(payload).await {
                Ok(response) => {
                    debug!(success = response.success, "primary host answered");
                    return Execution {
                        response,
                        source: ExecutionSource::Primary,
                    };
                }
                Err(e) => warn!(error = %e, "primary host failed, computing offline"),
            }
        }
        Execution {
            response: self.fallback.calculate(payload),
            source: ExecutionSource::Fallback,
        }
    }
}
