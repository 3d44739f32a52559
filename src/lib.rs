//! 열효율 설비 인센티브 계산. 계산 엔진을 라이브러리로 분리하여 서버와 CLI(오프라인 대체 경로)가 같은 코드를 쓴다.

pub mod app;
pub mod config;
pub mod host;
pub mod importer;
pub mod incentive;
pub mod logging;
pub mod payload;
pub mod provider;
pub mod server;
pub mod ui_cli;
