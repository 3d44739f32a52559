//! 계산 서버(주 호스트) 진입점.

use clap::Parser;
use std::path::PathBuf;
use thermal_incentive_toolbox::{config, logging, server};

#[derive(Debug, Parser)]
#[command(name = "thermal_incentive_server", version, about = "인센티브 계산 HTTP 서버")]
struct ServerCli {
    /// 설정 파일 경로
    #[arg(long, default_value = config::CONFIG_PATH)]
    config: PathBuf,
    /// 설정의 바인드 주소 대신 사용할 주소
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = ServerCli::parse();
    let mut cfg = config::load_from(&cli.config)?;
    if let Some(bind) = cli.bind {
        cfg.server.bind_addr = bind;
    }
    server::run_server(&cfg.server).await
}
