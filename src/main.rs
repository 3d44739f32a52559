use clap::Parser;
use thermal_incentive_toolbox::{app, config, logging, ui_cli::Cli};

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령을 실행한다.
#[tokio::main]
async fn main() {
    logging::init_tracing();
    if let Err(err) = try_run().await {
        eprintln!("오류: {err:#}");
        std::process::exit(1);
    }
}

async fn try_run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_from(&cli.config)?;
    app::run(&mut cfg, cli.command).await?;
    Ok(())
}
