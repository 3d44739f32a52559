use tracing_subscriber::EnvFilter;

/// 두 바이너리의 기본 로그 수준.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// `RUST_LOG`가 있으면 그것을, 없으면 [`DEFAULT_DIRECTIVE`]를 쓰는 필터.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// stderr 로 나가는 tracing 구독자를 설치한다.
pub fn init_tracing() {
    // 테스트 등에서 이미 설치돼 있으면 그대로 둔다.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
