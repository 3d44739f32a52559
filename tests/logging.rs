//! 로그 필터 기본값 테스트.
use thermal_incentive_toolbox::logging::DEFAULT_DIRECTIVE;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[test]
fn binaries_log_at_info_by_default() {
    let filter = EnvFilter::new(DEFAULT_DIRECTIVE);
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
}
