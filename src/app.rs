use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError};
use crate::host::{DualExecutor, HostError};
use crate::importer::{self, CitySources, ImportError};
use crate::incentive::ApplianceClass;
use crate::payload::CalculationPayload;
use crate::provider::{CatalogError, CatalogStore, CityIndex};
use crate::ui_cli::{self, BuildCitiesArgs, CalcArgs, Command, ConfigArgs, ImportCatalogArgs};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("요청 JSON 오류: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("데이터 오류: {0}")]
    Catalog(#[from] CatalogError),
    #[error("가져오기 오류: {0}")]
    Import(#[from] ImportError),
    #[error("호스트 오류: {0}")]
    Host(#[from] HostError),
    #[error("도시를 찾을 수 없거나 기후대 정보가 없습니다: {0}")]
    UnknownCity(String),
    /// 두 경로 모두 결과를 내지 못함
    #[error("계산 실패: {0}")]
    Calculation(String),
}

/// 하위 명령을 실행한다.
pub async fn run(config: &mut Config, command: Command) -> Result<(), AppError> {
    match command {
        Command::Calc(args) => run_calc(config, &args).await,
        Command::Config(args) => run_config(config, &args),
        Command::ImportCatalog(args) => run_import_catalog(config, &args),
        Command::BuildCities(args) => run_build_cities(config, &args),
    }
}

async fn run_calc(config: &Config, args: &CalcArgs) -> Result<(), AppError> {
    let cities = match &args.city {
        Some(_) => Some(CityIndex::load(&config.server.data_dir)?),
        None => None,
    };
    let payload = build_payload(args, cities.as_ref())?;
    let executor = if args.offline {
        DualExecutor::offline()
    } else {
        DualExecutor::new(&config.client)?
    };
    let execution = executor.calculate(&payload).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&execution.response)?);
    } else {
        ui_cli::print_execution(&execution);
    }
    if execution.response.success {
        Ok(())
    } else {
        Err(AppError::Calculation(
            execution
                .response
                .error
                .unwrap_or_else(|| "errore sconosciuto".to_string()),
        ))
    }
}

/// 요청 파일(있으면)을 읽고 명령행 옵션을 덧씌워 전송 형식을 만든다.
pub fn build_payload(
    args: &CalcArgs,
    cities: Option<&CityIndex>,
) -> Result<CalculationPayload, AppError> {
    let mut payload = match &args.payload {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => CalculationPayload::default(),
    };
    for class in &args.classes {
        payload.add_class(class);
    }
    for (class, amount) in &args.invoices {
        payload.add_class(class);
        payload.set_invoice(class, amount.as_str());
    }
    for (class, key, value) in &args.fields {
        payload.add_class(class);
        payload.set_field(class, key, value.as_str());
    }
    if let Some(zone) = &args.zone {
        payload.set_climate_zone(zone);
    }
    if let (Some(city), Some(index)) = (&args.city, cities) {
        let zone = index
            .resolve_zone(city, args.province.as_deref())
            .ok_or_else(|| AppError::UnknownCity(city.clone()))?;
        payload.set_climate_zone(&zone);
    }
    Ok(payload)
}

fn run_config(config: &mut Config, args: &ConfigArgs) -> Result<(), AppError> {
    if !args.is_empty() {
        if let Some(url) = &args.primary_url {
            config.client.primary_url = url.clone();
        }
        if let Some(ms) = args.timeout_ms {
            config.client.timeout_ms = ms;
        }
        if let Some(addr) = &args.bind_addr {
            config.server.bind_addr = addr.clone();
        }
        if let Some(dir) = &args.data_dir {
            config.server.data_dir = dir.clone();
        }
        config.save()?;
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

fn run_import_catalog(config: &Config, args: &ImportCatalogArgs) -> Result<(), AppError> {
    let data_dir = args.data_dir.as_deref().unwrap_or(&config.server.data_dir);
    let (count, path) = import_catalog(&args.csv, &args.class, &args.brand, data_dir)?;
    ui_cli::print_written(count, "모델", &path);
    Ok(())
}

/// CSV를 읽어 카탈로그 파일을 쓴다. 모델 수와 파일 경로를 돌려준다.
pub fn import_catalog(
    csv: &Path,
    class_id: &str,
    brand: &str,
    data_dir: &Path,
) -> Result<(usize, PathBuf), AppError> {
    let class = ApplianceClass::from_id(class_id);
    let rows = importer::read_wrapped_rows(csv)?;
    let models = importer::build_catalog(&class, &rows)?;
    let path = CatalogStore::under_data_dir(data_dir).write_models(
        class.catalog_id(),
        brand,
        &models,
    )?;
    Ok((models.len(), path))
}

fn run_build_cities(config: &Config, args: &BuildCitiesArgs) -> Result<(), AppError> {
    let data_dir = args.data_dir.as_deref().unwrap_or(&config.server.data_dir);
    let sources = match &args.sources {
        Some(dir) => CitySources::in_dir(dir),
        None => CitySources::in_dir(&data_dir.join("sources")),
    };
    let cities = importer::build_cities(&sources)?;
    let path = importer::write_cities(data_dir, &cities)?;
    ui_cli::print_written(cities.len(), "도시", &path);
    Ok(())
}
