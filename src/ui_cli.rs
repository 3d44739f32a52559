use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::CONFIG_PATH;
use crate::host::{Execution, ExecutionSource};
use crate::payload::{CalculationResponse, RowPayload};

/// 명령행 인자.
#[derive(Debug, Parser)]
#[command(
    name = "thermal_incentive_toolbox",
    version,
    about = "열효율 설비 인센티브 계산기"
)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = CONFIG_PATH)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 인센티브를 계산한다. 서버에 닿지 않으면 로컬에서 계산한다.
    Calc(CalcArgs),
    /// 현재 설정을 보여주고, 값을 주면 바꿔서 저장한다.
    Config(ConfigArgs),
    /// GSE 카탈로그 CSV를 `catalog/<종류>/<브랜드>.json`으로 변환한다.
    ImportCatalog(ImportCatalogArgs),
    /// ISTAT CSV로 `geo/cities.json`을 만든다.
    BuildCities(BuildCitiesArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct CalcArgs {
    /// 기기 식별자 (scaldacqua, solare-termico, pompa-calore, sistema-ibrido)
    #[arg(long = "class")]
    pub classes: Vec<String>,
    /// 송장 금액: <기기>=<금액>
    #[arg(long = "invoice", value_parser = parse_invoice)]
    pub invoices: Vec<(String, String)>,
    /// 기술 사양: <기기>.<키>=<값>
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String, String)>,
    /// 기후대 코드(A~F)
    #[arg(long)]
    pub zone: Option<String>,
    /// 도시 이름으로 기후대를 찾는다(서버 데이터 디렉터리의 cities.json 사용)
    #[arg(long, conflicts_with = "zone")]
    pub city: Option<String>,
    /// 도 코드(예: MI). --city 와 함께 동명 도시를 구분한다.
    #[arg(long, requires = "city")]
    pub province: Option<String>,
    /// 기본 요청 JSON 파일. 위 옵션은 그 위에 덧씌운다.
    #[arg(long)]
    pub payload: Option<PathBuf>,
    /// 서버를 건너뛰고 로컬에서만 계산
    #[arg(long)]
    pub offline: bool,
    /// 응답 JSON을 그대로 출력
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ImportCatalogArgs {
    /// 원본 CSV 파일
    #[arg(long)]
    pub csv: PathBuf,
    /// 기기 식별자 (scaldacqua, solare-termico, pompa-calore, sistema-ibrido)
    #[arg(long)]
    pub class: String,
    /// 브랜드 이름(파일 이름이 된다)
    #[arg(long)]
    pub brand: String,
    /// 설정의 데이터 디렉터리 대신 사용할 디렉터리
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct BuildCitiesArgs {
    /// 원본 CSV 디렉터리. 기본값은 `<data_dir>/sources`
    #[arg(long)]
    pub sources: Option<PathBuf>,
    /// 설정의 데이터 디렉터리 대신 사용할 디렉터리
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub primary_url: Option<String>,
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    #[arg(long)]
    pub bind_addr: Option<String>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn is_empty(&self) -> bool {
        self.primary_url.is_none()
            && self.timeout_ms.is_none()
            && self.bind_addr.is_none()
            && self.data_dir.is_none()
    }
}

/// `<기기>=<금액>` 을 나눈다.
pub fn parse_invoice(s: &str) -> Result<(String, String), String> {
    let (class, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("'<기기>=<금액>' 형식이 아닙니다: {s}"))?;
    if class.trim().is_empty() {
        return Err(format!("기기 식별자가 비어 있습니다: {s}"));
    }
    Ok((class.trim().to_string(), amount.to_string()))
}

/// `<기기>.<키>=<값>` 을 나눈다. 기기 식별자에는 `.`이 없다고 본다.
pub fn parse_field(s: &str) -> Result<(String, String, String), String> {
    let (path, value) = s
        .split_once('=')
        .ok_or_else(|| format!("'<기기>.<키>=<값>' 형식이 아닙니다: {s}"))?;
    let (class, key) = path
        .split_once('.')
        .ok_or_else(|| format!("'<기기>.<키>' 에 '.' 이 없습니다: {s}"))?;
    if class.trim().is_empty() || key.trim().is_empty() {
        return Err(format!("기기 또는 키가 비어 있습니다: {s}"));
    }
    Ok((
        class.trim().to_string(),
        key.trim().to_string(),
        value.to_string(),
    ))
}

/// 계산 결과를 표 형태로 출력한다.
pub fn print_execution(execution: &Execution) {
    print_response(&execution.response);
    if execution.source == ExecutionSource::Fallback {
        println!("(서버에 연결하지 못해 로컬에서 계산했습니다)");
    }
}

pub fn print_response(response: &CalculationResponse) {
    if let Some(rows) = &response.data {
        for (class, row) in rows {
            print_row(class, row);
        }
    }
    if let Some(err) = &response.error {
        println!("오류: {err}");
    }
}

fn print_row(class: &str, row: &RowPayload) {
    println!("\n[{class}]");
    println!("송장 금액(VAT 포함): {:.2} €", row.totale_vat);
    println!("총 인센티브: {:.2} €", row.incentivo_lordo);
    println!("순 인센티브: {:.2} €", row.incentivo_netto);
    println!("실제 지원율: {} %", row.percent_reale);
    if let Some(w) = &row.warnings {
        println!("경고: {w}");
    }
}

/// 변환 결과 파일을 알린다.
pub fn print_written(count: usize, what: &str, path: &Path) {
    println!("{what} {count}건을 {} 에 저장했습니다", path.display());
}
