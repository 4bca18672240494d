//! notify-stock CLI.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use notify_collector::modules::{
    LiveSeriesSource, RegisterMode, Registrar, StoredSeriesSource,
};
use notify_core::logging::{init_logging, LogConfig};
use notify_core::{AppConfig, Symbol, SymbolRegistry};
use notify_data::{MemoryStore, PgStore, StockRepository};
use notify_exchange::{ChartSource, YahooChartClient};
use notify_notification::{DigestNotifier, Envelope, MailtrapSender, SeriesSource};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "notify-stock")]
#[command(about = "Daily index price collector and market summary mailer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(long, short = 'c', global = true, default_value = "config/default.toml")]
    config: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error). 설정 파일보다 우선
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 데이터베이스 대신 메모리 저장소 사용
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 지정한 심볼의 시세 등록 (기본: 최근 1주)
    Register {
        /// 심볼 (정규 코드, 제공자 코드, 표시 이름 모두 가능)
        #[arg(short = 's', long = "symbol", required = true, value_delimiter = ',')]
        symbols: Vec<String>,

        /// 전체 이력 등록
        #[arg(short = 'a', long)]
        all: bool,
    },

    /// 설정된 지원 종목 전체 갱신
    Update {
        /// 전체 이력 등록
        #[arg(short = 'a', long)]
        all: bool,
    },

    /// 시장 요약 메일 발송
    Notify {
        /// 심볼 (생략 시 지원 종목 전체)
        #[arg(short = 's', long = "symbol", value_delimiter = ',')]
        symbols: Vec<String>,

        /// 시계열 공급자
        #[arg(long, value_enum, default_value_t = SourceKind::Stored)]
        source: SourceKind,
    },

    /// 심볼 레지스트리 출력
    Symbols,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceKind {
    /// 저장된 레코드
    Stored,
    /// 차트 API 직접 조회
    Live,
}

fn register_mode(all: bool) -> RegisterMode {
    if all {
        RegisterMode::FullHistory
    } else {
        RegisterMode::Recent
    }
}

async fn open_store(
    config: &AppConfig,
    registry: &SymbolRegistry,
    dry_run: bool,
) -> anyhow::Result<Arc<dyn StockRepository>> {
    if dry_run {
        tracing::warn!("메모리 저장소 사용 (결과가 저장되지 않음)");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(&config.database)
        .await?
        .with_registry(registry.clone());
    store.migrate().await?;
    store.health_check().await?;
    Ok(Arc::new(store))
}

fn chart_source(config: &AppConfig) -> anyhow::Result<Arc<dyn ChartSource>> {
    Ok(Arc::new(YahooChartClient::from_config(&config.chart)?))
}

async fn run_register(
    config: &AppConfig,
    registry: &SymbolRegistry,
    inputs: &[String],
    all: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let store = open_store(config, registry, dry_run).await?;
    let registrar = Registrar::new(
        chart_source(config)?,
        store,
        registry.clone(),
        config.collect.clone(),
    )
    .with_interval(config.chart.interval);

    let report = registrar
        .register_symbols(inputs, register_mode(all), Utc::now())
        .await;
    report.stats.log_summary("시세 등록");
    report.into_result()?;

    Ok(())
}

async fn run_notify(
    config: &AppConfig,
    registry: &SymbolRegistry,
    inputs: &[String],
    source: SourceKind,
    dry_run: bool,
) -> anyhow::Result<()> {
    let symbols: Vec<Symbol> = if inputs.is_empty() {
        config.symbols.supported_symbols(registry)?
    } else {
        inputs
            .iter()
            .map(|s| registry.resolve(s))
            .collect::<Result<_, _>>()?
    };

    let series: Arc<dyn SeriesSource> = match source {
        SourceKind::Stored => Arc::new(StoredSeriesSource::new(
            open_store(config, registry, dry_run).await?,
        )),
        SourceKind::Live => Arc::new(LiveSeriesSource::new(
            chart_source(config)?,
            registry.clone(),
            config.chart.interval,
        )),
    };

    let notifier = DigestNotifier::new(
        Arc::new(MailtrapSender::from_config(&config.mail)),
        series,
        registry.clone(),
        Envelope::from_config(&config.mail),
    )
    .with_window_months(config.collect.digest_months);

    let report = notifier.send_digest(&symbols).await?;
    tracing::info!(
        subject = %report.subject,
        delivered = report.delivered.len(),
        "요약 메일 발송 완료"
    );
    report.into_result()?;

    Ok(())
}

fn print_symbols(registry: &SymbolRegistry) {
    println!("{:<12} {:<12} DISPLAY", "CANONICAL", "PROVIDER");
    for entry in registry.entries() {
        println!("{:<12} {:<12} {}", entry.canonical, entry.provider, entry.display);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("설정 로드 실패: {}", cli.config.display()))?;

    // 로깅 초기화
    let mut log_config = LogConfig::from_settings(&config.logging);
    if let Some(level) = &cli.log_level {
        log_config.level = level.clone();
    }
    init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let registry = config.symbols.registry()?;
    if SymbolRegistry::install(registry.clone()).is_err() {
        tracing::warn!("심볼 레지스트리가 이미 초기화되어 있습니다");
    }

    tracing::info!("notify-stock 시작");

    match cli.command {
        Commands::Register { symbols, all } => {
            run_register(&config, &registry, &symbols, all, cli.dry_run).await?;
        }
        Commands::Update { all } => {
            let supported = config.symbols.supported.clone();
            run_register(&config, &registry, &supported, all, cli.dry_run).await?;
        }
        Commands::Notify { symbols, source } => {
            run_notify(&config, &registry, &symbols, source, cli.dry_run).await?;
        }
        Commands::Symbols => print_symbols(&registry),
    }

    tracing::info!("notify-stock 종료");

    Ok(())
}
