//! 설정 관리.
//!
//! 기본값 → TOML 파일 → `NOTIFY__` 접두사 환경 변수 순서로 덮어씁니다.
//! 예: `NOTIFY__MAIL__API_TOKEN=...`, `NOTIFY__DATABASE__URL=postgres://...`

use crate::error::SymbolError;
use crate::types::{default_symbol_entries, ChartInterval, Symbol, SymbolEntry, SymbolRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 메일 전송 설정
    pub mail: MailConfig,
    /// 시세 차트 API 설정
    pub chart: ChartConfig,
    /// 수집 작업 설정
    pub collect: CollectConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 지원 종목 설정
    pub symbols: SymbolsConfig,
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 연결 URL
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/notify_stock".to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// 메일 전송 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// 발신 주소
    pub from: String,
    /// 발신자 이름
    pub from_name: String,
    /// 수신 주소
    pub to: String,
    /// API 토큰
    pub api_token: String,
    /// 전송 API 기본 URL
    pub base_url: String,
    /// 메일 카테고리
    pub category: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: String::new(),
            from_name: "Notify Stock".to_string(),
            to: String::new(),
            api_token: String::new(),
            base_url: "https://send.api.mailtrap.io".to_string(),
            category: "Market Summary".to_string(),
        }
    }
}

/// 시세 차트 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// API 기본 URL
    pub base_url: String,
    /// 조회 간격
    pub interval: ChartInterval,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            interval: ChartInterval::Day,
            timeout_secs: 30,
        }
    }
}

impl ChartConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 수집 작업 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectConfig {
    /// 심볼/구간 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// 주간 갱신 시 조회 일수
    pub recent_days: i64,
    /// 전체 이력 수집 시 한 번에 조회할 기간 (년)
    pub backfill_years: u32,
    /// 다이제스트에 사용할 기간 (개월)
    pub digest_months: u32,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 2000,
            recent_days: 7,
            backfill_years: 5,
            digest_months: 12,
        }
    }
}

impl CollectConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 지원 종목 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SymbolsConfig {
    /// 레지스트리 항목. 비어 있으면 기본 테이블을 사용합니다.
    pub entries: Vec<SymbolEntry>,
    /// `update` 명령이 처리할 종목 (어느 표현이든 가능)
    pub supported: Vec<String>,
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            supported: default_symbol_entries()
                .into_iter()
                .map(|e| e.canonical)
                .collect(),
        }
    }
}

impl SymbolsConfig {
    /// 설정된 항목으로 레지스트리를 생성합니다.
    pub fn registry(&self) -> Result<SymbolRegistry, SymbolError> {
        if self.entries.is_empty() {
            Ok(SymbolRegistry::default())
        } else {
            SymbolRegistry::from_entries(self.entries.clone())
        }
    }

    /// `supported` 목록을 레지스트리로 해석합니다.
    pub fn supported_symbols(&self, registry: &SymbolRegistry) -> Result<Vec<Symbol>, SymbolError> {
        self.supported
            .iter()
            .map(|s| registry.resolve(s))
            .collect()
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 기본값과 환경 변수만으로 로드됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("NOTIFY")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("symbols.supported")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// TOML 문자열에서 설정을 로드합니다. 환경 변수는 적용하지 않습니다.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.collect.recent_days, 7);
        assert_eq!(config.collect.backfill_years, 5);
        assert_eq!(config.collect.request_delay(), Duration::from_secs(2));
        assert_eq!(config.chart.interval, ChartInterval::Day);
        assert_eq!(config.symbols.supported, vec!["N225", "S&P500"]);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml_str(
            r#"
            [mail]
            from = "digest@example.com"
            to = "me@example.com"

            [chart]
            interval = "1wk"

            [symbols]
            supported = ["^N225"]
            "#,
        )
        .unwrap();

        assert_eq!(config.mail.from, "digest@example.com");
        assert_eq!(config.mail.base_url, "https://send.api.mailtrap.io");
        assert_eq!(config.chart.interval, ChartInterval::Week);

        let registry = config.symbols.registry().unwrap();
        let supported = config.symbols.supported_symbols(&registry).unwrap();
        assert_eq!(supported.len(), 1);
        assert_eq!(supported[0].as_str(), "N225");
    }

    #[test]
    fn test_custom_registry_entries() {
        let config = AppConfig::from_toml_str(
            r#"
            [symbols]
            supported = ["DJI"]

            [[symbols.entries]]
            canonical = "DJI"
            provider = "^DJI"
            display = "Dow Jones"
            "#,
        )
        .unwrap();

        let registry = config.symbols.registry().unwrap();
        assert_eq!(registry.entries().len(), 1);
        assert!(config.symbols.supported_symbols(&registry).is_ok());
        assert!(registry.resolve("N225").is_err());
    }
}
