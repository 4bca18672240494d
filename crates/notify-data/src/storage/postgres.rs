//! PostgreSQL 저장소.
//!
//! 테이블 구조는 `migrations/` 디렉토리를 참조하세요.
//!
//! - `stocks`: (symbol, day) 기본 키, OHLC는 양수 제약
//! - `symbols`: symbol 기본 키, 종목 상세 정보

use crate::error::{DataError, Result};
use crate::traits::{require_symbols, InstrumentStore, PriceStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use notify_core::{Currency, DatabaseConfig, InstrumentDetail, PriceRecord, Symbol, SymbolRegistry};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

const INSERT_CHUNK_SIZE: usize = 500;

/// `stocks` 테이블 레코드.
#[derive(Debug, Clone, FromRow)]
struct StockRow {
    symbol: String,
    day: NaiveDate,
    open: Decimal,
    close: Decimal,
    high: Decimal,
    low: Decimal,
}

impl StockRow {
    fn into_record(self, registry: &SymbolRegistry) -> Result<PriceRecord> {
        let symbol = registry
            .resolve(&self.symbol)
            .map_err(|e| DataError::InvalidData(e.to_string()))?;
        PriceRecord::new(symbol, self.day, self.open, self.close, self.high, self.low)
            .map_err(|e| DataError::InvalidData(format!("{} {}: {}", self.symbol, self.day, e)))
    }
}

/// `symbols` 테이블 레코드.
#[derive(Debug, Clone, FromRow)]
struct SymbolRow {
    symbol: String,
    short_name: String,
    long_name: String,
    currency: String,
    market_price: Decimal,
    previous_close: Decimal,
    volume: Option<i64>,
    market_cap: Option<i64>,
}

impl SymbolRow {
    fn into_detail(self, registry: &SymbolRegistry) -> Result<InstrumentDetail> {
        let symbol = registry
            .resolve(&self.symbol)
            .map_err(|e| DataError::InvalidData(e.to_string()))?;
        let currency: Currency = self
            .currency
            .parse()
            .map_err(|e: notify_core::ValidationError| DataError::InvalidData(e.to_string()))?;

        Ok(InstrumentDetail {
            symbol,
            short_name: self.short_name,
            long_name: self.long_name,
            currency,
            market_price: self.market_price,
            previous_close: self.previous_close,
            volume: self.volume,
            market_cap: self.market_cap,
        })
    }
}

/// PostgreSQL 기반 가격/종목 저장소.
///
/// 저장된 정규 코드는 조회 시 이 저장소의 레지스트리로 다시 해석합니다.
/// 기본값은 전역 레지스트리이며, 등록기 등에 별도 레지스트리를 주입했다면
/// [`PgStore::with_registry`]로 같은 레지스트리를 넘겨야 합니다.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    registry: SymbolRegistry,
}

impl PgStore {
    /// 설정의 `[database]` 섹션으로 연결합니다.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        info!("Database connection established");

        Ok(Self {
            pool,
            registry: SymbolRegistry::global().clone(),
        })
    }

    /// 행 해석에 사용할 심볼 레지스트리를 지정합니다.
    pub fn with_registry(mut self, registry: SymbolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// 스키마 마이그레이션을 실행합니다.
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");

        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DataError::MigrationError(e.to_string()))?;

        info!("Migrations completed successfully");
        Ok(())
    }

    /// 데이터베이스 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        debug!("Database health check passed");
        Ok(())
    }
}

/// 같은 (symbol, day)가 한 INSERT 안에 두 번 나오면 PostgreSQL이 거부하므로
/// 뒤에 나온 레코드만 남깁니다.
fn dedupe_by_key(records: &[PriceRecord]) -> Vec<&PriceRecord> {
    let mut latest: BTreeMap<(&str, NaiveDate), &PriceRecord> = BTreeMap::new();
    for record in records {
        latest.insert((record.symbol().as_str(), record.day()), record);
    }
    latest.into_values().collect()
}

#[async_trait]
impl PriceStore for PgStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn save_prices(&self, records: &[PriceRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let unique = dedupe_by_key(records);
        let mut saved = 0;

        for chunk in unique.chunks(INSERT_CHUNK_SIZE) {
            let symbols: Vec<&str> = chunk.iter().map(|r| r.symbol().as_str()).collect();
            let days: Vec<NaiveDate> = chunk.iter().map(|r| r.day()).collect();
            let opens: Vec<Decimal> = chunk.iter().map(|r| r.open()).collect();
            let closes: Vec<Decimal> = chunk.iter().map(|r| r.close()).collect();
            let highs: Vec<Decimal> = chunk.iter().map(|r| r.high()).collect();
            let lows: Vec<Decimal> = chunk.iter().map(|r| r.low()).collect();

            let result = sqlx::query(
                r#"
                INSERT INTO stocks (symbol, day, open, close, high, low, updated_at)
                SELECT t.symbol, t.day, t.open, t.close, t.high, t.low, NOW()
                FROM UNNEST(
                    $1::text[], $2::date[],
                    $3::numeric[], $4::numeric[], $5::numeric[], $6::numeric[]
                ) AS t(symbol, day, open, close, high, low)
                ON CONFLICT (symbol, day) DO UPDATE SET
                    open = EXCLUDED.open,
                    close = EXCLUDED.close,
                    high = EXCLUDED.high,
                    low = EXCLUDED.low,
                    updated_at = NOW()
                "#,
            )
            .bind(&symbols)
            .bind(&days)
            .bind(&opens)
            .bind(&closes)
            .bind(&highs)
            .bind(&lows)
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

            saved += result.rows_affected() as usize;
        }

        debug!(saved, "가격 레코드 저장");
        Ok(saved)
    }

    #[instrument(skip(self, symbols), fields(symbols = symbols.len()))]
    async fn query_prices(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<Symbol, Vec<PriceRecord>>> {
        require_symbols(symbols)?;

        let codes: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        let rows: Vec<StockRow> = sqlx::query_as(
            r#"
            SELECT DISTINCT ON (symbol, day)
                symbol, day, open, close, high, low
            FROM stocks
            WHERE symbol = ANY($1::text[])
              AND day BETWEEN $2 AND $3
            ORDER BY symbol, day
            "#,
        )
        .bind(&codes)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut by_symbol: HashMap<Symbol, Vec<PriceRecord>> = HashMap::new();
        for row in rows {
            let record = row.into_record(&self.registry)?;
            by_symbol
                .entry(record.symbol().clone())
                .or_default()
                .push(record);
        }

        Ok(by_symbol)
    }

    #[instrument(skip(self))]
    async fn latest_price(&self, symbol: &Symbol) -> Result<Option<PriceRecord>> {
        let row: Option<StockRow> = sqlx::query_as(
            r#"
            SELECT symbol, day, open, close, high, low
            FROM stocks
            WHERE symbol = $1
            ORDER BY day DESC
            LIMIT 1
            "#,
        )
        .bind(symbol.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_record(&self.registry)).transpose()
    }
}

#[async_trait]
impl InstrumentStore for PgStore {
    #[instrument(skip(self, details), fields(count = details.len()))]
    async fn save_instruments(&self, details: &[InstrumentDetail]) -> Result<usize> {
        if details.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for detail in details {
            sqlx::query(
                r#"
                INSERT INTO symbols
                    (symbol, short_name, long_name, currency, market_price, previous_close,
                     volume, market_cap, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
                ON CONFLICT (symbol) DO UPDATE SET
                    short_name = EXCLUDED.short_name,
                    long_name = EXCLUDED.long_name,
                    currency = EXCLUDED.currency,
                    market_price = EXCLUDED.market_price,
                    previous_close = EXCLUDED.previous_close,
                    volume = EXCLUDED.volume,
                    market_cap = EXCLUDED.market_cap,
                    updated_at = NOW()
                "#,
            )
            .bind(detail.symbol.as_str())
            .bind(&detail.short_name)
            .bind(&detail.long_name)
            .bind(detail.currency.as_str())
            .bind(detail.market_price)
            .bind(detail.previous_close)
            .bind(detail.volume)
            .bind(detail.market_cap)
            .execute(&mut *tx)
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;
        }

        tx.commit().await?;

        debug!(count = details.len(), "종목 정보 저장");
        Ok(details.len())
    }

    #[instrument(skip(self))]
    async fn get_instrument(&self, symbol: &Symbol) -> Result<InstrumentDetail> {
        let row: Option<SymbolRow> = sqlx::query_as(
            r#"
            SELECT symbol, short_name, long_name, currency, market_price, previous_close,
                   volume, market_cap
            FROM symbols
            WHERE symbol = $1
            "#,
        )
        .bind(symbol.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| DataError::NotFound(format!("symbol {} not found", symbol)))?
            .into_detail(&self.registry)
    }

    async fn list_instruments(&self) -> Result<Vec<InstrumentDetail>> {
        let rows: Vec<SymbolRow> = sqlx::query_as(
            r#"
            SELECT symbol, short_name, long_name, currency, market_price, previous_close,
                   volume, market_cap
            FROM symbols
            ORDER BY symbol
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.into_detail(&self.registry))
            .collect()
    }
}
