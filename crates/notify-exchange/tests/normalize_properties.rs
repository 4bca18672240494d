//! 차트 정규화 속성 테스트.
//!
//! 서로 다른 날짜의 시세 n개에 대해:
//! 1. 레코드 수 + 건너뛴 날짜 수 = n
//! 2. 레코드 수 = 네 값이 모두 양수인 날짜 수
//! 3. 건너뛴 인덱스는 양수가 아닌 값(0 이하 또는 `null`)이 있는 날짜와 정확히 같다

use notify_core::Symbol;
use notify_exchange::chart::{ChartBody, ChartMeta, ChartResult, Indicators, Quote};
use notify_exchange::{normalize, ChartResponse};
use proptest::prelude::*;

const DAY: i64 = 86_400;
// 2024-03-15 00:00:00 UTC
const BASE: i64 = 1_710_460_800;

type Quadruple = (Option<f64>, Option<f64>, Option<f64>, Option<f64>);

// ── Strategies ───────────────────────────────────────────────────────

/// 양수, 0 이하, `null`이 섞인 가격
fn arb_price() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        6 => (1i64..100_000_000).prop_map(|cents| Some(cents as f64 / 100.0)),
        1 => (-100_000_000i64..=0).prop_map(|cents| Some(cents as f64 / 100.0)),
        1 => Just(None),
    ]
}

fn arb_quadruples() -> impl Strategy<Value = Vec<Quadruple>> {
    prop::collection::vec((arb_price(), arb_price(), arb_price(), arb_price()), 0..40)
}

// ── Helpers ──────────────────────────────────────────────────────────

fn chart(quads: &[Quadruple]) -> ChartResponse {
    let timestamp = (0..quads.len() as i64).map(|i| BASE + i * DAY).collect();
    let quote = Quote {
        open: quads.iter().map(|q| q.0).collect(),
        close: quads.iter().map(|q| q.1).collect(),
        high: quads.iter().map(|q| q.2).collect(),
        low: quads.iter().map(|q| q.3).collect(),
        volume: Vec::new(),
    };

    ChartResponse {
        chart: ChartBody {
            result: Some(vec![ChartResult {
                meta: ChartMeta {
                    currency: Some("JPY".to_string()),
                    regular_market_price: Some(38500.0),
                    chart_previous_close: Some(38100.0),
                    ..Default::default()
                },
                timestamp,
                indicators: Indicators {
                    quote: vec![quote],
                    adjclose: None,
                },
            }]),
            error: None,
        },
    }
}

fn all_positive(q: &Quadruple) -> bool {
    [q.0, q.1, q.2, q.3]
        .iter()
        .all(|v| matches!(v, Some(x) if *x > 0.0))
}

proptest! {
    #[test]
    fn prop_records_match_all_positive_days(quads in arb_quadruples()) {
        let symbol = Symbol::parse("N225").unwrap();
        let normalized = normalize(&chart(&quads), &symbol).unwrap();

        let expected = quads.iter().filter(|q| all_positive(q)).count();
        prop_assert_eq!(normalized.records.len() + normalized.skipped.len(), quads.len());
        prop_assert_eq!(normalized.records.len(), expected);

        let skipped: Vec<usize> = normalized.skipped.iter().map(|s| s.index).collect();
        let invalid: Vec<usize> = quads
            .iter()
            .enumerate()
            .filter(|(_, q)| !all_positive(q))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(skipped, invalid);

        // 날짜순, 날짜당 하나
        for pair in normalized.records.windows(2) {
            prop_assert!(pair[0].day() < pair[1].day());
        }
    }
}
