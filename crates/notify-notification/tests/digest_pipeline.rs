//! 요약 메일 파이프라인 테스트.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use notify_core::{
    Classify, Currency, ErrorKind, InstrumentDetail, PriceRecord, StockSeries, Symbol,
    SymbolRegistry,
};
use notify_notification::{
    DigestError, DigestNotifier, Envelope, MailMessage, MailSender, MailtrapConfig,
    MailtrapSender, NotificationError, NotificationResult, SeriesSource, SourceError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 보낸 메일을 기록하는 전송기.
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<MailMessage>>,
    fail: bool,
}

#[async_trait]
impl MailSender for RecordingSender {
    async fn send(&self, message: &MailMessage) -> NotificationResult<()> {
        if self.fail {
            return Err(NotificationError::SendFailed("HTTP 500: boom".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// 미리 준비한 시계열을 돌려주는 공급자.
#[derive(Default)]
struct FixedSource {
    series: HashMap<String, StockSeries>,
}

impl FixedSource {
    fn with(mut self, canonical: &str, currency: Currency, closes: &[Decimal]) -> Self {
        let symbol = Symbol::parse(canonical).unwrap();
        let detail = InstrumentDetail {
            symbol: symbol.clone(),
            short_name: canonical.to_string(),
            long_name: canonical.to_string(),
            currency,
            market_price: *closes.last().unwrap(),
            previous_close: closes[0],
            volume: None,
            market_cap: None,
        };
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                PriceRecord::new(
                    symbol.clone(),
                    NaiveDate::from_ymd_opt(2026, 10, 1 + i as u32).unwrap(),
                    *close,
                    *close,
                    *close,
                    *close,
                )
                .unwrap()
            })
            .collect();
        self.series.insert(
            canonical.to_string(),
            StockSeries::new(detail, records).unwrap(),
        );
        self
    }
}

#[async_trait]
impl SeriesSource for FixedSource {
    async fn load_series(
        &self,
        symbol: &Symbol,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<StockSeries, SourceError> {
        self.series.get(symbol.as_str()).cloned().ok_or_else(|| {
            SourceError::new(
                ErrorKind::Persistence,
                format!("symbol {} not found", symbol),
            )
        })
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn envelope() -> Envelope {
    Envelope {
        from: "digest@example.com".to_string(),
        from_name: "Notify Stock".to_string(),
        to: "me@example.com".to_string(),
        category: "Market Summary".to_string(),
    }
}

fn notifier(sender: Arc<RecordingSender>, source: FixedSource) -> DigestNotifier {
    DigestNotifier::new(
        sender,
        Arc::new(source),
        SymbolRegistry::default(),
        envelope(),
    )
    .with_clock(Arc::new(|| Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()))
}

fn symbols() -> Vec<Symbol> {
    vec![
        Symbol::parse("N225").unwrap(),
        Symbol::parse("S&P500").unwrap(),
    ]
}

#[tokio::test]
async fn test_digest_joins_messages_in_input_order() {
    let sender = Arc::new(RecordingSender::default());
    let source = FixedSource::default()
        .with("N225", Currency::Jpy, &[dec!(100), dec!(200), dec!(300)])
        .with("S&P500", Currency::Usd, &[dec!(50), dec!(50)]);

    let report = notifier(sender.clone(), source)
        .send_digest(&symbols())
        .await
        .unwrap();

    assert_eq!(report.subject, "Market Summary October 19 2026");
    assert_eq!(
        report.body,
        "Nikkei 225\n\
         Closing Price: 300 JPY\n\
         1-Year Moving Average: 200 JPY\n\
         Closing-to-Average Ratio: 150%\n\
         \n\
         S&P 500\n\
         Closing Price: 50 USD\n\
         1-Year Moving Average: 50 USD\n\
         Closing-to-Average Ratio: 100%"
    );
    assert!(report.failures.is_empty());

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, report.body);
    assert_eq!(sent[0].to, "me@example.com");
}

#[tokio::test]
async fn test_failed_symbol_is_reported_but_others_are_sent() {
    let sender = Arc::new(RecordingSender::default());
    let source =
        FixedSource::default().with("S&P500", Currency::Usd, &[dec!(10), dec!(20), dec!(30)]);

    let report = notifier(sender.clone(), source)
        .send_digest(&symbols())
        .await
        .unwrap();

    assert_eq!(report.delivered, vec![Symbol::parse("S&P500").unwrap()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].symbol, "N225");
    assert_eq!(sender.sent.lock().unwrap().len(), 1);

    let err = report.into_result().unwrap_err();
    match err {
        DigestError::Partial(batch) => assert_eq!(batch.symbols(), vec!["N225"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_nothing_sent_when_every_symbol_fails() {
    let sender = Arc::new(RecordingSender::default());

    let err = notifier(sender.clone(), FixedSource::default())
        .send_digest(&symbols())
        .await
        .unwrap_err();

    match &err {
        DigestError::NothingToSend(batch) => {
            assert_eq!(batch.symbols(), vec!["N225", "S&P500"])
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(sender.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_fatal() {
    let sender = Arc::new(RecordingSender {
        fail: true,
        ..Default::default()
    });
    let source = FixedSource::default()
        .with("N225", Currency::Jpy, &[dec!(1)])
        .with("S&P500", Currency::Usd, &[dec!(1)]);

    let err = notifier(sender, source)
        .send_digest(&symbols())
        .await
        .unwrap_err();

    assert!(matches!(err, DigestError::Transport(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_mailtrap_posts_json_with_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/send")
        .match_header("authorization", "Bearer secret-token")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "from": { "email": "digest@example.com", "name": "Notify Stock" },
            "to": [{ "email": "me@example.com" }],
            "subject": "Market Summary October 19 2026",
            "category": "Market Summary"
        })))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let sender = Arc::new(MailtrapSender::new(
        MailtrapConfig::new("secret-token").with_base_url(server.url()),
    ));
    let source = FixedSource::default()
        .with("N225", Currency::Jpy, &[dec!(1)])
        .with("S&P500", Currency::Usd, &[dec!(1)]);

    DigestNotifier::new(sender, Arc::new(source), SymbolRegistry::default(), envelope())
        .with_clock(Arc::new(|| Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()))
        .send_digest(&symbols())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_mailtrap_error_status_is_send_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/send")
        .with_status(401)
        .with_body(r#"{"errors":["Unauthorized"]}"#)
        .create_async()
        .await;

    let sender = MailtrapSender::new(MailtrapConfig::new("bad").with_base_url(server.url()));
    let message = MailMessage {
        from: "digest@example.com".to_string(),
        from_name: "Notify Stock".to_string(),
        to: "me@example.com".to_string(),
        subject: "s".to_string(),
        body: "b".to_string(),
        category: "c".to_string(),
    };

    match sender.send(&message).await.unwrap_err() {
        NotificationError::SendFailed(msg) => assert!(msg.contains("401")),
        other => panic!("unexpected error: {other:?}"),
    }
}
