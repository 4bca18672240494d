//! 수집 통계 구조체.

use notify_core::BatchOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 총 심볼 수
    pub total: usize,
    /// 성공한 심볼 수
    pub success: usize,
    /// 실패한 심볼 수
    pub errors: usize,
    /// 저장된 총 레코드 수
    pub total_records: usize,
    /// 건너뛴 날짜 수 (잘못된 시세)
    pub skipped_ticks: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 한 번의 조회 결과를 누적합니다.
    pub fn add_fetch(&mut self, records: usize, skipped: usize) {
        self.total_records += records;
        self.skipped_ticks += skipped;
    }

    /// 심볼 단위 결과로부터 성공/실패 수를 채웁니다.
    pub fn count_outcome<T>(&mut self, outcome: &BatchOutcome<T>) {
        self.success = outcome.successes().len();
        self.errors = outcome.failures().len();
        self.total = self.success + self.errors;
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            total_records = self.total_records,
            skipped_ticks = self.skipped_ticks,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::SymbolError;

    #[test]
    fn test_count_outcome() {
        let mut outcome: BatchOutcome<&str> = BatchOutcome::new();
        outcome.record("A", Ok::<_, SymbolError>("A"));
        outcome.record("B", Err::<&str, _>(SymbolError::Unsupported { input: "B".into() }));
        outcome.record("C", Ok::<_, SymbolError>("C"));

        let mut stats = CollectionStats::new();
        stats.count_outcome(&outcome);
        stats.add_fetch(10, 1);
        stats.add_fetch(5, 0);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total_records, 15);
        assert_eq!(stats.skipped_ticks, 1);
        assert!((stats.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_success_rate_is_zero() {
        assert_eq!(CollectionStats::new().success_rate(), 0.0);
    }
}
