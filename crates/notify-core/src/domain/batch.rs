//! 여러 심볼에 대한 처리 결과 집계.
//!
//! 한 심볼의 실패가 나머지 심볼의 처리를 막지 않도록, 성공과 실패를
//! 각각 누적한 뒤 마지막에 한꺼번에 보고합니다.

use crate::error::{BatchError, Classify, SymbolFailure};
use std::fmt;

/// 심볼 단위 처리 결과 누적기.
#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    successes: Vec<T>,
    failures: Vec<SymbolFailure>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 한 심볼의 처리 결과를 기록합니다.
    pub fn record<E>(&mut self, symbol: impl Into<String>, result: Result<T, E>)
    where
        E: Classify + fmt::Display,
    {
        match result {
            Ok(value) => self.successes.push(value),
            Err(err) => self.failures.push(SymbolFailure::from_error(symbol, &err)),
        }
    }

    pub fn push_success(&mut self, value: T) {
        self.successes.push(value);
    }

    pub fn push_failure(&mut self, failure: SymbolFailure) {
        self.failures.push(failure);
    }

    pub fn successes(&self) -> &[T] {
        &self.successes
    }

    pub fn failures(&self) -> &[SymbolFailure] {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 성공과 실패를 분리하여 반환합니다.
    pub fn into_parts(self) -> (Vec<T>, Vec<SymbolFailure>) {
        (self.successes, self.failures)
    }

    /// 실패가 하나라도 있으면 실패 목록 전체를 에러로 반환합니다.
    pub fn into_result(self) -> Result<Vec<T>, BatchError> {
        if self.failures.is_empty() {
            Ok(self.successes)
        } else {
            Err(BatchError {
                failures: self.failures,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, SymbolError};

    #[test]
    fn test_record_keeps_both_sides() {
        let mut outcome = BatchOutcome::new();
        outcome.record("A", Ok::<_, SymbolError>(1));
        outcome.record(
            "B",
            Err(SymbolError::Unsupported {
                input: "B".to_string(),
            }),
        );
        outcome.record("C", Ok::<_, SymbolError>(3));

        assert_eq!(outcome.successes(), &[1, 3]);
        assert_eq!(outcome.failures().len(), 1);
        assert_eq!(outcome.failures()[0].kind, ErrorKind::UnresolvableSymbol);

        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.symbols(), vec!["B"]);
    }

    #[test]
    fn test_all_success_into_result() {
        let mut outcome = BatchOutcome::new();
        outcome.record("A", Ok::<_, SymbolError>("a"));
        assert!(!outcome.has_failures());
        assert_eq!(outcome.into_result().unwrap(), vec!["a"]);
    }
}
