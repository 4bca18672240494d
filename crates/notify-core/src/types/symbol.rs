//! 심볼 식별자와 레지스트리.
//!
//! 하나의 종목은 세 가지 표현을 가집니다:
//! - **제공자 코드**: 시세 API가 사용하는 코드 (예: `^N225`, `^GSPC`)
//! - **정규 코드**: 내부 저장과 조회에 쓰는 코드 (예: `N225`, `S&P500`)
//! - **표시 이름**: 사람이 읽는 이름 (예: `Nikkei 225`, `S&P 500`)
//!
//! [`SymbolRegistry`]는 시작 시 한 번 만들어진 뒤 읽기 전용으로만 사용됩니다.
//! 한 값은 한 항목에만 속할 수 있으므로 (컬럼이 달라도) 모든 조회는
//! 단사(injective)이고, 어떤 표현을 넣어도 같은 항목으로 돌아옵니다.

use crate::error::SymbolError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// 정규 코드로 식별되는 종목 심볼.
///
/// 레지스트리를 통해서만 만들어지므로 존재하는 `Symbol`은 항상 지원되는 종목입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// 전역 레지스트리로 입력을 해석합니다.
    ///
    /// 제공자 코드, 정규 코드, 표시 이름 중 어느 것이든 받습니다.
    pub fn parse(input: &str) -> Result<Self, SymbolError> {
        SymbolRegistry::global().resolve(input)
    }

    /// 정규 코드.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 전역 레지스트리 기준 제공자 코드.
    pub fn provider_code(&self) -> Result<&'static str, SymbolError> {
        SymbolRegistry::global().to_provider_code(self)
    }

    /// 전역 레지스트리 기준 표시 이름.
    pub fn display_name(&self) -> Result<&'static str, SymbolError> {
        SymbolRegistry::global().to_display_name(self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl std::str::FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 레지스트리 한 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// 정규 코드
    pub canonical: String,
    /// 제공자 코드
    pub provider: String,
    /// 표시 이름
    pub display: String,
}

impl SymbolEntry {
    pub fn new(
        canonical: impl Into<String>,
        provider: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            canonical: canonical.into(),
            provider: provider.into(),
            display: display.into(),
        }
    }
}

/// 레지스트리 컬럼.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolColumn {
    Provider,
    Canonical,
    Display,
}

impl SymbolColumn {
    const ALL: [SymbolColumn; 3] = [
        SymbolColumn::Provider,
        SymbolColumn::Canonical,
        SymbolColumn::Display,
    ];

    fn value(self, entry: &SymbolEntry) -> &str {
        match self {
            SymbolColumn::Provider => &entry.provider,
            SymbolColumn::Canonical => &entry.canonical,
            SymbolColumn::Display => &entry.display,
        }
    }
}

impl fmt::Display for SymbolColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolColumn::Provider => "provider",
            SymbolColumn::Canonical => "canonical",
            SymbolColumn::Display => "display",
        };
        write!(f, "{}", name)
    }
}

/// 기본 지원 종목.
pub fn default_symbol_entries() -> Vec<SymbolEntry> {
    vec![
        SymbolEntry::new("N225", "^N225", "Nikkei 225"),
        SymbolEntry::new("S&P500", "^GSPC", "S&P 500"),
    ]
}

static GLOBAL_REGISTRY: OnceLock<SymbolRegistry> = OnceLock::new();

/// 세 가지 표현 사이의 양방향 매핑.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    entries: Vec<SymbolEntry>,
    by_provider: HashMap<String, usize>,
    by_canonical: HashMap<String, usize>,
    by_display: HashMap<String, usize>,
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::index(default_symbol_entries())
    }
}

impl SymbolRegistry {
    /// 항목 목록으로 레지스트리를 생성합니다.
    ///
    /// 서로 다른 두 항목이 같은 값을 가지면 컬럼과 관계없이 실패합니다.
    /// 한 항목 안에서 정규 코드와 표시 이름이 같은 것은 허용됩니다.
    pub fn from_entries(entries: Vec<SymbolEntry>) -> Result<Self, SymbolError> {
        let mut owner: HashMap<&str, usize> = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            for column in SymbolColumn::ALL {
                let value = column.value(entry);
                match owner.get(value) {
                    Some(&j) if j != i => {
                        return Err(SymbolError::Duplicate {
                            column,
                            value: value.to_string(),
                        });
                    }
                    _ => {
                        owner.insert(value, i);
                    }
                }
            }
        }

        Ok(Self::index(entries))
    }

    fn index(entries: Vec<SymbolEntry>) -> Self {
        let mut by_provider = HashMap::with_capacity(entries.len());
        let mut by_canonical = HashMap::with_capacity(entries.len());
        let mut by_display = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            by_provider.insert(entry.provider.clone(), i);
            by_canonical.insert(entry.canonical.clone(), i);
            by_display.insert(entry.display.clone(), i);
        }

        Self {
            entries,
            by_provider,
            by_canonical,
            by_display,
        }
    }

    /// 전역 레지스트리를 설치합니다.
    ///
    /// 첫 사용 전에 한 번만 호출할 수 있으며, 이미 초기화되어 있으면
    /// 전달한 레지스트리를 그대로 돌려줍니다.
    pub fn install(registry: SymbolRegistry) -> Result<(), SymbolRegistry> {
        GLOBAL_REGISTRY.set(registry)
    }

    /// 전역 레지스트리. 설치되지 않았다면 기본 테이블로 초기화됩니다.
    pub fn global() -> &'static SymbolRegistry {
        GLOBAL_REGISTRY.get_or_init(SymbolRegistry::default)
    }

    /// 입력을 정규 심볼로 해석합니다.
    ///
    /// 제공자 코드, 정규 코드, 표시 이름 순서로 조회합니다.
    pub fn resolve(&self, input: &str) -> Result<Symbol, SymbolError> {
        self.by_provider
            .get(input)
            .or_else(|| self.by_canonical.get(input))
            .or_else(|| self.by_display.get(input))
            .map(|&i| Symbol(self.entries[i].canonical.clone()))
            .ok_or_else(|| SymbolError::unsupported(input))
    }

    fn entry(&self, symbol: &Symbol) -> Result<&SymbolEntry, SymbolError> {
        self.by_canonical
            .get(symbol.as_str())
            .map(|&i| &self.entries[i])
            .ok_or_else(|| SymbolError::unsupported(symbol.as_str()))
    }

    /// 제공자 코드.
    pub fn to_provider_code(&self, symbol: &Symbol) -> Result<&str, SymbolError> {
        self.entry(symbol).map(|e| e.provider.as_str())
    }

    /// 정규 코드.
    pub fn to_canonical_code(&self, symbol: &Symbol) -> Result<&str, SymbolError> {
        self.entry(symbol).map(|e| e.canonical.as_str())
    }

    /// 표시 이름.
    pub fn to_display_name(&self, symbol: &Symbol) -> Result<&str, SymbolError> {
        self.entry(symbol).map(|e| e.display.as_str())
    }

    /// 등록된 모든 항목 (등록 순서).
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// 등록된 모든 심볼 (등록 순서).
    pub fn symbols(&self) -> Vec<Symbol> {
        self.entries
            .iter()
            .map(|e| Symbol(e.canonical.clone()))
            .collect()
    }
}
