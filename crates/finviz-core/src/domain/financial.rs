//! 재무제표 스냅샷.
//!
//! 금액 단위는 모두 억원입니다. 백엔드가 원 단위를 억원으로 환산해서 내려줍니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 억원 → 조원 환산 단위.
pub const EOK_PER_JO: i64 = 10_000;

/// 재무제표 계정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementLine {
    /// 자산총계
    TotalAssets,
    /// 부채총계
    TotalLiabilities,
    /// 자본총계
    TotalEquity,
    /// 매출액
    Revenue,
    /// 영업이익
    OperatingProfit,
    /// 당기순이익
    NetIncome,
}

impl StatementLine {
    /// 공시 계정명.
    pub fn account_name(&self) -> &'static str {
        match self {
            Self::TotalAssets => "자산총계",
            Self::TotalLiabilities => "부채총계",
            Self::TotalEquity => "자본총계",
            Self::Revenue => "매출액",
            Self::OperatingProfit => "영업이익",
            Self::NetIncome => "당기순이익",
        }
    }

    /// 재무상태표 계정 여부.
    pub fn is_balance_sheet(&self) -> bool {
        matches!(
            self,
            Self::TotalAssets | Self::TotalLiabilities | Self::TotalEquity
        )
    }
}

impl std::fmt::Display for StatementLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.account_name())
    }
}

/// 당기/전기 금액 쌍.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmountPair {
    /// 당기
    #[serde(default)]
    pub current: Decimal,
    /// 전기
    #[serde(default)]
    pub previous: Decimal,
}

impl AmountPair {
    pub fn new(current: Decimal, previous: Decimal) -> Self {
        Self { current, previous }
    }
}

/// 보고 기간 메타데이터.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodMetadata {
    /// 사업연도
    #[serde(default)]
    pub bsns_year: String,
    /// 보고서 코드 (11011: 사업보고서)
    #[serde(default)]
    pub reprt_code: String,
    /// 당기명 (예: "제 54 기")
    #[serde(default)]
    pub thstrm_nm: String,
    /// 전기명
    #[serde(default)]
    pub frmtrm_nm: String,
}

/// 한 회사의 한 사업연도 재무 수치.
///
/// 요청마다 새로 조회하며 캐시하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// 재무상태표 (계정명 → 금액)
    #[serde(default)]
    pub balance_sheet: HashMap<String, AmountPair>,
    /// 손익계산서 (계정명 → 금액)
    #[serde(default)]
    pub income_statement: HashMap<String, AmountPair>,
    /// 보고 기간
    #[serde(default)]
    pub metadata: PeriodMetadata,
}

impl FinancialSnapshot {
    /// 빈 스냅샷을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 계정 금액을 설정합니다.
    pub fn with_line(mut self, line: StatementLine, current: Decimal, previous: Decimal) -> Self {
        self.set_line(line, AmountPair::new(current, previous));
        self
    }

    /// 사업연도를 설정합니다.
    pub fn with_year(mut self, year: i32) -> Self {
        self.metadata.bsns_year = year.to_string();
        self
    }

    /// 계정 금액을 설정합니다.
    pub fn set_line(&mut self, line: StatementLine, amount: AmountPair) {
        let table = if line.is_balance_sheet() {
            &mut self.balance_sheet
        } else {
            &mut self.income_statement
        };
        table.insert(line.account_name().to_string(), amount);
    }

    /// 계정 금액. 공시에서 빠진 계정은 0입니다.
    pub fn line(&self, line: StatementLine) -> AmountPair {
        let table = if line.is_balance_sheet() {
            &self.balance_sheet
        } else {
            &self.income_statement
        };
        table
            .get(line.account_name())
            .copied()
            .unwrap_or_default()
    }

    /// 보고 기간 표시용 라벨.
    pub fn period_label(&self) -> String {
        match (
            self.metadata.bsns_year.is_empty(),
            self.metadata.thstrm_nm.is_empty(),
        ) {
            (false, false) => format!("{}년 ({})", self.metadata.bsns_year, self.metadata.thstrm_nm),
            (false, true) => format!("{}년", self.metadata.bsns_year),
            (true, false) => self.metadata.thstrm_nm.clone(),
            (true, true) => "-".to_string(),
        }
    }
}
