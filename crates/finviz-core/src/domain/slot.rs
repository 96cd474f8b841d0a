//! 시각화 슬롯과 연도 범위.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::ChartType;
use crate::error::VizError;

/// 세션이 동시에 하나씩만 가질 수 있는 시각화 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationSlot {
    /// 손익 추이 (라인 차트)
    RevenueTrend,
    /// 재무상태 구성 (막대 차트)
    AssetComposition,
    /// 회계등식 균형 (막대 + 라인)
    BalanceEquation,
    /// 재무상태표 박스 다이어그램
    BalanceSheetBoxes,
}

impl VisualizationSlot {
    /// 모든 슬롯.
    pub const ALL: [VisualizationSlot; 4] = [
        VisualizationSlot::RevenueTrend,
        VisualizationSlot::AssetComposition,
        VisualizationSlot::BalanceEquation,
        VisualizationSlot::BalanceSheetBoxes,
    ];

    /// 회사를 선택하면 바로 요청되는 기본 슬롯.
    pub const DEFAULT: VisualizationSlot = VisualizationSlot::RevenueTrend;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RevenueTrend => "revenue-trend",
            Self::AssetComposition => "asset-composition",
            Self::BalanceEquation => "balance-equation",
            Self::BalanceSheetBoxes => "balance-sheet-boxes",
        }
    }

    /// 차트 API로 그리는 슬롯이면 차트 타입. 박스 다이어그램은 `None`.
    pub fn chart_type(&self) -> Option<ChartType> {
        match self {
            Self::RevenueTrend => Some(ChartType::Revenue),
            Self::AssetComposition => Some(ChartType::Asset),
            Self::BalanceEquation => Some(ChartType::Balance),
            Self::BalanceSheetBoxes => None,
        }
    }
}

impl std::fmt::Display for VisualizationSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VisualizationSlot {
    type Err = VizError;

    /// 슬롯 이름 또는 탭 별칭(revenue, asset, balance, boxes)을 받습니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue-trend" | "revenue" => Ok(Self::RevenueTrend),
            "asset-composition" | "asset" => Ok(Self::AssetComposition),
            "balance-equation" | "balance" => Ok(Self::BalanceEquation),
            "balance-sheet-boxes" | "boxes" => Ok(Self::BalanceSheetBoxes),
            _ => Err(VizError::InvalidInput(format!("알 수 없는 슬롯: {}", s))),
        }
    }
}

/// 오름차순 사업연도 목록. 항상 하나 이상의 연도를 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange(Vec<i32>);

impl YearRange {
    /// 연도 목록으로 생성합니다. 정렬 후 중복을 제거하며 비어 있으면 에러입니다.
    pub fn new(years: impl IntoIterator<Item = i32>) -> Result<Self, VizError> {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();
        if years.is_empty() {
            return Err(VizError::InvalidInput("연도 범위가 비어 있습니다".to_string()));
        }
        Ok(Self(years))
    }

    /// 한 해만 담은 범위.
    pub fn single(year: i32) -> Self {
        Self(vec![year])
    }

    /// `last_year`로 끝나는 `span`개 연도.
    pub fn ending_at(last_year: i32, span: u32) -> Self {
        let span = span.max(1) as i32;
        Self(((last_year - span + 1)..=last_year).collect())
    }

    /// `current_year` 기준 최근 완결 연도 `span`개 (올해는 제외).
    pub fn recent_complete(current_year: i32, span: u32) -> Self {
        Self::ending_at(current_year - 1, span)
    }

    pub fn years(&self) -> &[i32] {
        &self.0
    }

    pub fn first(&self) -> i32 {
        self.0[0]
    }

    pub fn last(&self) -> i32 {
        self.0[self.0.len() - 1]
    }

    /// 쉼표로 구분된 쿼리 파라미터 값 (예: "2019,2020,2021").
    pub fn to_query(&self) -> String {
        self.0
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for YearRange {
    /// 오늘 날짜 기준 최근 완결 5개 연도.
    fn default() -> Self {
        Self::recent_complete(current_year(), 5)
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl std::str::FromStr for YearRange {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let years = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i32>()
                    .map_err(|_| VizError::InvalidInput(format!("잘못된 연도: {}", part)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(years)
    }
}

/// 현재 달력 연도 (로컬 시간).
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
