//! 차트 시계열 데이터.
//!
//! 백엔드가 만들어 주는 차트 데이터는 렌더러에 그대로 넘기는 불투명 값입니다.
//! 데이터셋의 색상/스택 같은 스타일 필드는 해석하지 않고 보존만 합니다.

use serde::{Deserialize, Serialize};

/// 백엔드 차트 API의 `type` 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// 손익 (매출액, 영업이익, 당기순이익)
    Revenue,
    /// 재무상태 (자산, 부채, 자본)
    Asset,
    /// 회계등식 균형 (자산 = 부채 + 자본)
    Balance,
}

impl ChartType {
    /// 쿼리 파라미터 값.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Asset => "asset",
            Self::Balance => "balance",
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

impl std::str::FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(Self::Revenue),
            "asset" => Ok(Self::Asset),
            "balance" => Ok(Self::Balance),
            _ => Err(format!("Unknown chart type: {}", s)),
        }
    }
}

/// 차트 데이터셋 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    /// 범례 라벨 (예: "매출액", "자산총계 (A)")
    pub label: String,
    /// 연도별 값 (억원)
    #[serde(default)]
    pub data: Vec<f64>,
    /// 렌더러 전용 스타일 필드 (backgroundColor, stack, type 등)
    #[serde(flatten)]
    pub style: serde_json::Map<String, serde_json::Value>,
}

impl ChartDataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            style: serde_json::Map::new(),
        }
    }
}

/// 차트 데이터 (x축 라벨 + 데이터셋).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    /// x축 라벨 (연도)
    #[serde(default)]
    pub labels: Vec<String>,
    /// 데이터셋
    #[serde(default)]
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// 라벨에 `needle`이 포함된 첫 데이터셋.
    pub fn dataset_containing(&self, needle: &str) -> Option<&ChartDataset> {
        self.datasets.iter().find(|d| d.label.contains(needle))
    }

    /// 데이터가 하나도 없는지 여부.
    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(|d| d.data.is_empty())
    }
}
