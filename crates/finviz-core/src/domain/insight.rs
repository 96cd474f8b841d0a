//! AI 분석 결과 페이로드.
//!
//! 텍스트는 백엔드가 만들어 주며 여기서는 화면에 보여줄 문자열로만 다룹니다.

use serde::{Deserialize, Serialize};

/// 빠른 인사이트의 주요 수치.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyNumbers {
    /// 매출액 (억원)
    #[serde(default)]
    pub revenue: f64,
    /// 영업이익률 (%)
    #[serde(default)]
    pub operating_margin: f64,
    /// 순이익률 (%)
    #[serde(default)]
    pub net_margin: f64,
    /// 부채비율 (%)
    #[serde(default)]
    pub debt_ratio: f64,
}

/// 한 사업연도에 대한 빠른 인사이트.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuickInsights {
    /// 매출 규모
    #[serde(default)]
    pub revenue_scale: String,
    /// 수익성
    #[serde(default)]
    pub profitability: String,
    /// 재무 안정성
    #[serde(default)]
    pub financial_stability: String,
    /// 종합 등급
    #[serde(default)]
    pub overall_grade: String,
    /// 주요 수치
    #[serde(default)]
    pub key_numbers: KeyNumbers,
}

/// 여러 사업연도에 대한 상세 분석.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    /// 분석 본문
    #[serde(default)]
    pub analysis: String,
    /// 분석 대상 연도
    #[serde(default)]
    pub years: Vec<String>,
}
