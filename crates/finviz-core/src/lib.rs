//! # Finviz Core
//!
//! 재무 시각화 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 회사 및 레지스트리 통계
//! - 재무제표 스냅샷 (연도별 계정 금액)
//! - 시각화 슬롯과 연도 범위
//! - 외부 재무 API 추상화 (`FinancialApi`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
