//! 재무 시각화 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 회사 검색, 랜덤 추천, 레지스트리 통계
//! - 시각화 세션을 통한 차트/박스 다이어그램 터미널 출력
//! - 재무 인사이트 및 상세 분석 조회

pub mod commands;
pub mod render;

pub use render::TerminalRenderer;
