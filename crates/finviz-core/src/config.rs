//! 설정 관리.
//!
//! 기본값 → TOML 파일 → `FINVIZ__` 접두사 환경 변수 순으로 덮어씁니다.
//! 예: `FINVIZ__API__BASE_URL=http://localhost:5000`

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 재무 API 설정
    #[serde(default)]
    pub api: ApiConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 재무상태표 박스 다이어그램 기하 설정
    #[serde(default)]
    pub layout: LayoutConfig,
    /// 시각화 세션 설정
    #[serde(default)]
    pub session: SessionConfig,
}

/// 재무 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 백엔드 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초). 0이면 타임아웃 없음
    pub timeout_secs: u64,
    /// 검색 결과 개수 (백엔드 상한 100)
    pub search_limit: u32,
    /// 랜덤 회사 개수 (백엔드 상한 20)
    pub random_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
            search_limit: 50,
            random_limit: 8,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 박스 다이어그램 기하 설정 (렌더 단위).
///
/// 비율 등급 임계값은 고정이며 여기서 바꿀 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// 기본 높이 하한
    pub base_height_min: f64,
    /// 기본 높이 상한
    pub base_height_max: f64,
    /// 부채/자본 박스 각각의 최소 높이
    pub sub_box_min_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_height_min: 200.0,
            base_height_max: 400.0,
            sub_box_min_height: 30.0,
        }
    }
}

/// 시각화 세션 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 기본 연도 범위 길이
    pub default_year_span: u32,
    /// 박스 다이어그램이 보여줄 연도 (올해 기준 몇 년 전)
    pub balance_lookback_years: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_year_span: 5,
            balance_lookback_years: 2,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("FINVIZ")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let loaded: AppConfig = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 값 범위를 검사합니다.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let layout = &self.layout;
        if layout.base_height_min <= 0.0 || layout.base_height_min > layout.base_height_max {
            return Err(config::ConfigError::Message(format!(
                "layout.base_height_min({})은 0보다 크고 base_height_max({}) 이하여야 합니다",
                layout.base_height_min, layout.base_height_max
            )));
        }
        if layout.sub_box_min_height < 0.0 {
            return Err(config::ConfigError::Message(
                "layout.sub_box_min_height는 음수일 수 없습니다".to_string(),
            ));
        }
        if self.session.default_year_span == 0 {
            return Err(config::ConfigError::Message(
                "session.default_year_span은 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
