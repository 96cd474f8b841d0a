//! 회사 레지스트리 모델.

use serde::{Deserialize, Deserializer, Serialize};

/// 레지스트리에 등록된 회사.
///
/// 조회 후에는 변경되지 않습니다. 종목코드 유무가 상장 여부의 유일한 기준입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// 고유번호 (8자리, 불투명 식별자)
    pub corp_code: String,
    /// 회사명
    pub corp_name: String,
    /// 영문명
    #[serde(default, deserialize_with = "empty_as_none")]
    pub corp_eng_name: Option<String>,
    /// 종목코드 (상장사만 존재)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub stock_code: Option<String>,
    /// 최종 수정일 (YYYYMMDD)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub modify_date: Option<String>,
}

/// 상장 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// 상장
    Listed,
    /// 비상장
    Unlisted,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listed => write!(f, "상장"),
            Self::Unlisted => write!(f, "비상장"),
        }
    }
}

impl Company {
    /// 최소 정보로 회사를 생성합니다.
    pub fn new(corp_code: impl Into<String>, corp_name: impl Into<String>) -> Self {
        Self {
            corp_code: corp_code.into(),
            corp_name: corp_name.into(),
            corp_eng_name: None,
            stock_code: None,
            modify_date: None,
        }
    }

    /// 종목코드를 지정합니다.
    pub fn with_stock_code(mut self, stock_code: impl Into<String>) -> Self {
        let code = stock_code.into();
        self.stock_code = if code.trim().is_empty() { None } else { Some(code) };
        self
    }

    /// 상장 여부.
    pub fn is_listed(&self) -> bool {
        self.stock_code.is_some()
    }

    /// 상장 구분.
    pub fn listing_status(&self) -> ListingStatus {
        if self.is_listed() {
            ListingStatus::Listed
        } else {
            ListingStatus::Unlisted
        }
    }

    /// 표시용 수정일 (YYYY-MM-DD).
    pub fn display_modify_date(&self) -> String {
        format_registry_date(self.modify_date.as_deref())
    }
}

/// 레지스트리 통계.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// 전체 회사 수
    pub total_companies: u64,
    /// 상장 회사 수
    pub listed_companies: u64,
    /// 비상장 회사 수
    pub unlisted_companies: u64,
    /// 최근 수정일 (YYYYMMDD)
    #[serde(default)]
    pub last_modified: Option<String>,
}

/// `YYYYMMDD` 날짜를 `YYYY-MM-DD`로 바꿉니다.
///
/// 값이 없으면 `-`, 8자리가 아니면 원문 그대로 반환합니다.
pub fn format_registry_date(date: Option<&str>) -> String {
    match date.map(str::trim) {
        None | Some("") => "-".to_string(),
        Some(d) if d.len() == 8 && d.chars().all(|c| c.is_ascii_digit()) => {
            format!("{}-{}-{}", &d[0..4], &d[4..6], &d[6..8])
        }
        Some(d) => d.to_string(),
    }
}

/// 빈 문자열을 `None`으로 취급합니다. 레지스트리는 비상장사의 종목코드를 `""`로 내려줍니다.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
