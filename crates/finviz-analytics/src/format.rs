//! 금액 포맷팅.
//!
//! 입력 금액은 억원 단위입니다. 1조(= 10,000억) 이상은 조 단위 소수 한 자리로,
//! 그 미만은 천 단위 구분 기호를 넣은 정수로 표시합니다.

use finviz_core::EOK_PER_JO;
use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;

/// 억원 금액을 표시 문자열로 변환합니다.
///
/// - `0` → `"0"` (절대 `"0.0조"`가 아님)
/// - `9999` → `"9,999"`
/// - `10000` → `"1.0조"`
/// - `-25000` → `"-2.5조"`
pub fn format_eok(amount: Decimal) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let whole = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i128()
        .unwrap_or(0);

    // 반올림한 억 단위로 임계값 비교 (9999.6억 → 1.0조)
    let per_jo = Decimal::from(EOK_PER_JO);
    if whole.unsigned_abs() >= EOK_PER_JO as u128 {
        let tenths = (amount / per_jo * Decimal::TEN)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i128()
            .unwrap_or(0);
        let sign = if tenths < 0 { "-" } else { "" };
        let tenths = tenths.abs();
        return format!("{}{}.{}조", sign, format_thousands(tenths / 10), tenths % 10);
    }

    format_thousands(whole)
}

/// 단위를 붙인 금액 라벨 (예: `"9,999억원"`, `"1.0조원"`).
pub fn format_amount_label(amount: Decimal) -> String {
    let formatted = format_eok(amount);
    if formatted.ends_with('조') {
        format!("{}원", formatted)
    } else {
        format!("{}억원", formatted)
    }
}

/// 정수에 천 단위 구분 기호를 넣습니다.
pub fn format_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// 소수부를 유지한 채 정수부에만 천 단위 구분 기호를 넣습니다 (예: `1234.5` → `"1,234.5"`).
pub fn format_grouped(value: Decimal) -> String {
    let normalized = value.normalize();
    let text = normalized.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let int_value: i128 = int_part.parse().unwrap_or(0);
    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, format_thousands(int_value), frac),
        None => format!("{}{}", sign, format_thousands(int_value)),
    }
}
