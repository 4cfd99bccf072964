use chrono::{DateTime, Datelike, NaiveDate};

/// 月の短縮名（グラフのラベル用）
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 保存されている日付文字列を解析する
///
/// YYYY-MM-DD形式のほか、RFC3339形式の日時も日付部分として受け付けます。
///
/// # 戻り値
/// 解析できた場合は日付、それ以外はNone
pub fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// 指定した月の初日を取得する
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// 指定した月の末日を取得する
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    // 翌月が表現できないのは最終月のみ
    shift_months(start_of_month(date), 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// 月初の日付を指定した月数だけずらす
///
/// # 引数
/// * `first_of_month` - 月初の日付
/// * `months` - ずらす月数（負の値で過去方向）
///
/// # 戻り値
/// ずらした月の初日、表現できる日付の範囲を超える場合はNone
pub fn shift_months(first_of_month: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = i64::from(first_of_month.year()) * 12
        + i64::from(first_of_month.month0())
        + i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month0 = u32::try_from(total.rem_euclid(12)).ok()?;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

/// 月の短縮名を取得する
pub fn month_label(date: NaiveDate) -> &'static str {
    MONTH_LABELS[date.month0() as usize]
}

/// 金額を小数点以下2桁に丸める
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// 金額を安全に扱う（NaNや無限大は0として扱う）
pub fn safe_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// 日付を表示用にフォーマットする（例: "Apr 15, 2025"）
///
/// # 戻り値
/// フォーマットされた日付、解析できない場合は "Invalid date"
pub fn format_date(value: &str) -> String {
    match parse_stored_date(value) {
        Some(date) => format!("{} {}, {}", month_label(date), date.day(), date.year()),
        None => "Invalid date".to_string(),
    }
}

/// 今日からの相対的な日数を表示用にフォーマットする
///
/// # 引数
/// * `value` - 日付文字列
/// * `today` - 基準日
///
/// # 戻り値
/// "today"、"tomorrow"、"yesterday"、"in N days"、"N days ago" のいずれか。
/// 解析できない場合は空文字列
pub fn format_relative_time(value: &str, today: NaiveDate) -> String {
    let Some(date) = parse_stored_date(value) else {
        return String::new();
    };

    match (date - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        days if days > 0 => format!("in {days} days"),
        days => format!("{} days ago", days.abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_stored_date() {
        assert_eq!(parse_stored_date("2025-04-15"), Some(date(2025, 4, 15)));
        assert_eq!(
            parse_stored_date("2025-04-15T10:00:00+09:00"),
            Some(date(2025, 4, 15))
        );
        assert_eq!(parse_stored_date("someday"), None);
        assert_eq!(parse_stored_date(""), None);
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(start_of_month(date(2025, 4, 15)), date(2025, 4, 1));
        assert_eq!(end_of_month(date(2025, 4, 15)), date(2025, 4, 30));
        assert_eq!(end_of_month(date(2024, 2, 3)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2025, 12, 31)), date(2025, 12, 31));
    }

    #[test]
    fn test_shift_months_across_years() {
        assert_eq!(shift_months(date(2025, 1, 1), -1), Some(date(2024, 12, 1)));
        assert_eq!(shift_months(date(2025, 3, 1), -14), Some(date(2024, 1, 1)));
        assert_eq!(shift_months(date(2025, 11, 1), 2), Some(date(2026, 1, 1)));
    }

    #[test]
    fn test_shift_months_out_of_range() {
        assert_eq!(shift_months(date(2025, 4, 1), -3_300_000), None);
        assert_eq!(shift_months(date(2025, 4, 1), i32::MIN), None);
        assert_eq!(shift_months(date(2025, 4, 1), i32::MAX), None);
        assert_eq!(end_of_month(NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_round_and_safe_amount() {
        assert_eq!(round_to_cents(15.994), 15.99);
        assert_eq!(round_to_cents(15.995_1), 16.0);
        assert_eq!(safe_amount(f64::NAN), 0.0);
        assert_eq!(safe_amount(f64::NEG_INFINITY), 0.0);
        assert_eq!(safe_amount(9.99), 9.99);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-04-15"), "Apr 15, 2025");
        assert_eq!(format_date("2025-13-01"), "Invalid date");
    }

    #[test]
    fn test_format_relative_time() {
        let today = date(2025, 4, 10);
        assert_eq!(format_relative_time("2025-04-10", today), "today");
        assert_eq!(format_relative_time("2025-04-11", today), "tomorrow");
        assert_eq!(format_relative_time("2025-04-09", today), "yesterday");
        assert_eq!(format_relative_time("2025-04-15", today), "in 5 days");
        assert_eq!(format_relative_time("2025-04-01", today), "9 days ago");
        assert_eq!(format_relative_time("invalid", today), "");
    }
}
