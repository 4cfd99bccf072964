// 入力値のサニタイズと検証

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// サービス名の最大文字数
pub const MAX_NAME_LENGTH: usize = 50;

/// 金額の上限
pub const MAX_PRICE: f64 = 10000.0;

static VALID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9 .,&+\-_()]+$").expect("サービス名の正規表現が不正です"));

static VALID_COLOR_HEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("カラーコードの正規表現が不正です")
});

static VALID_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("日付の正規表現が不正です"));

/// 危険なURLスキーム
const BLOCKED_URL_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// テキスト入力をサニタイズする
///
/// 前後の空白と制御文字を取り除きます。HTMLエスケープは表示側の責務です。
pub fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// URLをサニタイズする
///
/// # 戻り値
/// 安全なURLの場合はSome、空または危険なスキームの場合はNone
pub fn sanitize_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    // スキーム中の空白や制御文字は除いて判定する
    let normalized: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();

    if BLOCKED_URL_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        log::warn!("危険なURLスキームを拒否しました");
        return None;
    }

    Some(trimmed.to_string())
}

/// サービス名が許可された文字のみで構成されているか検証する
///
/// 英数字、空白、`.,&+-_()` のみ許可し、最大50文字まで。
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_NAME_LENGTH && VALID_NAME.is_match(name)
}

/// 3桁または6桁の16進カラーコードか検証する
pub fn is_valid_color_hex(color: &str) -> bool {
    VALID_COLOR_HEX.is_match(color)
}

/// 安全なランダムカラーを生成する
pub fn generate_safe_random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0x00FF_FFFF);
    format!("#{value:06x}")
}

/// 金額が許容範囲（0より大きく上限以下）か検証する
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0 && price <= MAX_PRICE
}

/// YYYY-MM-DD形式の実在する日付か検証する
pub fn is_valid_date_string(date: &str) -> bool {
    parse_date_string(date).is_some()
}

/// YYYY-MM-DD形式の日付文字列を解析する
///
/// # 戻り値
/// 解析できた場合は日付、形式不正や存在しない日付の場合はNone
pub fn parse_date_string(date: &str) -> Option<NaiveDate> {
    if !VALID_DATE.is_match(date) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  Netflix  "), "Netflix");
        assert_eq!(sanitize_text("Spo\u{0007}tify\n"), "Spotify");
        assert_eq!(sanitize_text("   "), "");
    }

    #[test]
    fn test_sanitize_url_rejects_dangerous_schemes() {
        assert_eq!(sanitize_url("javascript:alert(1)"), None);
        assert_eq!(sanitize_url("  JavaScript:alert(1)"), None);
        assert_eq!(sanitize_url("java\tscript:alert(1)"), None);
        assert_eq!(sanitize_url("data:text/html;base64,xxx"), None);
        assert_eq!(sanitize_url("vbscript:msgbox"), None);
        assert_eq!(sanitize_url(""), None);
    }

    #[test]
    fn test_sanitize_url_keeps_safe_urls() {
        assert_eq!(
            sanitize_url("https://example.com/logo.png"),
            Some("https://example.com/logo.png".to_string())
        );
        assert_eq!(
            sanitize_url("/placeholder.svg?height=40&width=40"),
            Some("/placeholder.svg?height=40&width=40".to_string())
        );
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("Adobe Creative Cloud"));
        assert!(is_valid_name("AT&T (Mobile) - Plan_2, v1.0+"));
        assert!(!is_valid_name("Test!!"));
        assert!(!is_valid_name("<script>"));
        assert!(!is_valid_name(""));
        assert!(is_valid_name(&"a".repeat(50)));
        assert!(!is_valid_name(&"a".repeat(51)));
    }

    #[test]
    fn test_is_valid_color_hex() {
        assert!(is_valid_color_hex("#E50914"));
        assert!(is_valid_color_hex("#fff"));
        assert!(!is_valid_color_hex("E50914"));
        assert!(!is_valid_color_hex("#12345"));
        assert!(!is_valid_color_hex("#GGGGGG"));
    }

    #[test]
    fn test_generate_safe_random_color() {
        for _ in 0..20 {
            let color = generate_safe_random_color();
            assert!(is_valid_color_hex(&color), "{color}");
            assert_eq!(color.len(), 7);
        }
    }

    #[test]
    fn test_is_valid_price() {
        assert!(is_valid_price(0.01));
        assert!(is_valid_price(10000.0));
        assert!(!is_valid_price(0.0));
        assert!(!is_valid_price(-5.0));
        assert!(!is_valid_price(10000.01));
        assert!(!is_valid_price(f64::NAN));
        assert!(!is_valid_price(f64::INFINITY));
    }

    #[test]
    fn test_date_validation() {
        assert!(is_valid_date_string("2025-04-15"));
        assert!(is_valid_date_string("2024-02-29"));
        assert!(!is_valid_date_string("2025-02-30"));
        assert!(!is_valid_date_string("2025-4-15"));
        assert!(!is_valid_date_string("15/04/2025"));
        assert!(!is_valid_date_string("not a date"));
    }

    #[quickcheck]
    fn prop_valid_names_contain_only_allowed_characters(name: String) -> bool {
        // 受理された名前は許可文字のみで構成される
        !is_valid_name(&name)
            || name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || " .,&+-_()".contains(c))
    }
}
