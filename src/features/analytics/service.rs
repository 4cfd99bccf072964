//! 支出分析の集計ロジック
//!
//! すべての関数は有効なサブスクリプションの一覧と基準日だけを受け取る純粋関数です。
//! 月ごとの集計は「その月末までに作成されていたレコードの金額の合計」として計算します。
//! 解約日を記録していないため、過去の月にも現在有効なレコードのみが計上されます。

use super::models::{
    CategoryColor, CategoryMonthlyDataPoint, ChartDataPoint, MonthlyDataPoint, MonthlyDelta,
    YearlyComparison,
};
use super::palette::{other_color, ColorAssigner};
use crate::features::subscriptions::{Category, Subscription};
use crate::shared::security::sanitize_text;
use crate::shared::utils::{
    end_of_month, month_label, parse_stored_date, round_to_cents, safe_amount, shift_months,
    start_of_month,
};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// データがない場合のカテゴリ別プレースホルダー名
pub const NO_DATA_LABEL: &str = "No Data";
/// データがない場合のサブスクリプション別プレースホルダー名
pub const NO_SUBSCRIPTIONS_LABEL: &str = "No Subscriptions";
/// プレースホルダーの値（円グラフを全周で描画するため）
pub const PLACEHOLDER_VALUE: f64 = 100.0;

/// 集計用にカテゴリを正規化する（空や不正な値は Other）
fn normalized_category(subscription: &Subscription) -> Category {
    Category::parse(subscription.category.as_str())
}

/// 指定日までに作成されていたか
///
/// 作成日を解析できないレコードは過去の集計から除外します。
fn created_on_or_before(subscription: &Subscription, date: NaiveDate) -> bool {
    parse_stored_date(&subscription.created_at)
        .map(|created| created <= date)
        .unwrap_or(false)
}

/// 一覧に現れた順でカテゴリを列挙する
fn discover_categories(subscriptions: &[Subscription]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    for subscription in subscriptions {
        let category = normalized_category(subscription);
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

/// 遡及期間の各月の月初（古い順）
///
/// 表現できる日付の範囲を超える月は含みません。
fn lookback_months(today: NaiveDate, lookback: u32) -> impl Iterator<Item = NaiveDate> {
    let current = start_of_month(today);
    (0..lookback).rev().filter_map(move |offset| {
        let months = i32::try_from(offset).ok()?;
        shift_months(current, -months)
    })
}

/// 指定月末時点での支出合計
fn total_as_of(subscriptions: &[Subscription], month_end: NaiveDate) -> f64 {
    subscriptions
        .iter()
        .filter(|s| created_on_or_before(s, month_end))
        .map(|s| safe_amount(s.price))
        .sum()
}

/// 月次の支出推移を取得する
///
/// # 引数
/// * `subscriptions` - 有効なサブスクリプション
/// * `today` - 基準日
/// * `lookback` - 遡及月数（今月を含む）
///
/// # 戻り値
/// 古い月から順に並んだ `lookback` 件のデータ点
pub fn monthly_series(
    subscriptions: &[Subscription],
    today: NaiveDate,
    lookback: u32,
) -> Vec<MonthlyDataPoint> {
    lookback_months(today, lookback)
        .map(|month_start| MonthlyDataPoint {
            month: month_label(month_start).to_string(),
            year: month_start.year(),
            amount: round_to_cents(total_as_of(subscriptions, end_of_month(month_start))),
        })
        .collect()
}

/// カテゴリ別の月次支出推移を取得する
///
/// 各月のデータ点には、一覧に存在するすべてのカテゴリのキーが含まれます（該当なしは0）。
pub fn category_monthly_series(
    subscriptions: &[Subscription],
    today: NaiveDate,
    lookback: u32,
) -> Vec<CategoryMonthlyDataPoint> {
    let categories = discover_categories(subscriptions);

    lookback_months(today, lookback)
        .map(|month_start| {
            let month_end = end_of_month(month_start);
            let mut amounts: BTreeMap<String, f64> = categories
                .iter()
                .map(|category| (category.as_str().to_string(), 0.0))
                .collect();

            let mut total = 0.0;
            for subscription in subscriptions
                .iter()
                .filter(|s| created_on_or_before(s, month_end))
            {
                let amount = safe_amount(subscription.price);
                total += amount;
                *amounts
                    .entry(normalized_category(subscription).as_str().to_string())
                    .or_insert(0.0) += amount;
            }

            CategoryMonthlyDataPoint {
                month: month_label(month_start).to_string(),
                year: month_start.year(),
                total: round_to_cents(total),
                categories: amounts
                    .into_iter()
                    .map(|(category, amount)| (category, round_to_cents(amount)))
                    .collect(),
            }
        })
        .collect()
}

/// カテゴリ別の支出を取得する（円グラフ用）
///
/// # 戻り値
/// 発見順に並んだカテゴリごとのデータ点。
/// サブスクリプションがない場合は "No Data" のプレースホルダー1件
pub fn category_spending(subscriptions: &[Subscription]) -> Vec<ChartDataPoint> {
    if subscriptions.is_empty() {
        return vec![ChartDataPoint {
            name: NO_DATA_LABEL.to_string(),
            value: PLACEHOLDER_VALUE,
            color: other_color().to_string(),
            category: Category::Other.as_str().to_string(),
        }];
    }

    let mut totals: Vec<(Category, f64)> = Vec::new();
    for subscription in subscriptions {
        let category = normalized_category(subscription);
        let amount = safe_amount(subscription.price);
        match totals.iter_mut().find(|(c, _)| *c == category) {
            Some((_, total)) => *total += amount,
            None => totals.push((category, amount)),
        }
    }

    let mut colors = ColorAssigner::new();
    totals
        .into_iter()
        .map(|(category, total)| ChartDataPoint {
            name: category.as_str().to_string(),
            value: round_to_cents(total),
            color: colors.color_for(&category),
            category: category.as_str().to_string(),
        })
        .collect()
}

/// サブスクリプション別の支出を取得する
///
/// 色はレコード自身の色ではなく、カテゴリに割り当てられた色を使います。
///
/// # 戻り値
/// サブスクリプションごとのデータ点。
/// サブスクリプションがない場合は "No Subscriptions" のプレースホルダー1件
pub fn subscription_spending(subscriptions: &[Subscription]) -> Vec<ChartDataPoint> {
    if subscriptions.is_empty() {
        return vec![ChartDataPoint {
            name: NO_SUBSCRIPTIONS_LABEL.to_string(),
            value: PLACEHOLDER_VALUE,
            color: other_color().to_string(),
            category: Category::Other.as_str().to_string(),
        }];
    }

    let mut colors = ColorAssigner::new();
    subscriptions
        .iter()
        .map(|subscription| {
            let category = normalized_category(subscription);
            let name = sanitize_text(&subscription.name);
            ChartDataPoint {
                name: if name.is_empty() {
                    "Unknown".to_string()
                } else {
                    name
                },
                value: round_to_cents(safe_amount(subscription.price)),
                color: colors.color_for(&category),
                category: category.as_str().to_string(),
            }
        })
        .collect()
}

/// 今月と先月の支出を比較する
///
/// 今月の支出は現在有効なすべてのレコードの合計、
/// 先月の支出は先月末までに作成されていたレコードの合計です。
pub fn monthly_delta(subscriptions: &[Subscription], today: NaiveDate) -> MonthlyDelta {
    let current_month = start_of_month(today);

    let current = current_monthly_spending(subscriptions);
    let previous = shift_months(current_month, -1)
        .map(|previous_month| total_as_of(subscriptions, end_of_month(previous_month)))
        .map(round_to_cents)
        .unwrap_or(0.0);

    let new_subscriptions_this_month = subscriptions
        .iter()
        .filter(|s| {
            parse_stored_date(&s.created_at)
                .map(|created| created >= current_month)
                .unwrap_or(false)
        })
        .count();

    MonthlyDelta {
        current,
        previous,
        difference: round_to_cents((current - previous).abs()),
        is_increase: current > previous,
        new_subscriptions_this_month,
    }
}

/// 今年と昨年の年間支出を比較する
///
/// それぞれの年末までに作成されていたレコードの月額を12倍した値を年間支出とします。
pub fn yearly_comparison(subscriptions: &[Subscription], today: NaiveDate) -> YearlyComparison {
    let annual_total = |year: i32| -> f64 {
        let total: f64 = subscriptions
            .iter()
            .filter(|s| {
                parse_stored_date(&s.created_at)
                    .map(|created| created.year() <= year)
                    .unwrap_or(false)
            })
            .map(|s| safe_amount(s.price))
            .sum();
        total * 12.0
    };

    let current_year = annual_total(today.year());
    let previous_year = annual_total(today.year() - 1);

    let percentage_change = if previous_year > 0.0 {
        (((current_year - previous_year) / previous_year) * 100.0).round() as i64
    } else {
        0
    };

    YearlyComparison {
        current_year: round_to_cents(current_year),
        previous_year: round_to_cents(previous_year),
        percentage_change,
    }
}

/// カテゴリごとの割り当て色を取得する
pub fn category_colors(subscriptions: &[Subscription]) -> Vec<CategoryColor> {
    let mut colors = ColorAssigner::new();
    discover_categories(subscriptions)
        .into_iter()
        .map(|category| CategoryColor {
            color: colors.color_for(&category),
            category: category.as_str().to_string(),
        })
        .collect()
}

/// 有効なすべてのレコードの金額の合計（支払いサイクルによる換算は行わない）
fn current_monthly_spending(subscriptions: &[Subscription]) -> f64 {
    round_to_cents(subscriptions.iter().map(|s| safe_amount(s.price)).sum())
}

/// 平均月額支出を計算する
///
/// 現在の月額支出と同じ値を返します。
pub fn average_monthly_spending(subscriptions: &[Subscription]) -> f64 {
    current_monthly_spending(subscriptions)
}
