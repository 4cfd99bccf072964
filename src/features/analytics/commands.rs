use super::models::{
    CategoryColor, CategoryMonthlyDataPoint, ChartDataPoint, DashboardSnapshot, MonthlyDataPoint,
    MonthlyDelta, UpcomingPayment, YearlyComparison,
};
use super::service;
use crate::features::subscriptions::commands::lock_store;
use crate::features::subscriptions::SubscriptionStore;
use crate::shared::config::MAX_ANALYTICS_LOOKBACK_MONTHS;
use crate::shared::errors::AppError;
use crate::shared::utils::{format_date, format_relative_time, round_to_cents};
use crate::AppState;

/// 遡及月数を決定する（未指定の場合は設定値）
///
/// 1以上、上限以下の値のみ受け付けます。
fn resolve_lookback(state: &AppState, lookback_months: Option<u32>) -> Result<u32, String> {
    match lookback_months {
        Some(months) if (1..=MAX_ANALYTICS_LOOKBACK_MONTHS).contains(&months) => Ok(months),
        Some(_) => {
            let error = AppError::validation(
                "lookback_months",
                format!("遡及月数は1以上{MAX_ANALYTICS_LOOKBACK_MONTHS}以下で指定してください"),
            );
            error.log();
            Err(error.user_message().to_string())
        }
        None => Ok(state.config.analytics_lookback_months),
    }
}

/// 月次の支出推移を取得する
///
/// # 引数
/// * `state` - アプリケーション状態
/// * `lookback_months` - 遡及月数（Noneの場合は設定値）
///
/// # 戻り値
/// 古い月から順に並んだデータ点、または失敗時はエラーメッセージ
pub fn get_monthly_spending_data(
    state: &AppState,
    lookback_months: Option<u32>,
) -> Result<Vec<MonthlyDataPoint>, String> {
    let lookback = resolve_lookback(state, lookback_months)?;
    let store = lock_store(state)?;
    Ok(service::monthly_series(
        &store.find_all(),
        store.today(),
        lookback,
    ))
}

/// カテゴリ別の月次支出推移を取得する
pub fn get_category_monthly_data(
    state: &AppState,
    lookback_months: Option<u32>,
) -> Result<Vec<CategoryMonthlyDataPoint>, String> {
    let lookback = resolve_lookback(state, lookback_months)?;
    let store = lock_store(state)?;
    Ok(service::category_monthly_series(
        &store.find_all(),
        store.today(),
        lookback,
    ))
}

/// カテゴリ別の支出を取得する
pub fn get_category_spending_data(state: &AppState) -> Result<Vec<ChartDataPoint>, String> {
    let store = lock_store(state)?;
    Ok(service::category_spending(&store.find_all()))
}

/// サブスクリプション別の支出を取得する
pub fn get_subscription_spending_data(state: &AppState) -> Result<Vec<ChartDataPoint>, String> {
    let store = lock_store(state)?;
    Ok(service::subscription_spending(&store.find_all()))
}

/// 今月と先月の支出差を取得する
pub fn get_monthly_spending_difference(state: &AppState) -> Result<MonthlyDelta, String> {
    let store = lock_store(state)?;
    Ok(service::monthly_delta(store.subscriptions(), store.today()))
}

/// 今年と昨年の年間支出比較を取得する
pub fn get_yearly_comparison(state: &AppState) -> Result<YearlyComparison, String> {
    let store = lock_store(state)?;
    Ok(service::yearly_comparison(
        store.subscriptions(),
        store.today(),
    ))
}

/// カテゴリごとの割り当て色を取得する
pub fn get_category_colors(state: &AppState) -> Result<Vec<CategoryColor>, String> {
    let store = lock_store(state)?;
    Ok(service::category_colors(&store.find_all()))
}

/// 現在の月額支出を取得する
pub fn get_average_monthly_spending(state: &AppState) -> Result<f64, String> {
    let store = lock_store(state)?;
    Ok(service::average_monthly_spending(store.subscriptions()))
}

/// グラフ表示に十分なデータがあるか
pub fn has_enough_data_for_charts(state: &AppState) -> Result<bool, String> {
    let store = lock_store(state)?;
    Ok(store.has_enough_data_for_charts())
}

/// ダッシュボード表示用のまとめを作成する
pub fn build_dashboard_snapshot(store: &SubscriptionStore, window_days: i64) -> DashboardSnapshot {
    let subscriptions = store.find_all();
    let today = store.today();

    DashboardSnapshot {
        generated_on: today.format("%Y-%m-%d").to_string(),
        subscription_count: subscriptions.len(),
        total_monthly_cost: round_to_cents(store.calculate_monthly_total()),
        upcoming_payments: store
            .find_upcoming(window_days)
            .into_iter()
            .map(|subscription| UpcomingPayment {
                due_date_label: format_date(&subscription.next_billing_date),
                due_in: format_relative_time(&subscription.next_billing_date, today),
                subscription,
            })
            .collect(),
        category_spending: service::category_spending(&subscriptions),
        monthly_delta: service::monthly_delta(&subscriptions, today),
    }
}

/// ダッシュボード表示用のまとめを取得する
pub fn get_dashboard_snapshot(state: &AppState) -> Result<DashboardSnapshot, String> {
    let store = lock_store(state)?;
    Ok(build_dashboard_snapshot(
        &store,
        state.config.upcoming_window_days,
    ))
}
