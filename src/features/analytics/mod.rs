/// 支出分析機能モジュール
///
/// 有効なサブスクリプションから、グラフ表示用の集計データを生成します。
pub mod commands;
pub mod models;
pub mod palette;
pub mod service;

// 公開インターフェース
pub use commands::{
    build_dashboard_snapshot, get_average_monthly_spending, get_category_colors,
    get_category_monthly_data, get_category_spending_data, get_dashboard_snapshot,
    get_monthly_spending_data, get_monthly_spending_difference, get_subscription_spending_data,
    get_yearly_comparison, has_enough_data_for_charts,
};

pub use models::{
    CategoryColor, CategoryMonthlyDataPoint, ChartDataPoint, DashboardSnapshot, MonthlyDataPoint,
    MonthlyDelta, UpcomingPayment, YearlyComparison,
};
