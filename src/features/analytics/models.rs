use crate::features::subscriptions::Subscription;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 円グラフ・棒グラフ用のデータ点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub name: String,
    pub value: f64,
    pub color: String,
    pub category: String,
}

/// 月次推移グラフ用のデータ点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDataPoint {
    pub month: String, // "Jan" 〜 "Dec"
    pub year: i32,
    pub amount: f64,
}

/// カテゴリ別の月次推移データ点
///
/// カテゴリごとの金額は `month` や `total` と同じ階層のキーとして出力されます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMonthlyDataPoint {
    pub month: String,
    pub year: i32,
    pub total: f64,
    #[serde(flatten)]
    pub categories: BTreeMap<String, f64>,
}

/// カテゴリと割り当てられた色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryColor {
    pub category: String,
    pub color: String,
}

/// 今月と先月の支出比較
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDelta {
    pub current: f64,
    pub previous: f64,
    pub difference: f64, // 絶対値
    pub is_increase: bool,
    pub new_subscriptions_this_month: usize,
}

/// 今年と昨年の年間支出比較
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyComparison {
    pub current_year: f64,
    pub previous_year: f64,
    pub percentage_change: i64,
}

/// 表示用の日付ラベル付きの支払い予定
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingPayment {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub due_date_label: String, // 例: "Apr 15, 2025"
    pub due_in: String,         // 例: "in 5 days"
}

/// ダッシュボード表示用のまとめ
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_on: String,
    pub subscription_count: usize,
    pub total_monthly_cost: f64,
    pub upcoming_payments: Vec<UpcomingPayment>,
    pub category_spending: Vec<ChartDataPoint>,
    pub monthly_delta: MonthlyDelta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_monthly_point_flattens_categories() {
        let mut categories = BTreeMap::new();
        categories.insert("Music".to_string(), 9.99);
        categories.insert("Gaming".to_string(), 10.0);

        let point = CategoryMonthlyDataPoint {
            month: "Apr".to_string(),
            year: 2025,
            total: 19.99,
            categories,
        };

        let json: serde_json::Value = serde_json::to_value(&point).unwrap();
        assert_eq!(json["month"], "Apr");
        assert_eq!(json["total"], 19.99);
        assert_eq!(json["Music"], 9.99);
        assert_eq!(json["Gaming"], 10.0);
    }
}
