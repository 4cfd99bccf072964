use crate::shared::security::sanitize_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ロゴ未指定時のプレースホルダー
pub const PLACEHOLDER_LOGO: &str = "/placeholder.svg?height=40&width=40";

/// 支払いサイクル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Biannually,
    Annually,
}

impl BillingCycle {
    /// 表示用の名前
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Quarterly => "Quarterly",
            BillingCycle::Biannually => "Biannually",
            BillingCycle::Annually => "Annually",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "quarterly" => Ok(BillingCycle::Quarterly),
            "biannually" => Ok(BillingCycle::Biannually),
            "annually" => Ok(BillingCycle::Annually),
            other => Err(format!("不明な支払いサイクルです: {other}")),
        }
    }
}

/// サブスクリプションのカテゴリ
///
/// 既知のカテゴリ以外の名前は `Custom` として保持します。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Entertainment,
    Music,
    Productivity,
    Shopping,
    Utilities,
    #[default]
    Other,
    Custom(String),
}

impl Category {
    /// 既知のカテゴリ一覧
    pub const KNOWN: [Category; 6] = [
        Category::Entertainment,
        Category::Music,
        Category::Productivity,
        Category::Shopping,
        Category::Utilities,
        Category::Other,
    ];

    /// 入力文字列からカテゴリを決定する
    ///
    /// サニタイズ後に空になる場合は `Other` になります。
    pub fn parse(raw: &str) -> Self {
        let sanitized = sanitize_text(raw);
        if sanitized.is_empty() {
            return Category::Other;
        }

        Category::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(&sanitized))
            .cloned()
            .unwrap_or(Category::Custom(sanitized))
    }

    /// カテゴリ名
    pub fn as_str(&self) -> &str {
        match self {
            Category::Entertainment => "Entertainment",
            Category::Music => "Music",
            Category::Productivity => "Productivity",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
            Category::Custom(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

/// サブスクリプションデータモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,              // サービス名、50文字以内
    pub category: Category,        // 未指定の場合は Other
    pub price: f64,                // 0より大きく10000以下
    pub billing_cycle: BillingCycle,
    pub next_billing_date: String, // YYYY-MM-DD形式
    pub logo: String,              // サニタイズ済みURL
    pub color: String,             // #RGB または #RRGGBB
    pub created_at: String,        // YYYY-MM-DD形式、作成後は変更しない
}

/// サブスクリプション作成用DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionDto {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    pub billing_cycle: String,
    pub next_billing_date: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub color: String,
}

/// サブスクリプション更新用DTO
///
/// 全フィールドを置き換えます。作成日は変更できません。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubscriptionDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    pub billing_cycle: String,
    pub next_billing_date: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub color: String,
}

impl From<&Subscription> for UpdateSubscriptionDto {
    fn from(subscription: &Subscription) -> Self {
        Self {
            id: subscription.id,
            name: subscription.name.clone(),
            category: subscription.category.as_str().to_string(),
            price: subscription.price,
            billing_cycle: subscription.billing_cycle.as_str().to_string(),
            next_billing_date: subscription.next_billing_date.clone(),
            logo: subscription.logo.clone(),
            color: subscription.color.clone(),
        }
    }
}

/// 削除取り消し用に一時保持される削除済みサブスクリプション
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tombstone {
    pub subscription: Subscription,
    pub deleted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Tombstone {
    /// 猶予期間を過ぎているか
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_cycle_parse() {
        assert_eq!("Monthly".parse::<BillingCycle>(), Ok(BillingCycle::Monthly));
        assert_eq!("annually".parse::<BillingCycle>(), Ok(BillingCycle::Annually));
        assert_eq!(
            " Quarterly ".parse::<BillingCycle>(),
            Ok(BillingCycle::Quarterly)
        );
        assert!("Weekly".parse::<BillingCycle>().is_err());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("Music"), Category::Music);
        assert_eq!(Category::parse("music"), Category::Music);
        assert_eq!(Category::parse(""), Category::Other);
        assert_eq!(Category::parse("   "), Category::Other);
        assert_eq!(
            Category::parse(" Gaming "),
            Category::Custom("Gaming".to_string())
        );
        assert!(!Category::KNOWN.contains(&Category::parse("Gaming")));
    }

    #[test]
    fn test_subscription_serialization() {
        let subscription = Subscription {
            id: 1,
            name: "Netflix".to_string(),
            category: Category::Custom("Streaming".to_string()),
            price: 15.99,
            billing_cycle: BillingCycle::Monthly,
            next_billing_date: "2025-04-15".to_string(),
            logo: PLACEHOLDER_LOGO.to_string(),
            color: "#E50914".to_string(),
            created_at: "2025-01-15".to_string(),
        };

        let json = serde_json::to_string(&subscription).unwrap();
        assert!(json.contains("\"category\":\"Streaming\""));
        assert!(json.contains("\"billing_cycle\":\"Monthly\""));

        let deserialized: Subscription = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, subscription);
    }

    #[test]
    fn test_update_dto_from_subscription() {
        let subscription = Subscription {
            id: 7,
            name: "Spotify".to_string(),
            category: Category::Music,
            price: 9.99,
            billing_cycle: BillingCycle::Annually,
            next_billing_date: "2025-04-10".to_string(),
            logo: PLACEHOLDER_LOGO.to_string(),
            color: "#1DB954".to_string(),
            created_at: "2025-02-10".to_string(),
        };

        let dto = UpdateSubscriptionDto::from(&subscription);
        assert_eq!(dto.id, 7);
        assert_eq!(dto.category, "Music");
        assert_eq!(dto.billing_cycle, "Annually");
    }
}
