/// サブスクリプション機能モジュール
///
/// このモジュールは、サブスクリプション管理に関連するすべての機能を提供します：
/// - サブスクリプションの作成、読み取り、更新、削除
/// - 猶予期間付きの削除取り消し
/// - 支払い予定と月額合計の計算
pub mod commands;
pub mod models;
pub mod repository;
pub mod seed;
pub mod sweeper;


// 公開インターフェース
pub use commands::{
    create_subscription, delete_subscription, get_monthly_subscription_total, get_pending_undo,
    get_subscription, get_subscriptions, get_subscriptions_by_category, get_upcoming_payments,
    undo_delete_subscription, update_subscription,
};

pub use models::{
    BillingCycle, Category, CreateSubscriptionDto, Subscription, Tombstone, UpdateSubscriptionDto,
};

pub use repository::SubscriptionStore;
pub use sweeper::spawn_tombstone_sweeper;
