use super::models::{CreateSubscriptionDto, Subscription, Tombstone, UpdateSubscriptionDto};
use super::repository::SubscriptionStore;
use crate::shared::errors::AppError;
use crate::AppState;
use std::collections::BTreeMap;
use std::sync::MutexGuard;

/// ストアのロックを取得する
///
/// # 戻り値
/// ロックガード、ロックが破損している場合はエラーメッセージ
pub(crate) fn lock_store(state: &AppState) -> Result<MutexGuard<'_, SubscriptionStore>, String> {
    state.store.lock().map_err(|e| {
        let error = AppError::concurrency(format!("ストアロックエラー: {e}"));
        error.log();
        error.user_message().to_string()
    })
}

/// サブスクリプションを作成する
///
/// # 引数
/// * `state` - アプリケーション状態
/// * `dto` - サブスクリプション作成用DTO
///
/// # 戻り値
/// 作成されたサブスクリプション、または失敗時はエラーメッセージ
pub fn create_subscription(
    state: &AppState,
    dto: CreateSubscriptionDto,
) -> Result<Subscription, String> {
    let mut store = lock_store(state)?;
    store.create(dto).map_err(|e| e.user_message().to_string())
}

/// サブスクリプション一覧を次回請求日順で取得する
pub fn get_subscriptions(state: &AppState) -> Result<Vec<Subscription>, String> {
    let store = lock_store(state)?;
    Ok(store.find_all())
}

/// カテゴリごとのサブスクリプション一覧を取得する
pub fn get_subscriptions_by_category(
    state: &AppState,
) -> Result<BTreeMap<String, Vec<Subscription>>, String> {
    let store = lock_store(state)?;
    Ok(store.find_by_category())
}

/// IDでサブスクリプションを取得する
///
/// # 戻り値
/// サブスクリプション、または見つからない場合はエラーメッセージ
pub fn get_subscription(state: &AppState, id: i64) -> Result<Subscription, String> {
    let store = lock_store(state)?;
    store.find_by_id(id).map_err(|e| e.user_message().to_string())
}

/// サブスクリプションを更新する
///
/// # 戻り値
/// 更新されたサブスクリプション、または失敗時はエラーメッセージ
pub fn update_subscription(
    state: &AppState,
    dto: UpdateSubscriptionDto,
) -> Result<Subscription, String> {
    let mut store = lock_store(state)?;
    store.update(dto).map_err(|e| e.user_message().to_string())
}

/// サブスクリプションを削除する（猶予期間内は取り消し可能）
///
/// # 戻り値
/// 削除した場合はtrue、対象がない場合はfalse
pub fn delete_subscription(state: &AppState, id: i64) -> Result<bool, String> {
    let mut store = lock_store(state)?;
    Ok(store.delete(id))
}

/// サブスクリプションの削除を取り消す
///
/// # 戻り値
/// 復元した場合はtrue、取り消し可能な削除がない場合はfalse
pub fn undo_delete_subscription(state: &AppState, id: i64) -> Result<bool, String> {
    let mut store = lock_store(state)?;
    Ok(store.undo_delete(id))
}

/// 取り消し可能な削除の情報を取得する
pub fn get_pending_undo(state: &AppState, id: i64) -> Result<Option<Tombstone>, String> {
    let mut store = lock_store(state)?;
    Ok(store.pending_undo(id))
}

/// 近日中の支払い予定を取得する
///
/// # 引数
/// * `state` - アプリケーション状態
/// * `window_days` - 対象日数（未指定の場合は設定値）
pub fn get_upcoming_payments(
    state: &AppState,
    window_days: Option<i64>,
) -> Result<Vec<Subscription>, String> {
    let window_days = window_days.unwrap_or(state.config.upcoming_window_days);
    let store = lock_store(state)?;
    Ok(store.find_upcoming(window_days))
}

/// 有効なサブスクリプションの月額合計を取得する
pub fn get_monthly_subscription_total(state: &AppState) -> Result<f64, String> {
    let store = lock_store(state)?;
    Ok(store.calculate_monthly_total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::ManualClock;
    use crate::shared::config::ValidatedConfig;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn test_state() -> AppState {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 4, 10, 3, 0, 0).unwrap());
        AppState::with_store(
            ValidatedConfig::default(),
            SubscriptionStore::seeded(&ValidatedConfig::default(), Arc::new(clock)),
        )
    }

    #[test]
    fn test_command_flow() {
        let state = test_state();

        let created = create_subscription(
            &state,
            CreateSubscriptionDto {
                name: "Dropbox".to_string(),
                category: "Utilities".to_string(),
                price: 11.99,
                billing_cycle: "Monthly".to_string(),
                next_billing_date: "2025-04-11".to_string(),
                logo: String::new(),
                color: "#0061FF".to_string(),
            },
        )
        .unwrap();
        assert_eq!(created.id, 11);
        assert_eq!(get_subscriptions(&state).unwrap().len(), 11);

        assert!(delete_subscription(&state, created.id).unwrap());
        assert!(get_pending_undo(&state, created.id).unwrap().is_some());
        assert!(undo_delete_subscription(&state, created.id).unwrap());
        assert_eq!(get_subscription(&state, created.id).unwrap(), created);
    }

    #[test]
    fn test_command_errors_are_user_messages() {
        let state = test_state();

        let error = get_subscription(&state, 404).unwrap_err();
        assert_eq!(error, "ID 404 のサブスクリプションが見つかりません");

        let mut dto = UpdateSubscriptionDto::from(&get_subscription(&state, 1).unwrap());
        dto.name = "Bad <name>".to_string();
        let error = update_subscription(&state, dto).unwrap_err();
        assert!(error.contains("サービス名"));
    }

    #[test]
    fn test_upcoming_uses_configured_window() {
        let state = test_state();
        // 2025-04-10 から7日以内: Spotify(10), iCloud(12), Netflix(15), Microsoft 365(17)
        let names: Vec<String> = get_upcoming_payments(&state, None)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Spotify", "iCloud", "Netflix", "Microsoft 365"]);

        assert_eq!(get_upcoming_payments(&state, Some(0)).unwrap().len(), 1);
    }

    #[test]
    fn test_upcoming_with_huge_window_returns_all_future_payments() {
        let state = test_state();
        // 2025-04-10 以降に請求予定のもの（Amazon Prime と YouTube Premium は過去）
        assert_eq!(
            get_upcoming_payments(&state, Some(1_000_000_000)).unwrap().len(),
            8
        );
        assert_eq!(get_upcoming_payments(&state, Some(i64::MAX)).unwrap().len(), 8);
    }

    #[test]
    fn test_monthly_total_and_categories() {
        let state = test_state();
        let total = get_monthly_subscription_total(&state).unwrap();
        assert!((total - 149.91).abs() < 1e-9);

        let grouped = get_subscriptions_by_category(&state).unwrap();
        assert_eq!(grouped["Entertainment"].len(), 4);
        assert_eq!(grouped["Productivity"].len(), 3);
        assert!(!grouped.contains_key("Other"));
    }
}
