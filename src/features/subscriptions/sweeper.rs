//! 期限切れ墓石の定期掃除
//!
//! 猶予判定自体は墓石へのアクセス時に行うため、このタスクはメモリを
//! 解放するためだけに動きます。

use crate::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 墓石掃除タスクを起動する
///
/// # 引数
/// * `state` - アプリケーション状態
/// * `interval` - 実行間隔
///
/// # 戻り値
/// タスクのハンドル（`abort()` で停止）
pub fn spawn_tombstone_sweeper(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    log::info!("墓石掃除タスクを起動します: interval={}ms", interval.as_millis());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match state.store.lock() {
                Ok(mut store) => {
                    if store.purge_expired_tombstones() > 0 {
                        log::debug!("取り消し待ちの墓石: 残り{}件", store.tombstone_count());
                    }
                }
                Err(e) => {
                    log::error!("墓石掃除タスクを停止します。ストアロックエラー: {e}");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subscriptions::repository::SubscriptionStore;
    use crate::shared::clock::ManualClock;
    use crate::shared::config::ValidatedConfig;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_sweeper_purges_expired_tombstones() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 4, 10, 3, 0, 0).unwrap());
        let config = ValidatedConfig::default();
        let state = Arc::new(AppState::with_store(
            config.clone(),
            SubscriptionStore::seeded(&config, Arc::new(clock.clone())),
        ));

        assert!(state.store.lock().unwrap().delete(1));
        assert!(state.store.lock().unwrap().delete(2));

        let handle = spawn_tombstone_sweeper(state.clone(), Duration::from_millis(10));

        // 猶予期間内は掃除されない
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(state.store.lock().unwrap().tombstone_count(), 2);

        clock.advance(chrono::Duration::seconds(11));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(state.store.lock().unwrap().tombstone_count(), 0);
        assert!(!state.store.lock().unwrap().undo_delete(1));

        handle.abort();
    }
}
