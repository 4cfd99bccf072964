pub mod features;
pub mod shared;

use features::analytics::build_dashboard_snapshot;
use features::subscriptions::{spawn_tombstone_sweeper, SubscriptionStore};
use log::{error, info};
use shared::clock::SystemClock;
use shared::config::{
    initialize_application, load_environment_variables, log_initialization_complete,
    EnvironmentConfig, ValidatedConfig,
};
use shared::errors::AppResult;
use std::sync::{Arc, Mutex};

/// アプリケーション状態（サブスクリプションストアと設定を保持）
#[derive(Debug)]
pub struct AppState {
    pub store: Mutex<SubscriptionStore>,
    pub config: ValidatedConfig,
}

impl AppState {
    /// 既存のストアからアプリケーション状態を作成する
    pub fn with_store(config: ValidatedConfig, store: SubscriptionStore) -> Self {
        Self {
            store: Mutex::new(store),
            config,
        }
    }
}

/// アプリケーションを初期化する
///
/// # 処理内容
/// 1. 環境変数を読み込み
/// 2. ログシステムを初期化し、設定を検証
/// 3. 初期データでストアを作成
///
/// # 戻り値
/// アプリケーション状態、または設定が不正な場合はエラー
pub fn initialize_app() -> AppResult<AppState> {
    load_environment_variables();

    let result = initialize_application(EnvironmentConfig::from_env())?;

    info!("サブスクリプションストアを初期化しています...");
    let store = SubscriptionStore::seeded(&result.config, Arc::new(SystemClock));
    log_initialization_complete(&result, store.subscriptions().len());

    Ok(AppState::with_store(result.config, store))
}

/// アプリケーションを実行する
///
/// 墓石掃除タスクを起動し、現在のダッシュボードをJSONで標準出力に書き出します。
pub async fn run() -> AppResult<()> {
    let state = Arc::new(initialize_app().map_err(|e| {
        error!("アプリケーションの初期化に失敗しました: {}", e.details());
        e
    })?);

    let sweeper = spawn_tombstone_sweeper(Arc::clone(&state), state.config.tombstone_sweep_interval);

    let snapshot = {
        let store = state.store.lock().map_err(|e| {
            shared::errors::AppError::concurrency(format!("ストアロックエラー: {e}"))
        })?;
        build_dashboard_snapshot(&store, state.config.upcoming_window_days)
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    sweeper.abort();
    info!("アプリケーションを終了します");
    Ok(())
}
