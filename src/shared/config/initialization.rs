use crate::shared::config::{EnvironmentConfig, ValidatedConfig};
use crate::shared::errors::AppResult;

/// アプリケーション初期化の結果を表す構造体
#[derive(Debug)]
pub struct InitializationResult {
    /// 生の環境設定
    pub env_config: EnvironmentConfig,
    /// 検証済みの設定
    pub config: ValidatedConfig,
}

/// アプリケーションの設定を初期化する
///
/// # 処理内容
/// 1. 環境変数から設定を読み込み
/// 2. ログシステムを初期化
/// 3. 設定値を検証
///
/// # 戻り値
/// 初期化結果、または設定が不正な場合はエラー
pub fn initialize_application(env_config: EnvironmentConfig) -> AppResult<InitializationResult> {
    initialize_logging_system(&env_config);

    let config = env_config.validate().map_err(|e| {
        log::error!("設定の検証に失敗しました: {e}");
        e
    })?;

    log::info!(
        "設定を読み込みました: timezone={}, undo_grace={}s, upcoming_window={}日, lookback={}ヶ月",
        config.timezone,
        config.undo_grace.num_seconds(),
        config.upcoming_window_days,
        config.analytics_lookback_months
    );

    Ok(InitializationResult { env_config, config })
}

/// ログレベル文字列をフィルターに変換する
pub fn parse_log_level(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    }
}

/// ログシステムを初期化する
///
/// 既に初期化済みの場合は何もしません（テストから複数回呼ばれるため）。
///
/// # 引数
/// * `env_config` - 環境設定
pub fn initialize_logging_system(env_config: &EnvironmentConfig) {
    let log_level = parse_log_level(&env_config.log_level);

    let initialized = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .is_ok();

    if initialized {
        log::info!(
            "ログシステムを初期化しました: level={}, environment={}",
            env_config.log_level,
            env_config.environment
        );
    }
}

/// 初期化完了ログを出力する
///
/// # 引数
/// * `result` - 初期化結果
/// * `record_count` - 初期データの件数
pub fn log_initialization_complete(result: &InitializationResult, record_count: usize) {
    log::info!("=== 初期化完了 ===");
    log::info!("環境: {}", result.env_config.environment);
    log::info!("デバッグモード: {}", result.env_config.debug_mode);
    log::info!("初期サブスクリプション件数: {record_count}");
}
