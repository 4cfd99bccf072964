/// 環境設定関連のモジュール
pub mod environment;

/// アプリケーション初期化処理
pub mod initialization;

// 便利な再エクスポート
pub use environment::{
    get_env_filename, get_environment, load_env_file, load_environment_variables, Environment,
    EnvironmentConfig, ValidatedConfig, MAX_ANALYTICS_LOOKBACK_MONTHS, MAX_UNDO_GRACE_SECONDS,
    MAX_UPCOMING_WINDOW_DAYS,
};
pub use initialization::{
    initialize_application, initialize_logging_system, log_initialization_complete,
    InitializationResult,
};
