/// 共有エラー型とエラーハンドリング
pub mod errors;

/// 共有設定管理
pub mod config;

/// 時刻取得の抽象化
pub mod clock;

/// 入力値のサニタイズと検証
pub mod security;

/// 共有ユーティリティ関数
pub mod utils;

// 便利な再エクスポート
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    get_environment, initialize_application, initialize_logging_system,
    load_environment_variables, log_initialization_complete, Environment, EnvironmentConfig,
    InitializationResult, ValidatedConfig,
};
pub use errors::{AppError, AppResult, ErrorSeverity};
