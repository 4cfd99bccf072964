use crate::shared::errors::{AppError, AppResult};
use chrono_tz::Tz;
use std::path::Path;

/// 既定のタイムゾーン（「今日」の判定に使用）
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// 削除取り消しの猶予時間（秒）の既定値
pub const DEFAULT_UNDO_GRACE_SECONDS: i64 = 10;

/// 支払い予定の表示期間（日）の既定値
pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 7;

/// 分析グラフの遡及月数の既定値
pub const DEFAULT_ANALYTICS_LOOKBACK_MONTHS: u32 = 12;

/// 墓石掃除タスクの実行間隔（ミリ秒）の既定値
pub const DEFAULT_TOMBSTONE_SWEEP_INTERVAL_MS: u64 = 1000;

/// 削除取り消しの猶予時間（秒）の上限（1日）
pub const MAX_UNDO_GRACE_SECONDS: i64 = 86_400;

/// 支払い予定の表示期間（日）の上限
pub const MAX_UPCOMING_WINDOW_DAYS: i64 = 3_660;

/// 分析グラフの遡及月数の上限
pub const MAX_ANALYTICS_LOOKBACK_MONTHS: u32 = 1_200;

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// デバッグモードの有効/無効
    pub debug_mode: bool,
    /// ログレベル
    pub log_level: String,
    /// 「今日」を決めるタイムゾーン名（IANA形式）
    pub timezone: String,
    /// 削除取り消しの猶予時間（秒）
    pub undo_grace_seconds: String,
    /// 支払い予定の表示期間（日）
    pub upcoming_window_days: String,
    /// 分析グラフの遡及月数
    pub analytics_lookback_months: String,
    /// 墓石掃除タスクの実行間隔（ミリ秒）
    pub tombstone_sweep_interval_ms: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    ///
    /// # 戻り値
    /// 環境設定
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の取得関数から設定を読み込む
    ///
    /// 値が見つからない項目には既定値を使用します。
    ///
    /// # 引数
    /// * `lookup` - キーから値を返す関数
    ///
    /// # 戻り値
    /// 環境設定
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|value| Environment::parse(&value))
            .unwrap_or_else(get_environment);
        let debug_mode = environment == Environment::Development;
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
            timezone: lookup("APP_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            undo_grace_seconds: lookup("UNDO_GRACE_SECONDS")
                .unwrap_or_else(|| DEFAULT_UNDO_GRACE_SECONDS.to_string()),
            upcoming_window_days: lookup("UPCOMING_WINDOW_DAYS")
                .unwrap_or_else(|| DEFAULT_UPCOMING_WINDOW_DAYS.to_string()),
            analytics_lookback_months: lookup("ANALYTICS_LOOKBACK_MONTHS")
                .unwrap_or_else(|| DEFAULT_ANALYTICS_LOOKBACK_MONTHS.to_string()),
            tombstone_sweep_interval_ms: lookup("TOMBSTONE_SWEEP_INTERVAL_MS")
                .unwrap_or_else(|| DEFAULT_TOMBSTONE_SWEEP_INTERVAL_MS.to_string()),
        }
    }

    /// 設定値を検証し、型付きの設定に変換する
    ///
    /// # 戻り値
    /// 検証済みの設定、または不正な値がある場合は設定エラー
    pub fn validate(&self) -> AppResult<ValidatedConfig> {
        let timezone: Tz = self.timezone.parse().map_err(|_| {
            AppError::configuration(format!("不明なタイムゾーンです: {}", self.timezone))
        })?;

        let undo_grace_seconds = parse_bounded::<i64>(
            "UNDO_GRACE_SECONDS",
            &self.undo_grace_seconds,
            Some(MAX_UNDO_GRACE_SECONDS),
        )?;
        let undo_grace = chrono::Duration::try_seconds(undo_grace_seconds).ok_or_else(|| {
            AppError::configuration(format!(
                "UNDO_GRACE_SECONDS が範囲外です: {}",
                self.undo_grace_seconds
            ))
        })?;
        let upcoming_window_days = parse_bounded::<i64>(
            "UPCOMING_WINDOW_DAYS",
            &self.upcoming_window_days,
            Some(MAX_UPCOMING_WINDOW_DAYS),
        )?;
        let analytics_lookback_months = parse_bounded::<u32>(
            "ANALYTICS_LOOKBACK_MONTHS",
            &self.analytics_lookback_months,
            Some(MAX_ANALYTICS_LOOKBACK_MONTHS),
        )?;
        let tombstone_sweep_interval_ms = parse_bounded::<u64>(
            "TOMBSTONE_SWEEP_INTERVAL_MS",
            &self.tombstone_sweep_interval_ms,
            None,
        )?;

        Ok(ValidatedConfig {
            timezone,
            undo_grace,
            upcoming_window_days,
            analytics_lookback_months,
            tombstone_sweep_interval: std::time::Duration::from_millis(tombstone_sweep_interval_ms),
        })
    }
}

/// 検証済みの型付き設定
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// 「今日」を決めるタイムゾーン
    pub timezone: Tz,
    /// 削除取り消しの猶予時間
    pub undo_grace: chrono::Duration,
    /// 支払い予定の表示期間（日）
    pub upcoming_window_days: i64,
    /// 分析グラフの遡及月数
    pub analytics_lookback_months: u32,
    /// 墓石掃除タスクの実行間隔
    pub tombstone_sweep_interval: std::time::Duration,
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Tokyo,
            undo_grace: chrono::Duration::seconds(DEFAULT_UNDO_GRACE_SECONDS),
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
            analytics_lookback_months: DEFAULT_ANALYTICS_LOOKBACK_MONTHS,
            tombstone_sweep_interval: std::time::Duration::from_millis(
                DEFAULT_TOMBSTONE_SWEEP_INTERVAL_MS,
            ),
        }
    }
}

/// 正の数値として解析し、上限が指定されていれば範囲も検証する
fn parse_bounded<T>(key: &str, raw: &str, max: Option<T>) -> AppResult<T>
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| AppError::configuration(format!("{key} は数値で指定してください: {raw}")))?;

    if value <= T::default() {
        return Err(AppError::configuration(format!(
            "{key} は正の数値で指定してください: {raw}"
        )));
    }

    if let Some(max) = max {
        if value > max {
            return Err(AppError::configuration(format!(
                "{key} は{max}以下で指定してください: {raw}"
            )));
        }
    }

    Ok(value)
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. コンパイル時埋め込み環境変数を最優先
/// 2. 実行時環境変数 ENVIRONMENT を確認
/// 3. デバッグビルドの場合は Development
/// 4. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        let env = Environment::parse(embedded_env);
        log::debug!("環境判定: コンパイル時埋め込み値を使用 -> {embedded_env} -> {env:?}");
        return env;
    }

    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = Environment::parse(&env_var);
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

/// 環境に応じた.envファイル名を取得する
///
/// # ファイル名の規則
/// - 開発環境: ".env"
/// - プロダクション環境: ".env.production"
pub fn get_env_filename(env: &Environment) -> &'static str {
    match env {
        Environment::Development => ".env",
        Environment::Production => ".env.production",
    }
}

/// 環境に応じた.envファイルを読み込む
///
/// ファイルが存在しない場合は警告のみを出し、
/// 直接設定された環境変数をそのまま使用します。
pub fn load_environment_variables() {
    if let Some(env) = option_env!("EMBEDDED_ENVIRONMENT") {
        log::info!("コンパイル時埋め込み環境設定を使用: {env}");
        return;
    }

    let environment = get_environment();
    let env_file = get_env_filename(&environment);

    log::info!("環境: {environment:?}, 読み込み対象: {env_file}");

    if !load_env_file(Path::new(env_file)) && env_file != ".env" {
        match dotenv::dotenv() {
            Ok(_) => {
                log::warn!("{env_file}が見つからないため、デフォルトの.envファイルを読み込みました");
            }
            Err(_) => {
                log::warn!("環境変数ファイルが見つかりません。直接設定された環境変数を使用します。");
            }
        }
    }
}

/// 指定された.envファイルを読み込む
///
/// # 戻り値
/// 読み込めた場合はtrue
pub fn load_env_file(path: &Path) -> bool {
    match dotenv::from_path(path) {
        Ok(_) => {
            log::info!("{}ファイルを読み込みました", path.display());
            true
        }
        Err(e) => {
            log::warn!("{}ファイルを読み込めませんでした: {e}", path.display());
            false
        }
    }
}
