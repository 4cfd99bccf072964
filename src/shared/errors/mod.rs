use thiserror::Error;

/// アプリケーション全体で使用される統一エラー型
#[derive(Debug, Error)]
pub enum AppError {
    /// バリデーション関連のエラー（どのフィールドが不正かを保持する）
    #[error("バリデーションエラー: {field}: {message}")]
    Validation { field: String, message: String },

    /// リソースが見つからない場合のエラー
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// 並行処理関連のエラー
    #[error("並行処理エラー: {0}")]
    Concurrency(String),

    /// JSON解析エラー
    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（データ形式の問題など）
    Medium,
    /// 高重要度（設定不備、ロック破損など）
    High,
}

impl AppError {
    /// ユーザーに表示するためのフレンドリーなメッセージを取得
    ///
    /// # 戻り値
    /// ユーザーに表示可能なエラーメッセージ
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Validation { message, .. } => message,
            AppError::NotFound(msg) => msg,
            AppError::Configuration(_) => "設定エラーが発生しました",
            AppError::Concurrency(_) => "並行処理でエラーが発生しました",
            AppError::Json(_) => "データ形式の解析でエラーが発生しました",
        }
    }

    /// エラーの詳細情報を取得
    ///
    /// # 戻り値
    /// エラーの詳細情報（ログ出力用）
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation { .. } => ErrorSeverity::Low,
            AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::Configuration(_) => ErrorSeverity::High,
            AppError::Concurrency(_) => ErrorSeverity::High,
            AppError::Json(_) => ErrorSeverity::Medium,
        }
    }

    /// 重要度に応じたログレベル
    pub fn log_level(&self) -> log::Level {
        match self.severity() {
            ErrorSeverity::High => log::Level::Error,
            ErrorSeverity::Medium | ErrorSeverity::Low => log::Level::Warn,
        }
    }

    /// 重要度に応じたレベルでエラーの詳細をログ出力する
    pub fn log(&self) {
        log::log!(self.log_level(), "{}", self.details());
    }

    /// バリデーションエラーの対象フィールド名を取得
    ///
    /// # 戻り値
    /// バリデーションエラーの場合はフィールド名、それ以外はNone
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// バリデーションエラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `field` - 不正な値が指定されたフィールド名
    /// * `message` - バリデーションエラーメッセージ
    ///
    /// # 戻り値
    /// バリデーションエラー
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// リソース未発見エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `resource` - 見つからなかったリソース名
    ///
    /// # 戻り値
    /// リソース未発見エラー
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound(format!("{}が見つかりません", resource.into()))
    }

    /// 設定エラーを作成するヘルパー関数
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// 並行処理エラーを作成するヘルパー関数
    pub fn concurrency<S: Into<String>>(message: S) -> Self {
        AppError::Concurrency(message.into())
    }
}

/// AppErrorからStringへの変換（コマンド層での使用のため）
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.user_message().to_string()
    }
}

/// Result型のエイリアス（アプリケーション全体で使用）
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        // 各エラータイプの重要度をテスト
        assert_eq!(
            AppError::validation("price", "金額が不正です").severity(),
            ErrorSeverity::Low
        );
        assert_eq!(
            AppError::not_found("サブスクリプション").severity(),
            ErrorSeverity::Low
        );
        assert_eq!(
            AppError::configuration("タイムゾーン不正").severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            AppError::concurrency("ロック破損").severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_log_level_follows_severity() {
        assert_eq!(
            AppError::concurrency("ロック破損").log_level(),
            log::Level::Error
        );
        assert_eq!(
            AppError::configuration("タイムゾーン不正").log_level(),
            log::Level::Error
        );
        assert_eq!(
            AppError::validation("price", "金額が不正です").log_level(),
            log::Level::Warn
        );
        assert_eq!(
            AppError::not_found("サブスクリプション").log_level(),
            log::Level::Warn
        );
    }

    #[test]
    fn test_user_message() {
        let validation_error = AppError::validation("name", "サービス名が不正です");
        assert_eq!(validation_error.user_message(), "サービス名が不正です");

        let not_found_error = AppError::not_found("ID 3 のサブスクリプション");
        assert_eq!(
            not_found_error.user_message(),
            "ID 3 のサブスクリプションが見つかりません"
        );

        let config_error = AppError::configuration("APP_TIMEZONE");
        assert_eq!(config_error.user_message(), "設定エラーが発生しました");
    }

    #[test]
    fn test_validation_field() {
        // バリデーションエラーはフィールド名を保持する
        let error = AppError::validation("next_billing_date", "日付が不正です");
        assert_eq!(error.field(), Some("next_billing_date"));
        assert!(error.details().contains("next_billing_date"));

        assert_eq!(AppError::not_found("サブスクリプション").field(), None);
    }

    #[test]
    fn test_string_conversion() {
        let error = AppError::validation("price", "テストエラー");
        let error_string: String = error.into();
        assert_eq!(error_string, "テストエラー");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: AppError = parse_error.into();
        assert!(matches!(error, AppError::Json(_)));
        assert_eq!(error.severity(), ErrorSeverity::Medium);
    }
}
