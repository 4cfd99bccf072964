/// 機能別モジュール
///
/// このモジュールは、アプリケーションの機能を機能別に整理したモジュール群を提供します。
/// 各機能モジュールは、その機能に関連するすべてのコード（モデル、コマンド、サービス）
/// を含む自己完結型のユニットです。
pub mod analytics;
pub mod payments;
pub mod subscriptions;
