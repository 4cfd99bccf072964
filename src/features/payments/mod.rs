/// 支払い方法機能モジュール
///
/// 登録済みの支払い方法を表示用に提供します（読み取り専用）。
pub mod models;

pub use models::{get_payment_methods, PaymentMethod};
