use serde::{Deserialize, Serialize};

/// 支払い方法データモデル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: String, // カードブランド（例: "Visa"）
    pub last4: String,
    pub expiry_month: u32,
    pub expiry_year: u32, // 下2桁
    pub is_default: bool,
}

/// 登録済みの支払い方法を取得する
///
/// 支払い処理は行わないため、固定のカード情報を返します。
pub fn get_payment_methods() -> Vec<PaymentMethod> {
    vec![PaymentMethod {
        id: "pm_1".to_string(),
        card_type: "Visa".to_string(),
        last4: "4242".to_string(),
        expiry_month: 4,
        expiry_year: 28,
        is_default: true,
    }]
}
