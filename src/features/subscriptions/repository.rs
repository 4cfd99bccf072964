use super::models::{
    BillingCycle, Category, CreateSubscriptionDto, Subscription, Tombstone, UpdateSubscriptionDto,
    PLACEHOLDER_LOGO,
};
use super::seed::mock_subscriptions;
use crate::shared::clock::Clock;
use crate::shared::config::ValidatedConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::security::{
    generate_safe_random_color, is_valid_color_hex, is_valid_date_string, is_valid_name,
    is_valid_price, sanitize_text, sanitize_url,
};
use crate::shared::utils::{parse_stored_date, safe_amount};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// サブスクリプションの保存領域
///
/// 有効なサブスクリプション（登録順）と、削除取り消し待ちの墓石を保持します。
/// すべての変更はこの構造体のメソッドを通して行います。
pub struct SubscriptionStore {
    subscriptions: Vec<Subscription>,
    tombstones: HashMap<i64, Tombstone>,
    next_id: i64,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    undo_grace: Duration,
}

impl fmt::Debug for SubscriptionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionStore")
            .field("subscriptions", &self.subscriptions.len())
            .field("tombstones", &self.tombstones.len())
            .field("next_id", &self.next_id)
            .field("timezone", &self.timezone)
            .finish()
    }
}

/// 検証済みの入力値
struct ValidatedFields {
    name: String,
    category: Category,
    price: f64,
    billing_cycle: BillingCycle,
    next_billing_date: String,
    logo: String,
}

impl SubscriptionStore {
    /// 空のストアを作成する
    pub fn new(config: &ValidatedConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_records(Vec::new(), config, clock)
    }

    /// 既存のレコードでストアを初期化する
    ///
    /// レコードは検証せずにそのまま取り込みます（初期データ用）。
    /// IDが重複している場合は最初のレコードのみを採用します。
    pub fn with_records(
        records: Vec<Subscription>,
        config: &ValidatedConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut subscriptions: Vec<Subscription> = Vec::with_capacity(records.len());
        for record in records {
            if subscriptions.iter().any(|s| s.id == record.id) {
                log::warn!("重複したIDのレコードを無視しました: id={}", record.id);
                continue;
            }
            subscriptions.push(record);
        }

        let next_id = subscriptions.iter().map(|s| s.id).max().unwrap_or(0) + 1;

        Self {
            subscriptions,
            tombstones: HashMap::new(),
            next_id,
            clock,
            timezone: config.timezone,
            undo_grace: config.undo_grace,
        }
    }

    /// モックデータで初期化されたストアを作成する
    pub fn seeded(config: &ValidatedConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Self::with_records(mock_subscriptions(), config, clock);
        log::info!(
            "初期データを読み込みました: {}件",
            store.subscriptions.len()
        );
        store
    }

    /// 設定タイムゾーンでの今日の日付
    pub fn today(&self) -> NaiveDate {
        self.clock.today(&self.timezone)
    }

    /// 有効なサブスクリプション（登録順）
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// 有効なサブスクリプション一覧を次回請求日の昇順で取得する
    ///
    /// 日付を解析できないレコードは末尾に並び、同じ日付は登録順を保ちます。
    pub fn find_all(&self) -> Vec<Subscription> {
        sort_by_billing_date(self.subscriptions.clone())
    }

    /// 有効なサブスクリプションをカテゴリごとに分類して取得する
    ///
    /// 空のカテゴリは結果に含まれません。
    pub fn find_by_category(&self) -> BTreeMap<String, Vec<Subscription>> {
        let mut grouped: BTreeMap<String, Vec<Subscription>> = BTreeMap::new();
        for subscription in &self.subscriptions {
            let key = Category::parse(subscription.category.as_str())
                .as_str()
                .to_string();
            grouped.entry(key).or_default().push(subscription.clone());
        }

        grouped
            .into_iter()
            .map(|(category, subscriptions)| (category, sort_by_billing_date(subscriptions)))
            .collect()
    }

    /// IDでサブスクリプションを取得する
    ///
    /// # 戻り値
    /// サブスクリプション、存在しない場合はNotFoundエラー
    pub fn find_by_id(&self, id: i64) -> AppResult<Subscription> {
        self.subscriptions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("ID {id} のサブスクリプション")))
    }

    /// サブスクリプションを作成する
    ///
    /// すべてのフィールドを検証・サニタイズし、不正な値があれば何も変更せずにエラーを返します。
    ///
    /// # 戻り値
    /// 保存されたサブスクリプション、または失敗時はバリデーションエラー
    pub fn create(&mut self, dto: CreateSubscriptionDto) -> AppResult<Subscription> {
        let fields = validate_fields(
            &dto.name,
            &dto.category,
            dto.price,
            &dto.billing_cycle,
            &dto.next_billing_date,
            &dto.logo,
        )
        .map_err(|e| {
            log::warn!("サブスクリプションの作成を拒否しました");
            e.log();
            e
        })?;

        let color = if is_valid_color_hex(&dto.color) {
            dto.color
        } else {
            generate_safe_random_color()
        };

        let id = self.next_id;
        self.next_id += 1;

        let subscription = Subscription {
            id,
            name: fields.name,
            category: fields.category,
            price: fields.price,
            billing_cycle: fields.billing_cycle,
            next_billing_date: fields.next_billing_date,
            logo: fields.logo,
            color,
            created_at: self.today().format("%Y-%m-%d").to_string(),
        };

        self.subscriptions.push(subscription.clone());
        log::info!(
            "サブスクリプションを作成しました: id={}, name={}",
            subscription.id,
            subscription.name
        );

        Ok(subscription)
    }

    /// サブスクリプションを更新する
    ///
    /// 作成時と同じ検証を行い、保存位置と作成日を保ったまま置き換えます。
    /// カラーコードが不正な場合は既存の色を維持します。
    ///
    /// # 戻り値
    /// 更新されたサブスクリプション、IDが存在しない場合はNotFoundエラー
    pub fn update(&mut self, dto: UpdateSubscriptionDto) -> AppResult<Subscription> {
        let index = self
            .subscriptions
            .iter()
            .position(|s| s.id == dto.id)
            .ok_or_else(|| {
                log::warn!("更新対象のサブスクリプションが見つかりません: id={}", dto.id);
                AppError::not_found(format!("ID {} のサブスクリプション", dto.id))
            })?;

        let fields = validate_fields(
            &dto.name,
            &dto.category,
            dto.price,
            &dto.billing_cycle,
            &dto.next_billing_date,
            &dto.logo,
        )
        .map_err(|e| {
            log::warn!("サブスクリプションの更新を拒否しました: id={}", dto.id);
            e.log();
            e
        })?;

        let existing = &self.subscriptions[index];
        let color = if is_valid_color_hex(&dto.color) {
            dto.color
        } else {
            existing.color.clone()
        };

        let updated = Subscription {
            id: existing.id,
            name: fields.name,
            category: fields.category,
            price: fields.price,
            billing_cycle: fields.billing_cycle,
            next_billing_date: fields.next_billing_date,
            logo: fields.logo,
            color,
            created_at: existing.created_at.clone(),
        };

        self.subscriptions[index] = updated.clone();
        log::info!("サブスクリプションを更新しました: id={}", updated.id);

        Ok(updated)
    }

    /// サブスクリプションを削除する（取り消し可能）
    ///
    /// 削除したレコードは猶予期間の間だけ墓石として保持されます。
    /// 同じIDの墓石が残っている場合は新しい墓石で置き換えます。
    ///
    /// # 戻り値
    /// 削除した場合はtrue、IDが存在しない場合はfalse
    pub fn delete(&mut self, id: i64) -> bool {
        let Some(index) = self.subscriptions.iter().position(|s| s.id == id) else {
            log::warn!("削除対象のサブスクリプションが見つかりません: id={id}");
            return false;
        };

        let subscription = self.subscriptions.remove(index);
        let deleted_at = self.clock.now();
        let tombstone = Tombstone {
            subscription,
            deleted_at,
            expires_at: deleted_at
                .checked_add_signed(self.undo_grace)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        if self.tombstones.insert(id, tombstone).is_some() {
            log::debug!("既存の墓石を新しい削除で置き換えました: id={id}");
        }

        log::info!(
            "サブスクリプションを削除しました: id={id}（{}秒以内なら取り消し可能）",
            self.undo_grace.num_seconds()
        );
        true
    }

    /// 削除を取り消す
    ///
    /// 猶予期間内の墓石があればレコードを有効な一覧の末尾に戻します。
    ///
    /// # 戻り値
    /// 復元した場合はtrue、墓石がないか期限切れの場合はfalse
    pub fn undo_delete(&mut self, id: i64) -> bool {
        if self.pending_undo(id).is_none() {
            log::warn!("取り消し可能な削除が見つかりません: id={id}");
            return false;
        }

        // 直前の確認と取り出しの間に墓石が消えていても失敗として扱う
        let Some(tombstone) = self.tombstones.remove(&id) else {
            return false;
        };

        self.subscriptions.push(tombstone.subscription);
        log::info!("サブスクリプションの削除を取り消しました: id={id}");
        true
    }

    /// 取り消し可能な墓石を取得する
    ///
    /// 期限切れの墓石はこの時点で破棄されます。
    pub fn pending_undo(&mut self, id: i64) -> Option<Tombstone> {
        let now = self.clock.now();
        let expired = self.tombstones.get(&id)?.is_expired(now);

        if expired {
            self.tombstones.remove(&id);
            log::debug!("墓石の猶予期間が終了しました: id={id}");
            return None;
        }

        self.tombstones.get(&id).cloned()
    }

    /// 期限切れの墓石をすべて破棄する
    ///
    /// # 戻り値
    /// 破棄した墓石の数
    pub fn purge_expired_tombstones(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.tombstones.len();
        self.tombstones.retain(|_, tombstone| !tombstone.is_expired(now));

        let purged = before - self.tombstones.len();
        if purged > 0 {
            log::debug!("期限切れの墓石を破棄しました: {purged}件");
        }
        purged
    }

    /// 保持している墓石の数（期限切れで未破棄のものを含む）
    pub fn tombstone_count(&self) -> usize {
        self.tombstones.len()
    }

    /// 指定日数以内に請求予定のサブスクリプションを取得する
    ///
    /// 今日から `window_days` 日後までを両端含みで対象とし、日付の昇順で返します。
    /// 日付を解析できないレコードは除外します。
    /// 終了日が表現できる範囲を超える場合は上限なしとして扱います。
    /// 負の日数の場合は空になります。
    pub fn find_upcoming(&self, window_days: i64) -> Vec<Subscription> {
        if window_days < 0 {
            return Vec::new();
        }

        let today = self.today();
        let until = Duration::try_days(window_days)
            .and_then(|window| today.checked_add_signed(window))
            .unwrap_or(NaiveDate::MAX);

        let upcoming: Vec<Subscription> = self
            .subscriptions
            .iter()
            .filter(|s| {
                parse_stored_date(&s.next_billing_date)
                    .map(|date| date >= today && date <= until)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        sort_by_billing_date(upcoming)
    }

    /// 有効なサブスクリプションの月額合計を計算する
    ///
    /// 支払いサイクルによる換算は行わず、各レコードの金額をそのまま合計します。
    pub fn calculate_monthly_total(&self) -> f64 {
        self.subscriptions
            .iter()
            .fold(0.0, |acc, s| acc + safe_amount(s.price))
    }

    /// グラフ表示に十分なデータがあるか
    pub fn has_enough_data_for_charts(&self) -> bool {
        !self.subscriptions.is_empty()
    }
}

/// 次回請求日の昇順に並べ替える（解析できない日付は末尾、同順位は元の順序を維持）
fn sort_by_billing_date(mut subscriptions: Vec<Subscription>) -> Vec<Subscription> {
    subscriptions.sort_by_cached_key(|s| {
        let date = parse_stored_date(&s.next_billing_date);
        (date.is_none(), date)
    });
    subscriptions
}

/// 作成・更新共通の入力検証
fn validate_fields(
    name: &str,
    category: &str,
    price: f64,
    billing_cycle: &str,
    next_billing_date: &str,
    logo: &str,
) -> AppResult<ValidatedFields> {
    let name = sanitize_text(name);
    if !is_valid_name(&name) {
        return Err(AppError::validation(
            "name",
            "サービス名は50文字以内の英数字、空白、.,&+-_() で入力してください",
        ));
    }

    if !is_valid_price(price) {
        return Err(AppError::validation(
            "price",
            "金額は0より大きく10000以下で入力してください",
        ));
    }

    let billing_cycle: BillingCycle = billing_cycle.parse().map_err(|_| {
        AppError::validation(
            "billing_cycle",
            "支払いサイクルは Monthly、Quarterly、Biannually、Annually のいずれかである必要があります",
        )
    })?;

    let next_billing_date = next_billing_date.trim();
    if !is_valid_date_string(next_billing_date) {
        return Err(AppError::validation(
            "next_billing_date",
            "次回請求日はYYYY-MM-DD形式の有効な日付で入力してください",
        ));
    }

    Ok(ValidatedFields {
        name,
        category: Category::parse(category),
        price,
        billing_cycle,
        next_billing_date: next_billing_date.to_string(),
        logo: sanitize_url(logo).unwrap_or_else(|| PLACEHOLDER_LOGO.to_string()),
    })
}
