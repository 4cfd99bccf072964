//! 時刻取得の抽象化
//!
//! 削除取り消しの猶予判定や「今日」の計算はすべてこのトレイト経由で行うため、
//! テストでは `ManualClock` を使って時間を早送りできます。

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::{Arc, Mutex};

/// 現在時刻を返す時計
pub trait Clock: Send + Sync {
    /// 現在時刻（UTC）
    fn now(&self) -> DateTime<Utc>;

    /// 指定タイムゾーンでの今日の日付
    fn today(&self, tz: &Tz) -> NaiveDate {
        self.now().with_timezone(tz).date_naive()
    }
}

/// システム時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 手動で進める時計（テスト用）
///
/// クローンしたインスタンス同士は同じ時刻を共有します。
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// 指定時刻から開始する時計を作成
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// 時計を進める
    pub fn advance(&self, delta: Duration) {
        let mut current = self.lock();
        *current += delta;
    }

    /// 時刻を直接設定する
    pub fn set(&self, at: DateTime<Utc>) {
        *self.lock() = at;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // 保持している値は単一の時刻のみなので、ポイズン状態でも値をそのまま使う
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let shared = clock.clone();

        clock.advance(Duration::seconds(11));
        assert_eq!(shared.now(), start + Duration::seconds(11));
    }

    #[test]
    fn test_today_uses_timezone() {
        // UTC 2025-03-31 20:00 は東京では 2025-04-01
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 31, 20, 0, 0).unwrap());
        assert_eq!(
            clock.today(&chrono_tz::Asia::Tokyo),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
        assert_eq!(
            clock.today(&chrono_tz::UTC),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
