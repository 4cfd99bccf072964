use super::models::{BillingCycle, Category, Subscription, PLACEHOLDER_LOGO};

/// 起動時に読み込まれるモックデータ
///
/// 永続化層を持たないため、プロセス起動ごとにこの内容へ戻ります。
pub fn mock_subscriptions() -> Vec<Subscription> {
    let rows: [(i64, &str, Category, f64, &str, &str, &str); 10] = [
        (1, "Netflix", Category::Entertainment, 15.99, "2025-04-15", "#E50914", "2025-01-15"),
        (2, "Spotify", Category::Music, 9.99, "2025-04-10", "#1DB954", "2025-02-10"),
        (3, "Adobe Creative Cloud", Category::Productivity, 52.99, "2025-04-22", "#FF0000", "2025-01-22"),
        (4, "Amazon Prime", Category::Shopping, 14.99, "2025-04-05", "#FF9900", "2024-12-05"),
        (5, "Disney+", Category::Entertainment, 7.99, "2025-04-18", "#0063e5", "2025-03-18"),
        (6, "iCloud", Category::Utilities, 2.99, "2025-04-12", "#147EFB", "2024-11-12"),
        (7, "YouTube Premium", Category::Entertainment, 11.99, "2025-04-08", "#FF0000", "2025-03-08"),
        (8, "HBO Max", Category::Entertainment, 14.99, "2025-04-25", "#5822B4", "2025-03-25"),
        (9, "Microsoft 365", Category::Productivity, 9.99, "2025-04-17", "#0078D4", "2025-02-17"),
        (10, "Notion", Category::Productivity, 8.0, "2025-04-20", "#000000", "2025-03-20"),
    ];

    rows.into_iter()
        .map(
            |(id, name, category, price, next_billing_date, color, created_at)| Subscription {
                id,
                name: name.to_string(),
                category,
                price,
                billing_cycle: BillingCycle::Monthly,
                next_billing_date: next_billing_date.to_string(),
                logo: PLACEHOLDER_LOGO.to_string(),
                color: color.to_string(),
                created_at: created_at.to_string(),
            },
        )
        .collect()
}
