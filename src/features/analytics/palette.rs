use crate::features::subscriptions::Category;

/// グラフ用のカラーパレット（白背景でのコントラストを考慮）
pub const CHART_COLORS: [&str; 12] = [
    "#2196F3", // Blue
    "#F44336", // Red
    "#4CAF50", // Green
    "#9C27B0", // Purple
    "#FF9800", // Orange
    "#00BCD4", // Cyan
    "#3F51B5", // Indigo
    "#E91E63", // Pink
    "#FFC107", // Amber
    "#009688", // Teal
    "#673AB7", // Deep Purple
    "#607D8B", // Blue Grey
];

/// 既知カテゴリの固定色
pub fn fixed_category_color(category: &Category) -> Option<&'static str> {
    let slot = match category {
        Category::Entertainment => 0,
        Category::Utilities => 1,
        Category::Music => 2,
        Category::Shopping => 3,
        Category::Productivity => 4,
        Category::Other => 11,
        Category::Custom(_) => return None,
    };
    Some(CHART_COLORS[slot])
}

/// 「その他」カテゴリの色（プレースホルダーにも使用）
pub fn other_color() -> &'static str {
    CHART_COLORS[11]
}

/// 一回の集計内でカテゴリに色を割り当てる
///
/// 既知のカテゴリは固定色、それ以外は発見順のインデックスでパレットを循環します。
/// 割り当ては集計ごとに作り直すため、呼び出しをまたいだ安定性は保証しません。
#[derive(Debug, Default)]
pub struct ColorAssigner {
    discovered: Vec<Category>,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// カテゴリの色を取得する（未発見のカテゴリは発見順に登録）
    pub fn color_for(&mut self, category: &Category) -> String {
        let index = match self.discovered.iter().position(|c| c == category) {
            Some(index) => index,
            None => {
                self.discovered.push(category.clone());
                self.discovered.len() - 1
            }
        };

        fixed_category_color(category)
            .unwrap_or(CHART_COLORS[index % CHART_COLORS.len()])
            .to_string()
    }
}
