//! Keyword tables for transaction type and category detection
//!
//! Matching is plain substring containment against the lowercased text, so a
//! keyword embedded in a longer word still matches ("bus" hits "business").
//! Tables carry both the Chinese keywords the app was first built around and
//! their English equivalents.

use crate::models::{Category, TransactionType};

/// Keywords that mark an utterance as income
pub const INCOME_KEYWORDS: &[&str] = &[
    "收入", "薪水", "薪資", "工資", "獎金", "紅包",
    "income", "salary", "wage", "bonus", "gift-money", "paycheck", "allowance", "refund",
];

const FOOD_KEYWORDS: &[&str] = &[
    "咖啡", "飯", "餐", "食", "麵", "早餐", "午餐", "晚餐", "宵夜", "飲料", "水果",
    "coffee", "breakfast", "lunch", "dinner", "meal", "snack", "drink", "fruit", "rice",
    "noodle", "food", "grocer",
];

const TRANSPORT_KEYWORDS: &[&str] = &[
    "車", "票", "捷運", "公車", "計程車", "高鐵", "火車", "油", "加油",
    "taxi", "bus", "metro", "subway", "train", "uber", "fuel", "gasoline", "parking", "toll",
];

const HOUSING_KEYWORDS: &[&str] = &[
    "房租", "水電", "電費", "水費", "瓦斯", "網路費",
    "rent", "utilit", "electric", "water bill", "gas bill", "internet",
];

const ENTERTAINMENT_KEYWORDS: &[&str] = &[
    "電影", "遊戲", "玩", "旅遊", "旅行", "門票",
    "movie", "cinema", "game", "concert", "travel", "trip", "netflix",
];

/// Expense categories in priority order; the first table with a hit wins
const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (Category::Food, FOOD_KEYWORDS),
    (Category::Transport, TRANSPORT_KEYWORDS),
    (Category::Housing, HOUSING_KEYWORDS),
    (Category::Entertainment, ENTERTAINMENT_KEYWORDS),
];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

/// Income if any income keyword appears anywhere in the text, expense otherwise
pub fn detect_type(text: &str) -> TransactionType {
    let lowered = text.to_lowercase();
    if contains_any(&lowered, INCOME_KEYWORDS) {
        TransactionType::Income
    } else {
        TransactionType::Expense
    }
}

/// Map an item label to a category
///
/// All income collapses to [`Category::Income`]; expenses go through the
/// keyword tables and land on [`Category::Other`] when nothing matches.
pub fn classify(item: &str, tx_type: TransactionType) -> Category {
    if tx_type == TransactionType::Income {
        return Category::Income;
    }

    let lowered = item.to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(_, keywords)| contains_any(&lowered, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}
