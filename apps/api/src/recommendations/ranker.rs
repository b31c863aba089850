use std::collections::HashSet;

use crate::models::recommendation::RecommendationItem;
use crate::parsing::recommendations::DEFAULT_RELEVANCE;

/// Identity of a recommendation: lowercase, whitespace-collapsed title and platform.
pub fn dedup_key(item: &RecommendationItem) -> (String, String) {
    (normalize(&item.title), normalize(&item.platform))
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Dedups, re-validates relevance and orders a freshly parsed batch.
///
/// The first occurrence of a title+platform wins. Each paid bucket is
/// stable-sorted by relevance descending, so ties keep arrival order.
/// Output is the unpaid bucket followed by the paid bucket.
pub fn rank_recommendations(items: Vec<RecommendationItem>) -> Vec<RecommendationItem> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let (mut paid, mut unpaid): (Vec<_>, Vec<_>) = items
        .into_iter()
        .filter(|item| seen.insert(dedup_key(item)))
        .map(|mut item| {
            item.relevance_score = validated_relevance(item.relevance_score);
            if !item.paid {
                item.price = None;
            }
            item
        })
        .partition(|item| item.paid);

    let by_relevance =
        |a: &RecommendationItem, b: &RecommendationItem| b.relevance_score.total_cmp(&a.relevance_score);
    unpaid.sort_by(by_relevance);
    paid.sort_by(by_relevance);

    unpaid.extend(paid);
    unpaid
}

fn validated_relevance(score: f64) -> f64 {
    if score.is_nan() {
        DEFAULT_RELEVANCE
    } else {
        score.clamp(0.0, 1.0)
    }
}
