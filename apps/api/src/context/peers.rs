use std::collections::HashMap;

use serde::Serialize;

/// How many peers are exploring a given interest. Carries no peer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerTag {
    pub label: String,
    pub count: usize,
}

/// Rolls other users' interest lists up into a label frequency.
///
/// Labels group case-insensitively and keep the first-seen spelling. A label
/// repeated within one user's list counts once. Ordered by count descending,
/// then label ascending, and capped at `limit`.
pub fn rollup_peer_tags(interest_lists: &[Vec<String>], limit: usize) -> Vec<PeerTag> {
    let mut order: Vec<String> = Vec::new();
    let mut tags: HashMap<String, PeerTag> = HashMap::new();

    for list in interest_lists {
        let mut seen_in_list: Vec<String> = Vec::new();
        for label in list {
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            let key = label.to_lowercase();
            if seen_in_list.contains(&key) {
                continue;
            }
            seen_in_list.push(key.clone());

            tags.entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    PeerTag {
                        label: label.to_string(),
                        count: 0,
                    }
                })
                .count += 1;
        }
    }

    let mut rolled: Vec<PeerTag> = order
        .into_iter()
        .filter_map(|key| tags.remove(&key))
        .collect();
    rolled.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
            .then_with(|| a.label.cmp(&b.label))
    });
    rolled.truncate(limit);
    rolled
}
