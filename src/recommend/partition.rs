use crate::recommend::RecommendationEntry;
use crate::types::{AnnotatedItem, DomainItem};

/// Words this short are too generic to count toward fuzzy overlap.
const FUZZY_MIN_WORD_CHARS: usize = 4;

/// Two-bucket split of a catalog collection. Together the buckets hold
/// every input item exactly once.
#[derive(Debug, Clone, Default)]
pub struct Partitioned {
    pub recommended: Vec<AnnotatedItem>,
    pub others: Vec<DomainItem>,
}

/// Split `items` into entries endorsed by `recommendations` and the rest.
///
/// An item matches an entry when either name contains the other
/// (case-insensitive) or when any word pair longer than three characters
/// overlaps by substring. The overlap rule is intentionally permissive;
/// occasional generic-word matches are accepted behavior, bounded by the
/// word-length guard.
pub fn partition(items: Vec<DomainItem>, recommendations: &[RecommendationEntry]) -> Partitioned {
    let mut recommended = Vec::new();
    let mut others = Vec::new();

    for item in items {
        match recommendations
            .iter()
            .find(|entry| names_match(&entry.name, &item.name))
        {
            Some(entry) => {
                recommended.push(AnnotatedItem::new(item, entry.reason.clone(), entry.priority));
            }
            None => others.push(item),
        }
    }

    recommended.sort_by_key(|annotated| annotated.priority);
    Partitioned {
        recommended,
        others,
    }
}

fn names_match(entry_name: &str, item_name: &str) -> bool {
    let entry = entry_name.to_lowercase();
    let item = item_name.to_lowercase();
    if entry.contains(&item) || item.contains(&entry) {
        return true;
    }
    fuzzy_word_overlap(&entry, &item)
}

fn fuzzy_word_overlap(a: &str, b: &str) -> bool {
    for word_a in a.split_whitespace() {
        if word_a.chars().count() < FUZZY_MIN_WORD_CHARS {
            continue;
        }
        for word_b in b.split_whitespace() {
            if word_b.chars().count() < FUZZY_MIN_WORD_CHARS {
                continue;
            }
            if word_a.contains(word_b) || word_b.contains(word_a) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::{names_match, partition};
    use crate::recommend::RecommendationEntry;
    use crate::types::DomainItem;

    fn entries() -> Vec<RecommendationEntry> {
        vec![
            RecommendationEntry::new("cotton", "Breathable, soft for sleep", 1),
            RecommendationEntry::new("linen", "Cool, crisp and durable", 2),
        ]
    }

    #[test]
    fn splits_matched_and_unmatched_items() {
        let items = vec![
            DomainItem::new(1, "Organic Cotton"),
            DomainItem::new(2, "Recycled Steel"),
        ];
        let result = partition(items, &entries());

        assert_eq!(result.recommended.len(), 1);
        assert_eq!(result.recommended[0].item.id, 1);
        assert_eq!(result.recommended[0].reason, "Breathable, soft for sleep");
        assert_eq!(result.recommended[0].priority, 1);
        assert_eq!(result.others.len(), 1);
        assert_eq!(result.others[0].id, 2);
    }

    #[test]
    fn every_item_lands_in_exactly_one_bucket() {
        let items: Vec<DomainItem> = (0..40)
            .map(|i| DomainItem::new(i, format!("Item {i} cotton").repeat((i % 3 + 1) as usize)))
            .chain((40..60).map(|i| DomainItem::new(i, format!("Widget {i}"))))
            .collect();
        let total = items.len();
        let result = partition(items, &entries());

        assert_eq!(result.recommended.len() + result.others.len(), total);
        let mut ids: Vec<u64> = result
            .recommended
            .iter()
            .map(|a| a.item.id)
            .chain(result.others.iter().map(|i| i.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn sorts_recommended_by_priority_keeping_input_order_for_ties() {
        let recommendations = vec![
            RecommendationEntry::new("silk", "sheen", 2),
            RecommendationEntry::new("wool", "warmth", 2),
            RecommendationEntry::new("cotton", "comfort", 1),
        ];
        let items = vec![
            DomainItem::new(1, "Mulberry Silk"),
            DomainItem::new(2, "Merino Wool"),
            DomainItem::new(3, "Organic Cotton"),
        ];
        let result = partition(items, &recommendations);
        let ids: Vec<u64> = result.recommended.iter().map(|a| a.item.id).collect();
        // cotton first by priority, then silk before wool by input order
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn matches_substrings_in_both_directions() {
        // entry name inside item name
        assert!(names_match("cotton", "Organic Cotton"));
        // item name inside entry name
        assert!(names_match("organic cotton fabric", "Cotton"));
    }

    #[test]
    fn fuzzy_overlap_requires_words_longer_than_three_chars() {
        assert!(names_match("block printing", "Screen Printing"));
        // "dye"/"dry" are three letters, below the guard
        assert!(!names_match("tie dye", "dry brush"));
    }

    #[test]
    fn no_recommendations_sends_everything_to_others() {
        let items = vec![DomainItem::new(1, "Organic Cotton")];
        let result = partition(items, &[]);
        assert!(result.recommended.is_empty());
        assert_eq!(result.others.len(), 1);
    }
}
