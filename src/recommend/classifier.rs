use crate::recommend::{KeywordTable, ProjectRecommendations};

/// Minimum description length, after trimming, worth analyzing.
const MIN_DESCRIPTION_CHARS: usize = 2;

/// Matches a free-text project description against the keyword table.
///
/// First match wins: profiles are scanned in table order and each profile's
/// keywords in declaration order; there is no scoring across candidates.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: KeywordTable,
}

impl Classifier {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    pub fn with_builtin_table() -> Self {
        Self::new(KeywordTable::builtin())
    }

    /// Pure and total: every string input yields a bundle or `None`.
    pub fn classify(&self, description: &str) -> Option<&ProjectRecommendations> {
        let trimmed = description.trim();
        if trimmed.chars().count() < MIN_DESCRIPTION_CHARS {
            return None;
        }
        let lowered = trimmed.to_lowercase();
        for profile in self.table.profiles() {
            for keyword in &profile.keywords {
                if lowered.contains(keyword.as_str()) {
                    return Some(&profile.recommendations);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::Classifier;
    use crate::recommend::{KeywordTable, ProjectProfile, ProjectRecommendations, RecommendationEntry};

    fn classifier() -> Classifier {
        Classifier::with_builtin_table()
    }

    #[test]
    fn matches_bedsheet_description() {
        let c = classifier();
        let bundle = c
            .classify("I want a cotton bedsheet with block printing")
            .expect("bedsheet keyword should match");
        assert_eq!(bundle.project_type, "Bedsheet");
        assert_eq!(bundle.materials[0].reason, "Breathable, soft for sleep");
        assert_eq!(bundle.materials[0].priority, 1);
    }

    #[test]
    fn is_case_insensitive() {
        let c = classifier();
        let bundle = c
            .classify("A BANARASI SAREE for the wedding")
            .expect("saree keyword should match");
        assert_eq!(bundle.project_type, "Saree");
    }

    #[test]
    fn returns_none_on_short_input() {
        assert!(classifier().classify("a").is_none());
        assert!(classifier().classify("").is_none());
        assert!(classifier().classify("   x   ").is_none());
    }

    #[test]
    fn returns_none_when_nothing_matches() {
        assert!(classifier().classify("xyz nonsense qqq").is_none());
    }

    #[test]
    fn is_deterministic() {
        let c = classifier();
        let first = c.classify("a silk saree").map(|b| b.project_type.clone());
        let second = c.classify("a silk saree").map(|b| b.project_type.clone());
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn first_profile_wins_on_overlapping_keywords() {
        let make = |project_type: &str, keyword: &str| ProjectProfile {
            keywords: vec![keyword.to_string()],
            recommendations: ProjectRecommendations {
                project_type: project_type.to_string(),
                context_message: String::new(),
                materials: vec![RecommendationEntry::new("cotton", "soft", 1)],
                crafts: Vec::new(),
                techniques: Vec::new(),
            },
        };
        let classifier = Classifier::new(KeywordTable::new(vec![
            make("First", "weave"),
            make("Second", "weave"),
        ]));
        let bundle = classifier.classify("a weave project").expect("should match");
        assert_eq!(bundle.project_type, "First");
    }

    #[test]
    fn builtin_bed_and_table_descriptions_pick_distinct_types() {
        let c = classifier();
        let bed = c.classify("plain bedding set").expect("bedding");
        let table = c.classify("a festive table runner").expect("runner");
        assert_eq!(bed.project_type, "Bedsheet");
        assert_eq!(table.project_type, "Table Linen");
    }
}
