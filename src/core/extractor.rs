use regex::{Captures, Regex};

use crate::core::rules::RuleChain;
use crate::models::{FilterSet, RelationshipType};

/// How a matched age pattern turns into bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgeRule {
    /// Two captured numbers are the inclusive bounds
    Range,
    /// One captured decade `d` means `d..=d + 9`
    Decade,
}

/// Parses structured constraints out of a raw query
///
/// Categories are independent; inside a category the first rule in table
/// order wins and the rest are not consulted.
#[derive(Debug, Clone)]
pub struct FilterExtractor {
    age: RuleChain<AgeRule>,
    location: Regex,
    relationship: RuleChain<RelationshipType>,
}

impl FilterExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let age = RuleChain::builder()
            .case_insensitive(true)
            .rule(r"([0-9]{2})\s*-\s*([0-9]{2})\s*years?\s*old", AgeRule::Range)
            .rule(r"between\s*([0-9]{2})\s*and\s*([0-9]{2})", AgeRule::Range)
            .rule(r"age\s*([0-9]{2})\s*to\s*([0-9]{2})", AgeRule::Range)
            // Only round decades standing alone: "30s", not "35s" or "1930s"
            .rule(r"\b([1-9]0)s\b", AgeRule::Decade)
            .build()?;

        // Case-sensitive: a place name starts with a capital
        let location = Regex::new(r"\b(?:in|from|near)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)")?;

        let relationship = RuleChain::builder()
            .case_insensitive(true)
            .whole_word(true)
            .rule(r"serious|long.?term|committed", RelationshipType::Serious)
            .rule(r"casual|fun|hookup|fling", RelationshipType::Casual)
            .build()?;

        Ok(Self {
            age,
            location,
            relationship,
        })
    }

    /// Extract a [`FilterSet`] from the raw (not enhanced) query
    pub fn extract(&self, query: &str) -> FilterSet {
        let mut filters = FilterSet::default();

        if let Some((caps, rule)) = self.age.first_match(query) {
            if let Some((min, max)) = age_bounds(&caps, *rule) {
                filters = filters.with_age_range(min, max);
            }
        }

        if let Some(caps) = self.location.captures(query) {
            filters.location = Some(caps[1].to_string());
        }

        if let Some((_, tag)) = self.relationship.first_match(query) {
            filters.relationship_type = Some(*tag);
        }

        tracing::info!("Extracted filters: {:?}", filters);
        filters
    }
}

fn age_bounds(caps: &Captures<'_>, rule: AgeRule) -> Option<(u32, u32)> {
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    match rule {
        AgeRule::Range => Some((number(1)?, number(2)?)),
        AgeRule::Decade => {
            let decade = number(1)?;
            Some((decade, decade + 9))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FilterExtractor {
        FilterExtractor::new().unwrap()
    }

    #[test]
    fn test_austin_scenario() {
        let filters = extractor()
            .extract("Looking for someone in Austin between 25 and 35 for a serious relationship");

        assert_eq!(
            filters,
            FilterSet {
                age_min: Some(25),
                age_max: Some(35),
                location: Some("Austin".to_string()),
                relationship_type: Some(RelationshipType::Serious),
            }
        );
    }

    #[test]
    fn test_decade_shorthand() {
        for decade in [20u32, 30, 40, 50, 60] {
            let filters = extractor().extract(&format!("someone in their {}s who cooks", decade));
            assert_eq!(filters.age_min, Some(decade));
            assert_eq!(filters.age_max, Some(decade + 9));
        }
    }

    #[test]
    fn test_explicit_range_beats_decade() {
        let filters = extractor().extract("25-34 years old, ideally in their 30s");
        assert_eq!(filters.age_min, Some(25));
        assert_eq!(filters.age_max, Some(34));
    }

    #[test]
    fn test_age_to_pattern() {
        let filters = extractor().extract("Age 40 to 50 please");
        assert_eq!(filters.age_min, Some(40));
        assert_eq!(filters.age_max, Some(50));
    }

    #[test]
    fn test_decade_needs_word_boundary() {
        let filters = extractor().extract("fan of 1980s music and 35s");
        assert_eq!(filters.age_min, None);
        assert_eq!(filters.age_max, None);
    }

    #[test]
    fn test_multi_word_location() {
        let filters = extractor().extract("an artist from New York who paints");
        assert_eq!(filters.location.as_deref(), Some("New York"));
    }

    #[test]
    fn test_lowercase_location_is_ignored() {
        let filters = extractor().extract("software engineers in their late twenties");
        assert_eq!(filters.location, None);
    }

    #[test]
    fn test_casual_only_when_no_serious_term() {
        let filters = extractor().extract("something fun, nothing serious");
        assert_eq!(filters.relationship_type, Some(RelationshipType::Serious));

        let filters = extractor().extract("just a fling");
        assert_eq!(filters.relationship_type, Some(RelationshipType::Casual));
    }

    #[test]
    fn test_nothing_extracted() {
        let filters = extractor().extract("someone kind who likes dogs");
        assert!(filters.is_empty());
    }
}
