use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Materials,
    Crafts,
    Techniques,
    Artisans,
}

impl Domain {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Crafts => "crafts",
            Self::Techniques => "techniques",
            Self::Artisans => "artisans",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Self::Materials => "Material",
            Self::Crafts => "Craft",
            Self::Techniques => "Technique",
            Self::Artisans => "Artisan",
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Materials => "Materials",
            Self::Crafts => "Crafts",
            Self::Techniques => "Techniques",
            Self::Artisans => "Artisans",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown domain: {0}")]
pub struct DomainParseError(pub String);

impl FromStr for Domain {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "materials" | "material" => Ok(Self::Materials),
            "crafts" | "craft" => Ok(Self::Crafts),
            "techniques" | "technique" => Ok(Self::Techniques),
            "artisans" | "artisan" => Ok(Self::Artisans),
            _ => Err(DomainParseError(s.to_string())),
        }
    }
}

/// One material, craft, technique, or artisan as returned by the remote API.
///
/// The API serves ids as either integers or numeric strings and attaches
/// different optional fields per domain; anything it sends beyond the known
/// fields is kept in `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainItem {
    #[serde(deserialize_with = "de_flexible_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_needed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Set only on items synthesized from a bare id the catalog could not
    /// resolve. Never set on real API data.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DomainItem {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            category: None,
            sustainability_rating: None,
            difficulty: None,
            time_estimate: None,
            time_required: None,
            tools_needed: None,
            location: None,
            placeholder: false,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Stand-in for an id the catalog could not resolve, e.g. "Technique 42".
    pub fn synthesized(domain: Domain, id: u64) -> Self {
        let mut item = Self::new(id, format!("{} {id}", domain.singular()));
        item.placeholder = true;
        item
    }

    /// Item description with markup tags removed, for plain-text display.
    pub fn plain_description(&self) -> String {
        let mut out = String::with_capacity(self.description.len());
        let mut in_tag = false;
        for c in self.description.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// A catalog item endorsed for the user's project, carrying why and how
/// strongly. Only present in the `recommended` bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedItem {
    #[serde(flatten)]
    pub item: DomainItem,
    pub reason: String,
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl AnnotatedItem {
    pub fn new(item: DomainItem, reason: impl Into<String>, priority: u32) -> Self {
        Self {
            item,
            reason: reason.into(),
            priority,
            relevance_score: None,
        }
    }

    pub fn with_relevance(mut self, score: f64) -> Self {
        self.relevance_score = Some(score);
        self
    }
}

/// Which rung of the fallback ladder produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    AiAssisted,
    KeywordAnalysis,
    Compatibility,
    CatalogFallback,
}

impl Display for ResolutionTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::AiAssisted => "ai_assisted",
            Self::KeywordAnalysis => "keyword_analysis",
            Self::Compatibility => "compatibility",
            Self::CatalogFallback => "catalog_fallback",
        };
        write!(f, "{display}")
    }
}

/// The per-domain output contract. `recommended` and `others` partition the
/// fetched collection; both are empty only when the fetch itself failed, in
/// which case `error` carries the cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartResult {
    pub domain: Domain,
    pub tier: ResolutionTier,
    pub recommended: Vec<AnnotatedItem>,
    pub others: Vec<DomainItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_message: Option<String>,
    pub ai_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl SmartResult {
    pub fn new(domain: Domain, tier: ResolutionTier) -> Self {
        Self {
            domain,
            tier,
            recommended: Vec::new(),
            others: Vec::new(),
            project_category: None,
            confidence: None,
            context_message: None,
            ai_message: String::new(),
            error: None,
            generated_at: Utc::now(),
        }
    }

    /// Empty-but-valid result for when even the base fetch failed.
    pub fn failed(domain: Domain, error: impl Into<String>) -> Self {
        let error = error.into();
        let mut result = Self::new(domain, ResolutionTier::CatalogFallback);
        result.ai_message = format!("Could not load {}: {error}", domain.as_slug());
        result.error = Some(error);
        result
    }

    pub fn with_recommended(mut self, recommended: Vec<AnnotatedItem>) -> Self {
        self.recommended = recommended;
        self
    }

    pub fn with_others(mut self, others: Vec<DomainItem>) -> Self {
        self.others = others;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>, confidence: Option<f64>) -> Self {
        self.project_category = Some(category.into());
        self.confidence = confidence;
        self
    }

    pub fn with_context_message(mut self, message: impl Into<String>) -> Self {
        self.context_message = Some(message.into());
        self
    }

    pub fn with_ai_message(mut self, message: impl Into<String>) -> Self {
        self.ai_message = message.into();
        self
    }

    pub fn total_items(&self) -> usize {
        self.recommended.len() + self.others.len()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// The three catalog domains loaded together for one wizard screen. Domains
/// that failed still appear with empty buckets and their error flag set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardData {
    pub materials: SmartResult,
    pub crafts: SmartResult,
    pub techniques: SmartResult,
    pub failed_domains: Vec<Domain>,
    pub generated_at: DateTime<Utc>,
}

impl WizardData {
    pub fn new(materials: SmartResult, crafts: SmartResult, techniques: SmartResult) -> Self {
        let failed_domains = [&materials, &crafts, &techniques]
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.domain)
            .collect();
        Self {
            materials,
            crafts,
            techniques,
            failed_domains,
            generated_at: Utc::now(),
        }
    }
}

pub(crate) fn de_flexible_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric id: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_domain_slugs_and_singulars() {
        use std::str::FromStr;
        assert_eq!(Domain::from_str("materials").unwrap(), Domain::Materials);
        assert_eq!(Domain::from_str("Craft").unwrap(), Domain::Crafts);
        assert!(Domain::from_str("gemstones").is_err());
    }

    #[test]
    fn decodes_numeric_and_string_ids() {
        let from_number: DomainItem =
            serde_json::from_value(serde_json::json!({"id": 7, "name": "Organic Cotton"}))
                .expect("numeric id");
        let from_text: DomainItem =
            serde_json::from_value(serde_json::json!({"id": "7", "name": "Organic Cotton"}))
                .expect("string id");
        assert_eq!(from_number.id, 7);
        assert_eq!(from_text.id, 7);
    }

    #[test]
    fn keeps_unknown_fields_in_extra() {
        let item: DomainItem = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Bamboo",
            "origin_region": "Assam"
        }))
        .expect("item with extra field");
        assert_eq!(
            item.extra.get("origin_region").and_then(|v| v.as_str()),
            Some("Assam")
        );
    }

    #[test]
    fn strips_markup_from_description() {
        let item =
            DomainItem::new(1, "Linen").with_description("<p>Cool,  <b>crisp</b> weave</p>");
        assert_eq!(item.plain_description(), "Cool, crisp weave");
    }

    #[test]
    fn synthesized_items_are_flagged() {
        let item = DomainItem::synthesized(Domain::Techniques, 42);
        assert!(item.placeholder);
        assert_eq!(item.name, "Technique 42");
    }

    #[test]
    fn failed_result_has_empty_buckets_and_error() {
        let result = SmartResult::failed(Domain::Materials, "connection refused");
        assert_eq!(result.total_items(), 0);
        assert!(result.is_failure());
        assert!(result.ai_message.contains("materials"));
    }
}
