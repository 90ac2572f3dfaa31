//! Core data structures for review analysis
//!
//! Every analysis component produces one of the result types defined here;
//! [`AnalysisReport`] aggregates them for a single [`Review`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Review
// ============================================================================

/// A restaurant review submitted for analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Review {
    /// Review text
    ///
    /// Raw as submitted; in an [`AnalysisReport`] it is the sanitized text
    /// that every entity offset refers to.
    pub text: String,

    /// Restaurant identifier (ignored by analysis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,

    /// Star rating, 1-5 (ignored by analysis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl Review {
    /// Create a review from text only
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Attach a restaurant identifier
    pub fn with_restaurant_id(mut self, id: impl Into<String>) -> Self {
        self.restaurant_id = Some(id.into());
        self
    }

    /// Attach a star rating
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sentiment implied by the star rating, if any
    ///
    /// 4 stars and up is positive, 3 is neutral, anything lower is negative.
    pub fn rating_sentiment(&self) -> Option<SentimentLabel> {
        self.rating.map(|rating| {
            if rating >= 4.0 {
                SentimentLabel::Positive
            } else if rating >= 3.0 {
                SentimentLabel::Neutral
            } else {
                SentimentLabel::Negative
            }
        })
    }
}

// ============================================================================
// Sentiment
// ============================================================================

/// Discrete sentiment bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels in display order
    pub fn all() -> [SentimentLabel; 3] {
        [Self::Positive, Self::Negative, Self::Neutral]
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Emoji shown next to the label in rendered reports
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Positive => "😊",
            Self::Negative => "😞",
            Self::Neutral => "😐",
        }
    }

    /// Parse a label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "pos" => Some(Self::Positive),
            "negative" | "neg" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity label with its confidence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentResult {
    /// Bucketed label
    pub label: SentimentLabel,

    /// Confidence (0.0 - 1.0), the magnitude of the polarity
    pub score: f32,

    /// Raw polarity before bucketing (-1.0 - 1.0)
    pub polarity: f32,

    /// Name of the polarity model that produced the result
    pub method: String,
}

impl SentimentResult {
    /// Neutral result with zero confidence
    pub fn neutral(method: impl Into<String>) -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
            polarity: 0.0,
            method: method.into(),
        }
    }
}

// ============================================================================
// Aspects
// ============================================================================

/// Fixed category of restaurant experience
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Food,
    Service,
    Ambiance,
    Price,
}

impl Aspect {
    /// All aspects in display order
    pub fn all() -> [Aspect; 4] {
        [Self::Food, Self::Service, Self::Ambiance, Self::Price]
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Service => "service",
            Self::Ambiance => "ambiance",
            Self::Price => "price",
        }
    }

    /// Capitalized name for display
    pub fn title(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Service => "Service",
            Self::Ambiance => "Ambiance",
            Self::Price => "Price",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis of one aspect
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AspectSentiment {
    /// Whether any clause mentioned the aspect
    pub mentioned: bool,

    /// Local sentiment; `None` when not mentioned
    pub sentiment: Option<SentimentResult>,

    /// Keywords that matched, in first-seen order
    pub matched_phrases: Vec<String>,

    /// Clauses attributed to the aspect
    pub sentences: Vec<String>,
}

impl AspectSentiment {
    /// Aspect absent from the review
    pub fn not_mentioned() -> Self {
        Self::default()
    }

    /// Display label: the sentiment label or "not mentioned"
    pub fn display_label(&self) -> &'static str {
        match &self.sentiment {
            Some(result) => result.label.as_str(),
            None => "not mentioned",
        }
    }

    /// Emoji for the aspect table
    pub fn emoji(&self) -> &'static str {
        match self.sentiment.as_ref().map(|s| s.label) {
            Some(SentimentLabel::Positive) => "✅",
            Some(SentimentLabel::Negative) => "❌",
            Some(SentimentLabel::Neutral) => "➖",
            None => "⚪",
        }
    }
}

/// Per-aspect analysis, always holding exactly the four aspects
///
/// Deserializing a map that lacks some aspects fills them in as "not
/// mentioned".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    from = "BTreeMap<Aspect, AspectSentiment>",
    into = "BTreeMap<Aspect, AspectSentiment>"
)]
pub struct AspectResult {
    entries: BTreeMap<Aspect, AspectSentiment>,
}

impl From<BTreeMap<Aspect, AspectSentiment>> for AspectResult {
    fn from(entries: BTreeMap<Aspect, AspectSentiment>) -> Self {
        let mut result = Self::default();
        result.entries.extend(entries);
        result
    }
}

impl From<AspectResult> for BTreeMap<Aspect, AspectSentiment> {
    fn from(result: AspectResult) -> Self {
        result.entries
    }
}

impl Default for AspectResult {
    fn default() -> Self {
        Self {
            entries: Aspect::all()
                .into_iter()
                .map(|aspect| (aspect, AspectSentiment::not_mentioned()))
                .collect(),
        }
    }
}

impl AspectResult {
    /// Result with every aspect marked "not mentioned"
    pub fn not_mentioned() -> Self {
        Self::default()
    }

    /// Replace the analysis of one aspect
    pub fn set(&mut self, aspect: Aspect, value: AspectSentiment) {
        self.entries.insert(aspect, value);
    }

    /// Analysis of one aspect
    pub fn get(&self, aspect: Aspect) -> &AspectSentiment {
        // Every key is inserted by `Default` and never removed.
        &self.entries[&aspect]
    }

    /// Iterate aspects in display order
    pub fn iter(&self) -> impl Iterator<Item = (Aspect, &AspectSentiment)> {
        self.entries.iter().map(|(aspect, value)| (*aspect, value))
    }

    /// Number of aspects (always 4)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mentioned aspects mapped to their labels
    pub fn summary(&self) -> BTreeMap<Aspect, SentimentLabel> {
        self.entries
            .iter()
            .filter_map(|(aspect, value)| value.sentiment.as_ref().map(|s| (*aspect, s.label)))
            .collect()
    }
}

// ============================================================================
// Cuisine
// ============================================================================

/// Label used when no cuisine matches well enough
pub const UNKNOWN_CUISINE: &str = "Unknown";

/// Weight accumulated by one cuisine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CuisineMatch {
    pub label: String,
    pub weight: u32,
}

/// Cuisine classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuisineResult {
    /// Cuisine label, or "Unknown"
    pub label: String,

    /// Normalized score (0.0 - 1.0)
    pub score: f32,

    /// How the label was decided
    pub method: String,

    /// Cuisines with a non-zero weight, strongest first
    pub matches: Vec<CuisineMatch>,
}

impl CuisineResult {
    /// Unknown cuisine with the given score
    pub fn unknown(score: f32, matches: Vec<CuisineMatch>) -> Self {
        Self {
            label: UNKNOWN_CUISINE.to_string(),
            score,
            method: "keyword_matching".to_string(),
            matches,
        }
    }

    /// Whether the classifier gave up
    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_CUISINE
    }

    /// Emoji for the cuisine label
    pub fn emoji(&self) -> &'static str {
        match self.label.as_str() {
            "Italian" => "🍝",
            "Chinese" => "🥡",
            "Indian" => "🍛",
            "Mexican" => "🌮",
            "Japanese" => "🍣",
            "Korean" => "🍖",
            "American" => "🍔",
            "Thai" => "🍜",
            "Mediterranean" => "🥙",
            "Ethiopian" => "🍲",
            "Brazilian" => "🥩",
            "Vietnamese" => "🥢",
            "French" => "🥖",
            _ => "🍽️",
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Domain category of an extracted entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Dish,
    Location,
    Person,
    Feature,
}

impl EntityCategory {
    /// All categories in display order
    pub fn all() -> [EntityCategory; 4] {
        [Self::Dish, Self::Location, Self::Person, Self::Feature]
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dish => "dish",
            Self::Location => "location",
            Self::Person => "person",
            Self::Feature => "feature",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity span in the review text
///
/// Offsets are byte offsets into the sanitized text carried by the report as
/// `report.review.text`, not into the raw submission: markup, URLs and
/// invisible characters removed by sanitization shift them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    /// Text as found in the sanitized review
    pub text: String,

    /// Domain category
    pub category: EntityCategory,

    /// Start byte offset in the sanitized review text
    pub start: usize,

    /// End byte offset (exclusive)
    pub end: usize,
}

impl Entity {
    /// Span length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Extracted entities ordered by start offset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct EntityResult {
    pub entities: Vec<Entity>,
}

impl EntityResult {
    /// Whether no entity was found
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Entities of one category
    pub fn by_category(&self, category: EntityCategory) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.category == category)
    }

    /// Entity count per category (categories with no entity are omitted)
    pub fn summary(&self) -> BTreeMap<EntityCategory, usize> {
        let mut counts = BTreeMap::new();
        for entity in &self.entities {
            *counts.entry(entity.category).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// Report
// ============================================================================

/// Surface statistics shown next to the analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewStats {
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub avg_word_length: f32,
}

/// Aggregate of all analysis results for one review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    /// The review with sanitized text; entity offsets index into it
    pub review: Review,
    pub sentiment: SentimentResult,
    pub aspects: AspectResult,
    pub cuisine: CuisineResult,
    pub entities: EntityResult,
    pub stats: ReviewStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_sentiment() {
        assert_eq!(
            Review::new("x").with_rating(5.0).rating_sentiment(),
            Some(SentimentLabel::Positive)
        );
        assert_eq!(
            Review::new("x").with_rating(3.0).rating_sentiment(),
            Some(SentimentLabel::Neutral)
        );
        assert_eq!(
            Review::new("x").with_rating(2.5).rating_sentiment(),
            Some(SentimentLabel::Negative)
        );
        assert_eq!(Review::new("x").rating_sentiment(), None);
    }

    #[test]
    fn test_aspect_result_has_four_keys() {
        let result = AspectResult::not_mentioned();
        assert_eq!(result.len(), 4);
        for aspect in Aspect::all() {
            assert!(!result.get(aspect).mentioned);
            assert_eq!(result.get(aspect).display_label(), "not mentioned");
        }
        assert!(result.summary().is_empty());
    }

    #[test]
    fn test_aspect_result_serializes_as_map() {
        let json = serde_json::to_value(AspectResult::not_mentioned()).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 4);
        assert!(map.contains_key("food"));
        assert!(map.contains_key("ambiance"));
        assert_eq!(map["price"]["mentioned"], false);
    }

    #[test]
    fn test_aspect_result_deserialize_fills_missing_aspects() {
        let empty: AspectResult = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, AspectResult::not_mentioned());

        let partial: AspectResult = serde_json::from_str(
            r#"{"food": {"mentioned": true, "matched_phrases": ["pasta"], "sentences": ["The pasta"]}}"#,
        )
        .unwrap();
        assert_eq!(partial.len(), 4);
        assert!(partial.get(Aspect::Food).mentioned);
        assert_eq!(partial.get(Aspect::Food).matched_phrases, vec!["pasta"]);
        assert!(!partial.get(Aspect::Price).mentioned);
        assert!(partial.get(Aspect::Service).sentiment.is_none());
    }

    #[test]
    fn test_sentiment_label_parse() {
        assert_eq!(SentimentLabel::parse("Positive"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse(" neg "), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }

    #[test]
    fn test_entity_overlap() {
        let a = Entity {
            text: "Pad Thai".into(),
            category: EntityCategory::Dish,
            start: 12,
            end: 20,
        };
        let b = Entity {
            text: "Thai".into(),
            category: EntityCategory::Location,
            start: 16,
            end: 20,
        };
        let c = Entity {
            text: "at".into(),
            category: EntityCategory::Feature,
            start: 21,
            end: 23,
        };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_entity_summary() {
        let result = EntityResult {
            entities: vec![
                Entity {
                    text: "pasta".into(),
                    category: EntityCategory::Dish,
                    start: 4,
                    end: 9,
                },
                Entity {
                    text: "pizza".into(),
                    category: EntityCategory::Dish,
                    start: 14,
                    end: 19,
                },
            ],
        };
        let summary = result.summary();
        assert_eq!(summary.get(&EntityCategory::Dish), Some(&2));
        assert_eq!(summary.get(&EntityCategory::Person), None);
    }

    #[test]
    fn test_unknown_cuisine() {
        let result = CuisineResult::unknown(0.0, vec![]);
        assert!(result.is_unknown());
        assert_eq!(result.emoji(), "🍽️");
    }
}
