//! Named entity recognition for reviews
//!
//! Two sources feed the recognizer:
//!
//! - an injected [`EntityTagger`] producing generic spans (person,
//!   organization, location, ...) that are mapped onto review categories
//! - dish and feature gazetteers matched directly in the text
//!
//! Overlapping candidates are resolved longest-first so every byte of the
//! review belongs to at most one entity.

pub mod tagger;

pub use tagger::HeuristicTagger;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{Entity, EntityCategory, EntityResult};
use crate::text::{tokenize, PhraseMatcher};

// ============================================================================
// Tagger capability
// ============================================================================

/// Generic entity labels produced by taggers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GenericLabel {
    Person,
    Organization,
    Location,
    Product,
    Food,
    Other,
}

/// A labeled byte range in the tagged text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedSpan {
    pub start: usize,
    pub end: usize,
    pub label: GenericLabel,
}

/// Span tagger plugged into the recognizer
///
/// Spans must be byte ranges on char boundaries of the input; the
/// recognizer discards any that are not.
pub trait EntityTagger: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Tag a text
    fn tag(&self, text: &str) -> Vec<TaggedSpan>;
}

// ============================================================================
// Configuration
// ============================================================================

/// Words that turn a "person" span into a dish
const FOOD_INDICATORS: &[&str] = &[
    "naan", "chicken", "curry", "biryani", "tikka", "paneer", "pizza", "pasta", "burger",
    "sushi", "taco", "rice", "bread", "salad", "soup", "fish", "beef", "pork", "lamb",
];

/// Adjectives taggers mistake for names
const FALSE_NAMES: &[&str] = &["rich", "fresh", "hot", "cold", "sweet", "spicy", "mild", "tender"];

/// Words that never form an entity on their own
const ENTITY_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "very", "good", "great", "best",
    "nice", "amazing",
];

const DEFAULT_DISHES: &[&str] = &[
    // Indian and Ethiopian
    "butter chicken", "chicken tikka", "tandoori chicken", "chicken curry", "paneer tikka",
    "palak paneer", "dal", "dal makhani", "biryani", "samosa", "naan", "garlic naan",
    "butter naan", "roti", "chapati", "paratha", "tikka masala", "korma", "vindaloo",
    "doro wat", "injera", "masala dosa", "idli", "vada", "pakora",
    // Italian
    "pizza", "margherita pizza", "pasta", "spaghetti", "lasagna", "fettuccine", "carbonara",
    "alfredo", "ravioli", "gnocchi", "tiramisu", "risotto", "bruschetta", "parmigiana",
    // American
    "burger", "cheeseburger", "impossible burger", "hot dog", "fries", "french fries", "wings",
    "buffalo wings", "ribs", "pulled pork", "mac and cheese", "eggs benedict", "avocado toast",
    "milkshake",
    // Japanese
    "sushi", "sashimi", "ramen", "tempura", "teriyaki", "tonkatsu", "udon", "soba",
    "california roll", "miso soup", "edamame",
    // Mexican
    "taco", "fish taco", "burrito", "quesadilla", "enchilada", "guacamole", "nachos", "fajita",
    "tamale", "churro",
    // Chinese
    "dumpling", "fried rice", "chow mein", "dim sum", "wonton", "kung pao chicken",
    "sweet and sour", "peking duck", "spring roll",
    // Korean
    "galbi", "bulgogi", "kimchi", "bibimbap", "japchae", "tteokbokki",
    // Thai
    "pad thai", "tom yum", "green curry", "red curry", "papaya salad",
    // Others
    "pho", "banh mi", "steak", "filet mignon", "salad", "caesar salad", "quinoa salad", "soup",
    "sandwich", "lobster", "crab", "shrimp", "cheesecake", "foie gras", "beef wellington",
    "pani puri", "vada pav", "falafel", "hummus", "shawarma", "gyro", "kebab",
];

const DEFAULT_FEATURES: &[&str] = &[
    "patio", "outdoor seating", "live music", "rooftop", "terrace", "happy hour", "free wifi",
    "wifi", "parking", "valet parking", "private room", "takeout", "delivery", "reservations",
    "drive-thru", "kids menu", "brunch", "buffet", "full bar", "ocean view", "fireplace",
    "dance floor", "wheelchair accessible", "dog friendly", "pet friendly", "vegan options",
    "vegetarian options", "gluten free",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Entity recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntityConfig {
    /// Maximum entities kept per category
    pub max_per_category: usize,

    /// Entities with at most this many characters are dropped
    pub max_dropped_length: usize,

    /// Dish gazetteer
    pub dishes: Vec<String>,

    /// Restaurant feature gazetteer
    pub features: Vec<String>,

    /// Flat `category<TAB>phrase` file extending the gazetteers
    pub gazetteer_path: Option<PathBuf>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            max_per_category: 10,
            max_dropped_length: 2,
            dishes: owned(DEFAULT_DISHES),
            features: owned(DEFAULT_FEATURES),
            gazetteer_path: None,
        }
    }
}

impl EntityConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_per_category == 0 {
            return Err(Error::invalid_config(
                "entities.max_per_category",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Entries read from a gazetteer file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gazetteer {
    pub dishes: Vec<String>,
    pub features: Vec<String>,
    pub locations: Vec<String>,
}

impl Gazetteer {
    /// Load a `category<TAB>phrase` file
    ///
    /// Categories are `dish`, `feature` and `location`. Blank lines and
    /// `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ResourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let gazetteer = Self::parse(&content, path)?;

        tracing::debug!(
            path = %path.display(),
            dishes = gazetteer.dishes.len(),
            features = gazetteer.features.len(),
            locations = gazetteer.locations.len(),
            "Loaded gazetteer"
        );
        Ok(gazetteer)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut gazetteer = Self::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((category, phrase)) = line.split_once('\t') else {
                return Err(Error::invalid_resource(path, index + 1, "expected category<TAB>phrase"));
            };
            let phrase = phrase.trim().to_string();
            if phrase.is_empty() {
                return Err(Error::invalid_resource(path, index + 1, "empty phrase"));
            }

            match category.trim().to_lowercase().as_str() {
                "dish" => gazetteer.dishes.push(phrase),
                "feature" => gazetteer.features.push(phrase),
                "location" => gazetteer.locations.push(phrase),
                other => {
                    return Err(Error::invalid_resource(
                        path,
                        index + 1,
                        format!("unknown category '{other}'"),
                    ))
                }
            }
        }

        Ok(gazetteer)
    }
}

// ============================================================================
// Recognizer
// ============================================================================

/// Review entity recognizer
#[derive(Clone)]
pub struct EntityRecognizer {
    tagger: Arc<dyn EntityTagger>,
    dishes: PhraseMatcher,
    features: PhraseMatcher,
    max_per_category: usize,
    max_dropped_length: usize,
}

impl std::fmt::Debug for EntityRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRecognizer")
            .field("tagger", &self.tagger.name())
            .field("dishes", &self.dishes.len())
            .field("features", &self.features.len())
            .field("max_per_category", &self.max_per_category)
            .finish()
    }
}

impl EntityRecognizer {
    /// Build a recognizer with the heuristic tagger
    ///
    /// Location entries of the gazetteer file extend the tagger's cities.
    pub fn new(config: &EntityConfig) -> Result<Self> {
        let gazetteer = match &config.gazetteer_path {
            Some(path) => Gazetteer::load(path)?,
            None => Gazetteer::default(),
        };

        let tagger = HeuristicTagger::new(
            tagger::DEFAULT_CITIES
                .iter()
                .map(|c| c.to_string())
                .chain(gazetteer.locations.iter().cloned()),
        );
        tracing::debug!(cities = tagger.city_count(), "Heuristic tagger ready");

        Self::build(config, Arc::new(tagger), &gazetteer)
    }

    /// Build a recognizer around any tagger
    pub fn with_tagger(config: &EntityConfig, tagger: Arc<dyn EntityTagger>) -> Result<Self> {
        let gazetteer = match &config.gazetteer_path {
            Some(path) => Gazetteer::load(path)?,
            None => Gazetteer::default(),
        };
        Self::build(config, tagger, &gazetteer)
    }

    fn build(
        config: &EntityConfig,
        tagger: Arc<dyn EntityTagger>,
        gazetteer: &Gazetteer,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            tagger,
            dishes: PhraseMatcher::new(config.dishes.iter().chain(&gazetteer.dishes))?,
            features: PhraseMatcher::new(config.features.iter().chain(&gazetteer.features))?,
            max_per_category: config.max_per_category,
            max_dropped_length: config.max_dropped_length,
        })
    }

    /// Extract non-overlapping entities ordered by start offset
    pub fn recognize(&self, text: &str) -> EntityResult {
        if text.trim().is_empty() {
            return EntityResult::default();
        }

        let mut candidates: Vec<Entity> = Vec::new();

        for span in self.tagger.tag(text) {
            if span.start >= span.end
                || span.end > text.len()
                || !text.is_char_boundary(span.start)
                || !text.is_char_boundary(span.end)
            {
                tracing::debug!(tagger = self.tagger.name(), ?span, "Discarding invalid span");
                continue;
            }
            let surface = &text[span.start..span.end];
            if let Some(category) = map_label(span.label, surface) {
                candidates.push(entity(text, span.start, span.end, category));
            }
        }

        for (matcher, category) in [
            (&self.dishes, EntityCategory::Dish),
            (&self.features, EntityCategory::Feature),
        ] {
            for m in matcher.find_all(text) {
                candidates.push(entity(text, m.start, m.end, category));
            }
        }

        candidates.retain(|e| self.is_meaningful(e));

        let mut accepted = deduplicate(candidates);
        accepted.sort_by_key(|e| e.start);

        let mut per_category: HashMap<EntityCategory, usize> = HashMap::new();
        accepted.retain(|e| {
            let count = per_category.entry(e.category).or_insert(0);
            *count += 1;
            *count <= self.max_per_category
        });

        EntityResult { entities: accepted }
    }

    fn is_meaningful(&self, entity: &Entity) -> bool {
        if entity.text.chars().count() <= self.max_dropped_length {
            return false;
        }
        let tokens = tokenize(&entity.text);
        !tokens.is_empty()
            && !tokens
                .iter()
                .all(|t| ENTITY_STOPWORDS.contains(&t.as_str()))
    }
}

fn entity(text: &str, start: usize, end: usize, category: EntityCategory) -> Entity {
    Entity {
        text: text[start..end].to_string(),
        category,
        start,
        end,
    }
}

/// Map a generic tagger label onto a review category
///
/// A named restaurant is a venue, so organizations map to locations.
pub fn map_label(label: GenericLabel, surface: &str) -> Option<EntityCategory> {
    match label {
        GenericLabel::Person => {
            let tokens = tokenize(surface);
            if tokens.iter().any(|t| FOOD_INDICATORS.contains(&t.as_str())) {
                Some(EntityCategory::Dish)
            } else if FALSE_NAMES.contains(&surface.trim().to_lowercase().as_str()) {
                None
            } else {
                Some(EntityCategory::Person)
            }
        }
        GenericLabel::Organization | GenericLabel::Location => Some(EntityCategory::Location),
        GenericLabel::Product | GenericLabel::Food => Some(EntityCategory::Dish),
        GenericLabel::Other => None,
    }
}

fn category_priority(category: EntityCategory) -> u8 {
    match category {
        EntityCategory::Dish => 0,
        EntityCategory::Feature => 1,
        EntityCategory::Location => 2,
        EntityCategory::Person => 3,
    }
}

/// Keep the longest candidates, dropping any that overlap an accepted one
fn deduplicate(mut candidates: Vec<Entity>) -> Vec<Entity> {
    candidates.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then(category_priority(a.category).cmp(&category_priority(b.category)))
            .then(a.start.cmp(&b.start))
    });

    let mut accepted: Vec<Entity> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !accepted.iter().any(|e| e.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FixedTagger(Vec<TaggedSpan>);

    impl EntityTagger for FixedTagger {
        fn name(&self) -> &str {
            "fixed"
        }

        fn tag(&self, _text: &str) -> Vec<TaggedSpan> {
            self.0.clone()
        }
    }

    fn recognizer() -> EntityRecognizer {
        EntityRecognizer::new(&EntityConfig::default()).unwrap()
    }

    fn pairs(result: &EntityResult) -> Vec<(&str, EntityCategory)> {
        result
            .entities
            .iter()
            .map(|e| (e.text.as_str(), e.category))
            .collect()
    }

    #[test]
    fn test_dish_and_restaurant() {
        let result = recognizer().recognize("I loved the Pad Thai at Golden Spoon");
        assert_eq!(
            pairs(&result),
            vec![
                ("Pad Thai", EntityCategory::Dish),
                ("Golden Spoon", EntityCategory::Location),
            ]
        );
    }

    #[test]
    fn test_lowercase_dish() {
        let result = recognizer()
            .recognize("The pasta was delicious but the service was slow and the wait was too long");
        assert_eq!(pairs(&result), vec![("pasta", EntityCategory::Dish)]);
    }

    #[test]
    fn test_longest_span_wins() {
        let text = "The Chicken Alfredo and Caesar Salad were delicious";
        let result = recognizer().recognize(text);
        assert_eq!(
            pairs(&result),
            vec![
                ("Chicken Alfredo", EntityCategory::Dish),
                ("Caesar Salad", EntityCategory::Dish),
            ]
        );
    }

    #[test]
    fn test_features() {
        let result = recognizer().recognize("Sat on the patio; there was live music all night");
        assert_eq!(
            pairs(&result),
            vec![
                ("patio", EntityCategory::Feature),
                ("live music", EntityCategory::Feature),
            ]
        );
    }

    #[test]
    fn test_person_mapping() {
        assert_eq!(
            map_label(GenericLabel::Person, "Butter Chicken"),
            Some(EntityCategory::Dish)
        );
        assert_eq!(map_label(GenericLabel::Person, "Fresh"), None);
        assert_eq!(map_label(GenericLabel::Person, "John"), Some(EntityCategory::Person));
        assert_eq!(
            map_label(GenericLabel::Organization, "Golden Spoon"),
            Some(EntityCategory::Location)
        );
        assert_eq!(map_label(GenericLabel::Product, "Coke"), Some(EntityCategory::Dish));
        assert_eq!(map_label(GenericLabel::Other, "Tuesday"), None);
    }

    #[test]
    fn test_tie_prefers_dish() {
        // Same span from the tagger (location) and the dish gazetteer
        let tagger = FixedTagger(vec![TaggedSpan {
            start: 4,
            end: 9,
            label: GenericLabel::Location,
        }]);
        let recognizer =
            EntityRecognizer::with_tagger(&EntityConfig::default(), Arc::new(tagger)).unwrap();
        let result = recognizer.recognize("Our sushi rocked");
        assert_eq!(pairs(&result), vec![("sushi", EntityCategory::Dish)]);
    }

    #[test]
    fn test_invalid_spans_discarded() {
        let text = "Café crème";
        let tagger = FixedTagger(vec![
            TaggedSpan { start: 0, end: 4, label: GenericLabel::Person },
            TaggedSpan { start: 3, end: 40, label: GenericLabel::Person },
            TaggedSpan { start: 5, end: 5, label: GenericLabel::Person },
        ]);
        let recognizer =
            EntityRecognizer::with_tagger(&EntityConfig::default(), Arc::new(tagger)).unwrap();
        assert!(recognizer.recognize(text).is_empty());
    }

    #[test]
    fn test_short_and_stopword_entities_dropped() {
        let tagger = FixedTagger(vec![
            TaggedSpan { start: 0, end: 2, label: GenericLabel::Person },
            TaggedSpan { start: 3, end: 8, label: GenericLabel::Location },
        ]);
        let recognizer =
            EntityRecognizer::with_tagger(&EntityConfig::default(), Arc::new(tagger)).unwrap();
        assert!(recognizer.recognize("Jo Great food").is_empty());
    }

    #[test]
    fn test_max_per_category() {
        let config = EntityConfig {
            max_per_category: 2,
            ..Default::default()
        };
        let recognizer = EntityRecognizer::new(&config).unwrap();
        let result = recognizer.recognize("We had pizza, ramen, tacos and pho");
        assert_eq!(
            pairs(&result),
            vec![("pizza", EntityCategory::Dish), ("ramen", EntityCategory::Dish)]
        );
    }

    #[test]
    fn test_gazetteer_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# local specials").unwrap();
        writeln!(file, "dish\tpoutine").unwrap();
        writeln!(file, "feature\tkaraoke").unwrap();
        writeln!(file, "location\tSpringfield").unwrap();

        let config = EntityConfig {
            gazetteer_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let recognizer = EntityRecognizer::new(&config).unwrap();
        let result = recognizer.recognize("Poutine and karaoke night in Springfield");
        assert_eq!(
            pairs(&result),
            vec![
                ("Poutine", EntityCategory::Dish),
                ("karaoke", EntityCategory::Feature),
                ("Springfield", EntityCategory::Location),
            ]
        );
    }

    #[test]
    fn test_gazetteer_errors() {
        let err = Gazetteer::parse("dish poutine", Path::new("g.tsv")).unwrap_err();
        assert!(matches!(err, Error::InvalidResource { line: 1, .. }));

        let err = Gazetteer::parse("drink\tlassi", Path::new("g.tsv")).unwrap_err();
        assert!(err.to_string().contains("unknown category"));

        let err = Gazetteer::load(Path::new("/nonexistent/gazetteer.tsv")).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound { .. }));
    }

    #[test]
    fn test_empty_text() {
        assert!(recognizer().recognize("").is_empty());
        assert!(recognizer().recognize("   ").is_empty());
    }

    #[test]
    fn test_spans_index_text() {
        let text = "Visited Sakura Sushi in Brooklyn, tried the spicy tuna roll and miso soup";
        let result = recognizer().recognize(text);
        assert!(!result.is_empty());
        for e in &result.entities {
            assert_eq!(&text[e.start..e.end], e.text);
        }
        for pair in result.entities.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }
}
