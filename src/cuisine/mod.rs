//! Cuisine classification
//!
//! Keyword voting over the bag-of-words form of a review. Each cuisine
//! collects the word counts of its matched keywords, so "pad thai" weighs
//! more than "basil". A review that names exactly one cuisine outright
//! ("great Korean place") is classified by that mention alone.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::models::{CuisineMatch, CuisineResult, UNKNOWN_CUISINE};
use crate::text::{Normalizer, PhraseMatcher};

/// Minimum number of cuisines a configuration must declare
pub const MIN_CUISINES: usize = 8;

/// One cuisine and its keywords
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuisineEntry {
    /// Display label, also matched as an explicit mention
    pub label: String,

    /// Dish and ingredient keywords
    pub keywords: Vec<String>,

    /// Other explicit names ("kbbq")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl CuisineEntry {
    fn new(label: &str, keywords: &[&str], aliases: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Cuisine classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CuisineConfig {
    /// Scores below this are reported as "Unknown"
    pub min_score: f32,

    /// Shortcut for reviews naming exactly one cuisine
    pub explicit_mentions: bool,

    /// Cuisines in priority order (first declared wins ties)
    pub cuisines: Vec<CuisineEntry>,
}

impl Default for CuisineConfig {
    fn default() -> Self {
        Self {
            min_score: 0.3,
            explicit_mentions: true,
            cuisines: default_cuisines(),
        }
    }
}

impl CuisineConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Zero excluded: a review with no keyword hits scores 0 and must fall below it
        if !(self.min_score > 0.0 && self.min_score <= 1.0) {
            return Err(Error::invalid_config(
                "cuisine.min_score",
                "must be within (0, 1]",
            ));
        }
        if self.cuisines.len() < MIN_CUISINES {
            return Err(Error::invalid_config(
                "cuisine.cuisines",
                format!("at least {MIN_CUISINES} cuisines required, got {}", self.cuisines.len()),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.cuisines {
            let label = entry.label.trim().to_lowercase();
            if label.is_empty() || label == UNKNOWN_CUISINE.to_lowercase() {
                return Err(Error::invalid_config(
                    "cuisine.cuisines.label",
                    format!("invalid label '{}'", entry.label),
                ));
            }
            if !seen.insert(label) {
                return Err(Error::invalid_config(
                    "cuisine.cuisines.label",
                    format!("duplicate label '{}'", entry.label),
                ));
            }
            if entry.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(Error::invalid_config(
                    "cuisine.cuisines.keywords",
                    format!("'{}' has no keywords", entry.label),
                ));
            }
        }
        Ok(())
    }
}

/// Compiled keywords of one cuisine
#[derive(Debug, Clone)]
struct CompiledCuisine {
    label: String,
    keywords: PhraseMatcher,
    names: PhraseMatcher,
    /// Content form of a keyword to its word count in the configured form
    weights: HashMap<String, u32>,
}

/// Keyword-based cuisine classifier
#[derive(Debug, Clone)]
pub struct CuisineClassifier {
    cuisines: Vec<CompiledCuisine>,
    normalizer: Normalizer,
    min_score: f32,
    explicit_mentions: bool,
}

impl CuisineClassifier {
    /// Compile all keyword lists
    ///
    /// Keywords go through the same stopword removal as review text, so
    /// "mac and cheese" is matched as "mac cheese".
    pub fn new(config: &CuisineConfig, normalizer: Normalizer) -> Result<Self> {
        config.validate()?;

        let mut cuisines = Vec::with_capacity(config.cuisines.len());
        for entry in &config.cuisines {
            let mut weights = HashMap::new();
            let mut forms = Vec::new();
            for keyword in &entry.keywords {
                let form = normalizer.content_form(keyword);
                if form.is_empty() {
                    tracing::warn!(cuisine = %entry.label, keyword = %keyword, "Keyword is all stopwords, skipped");
                    continue;
                }
                let words = keyword.split_whitespace().count() as u32;
                weights.entry(form.clone()).or_insert(words);
                forms.push(form);
            }

            let names: Vec<String> = std::iter::once(&entry.label)
                .chain(entry.aliases.iter())
                .map(|name| normalizer.content_form(name))
                .filter(|form| !form.is_empty())
                .collect();

            cuisines.push(CompiledCuisine {
                label: entry.label.trim().to_string(),
                keywords: PhraseMatcher::new(&forms)?,
                names: PhraseMatcher::new(&names)?,
                weights,
            });
        }

        Ok(Self {
            cuisines,
            normalizer,
            min_score: config.min_score,
            explicit_mentions: config.explicit_mentions,
        })
    }

    /// Configured labels in priority order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cuisines.iter().map(|c| c.label.as_str())
    }

    /// Classify a review
    ///
    /// # Examples
    ///
    /// ```
    /// use forkast::cuisine::{CuisineClassifier, CuisineConfig};
    /// use forkast::text::Normalizer;
    ///
    /// let classifier = CuisineClassifier::new(&CuisineConfig::default(), Normalizer::default()).unwrap();
    /// assert_eq!(classifier.classify("The ramen and gyoza were perfect").label, "Japanese");
    /// assert_eq!(classifier.classify("").label, "Unknown");
    /// ```
    pub fn classify(&self, text: &str) -> CuisineResult {
        let content = self.normalizer.normalize(text).content_text();
        if content.is_empty() {
            return CuisineResult::unknown(0.0, Vec::new());
        }

        let matches = self.weigh(&content);

        if self.explicit_mentions {
            if let Some(label) = self.explicit_mention(&content) {
                return CuisineResult {
                    label,
                    score: 1.0,
                    method: "explicit_mention".to_string(),
                    matches,
                };
            }
        }

        let total: u32 = matches.iter().map(|m| m.weight).sum();
        let Some(best) = matches.first() else {
            return CuisineResult::unknown(0.0, matches);
        };

        let score = (best.weight as f32 / total as f32).clamp(0.0, 1.0);
        if score < self.min_score {
            return CuisineResult::unknown(score, matches);
        }

        CuisineResult {
            label: best.label.clone(),
            score,
            method: "keyword_matching".to_string(),
            matches,
        }
    }

    /// Weight of every cuisine with at least one matched keyword
    ///
    /// Sorted by weight descending, then declaration order.
    pub fn all_scores(&self, text: &str) -> Vec<CuisineMatch> {
        let content = self.normalizer.normalize(text).content_text();
        self.weigh(&content)
    }

    fn weigh(&self, content: &str) -> Vec<CuisineMatch> {
        let mut matches: Vec<CuisineMatch> = self
            .cuisines
            .iter()
            .filter_map(|cuisine| {
                let weight: u32 = cuisine
                    .keywords
                    .matched_phrases(content)
                    .into_iter()
                    .map(|phrase| cuisine.weights.get(phrase).copied().unwrap_or(1))
                    .sum();
                (weight > 0).then(|| CuisineMatch {
                    label: cuisine.label.clone(),
                    weight,
                })
            })
            .collect();

        // Stable sort keeps declaration order among equal weights
        matches.sort_by(|a, b| b.weight.cmp(&a.weight));
        matches
    }

    /// The single cuisine named outright, if exactly one is
    ///
    /// A name inside a longer keyword ("french" in "french fries") is not a
    /// mention of that cuisine.
    fn explicit_mention(&self, content: &str) -> Option<String> {
        let keyword_spans: Vec<(usize, usize)> = self
            .cuisines
            .iter()
            .flat_map(|c| c.keywords.find_all(content))
            .map(|m| (m.start, m.end))
            .collect();

        let mentioned: Vec<&CompiledCuisine> = self
            .cuisines
            .iter()
            .filter(|cuisine| {
                cuisine.names.find_all(content).iter().any(|name| {
                    !keyword_spans.iter().any(|&(start, end)| {
                        start <= name.start
                            && name.end <= end
                            && (end - start) > (name.end - name.start)
                    })
                })
            })
            .collect();

        match mentioned.as_slice() {
            [only] => Some(only.label.clone()),
            _ => None,
        }
    }
}

fn default_cuisines() -> Vec<CuisineEntry> {
    vec![
        CuisineEntry::new(
            "Italian",
            &[
                "pasta", "pizza", "spaghetti", "lasagna", "risotto", "gelato", "tiramisu",
                "parmigiana", "carbonara", "bruschetta", "gnocchi", "italian", "marinara",
                "alfredo", "mozzarella", "parmesan", "fettuccine", "ravioli",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Chinese",
            &[
                "noodle", "dumpling", "wonton", "fried rice", "chow mein", "kung pao",
                "sweet and sour", "dim sum", "chinese", "szechuan", "cantonese", "spring roll",
                "fortune cookie", "stir fry", "soy sauce", "peking duck", "hot pot",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Indian",
            &[
                "curry", "naan", "biryani", "tandoori", "masala", "samosa", "paneer", "tikka",
                "korma", "vindaloo", "dal", "indian", "chapati", "butter chicken", "roti", "chai",
                "dosa", "idli",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Mexican",
            &[
                "taco", "burrito", "quesadilla", "enchilada", "guacamole", "salsa", "nachos",
                "fajita", "chimichanga", "mexican", "tortilla", "jalapeño", "margarita",
                "cilantro", "tamale",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Japanese",
            &[
                "sushi", "sashimi", "ramen", "tempura", "teriyaki", "miso", "wasabi", "sake",
                "udon", "japanese", "hibachi", "edamame", "bento", "katsu", "soba",
                "california roll", "tonkatsu", "gyoza",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Korean",
            &[
                "korean", "bbq", "galbi", "bulgogi", "kimchi", "bibimbap", "korean bbq",
                "gochujang", "banchan", "soju", "kbbq", "korean fried chicken", "japchae",
                "tteokbokki",
            ],
            &["kbbq", "korean bbq"],
        ),
        CuisineEntry::new(
            "American",
            &[
                "burger", "fries", "french fries", "steak", "ribs", "sandwich", "hot dog",
                "mac and cheese", "fried chicken", "american", "coleslaw", "milkshake", "diner",
                "breakfast", "bacon", "eggs", "wings", "pulled pork",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Thai",
            &[
                "pad thai", "tom yum", "thai", "coconut", "lemongrass", "basil", "peanut sauce",
                "mango", "sticky rice", "green curry", "red curry", "papaya salad",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Mediterranean",
            &[
                "hummus", "falafel", "kebab", "gyro", "shawarma", "pita", "mediterranean", "greek",
                "olive", "feta", "tzatziki", "lamb", "baba ganoush", "tabbouleh",
            ],
            &["greek"],
        ),
        CuisineEntry::new(
            "Ethiopian",
            &[
                "ethiopian", "injera", "doro wat", "berbere", "kitfo", "habesha", "teff", "mesob",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Brazilian",
            &[
                "brazilian", "picanha", "fogo", "churrasco", "pao de queijo", "caipirinha",
                "feijoada", "brigadeiro",
            ],
            &[],
        ),
        CuisineEntry::new(
            "Vietnamese",
            &[
                "pho", "banh mi", "vietnamese", "spring rolls", "bun", "vermicelli", "fish sauce",
                "lemongrass",
            ],
            &[],
        ),
        CuisineEntry::new(
            "French",
            &[
                "french", "foie gras", "escargot", "croissant", "crepe", "ratatouille",
                "coq au vin", "bouillabaisse", "beef wellington",
            ],
            &[],
        ),
    ]
}
