//! Aspect-based sentiment
//!
//! Reviews usually judge several things at once ("great food, rude
//! staff"). The detector attributes each clause to the aspects whose
//! keywords it mentions and scores every aspect from its own clauses.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Aspect, AspectResult, AspectSentiment};
use crate::sentiment::SentimentScorer;
use crate::text::{split_clauses, split_sentences, PhraseMatcher};

const FOOD_KEYWORDS: &[&str] = &[
    "food", "dish", "meal", "taste", "flavor", "flavour", "delicious", "tasty", "menu",
    "cuisine", "recipe", "ingredient", "fresh", "quality", "burger", "pizza", "pasta", "salad",
    "dessert", "appetizer", "entree", "chicken", "beef", "fish", "vegetable", "spicy", "sweet",
    "bland", "flavorless", "stale", "cold", "overcooked", "undercooked", "juicy", "tender",
    "crispy", "soggy", "burnt", "raw",
];

const SERVICE_KEYWORDS: &[&str] = &[
    "service", "staff", "waiter", "waitress", "server", "manager", "friendly", "rude",
    "attentive", "slow", "fast", "professional", "helpful", "employee", "personnel", "team",
    "wait", "waiting", "waited", "serve", "served", "ignored", "forgot", "efficient",
    "courteous", "polite", "impolite",
];

const AMBIANCE_KEYWORDS: &[&str] = &[
    "ambiance", "ambience", "atmosphere", "decor", "environment", "vibe", "mood", "cozy",
    "romantic", "loud", "noisy", "quiet", "clean", "dirty", "lighting", "music", "seating",
    "interior", "decoration", "place", "setting", "spacious", "cramped", "elegant", "tacky",
    "modern", "outdated",
];

const PRICE_KEYWORDS: &[&str] = &[
    "price", "expensive", "cheap", "affordable", "value", "cost", "worth", "overpriced",
    "reasonable", "budget", "money", "bill", "pricey", "inexpensive", "deal", "discount",
    "waste",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Keyword lists per aspect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AspectConfig {
    pub food: Vec<String>,
    pub service: Vec<String>,
    pub ambiance: Vec<String>,
    pub price: Vec<String>,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            food: owned(FOOD_KEYWORDS),
            service: owned(SERVICE_KEYWORDS),
            ambiance: owned(AMBIANCE_KEYWORDS),
            price: owned(PRICE_KEYWORDS),
        }
    }
}

impl AspectConfig {
    /// Keywords configured for one aspect
    pub fn keywords(&self, aspect: Aspect) -> &[String] {
        match aspect {
            Aspect::Food => &self.food,
            Aspect::Service => &self.service,
            Aspect::Ambiance => &self.ambiance,
            Aspect::Price => &self.price,
        }
    }

    /// Every aspect needs at least one keyword
    pub fn validate(&self) -> Result<()> {
        for aspect in Aspect::all() {
            if self.keywords(aspect).iter().all(|k| k.trim().is_empty()) {
                return Err(Error::invalid_config(
                    format!("aspects.{aspect}"),
                    "keyword list must not be empty",
                ));
            }
        }
        Ok(())
    }
}

/// Clause-level aspect detector
#[derive(Debug, Clone)]
pub struct AspectDetector {
    matchers: Vec<(Aspect, PhraseMatcher)>,
    scorer: SentimentScorer,
}

impl AspectDetector {
    /// Compile keyword lists; polarity comes from the given scorer
    pub fn new(config: &AspectConfig, scorer: SentimentScorer) -> Result<Self> {
        config.validate()?;

        let matchers = Aspect::all()
            .into_iter()
            .map(|aspect| Ok((aspect, PhraseMatcher::new(config.keywords(aspect))?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { matchers, scorer })
    }

    /// Detect mentioned aspects and their local sentiment
    ///
    /// The result always holds the four aspects; those without a matching
    /// clause are "not mentioned".
    pub fn detect(&self, text: &str) -> AspectResult {
        let mut result = AspectResult::not_mentioned();
        let clauses: Vec<String> = split_sentences(text)
            .iter()
            .flat_map(|sentence| split_clauses(sentence))
            .collect();

        for (aspect, matcher) in &self.matchers {
            let mut entry = AspectSentiment::not_mentioned();
            let mut polarities = Vec::new();

            for clause in &clauses {
                let phrases = matcher.matched_phrases(clause);
                if phrases.is_empty() {
                    continue;
                }

                for phrase in phrases {
                    if !entry.matched_phrases.iter().any(|p| p == phrase) {
                        entry.matched_phrases.push(phrase.to_string());
                    }
                }
                polarities.push(self.scorer.polarity(clause));
                entry.sentences.push(clause.clone());
            }

            if !polarities.is_empty() {
                let mean = polarities.iter().sum::<f32>() / polarities.len() as f32;
                entry.mentioned = true;
                entry.sentiment = Some(self.scorer.score_polarity(mean));
            }

            result.set(*aspect, entry);
        }

        tracing::trace!(
            clauses = clauses.len(),
            mentioned = result.summary().len(),
            "Detected aspects"
        );
        result
    }
}
