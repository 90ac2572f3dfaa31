//! Review analysis pipeline
//!
//! [`ReviewAnalyzer`] owns one instance of every analysis component, built
//! once from [`Config`]. It is immutable afterwards and can be shared
//! across threads behind an `Arc`.

use std::sync::Arc;

use crate::aspect::AspectDetector;
use crate::config::Config;
use crate::cuisine::CuisineClassifier;
use crate::entity::{EntityRecognizer, EntityTagger};
use crate::error::Result;
use crate::models::{AnalysisReport, Review, ReviewStats};
use crate::sentiment::SentimentScorer;
use crate::text::sanitize::sanitize_text;
use crate::text::{split_sentences, tokenize, Normalizer};

/// Complete analysis pipeline
#[derive(Debug, Clone)]
pub struct ReviewAnalyzer {
    scorer: SentimentScorer,
    aspects: AspectDetector,
    cuisine: CuisineClassifier,
    entities: EntityRecognizer,
}

impl ReviewAnalyzer {
    /// Build every component from configuration
    ///
    /// Resource files (lexicon overrides, gazetteer) are loaded here; a
    /// missing or malformed file is returned as an error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let entities = EntityRecognizer::new(&config.entities)?;
        Self::assemble(config, entities)
    }

    /// Build the pipeline around a custom entity tagger
    pub fn with_tagger(config: &Config, tagger: Arc<dyn EntityTagger>) -> Result<Self> {
        let entities = EntityRecognizer::with_tagger(&config.entities, tagger)?;
        Self::assemble(config, entities)
    }

    fn assemble(config: &Config, entities: EntityRecognizer) -> Result<Self> {
        let scorer = SentimentScorer::new(&config.sentiment)?;
        let normalizer = Normalizer::new(&config.normalizer);

        let analyzer = Self {
            aspects: AspectDetector::new(&config.aspects, scorer.clone())?,
            cuisine: CuisineClassifier::new(&config.cuisine, normalizer)?,
            entities,
            scorer,
        };

        tracing::info!(
            sentiment = analyzer.scorer.method(),
            cuisines = analyzer.cuisine.labels().count(),
            "Review analyzer ready"
        );
        Ok(analyzer)
    }

    /// Analyze a review
    ///
    /// The text is sanitized first; the report carries the sanitized review
    /// and entity offsets index into `report.review.text`.
    pub fn analyze(&self, review: &Review) -> AnalysisReport {
        let text = sanitize_text(&review.text);
        let span = tracing::debug_span!("analyze", chars = text.chars().count());
        let _enter = span.enter();

        let report = AnalysisReport {
            sentiment: self.scorer.score(&text),
            aspects: self.aspects.detect(&text),
            cuisine: self.cuisine.classify(&text),
            entities: self.entities.recognize(&text),
            stats: review_stats(&text),
            review: Review {
                text,
                restaurant_id: review.restaurant_id.clone(),
                rating: review.rating,
            },
        };

        tracing::debug!(
            sentiment = %report.sentiment.label,
            cuisine = %report.cuisine.label,
            entities = ?report.entities.summary(),
            "Review analyzed"
        );
        report
    }

    /// Analyze bare text
    pub fn analyze_text(&self, text: &str) -> AnalysisReport {
        self.analyze(&Review::new(text))
    }

    /// Sentiment component
    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    /// Cuisine component
    pub fn cuisine(&self) -> &CuisineClassifier {
        &self.cuisine
    }
}

/// Surface statistics of a text
pub fn review_stats(text: &str) -> ReviewStats {
    let words = tokenize(text);
    let word_count = words.len();
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();

    ReviewStats {
        word_count,
        char_count: text.chars().count(),
        sentence_count: if text.trim().is_empty() {
            0
        } else {
            split_sentences(text).len().max(1)
        },
        avg_word_length: if word_count == 0 {
            0.0
        } else {
            letters as f32 / word_count as f32
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    #[test]
    fn test_review_stats() {
        let stats = review_stats("Great tacos! Slow service.");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.sentence_count, 2);
        assert_eq!(stats.char_count, 26);
        assert!((stats.avg_word_length - 5.25).abs() < 1e-6);

        assert_eq!(review_stats(""), ReviewStats::default());
        assert_eq!(review_stats("!!!").sentence_count, 1);
    }

    #[test]
    fn test_analyze_sanitizes_text() {
        let analyzer = ReviewAnalyzer::from_config(&Config::default()).unwrap();
        let report = analyzer.analyze(&Review::new("  <b>Loved</b> the\u{200B} ramen  ").with_rating(5.0));

        assert_eq!(report.review.text, "Loved the ramen");
        assert_eq!(report.review.rating, Some(5.0));
        assert_eq!(report.sentiment.label, SentimentLabel::Positive);
        assert_eq!(report.cuisine.label, "Japanese");
        let ramen = &report.entities.entities[0];
        assert_eq!(&report.review.text[ramen.start..ramen.end], "ramen");
    }

    #[test]
    fn test_missing_resource_is_fatal() {
        let mut config = Config::default();
        config.entities.gazetteer_path = Some("/nonexistent/gazetteer.tsv".into());
        let err = ReviewAnalyzer::from_config(&config).unwrap_err();
        assert!(err.is_fatal());
    }
}
