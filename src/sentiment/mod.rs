//! Overall sentiment scoring
//!
//! A [`PolarityModel`] estimates a continuous polarity in [-1, 1]; the
//! [`SentimentScorer`] buckets it into a [`SentimentLabel`] with configurable
//! thresholds. The same bucketing rule is reused for aspect-level sentiment.

pub mod lexicon;

pub use lexicon::{Lexicon, LexiconWeights};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{SentimentLabel, SentimentResult};

/// Continuous polarity estimator
///
/// Implementations must be deterministic and return a value in [-1, 1] for
/// any input, including empty text.
pub trait PolarityModel: Send + Sync {
    /// Short identifier reported as `SentimentResult::method`
    fn name(&self) -> &str;

    /// Polarity of a text
    fn polarity(&self, text: &str) -> f32;
}

// ============================================================================
// Configuration
// ============================================================================

/// Sentiment scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SentimentConfig {
    /// Polarity strictly above this is positive
    pub positive_threshold: f32,

    /// Polarity strictly below this is negative
    pub negative_threshold: f32,

    /// Factor applied to negated words
    pub negation_scalar: f32,

    /// Tokens searched backwards for a negator
    pub negation_window: usize,

    /// Additional `word<TAB>polarity` entries merged over the built-in table
    pub lexicon_path: Option<PathBuf>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        let weights = LexiconWeights::default();
        Self {
            positive_threshold: 0.1,
            negative_threshold: -0.1,
            negation_scalar: weights.negation_scalar,
            negation_window: weights.negation_window,
            lexicon_path: None,
        }
    }
}

impl SentimentConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.positive_threshold) {
            return Err(Error::invalid_config(
                "sentiment.positive_threshold",
                "must be within [0, 1]",
            ));
        }
        if !(-1.0..=0.0).contains(&self.negative_threshold) {
            return Err(Error::invalid_config(
                "sentiment.negative_threshold",
                "must be within [-1, 0]",
            ));
        }
        if !(-1.0..=0.0).contains(&self.negation_scalar) {
            return Err(Error::invalid_config(
                "sentiment.negation_scalar",
                "must be within [-1, 0]",
            ));
        }
        if self.negation_window == 0 {
            return Err(Error::invalid_config(
                "sentiment.negation_window",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    fn weights(&self) -> LexiconWeights {
        LexiconWeights {
            negation_scalar: self.negation_scalar,
            negation_window: self.negation_window,
            ..LexiconWeights::default()
        }
    }
}

// ============================================================================
// Scorer
// ============================================================================

/// Buckets model polarity into sentiment labels
#[derive(Clone)]
pub struct SentimentScorer {
    model: Arc<dyn PolarityModel>,
    positive_threshold: f32,
    negative_threshold: f32,
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("model", &self.model.name())
            .field("positive_threshold", &self.positive_threshold)
            .field("negative_threshold", &self.negative_threshold)
            .finish()
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        let config = SentimentConfig::default();
        Self {
            model: Arc::new(Lexicon::with_weights(config.weights())),
            positive_threshold: config.positive_threshold,
            negative_threshold: config.negative_threshold,
        }
    }
}

impl SentimentScorer {
    /// Build a lexicon scorer, loading the override file if configured
    pub fn new(config: &SentimentConfig) -> Result<Self> {
        config.validate()?;

        let mut lexicon = Lexicon::with_weights(config.weights());
        if let Some(path) = &config.lexicon_path {
            lexicon.load_overrides(path)?;
        }

        Ok(Self::with_model(Arc::new(lexicon), config))
    }

    /// Build a scorer around any polarity model
    pub fn with_model(model: Arc<dyn PolarityModel>, config: &SentimentConfig) -> Self {
        Self {
            model,
            positive_threshold: config.positive_threshold,
            negative_threshold: config.negative_threshold,
        }
    }

    /// Name of the underlying model
    pub fn method(&self) -> &str {
        self.model.name()
    }

    /// Raw model polarity, 0 for blank text
    pub fn polarity(&self, text: &str) -> f32 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.model.polarity(text).clamp(-1.0, 1.0)
    }

    /// Score a text
    ///
    /// # Examples
    ///
    /// ```
    /// use forkast::models::SentimentLabel;
    /// use forkast::sentiment::SentimentScorer;
    ///
    /// let scorer = SentimentScorer::default();
    /// assert_eq!(scorer.score("Absolutely delicious!").label, SentimentLabel::Positive);
    /// assert_eq!(scorer.score("").label, SentimentLabel::Neutral);
    /// ```
    pub fn score(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral(self.method());
        }
        self.score_polarity(self.polarity(text))
    }

    /// Bucket a polarity; values exactly on a threshold are neutral
    pub fn label_for(&self, polarity: f32) -> SentimentLabel {
        if polarity > self.positive_threshold {
            SentimentLabel::Positive
        } else if polarity < self.negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Build a result from an already computed polarity
    pub fn score_polarity(&self, polarity: f32) -> SentimentResult {
        let polarity = if polarity.is_finite() {
            polarity.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        SentimentResult {
            label: self.label_for(polarity),
            score: polarity.abs().clamp(0.0, 1.0),
            polarity,
            method: self.method().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(f32);

    impl PolarityModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn polarity(&self, _text: &str) -> f32 {
            self.0
        }
    }

    fn fixed(polarity: f32) -> SentimentScorer {
        SentimentScorer::with_model(Arc::new(FixedModel(polarity)), &SentimentConfig::default())
    }

    #[test]
    fn test_threshold_ties_are_neutral() {
        assert_eq!(fixed(0.1).score("x").label, SentimentLabel::Neutral);
        assert_eq!(fixed(-0.1).score("x").label, SentimentLabel::Neutral);
        assert_eq!(fixed(0.11).score("x").label, SentimentLabel::Positive);
        assert_eq!(fixed(-0.11).score("x").label, SentimentLabel::Negative);
    }

    #[test]
    fn test_score_is_magnitude() {
        let result = fixed(-0.6).score("anything");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!((result.score - 0.6).abs() < 1e-6);
        assert_eq!(result.method, "fixed");
    }

    #[test]
    fn test_out_of_range_model_is_clamped() {
        let result = fixed(3.0).score("x");
        assert_eq!(result.polarity, 1.0);
        assert_eq!(result.score, 1.0);

        let result = fixed(f32::NAN).score("x");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_blank_text_skips_model() {
        let result = fixed(0.9).score("  \n ");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_lexicon_scorer() {
        let scorer = SentimentScorer::default();
        assert_eq!(scorer.method(), "lexicon");
        assert_eq!(
            scorer.score("The food was terrible and the service was horrible").label,
            SentimentLabel::Negative
        );
        assert_eq!(
            scorer.score("Wonderful dinner, friendly staff").label,
            SentimentLabel::Positive
        );
        assert_eq!(scorer.score("We had dinner at six").label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_mixed_review_leans_negative() {
        let scorer = SentimentScorer::default();
        let result =
            scorer.score("The pasta was delicious but the service was slow and the wait was too long");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score < 0.5);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = SentimentConfig {
            positive_threshold: 0.8,
            ..Default::default()
        };
        let scorer = SentimentScorer::new(&config).unwrap();
        // "good" alone is 0.7, below the raised threshold
        assert_eq!(scorer.score("good").label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_validate() {
        assert!(SentimentConfig::default().validate().is_ok());

        let config = SentimentConfig {
            positive_threshold: -0.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SentimentConfig {
            negation_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_lexicon_file_is_fatal() {
        let config = SentimentConfig {
            lexicon_path: Some(PathBuf::from("/nonexistent/lexicon.tsv")),
            ..Default::default()
        };
        let err = SentimentScorer::new(&config).unwrap_err();
        assert!(err.is_fatal());
    }
}
