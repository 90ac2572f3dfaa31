//! Built-in sample reviews and classification metrics
//!
//! Used by `forkast samples` / `forkast evaluate` and the samples endpoint to
//! sanity-check the pipeline against a handful of labeled reviews.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use crate::analyzer::ReviewAnalyzer;
use crate::models::{Review, SentimentLabel};

/// A labeled sample review
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SampleReview {
    pub text: &'static str,
    pub rating: f32,
    pub cuisine: &'static str,
}

impl SampleReview {
    /// Convert into an analyzable review
    pub fn to_review(&self) -> Review {
        Review::new(self.text).with_rating(self.rating)
    }
}

const SAMPLES: &[SampleReview] = &[
    SampleReview {
        text: "The pasta was absolutely delicious! Great atmosphere and excellent service. A bit pricey but totally worth it.",
        rating: 5.0,
        cuisine: "Italian",
    },
    SampleReview {
        text: "Food was okay but the service was terrible. We waited 45 minutes for our order. Not coming back.",
        rating: 2.0,
        cuisine: "American",
    },
    SampleReview {
        text: "Amazing Indian food! The butter chicken and naan were perfect. Friendly staff and cozy ambiance.",
        rating: 5.0,
        cuisine: "Indian",
    },
    SampleReview {
        text: "Decent sushi but overpriced. The place was clean and service was fast though.",
        rating: 3.0,
        cuisine: "Japanese",
    },
    SampleReview {
        text: "Worst Mexican food ever. Tacos were cold and flavorless. Very disappointing experience.",
        rating: 1.0,
        cuisine: "Mexican",
    },
    SampleReview {
        text: "Best pad thai in town and the green curry was fragrant. Service was a little slow.",
        rating: 4.0,
        cuisine: "Thai",
    },
    SampleReview {
        text: "Our Korean BBQ night was fun: the bulgogi and kimchi were fantastic, though the room was loud.",
        rating: 4.0,
        cuisine: "Korean",
    },
    SampleReview {
        text: "The croissant was stale and the coffee bitter. Overpriced for what you get.",
        rating: 2.0,
        cuisine: "French",
    },
];

/// Built-in labeled reviews
pub fn sample_reviews() -> &'static [SampleReview] {
    SAMPLES
}

/// Classification metrics, weighted by label support
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Accuracy and support-weighted precision, recall and F1
///
/// Labels that are never predicted get a precision of zero. Only the
/// common prefix of the two slices is compared.
pub fn calculate_metrics<L>(y_true: &[L], y_pred: &[L]) -> Metrics
where
    L: Eq + Hash + Ord + Clone,
{
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return Metrics::default();
    }

    let pairs = || y_true.iter().zip(y_pred.iter()).take(n);
    let correct = pairs().filter(|(t, p)| t == p).count();

    let mut support: HashMap<&L, usize> = HashMap::new();
    let mut predicted: HashMap<&L, usize> = HashMap::new();
    let mut true_positive: HashMap<&L, usize> = HashMap::new();
    for (t, p) in pairs() {
        *support.entry(t).or_insert(0) += 1;
        *predicted.entry(p).or_insert(0) += 1;
        if t == p {
            *true_positive.entry(t).or_insert(0) += 1;
        }
    }

    let labels: BTreeSet<&L> = support.keys().chain(predicted.keys()).copied().collect();

    let (mut precision, mut recall, mut f1) = (0.0, 0.0, 0.0);
    for label in labels {
        let weight = *support.get(label).unwrap_or(&0) as f64;
        if weight == 0.0 {
            continue;
        }
        let tp = *true_positive.get(label).unwrap_or(&0) as f64;
        let pred = *predicted.get(label).unwrap_or(&0) as f64;

        let p = if pred > 0.0 { tp / pred } else { 0.0 };
        let r = tp / weight;
        let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };

        precision += p * weight;
        recall += r * weight;
        f1 += f * weight;
    }

    let total = n as f64;
    Metrics {
        accuracy: round4(correct as f64 / total),
        precision: round4(precision / total),
        recall: round4(recall / total),
        f1_score: round4(f1 / total),
    }
}

/// Outcome of one sample
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SampleOutcome {
    pub text: String,
    pub expected_sentiment: SentimentLabel,
    pub predicted_sentiment: SentimentLabel,
    pub expected_cuisine: String,
    pub predicted_cuisine: String,
}

/// Metrics over a sample set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluationReport {
    pub samples: usize,
    pub sentiment: Metrics,
    pub cuisine: Metrics,
    pub outcomes: Vec<SampleOutcome>,
}

/// Run the analyzer over labeled samples
///
/// Overall sentiment is compared with the sentiment implied by the star
/// rating; cuisine with the labeled cuisine.
pub fn evaluate(analyzer: &ReviewAnalyzer, samples: &[SampleReview]) -> EvaluationReport {
    let outcomes: Vec<SampleOutcome> = samples
        .iter()
        .map(|sample| {
            let review = sample.to_review();
            let report = analyzer.analyze(&review);
            SampleOutcome {
                text: sample.text.to_string(),
                expected_sentiment: review
                    .rating_sentiment()
                    .unwrap_or(SentimentLabel::Neutral),
                predicted_sentiment: report.sentiment.label,
                expected_cuisine: sample.cuisine.to_string(),
                predicted_cuisine: report.cuisine.label,
            }
        })
        .collect();

    let expected: Vec<SentimentLabel> = outcomes.iter().map(|o| o.expected_sentiment).collect();
    let predicted: Vec<SentimentLabel> = outcomes.iter().map(|o| o.predicted_sentiment).collect();
    let sentiment = calculate_metrics(&expected, &predicted);

    let expected: Vec<&str> = outcomes.iter().map(|o| o.expected_cuisine.as_str()).collect();
    let predicted: Vec<&str> = outcomes.iter().map(|o| o.predicted_cuisine.as_str()).collect();
    let cuisine = calculate_metrics(&expected, &predicted);

    tracing::info!(
        samples = outcomes.len(),
        sentiment_accuracy = sentiment.accuracy,
        cuisine_accuracy = cuisine.accuracy,
        "Evaluation finished"
    );

    EvaluationReport {
        samples: outcomes.len(),
        sentiment,
        cuisine,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_perfect_predictions() {
        let labels = ["a", "b", "a"];
        let metrics = calculate_metrics(&labels, &labels);
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
    }

    #[test]
    fn test_weighted_metrics() {
        let y_true = ["pos", "pos", "neg", "neu"];
        let y_pred = ["pos", "neg", "neg", "pos"];
        let metrics = calculate_metrics(&y_true, &y_pred);

        assert_eq!(metrics.accuracy, 0.5);
        // pos: p=1/2 r=1/2 (w=2); neg: p=1/2 r=1 (w=1); neu: p=0 r=0 (w=1)
        assert_eq!(metrics.precision, 0.375);
        assert_eq!(metrics.recall, 0.5);
        assert_eq!(metrics.f1_score, 0.4167);
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(calculate_metrics(&empty, &empty), Metrics::default());
    }

    #[test]
    fn test_samples_cover_several_cuisines() {
        let cuisines: BTreeSet<&str> = sample_reviews().iter().map(|s| s.cuisine).collect();
        assert!(cuisines.len() >= 5);
        assert!(sample_reviews().iter().all(|s| (1.0..=5.0).contains(&s.rating)));
    }

    #[test]
    fn test_evaluate_samples() {
        let analyzer = ReviewAnalyzer::from_config(&Config::default()).unwrap();
        let report = evaluate(&analyzer, sample_reviews());

        assert_eq!(report.samples, sample_reviews().len());
        assert_eq!(report.outcomes.len(), report.samples);
        assert!(report.sentiment.accuracy >= 0.75);
        assert!(report.cuisine.accuracy >= 0.75);
    }
}
