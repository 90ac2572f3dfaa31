//! Restaurant sentiment lexicon
//!
//! Word-level polarity scores tuned for restaurant reviews, with negation
//! and intensifier handling. The built-in table can be extended or
//! overridden by a flat `word<TAB>polarity` file loaded at startup.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Error, Result};
use crate::text::{expand_contractions, split_sentences, tokenize};

use super::PolarityModel;

/// Built-in word polarities
const DEFAULT_WORDS: &[(&str, f32)] = &[
    // Positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.8),
    ("awesome", 0.8),
    ("fantastic", 0.8),
    ("wonderful", 0.9),
    ("perfect", 1.0),
    ("perfectly", 0.8),
    ("outstanding", 0.8),
    ("superb", 0.9),
    ("incredible", 0.8),
    ("phenomenal", 0.9),
    ("heavenly", 0.8),
    ("divine", 0.7),
    ("delicious", 0.7),
    ("tasty", 0.6),
    ("yummy", 0.6),
    ("flavorful", 0.6),
    ("fresh", 0.4),
    ("juicy", 0.5),
    ("tender", 0.4),
    ("crispy", 0.3),
    ("best", 1.0),
    ("love", 0.6),
    ("loved", 0.7),
    ("lovely", 0.6),
    ("enjoy", 0.5),
    ("enjoyed", 0.6),
    ("favorite", 0.6),
    ("nice", 0.5),
    ("pleasant", 0.6),
    ("happy", 0.6),
    ("satisfying", 0.5),
    ("impressive", 0.6),
    ("impressed", 0.6),
    ("recommend", 0.5),
    ("recommended", 0.5),
    ("friendly", 0.5),
    ("welcoming", 0.5),
    ("attentive", 0.5),
    ("helpful", 0.5),
    ("polite", 0.5),
    ("courteous", 0.5),
    ("professional", 0.4),
    ("efficient", 0.4),
    ("quick", 0.3),
    ("fast", 0.2),
    ("cozy", 0.5),
    ("charming", 0.5),
    ("elegant", 0.5),
    ("romantic", 0.4),
    ("beautiful", 0.8),
    ("clean", 0.4),
    ("spacious", 0.3),
    ("generous", 0.5),
    ("authentic", 0.4),
    ("affordable", 0.4),
    ("reasonable", 0.3),
    ("worth", 0.3),
    ("decent", 0.2),
    ("fine", 0.15),
    ("ok", 0.05),
    ("okay", 0.05),
    // Negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("horrible", -1.0),
    ("awful", -1.0),
    ("worst", -1.0),
    ("disgusting", -0.9),
    ("inedible", -0.9),
    ("nasty", -0.8),
    ("gross", -0.7),
    ("hate", -0.8),
    ("hated", -0.8),
    ("unacceptable", -0.7),
    ("poor", -0.4),
    ("mediocre", -0.4),
    ("underwhelming", -0.5),
    ("disappointing", -0.6),
    ("disappointed", -0.75),
    ("disappointment", -0.6),
    ("rude", -0.6),
    ("unfriendly", -0.5),
    ("unprofessional", -0.5),
    ("impolite", -0.5),
    ("inattentive", -0.5),
    ("uninterested", -0.4),
    ("ignored", -0.5),
    ("forgot", -0.4),
    ("annoying", -0.5),
    ("slow", -0.4),
    ("cold", -0.4),
    ("lukewarm", -0.3),
    ("stale", -0.5),
    ("bland", -0.5),
    ("flavorless", -0.6),
    ("tasteless", -0.6),
    ("greasy", -0.4),
    ("soggy", -0.5),
    ("burnt", -0.5),
    ("overcooked", -0.5),
    ("undercooked", -0.5),
    ("salty", -0.3),
    ("dry", -0.3),
    ("rubbery", -0.5),
    ("sick", -0.6),
    ("wrong", -0.5),
    ("sloppy", -0.4),
    ("dirty", -0.6),
    ("filthy", -0.8),
    ("loud", -0.3),
    ("noisy", -0.3),
    ("crowded", -0.3),
    ("cramped", -0.4),
    ("uncomfortable", -0.4),
    ("tacky", -0.4),
    ("outdated", -0.3),
    ("overpriced", -0.6),
    ("expensive", -0.3),
    ("pricey", -0.2),
    ("waste", -0.6),
    ("wasted", -0.6),
];

/// Words that flip the polarity of what follows
const DEFAULT_NEGATORS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nothing", "nobody", "nowhere", "cannot",
    "hardly", "barely", "without",
];

/// Words that scale the polarity of the next word
const DEFAULT_INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.3),
    ("too", 1.3),
    ("extremely", 1.5),
    ("absolutely", 1.4),
    ("incredibly", 1.4),
    ("totally", 1.3),
    ("truly", 1.2),
    ("highly", 1.3),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("somewhat", 0.7),
    ("slightly", 0.6),
    ("bit", 0.7),
];

/// Tuning knobs for lexicon scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconWeights {
    /// Factor applied to a negated word
    pub negation_scalar: f32,

    /// How many preceding tokens are searched for a negator
    pub negation_window: usize,

    /// Weight of words before a contrastive "but"
    pub before_contrast: f32,

    /// Weight of words after a contrastive "but"
    pub after_contrast: f32,
}

impl Default for LexiconWeights {
    fn default() -> Self {
        Self {
            negation_scalar: -0.5,
            negation_window: 3,
            before_contrast: 0.5,
            after_contrast: 1.5,
        }
    }
}

/// Lexicon-based polarity model
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Word to polarity mapping
    words: HashMap<String, f32>,
    /// Negation words
    negators: HashSet<String>,
    /// Intensifier words and their multipliers
    intensifiers: HashMap<String, f32>,
    /// Scoring weights
    weights: LexiconWeights,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// Create the built-in lexicon with default weights
    pub fn new() -> Self {
        Self::with_weights(LexiconWeights::default())
    }

    /// Create the built-in lexicon with custom weights
    pub fn with_weights(weights: LexiconWeights) -> Self {
        Self {
            words: DEFAULT_WORDS
                .iter()
                .map(|(word, score)| (word.to_string(), *score))
                .collect(),
            negators: DEFAULT_NEGATORS.iter().map(|w| w.to_string()).collect(),
            intensifiers: DEFAULT_INTENSIFIERS
                .iter()
                .map(|(word, factor)| (word.to_string(), *factor))
                .collect(),
            weights,
        }
    }

    /// Merge entries from a `word<TAB>polarity` file
    ///
    /// Blank lines and lines starting with `#` are ignored. Polarities must
    /// lie in [-1, 1]. A missing file is an error: lexicon files are
    /// startup resources and must not be silently skipped.
    pub fn load_overrides(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Err(Error::ResourceNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let entries = parse_entries(&content, path)?;
        let count = entries.len();
        self.words.extend(entries);

        tracing::debug!(path = %path.display(), entries = count, "Loaded lexicon overrides");
        Ok(count)
    }

    /// Insert or replace a single word
    pub fn insert(&mut self, word: &str, polarity: f32) {
        self.words
            .insert(word.trim().to_lowercase(), polarity.clamp(-1.0, 1.0));
    }

    /// Polarity of a single word, if known
    pub fn word_polarity(&self, word: &str) -> Option<f32> {
        self.words.get(&word.to_lowercase()).copied()
    }

    /// Number of scored words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the lexicon has no scored words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Score every lexicon hit in the token stream of one sentence
    ///
    /// Negation and the contrastive `but` never reach past the sentence.
    fn contributions(&self, tokens: &[String]) -> Vec<f32> {
        let contrast = tokens.iter().position(|t| t == "but");
        let mut contributions = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token) else {
                continue;
            };
            let mut value = base;

            // Chained intensifiers directly before the word ("really very good")
            let mut j = i;
            while j > 0 {
                match self.intensifiers.get(&tokens[j - 1]) {
                    Some(factor) => value *= factor,
                    None => break,
                }
                j -= 1;
            }

            let window_start = i.saturating_sub(self.weights.negation_window);
            if tokens[window_start..i]
                .iter()
                .any(|t| self.negators.contains(t))
            {
                value *= self.weights.negation_scalar;
            }

            match contrast {
                Some(b) if i < b => value *= self.weights.before_contrast,
                Some(b) if i > b => value *= self.weights.after_contrast,
                _ => {}
            }

            contributions.push(value);
        }

        contributions
    }
}

impl PolarityModel for Lexicon {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn polarity(&self, text: &str) -> f32 {
        let expanded = expand_contractions(text);
        let contributions: Vec<f32> = split_sentences(&expanded)
            .iter()
            .flat_map(|sentence| self.contributions(&tokenize(sentence)))
            .collect();

        if contributions.is_empty() {
            return 0.0;
        }

        let mean = contributions.iter().sum::<f32>() / contributions.len() as f32;
        mean.clamp(-1.0, 1.0)
    }
}

/// Parse `word<TAB>polarity` lines
fn parse_entries(content: &str, path: &Path) -> Result<Vec<(String, f32)>> {
    let mut entries = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t');
        let word = fields.next().unwrap_or_default().trim().to_lowercase();
        let score = fields
            .next()
            .ok_or_else(|| Error::invalid_resource(path, index + 1, "missing polarity column"))?;

        let score: f32 = score.trim().parse().map_err(|_| {
            Error::invalid_resource(path, index + 1, format!("invalid polarity '{}'", score.trim()))
        })?;

        if !(-1.0..=1.0).contains(&score) {
            return Err(Error::invalid_resource(
                path,
                index + 1,
                format!("polarity {score} outside [-1, 1]"),
            ));
        }
        if word.is_empty() {
            return Err(Error::invalid_resource(path, index + 1, "empty word"));
        }

        entries.push((word, score));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_single_words() {
        let lexicon = Lexicon::new();
        assert!(approx(lexicon.polarity("delicious"), 0.7));
        assert!(approx(lexicon.polarity("The service was slow"), -0.4));
        assert_eq!(lexicon.polarity("We ordered two plates"), 0.0);
    }

    #[test]
    fn test_negation() {
        let lexicon = Lexicon::new();
        assert!(approx(lexicon.polarity("not good"), -0.35));
        // Contraction expanded before scoring
        assert!(approx(lexicon.polarity("It wasn't good"), -0.35));
        // Negator outside the window has no effect
        assert!(approx(lexicon.polarity("no doubt about the very nice room"), 0.65));
    }

    #[test]
    fn test_intensifiers() {
        let lexicon = Lexicon::new();
        assert!(approx(lexicon.polarity("very good"), 0.91));
        assert!(approx(lexicon.polarity("a bit expensive"), -0.21));
        // Clamped to the valid range
        assert!(approx(lexicon.polarity("absolutely extremely perfect"), 1.0));
    }

    #[test]
    fn test_contrast_weighting() {
        let lexicon = Lexicon::new();
        let polarity =
            lexicon.polarity("The pasta was delicious but the service was slow and the wait was too long");
        // (0.7 * 0.5 + -0.4 * 1.5) / 2
        assert!(approx(polarity, -0.125));
    }

    #[test]
    fn test_negation_stops_at_sentence_end() {
        let lexicon = Lexicon::new();
        assert!(approx(lexicon.polarity("No complaints. Delicious food."), 0.7));
        assert!(approx(lexicon.polarity("Nothing to add. Great pizza!"), 0.8));
        assert!(approx(lexicon.polarity("No. Good"), 0.7));
    }

    #[test]
    fn test_contrast_stays_in_sentence() {
        let lexicon = Lexicon::new();
        let polarity = lexicon.polarity("The soup was bland but okay. The dessert was delicious.");
        // (-0.5 * 0.5 + 0.05 * 1.5 + 0.7) / 3
        assert!(approx(polarity, 0.175));
    }

    #[test]
    fn test_empty_text() {
        let lexicon = Lexicon::new();
        assert_eq!(lexicon.polarity(""), 0.0);
        assert_eq!(lexicon.polarity("   "), 0.0);
    }

    #[test]
    fn test_load_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# house words").unwrap();
        writeln!(file, "umami\t0.6").unwrap();
        writeln!(file, "bland\t-0.9").unwrap();
        writeln!(file).unwrap();

        let mut lexicon = Lexicon::new();
        let before = lexicon.len();
        assert_eq!(lexicon.load_overrides(file.path()).unwrap(), 2);
        assert_eq!(lexicon.len(), before + 1);
        assert_eq!(lexicon.word_polarity("Umami"), Some(0.6));
        assert_eq!(lexicon.word_polarity("bland"), Some(-0.9));
    }

    #[test]
    fn test_load_overrides_missing_file() {
        let mut lexicon = Lexicon::new();
        let err = lexicon
            .load_overrides(Path::new("/nonexistent/lexicon.tsv"))
            .unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound { .. }));
    }

    #[test]
    fn test_load_overrides_invalid_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tasty\t0.5").unwrap();
        writeln!(file, "weird\thigh").unwrap();

        let mut lexicon = Lexicon::new();
        let err = lexicon.load_overrides(file.path()).unwrap_err();
        match err {
            Error::InvalidResource { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_polarity_rejected() {
        let content = "yum\t1.5";
        assert!(parse_entries(content, Path::new("x.tsv")).is_err());
    }
}
