//! Text normalization
//!
//! Turns a raw review into the forms the analysis components consume:
//!
//! - [`sanitize`] - decoding and noise removal applied to every review
//! - [`matcher`] - keyword phrase matching with byte offsets
//! - [`Normalizer`] - lowercased tokens, bag-of-words tokens and sentences
//!
//! Sentence-level consumers (sentiment, aspects) work on sentences that keep
//! their original casing and punctuation; only bag-of-words consumers
//! (cuisine classification) see stopword-free token streams.

pub mod matcher;
pub mod sanitize;

pub use matcher::{PhraseMatch, PhraseMatcher};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*").unwrap());

static SENTENCE_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)|\n+").unwrap());

static SEGMENT_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?;:,()\[\]"\n]+"#).unwrap());

static CLAUSE_BOUNDARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i);|\b(?:but|however|although|though|yet|whereas|except)\b").unwrap()
});

// Irregular forms first; the generic suffix rules would produce "wo not" / "ca not"
static CONTRACTION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bwon['’]t\b", "will not"),
        (r"(?i)\bcan['’]t\b", "cannot"),
        (r"(?i)\bshan['’]t\b", "shall not"),
        (r"(?i)\bain['’]t\b", "is not"),
        (r"(?i)\blet['’]s\b", "let us"),
        (r"(?i)n['’]t\b", " not"),
        (r"(?i)['’]re\b", " are"),
        (r"(?i)['’]ll\b", " will"),
        (r"(?i)['’]ve\b", " have"),
        (r"(?i)['’]m\b", " am"),
        (r"(?i)['’]d\b", " would"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Default English stopwords for bag-of-words matching
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "in", "on", "at", "for", "with", "from", "by",
    "as", "is", "are", "was", "were", "be", "been", "am", "it", "its", "this", "that", "these",
    "those", "i", "we", "you", "he", "she", "they", "me", "us", "him", "her", "them", "my",
    "our", "your", "his", "their", "had", "have", "has", "do", "did", "does", "so", "just",
    "also", "there", "here", "then", "than", "some", "any", "all", "de", "la", "le",
];

/// Normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Words dropped from bag-of-words token streams
    pub stopwords: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Normalized forms of one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedText {
    /// Lowercase tokens joined by single spaces (punctuation removed)
    pub cleaned: String,

    /// Lowercase word tokens in text order
    pub tokens: Vec<String>,

    /// Tokens with stopwords removed
    pub content_tokens: Vec<String>,

    /// Sentences with original casing and punctuation context
    pub sentences: Vec<String>,

    /// Content tokens of each punctuation-delimited segment, space-joined
    pub content_segments: Vec<String>,
}

/// Separator placed between segments in [`NormalizedText::content_text`]
///
/// Keyword phrases are word sequences joined by whitespace, so no phrase can
/// match across it.
pub const SEGMENT_BREAK: &str = " | ";

impl NormalizedText {
    /// Content segments joined by [`SEGMENT_BREAK`]
    ///
    /// "ordered it hot. Dog friendly patio" becomes "ordered hot | dog
    /// friendly patio", which does not contain the phrase "hot dog".
    pub fn content_text(&self) -> String {
        self.content_segments.join(SEGMENT_BREAK)
    }
}

/// Text normalizer holding the configured stopword set
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

impl Normalizer {
    /// Create a normalizer from configuration
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            stopwords: config
                .stopwords
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Whether a word is in the stopword set (case-insensitive)
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.trim().to_lowercase())
    }

    /// Normalize a text into tokens, content tokens and sentences
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let tokens = tokenize(text);
        let content_tokens = self.remove_stopwords(&tokens);

        NormalizedText {
            cleaned: tokens.join(" "),
            content_tokens,
            tokens,
            sentences: split_sentences(text),
            content_segments: SEGMENT_BOUNDARY_REGEX
                .split(text)
                .map(|segment| self.content_form(segment))
                .filter(|segment| !segment.is_empty())
                .collect(),
        }
    }

    /// Drop stopwords from a token sequence
    pub fn remove_stopwords(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| !self.stopwords.contains(t.as_str()))
            .cloned()
            .collect()
    }

    /// Bag-of-words form of a phrase: tokenized, stopwords removed
    ///
    /// Keywords go through the same transformation as review text so that
    /// "mac and cheese" still matches after "and" is dropped.
    pub fn content_form(&self, phrase: &str) -> String {
        self.remove_stopwords(&tokenize(phrase)).join(" ")
    }
}

/// Lowercase word tokens
///
/// Letters and digits, with inner apostrophes kept ("didn't"). Hyphens and
/// all other punctuation separate tokens.
///
/// # Examples
///
/// ```
/// use forkast::text::tokenize;
///
/// assert_eq!(tokenize("Stir-fry, DIDN'T wow!"), vec!["stir", "fry", "didn't", "wow"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().replace('’', "'").to_lowercase())
        .collect()
}

/// Remove all punctuation, lowercase and collapse whitespace
pub fn remove_punctuation(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Split text into sentences
///
/// Boundaries are runs of `.`, `!` or `?` followed by whitespace or the end
/// of text, and line breaks. Decimal numbers ("$25.50") stay intact.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_BOUNDARY_REGEX
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a sentence into opinion clauses at contrastive connectives
///
/// "The pasta was delicious but the service was slow" yields two clauses so
/// that each opinion is scored on its own.
pub fn split_clauses(sentence: &str) -> Vec<String> {
    CLAUSE_BOUNDARY_REGEX
        .split(sentence)
        .map(|clause| clause.trim_matches(|c: char| c.is_whitespace() || c == ','))
        .filter(|clause| !clause.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand English contractions ("didn't" becomes "did not")
pub fn expand_contractions(text: &str) -> String {
    CONTRACTION_RULES
        .iter()
        .fold(text.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).into_owned()
        })
}
