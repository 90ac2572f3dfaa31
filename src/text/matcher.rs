//! Keyword phrase matching
//!
//! Aspect keywords, cuisine keywords and the dish/feature gazetteers are all
//! matched the same way: case-insensitive, on word boundaries, tolerant of
//! extra whitespace inside multi-word phrases and of a plural suffix on the
//! last word ("taco" matches "Tacos", "dish" matches "dishes").

use regex::Regex;

use crate::error::{Error, Result};

/// One occurrence of a keyword phrase in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch<'a> {
    /// The configured phrase that matched
    pub phrase: &'a str,
    /// Start byte offset in the searched text
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// Compiled set of keyword phrases
#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    phrases: Vec<(String, Regex)>,
}

impl PhraseMatcher {
    /// Compile a list of phrases
    ///
    /// Blank phrases and duplicates (case-insensitive) are skipped; the
    /// first spelling wins.
    pub fn new<I, S>(phrases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled: Vec<(String, Regex)> = Vec::new();

        for phrase in phrases {
            let phrase = phrase.as_ref().trim();
            if phrase.is_empty()
                || compiled
                    .iter()
                    .any(|(existing, _)| existing.eq_ignore_ascii_case(phrase))
            {
                continue;
            }

            let pattern = phrase_pattern(phrase);
            let regex = Regex::new(&pattern).map_err(|source| Error::Pattern {
                keyword: phrase.to_string(),
                source,
            })?;
            compiled.push((phrase.to_string(), regex));
        }

        Ok(Self { phrases: compiled })
    }

    /// Number of compiled phrases
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Whether no phrase was compiled
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Configured phrases in declaration order
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|(phrase, _)| phrase.as_str())
    }

    /// Whether any phrase occurs in the text
    pub fn is_match(&self, text: &str) -> bool {
        self.phrases.iter().any(|(_, regex)| regex.is_match(text))
    }

    /// Every occurrence of every phrase, ordered by position
    ///
    /// Occurrences of different phrases may overlap ("fried rice" and
    /// "rice"); callers decide how to resolve that.
    pub fn find_all<'a>(&'a self, text: &str) -> Vec<PhraseMatch<'a>> {
        let mut matches: Vec<PhraseMatch<'a>> = self
            .phrases
            .iter()
            .flat_map(|(phrase, regex)| {
                regex.find_iter(text).map(move |m| PhraseMatch {
                    phrase: phrase.as_str(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect();

        matches.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        matches
    }

    /// Distinct phrases found in the text, in order of first occurrence
    pub fn matched_phrases<'a>(&'a self, text: &str) -> Vec<&'a str> {
        let mut seen: Vec<&'a str> = Vec::new();
        for m in self.find_all(text) {
            if !seen.contains(&m.phrase) {
                seen.push(m.phrase);
            }
        }
        seen
    }
}

/// Build the regex source for one phrase
fn phrase_pattern(phrase: &str) -> String {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    let body = words.join(r"\s+");

    // Plural tolerance only applies when the phrase ends in a letter
    let plural = if phrase.chars().last().is_some_and(char::is_alphabetic) {
        "(?:e?s)?"
    } else {
        ""
    };

    format!(r"(?i)\b{body}{plural}\b")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundaries() {
        let matcher = PhraseMatcher::new(["fast", "wait"]).unwrap();
        assert!(!matcher.is_match("a hearty breakfast"));
        assert!(matcher.is_match("the wait was long"));
        assert!(!matcher.is_match("our waiter was kind"));
    }

    #[test]
    fn test_plural_and_case() {
        let matcher = PhraseMatcher::new(["taco", "dish"]).unwrap();
        assert_eq!(matcher.matched_phrases("Tacos and DISHES"), vec!["taco", "dish"]);
    }

    #[test]
    fn test_multi_word_phrase_offsets() {
        let matcher = PhraseMatcher::new(["pad thai"]).unwrap();
        let text = "I loved the Pad  Thai here";
        let found = matcher.find_all(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].start..found[0].end], "Pad  Thai");
    }

    #[test]
    fn test_overlapping_phrases_are_all_reported() {
        let matcher = PhraseMatcher::new(["rice", "fried rice"]).unwrap();
        let found = matcher.find_all("the fried rice was great");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].phrase, "fried rice");
        assert_eq!(found[1].phrase, "rice");
    }

    #[test]
    fn test_duplicates_and_blanks_skipped() {
        let matcher = PhraseMatcher::new(["Pizza", "pizza", "  "]).unwrap();
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.phrases().collect::<Vec<_>>(), vec!["Pizza"]);
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let matcher = PhraseMatcher::new(["mac & cheese", "drive-thru"]).unwrap();
        assert!(matcher.is_match("the Mac & Cheese was rich"));
        assert!(matcher.is_match("used the drive-thru"));
    }

    #[test]
    fn test_empty_text() {
        let matcher = PhraseMatcher::new(["food"]).unwrap();
        assert!(matcher.find_all("").is_empty());
        assert!(matcher.matched_phrases("").is_empty());
    }
}
