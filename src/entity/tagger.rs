//! Heuristic entity tagger
//!
//! Finds runs of capitalized words and classifies them from cheap signals:
//! venue suffixes ("Grill", "Bistro"), a small city gazetteer, food words and
//! the cue word in front of the run ("at", "in", "waiter"). Runs without a
//! signal are dropped; the gazetteers in the recognizer cover lowercase
//! dishes and features.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::{EntityTagger, GenericLabel, TaggedSpan};

static CAPITALIZED_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\p{Lu}[\p{L}\p{N}'’&]*(?:[ \t]+\p{Lu}[\p{L}\p{N}'’&]*)*").unwrap()
});

static RUN_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Last words that make a run a venue name
const VENUE_SUFFIXES: &[&str] = &[
    "restaurant", "cafe", "café", "grill", "bistro", "kitchen", "diner", "bar", "tavern",
    "pizzeria", "trattoria", "osteria", "steakhouse", "house", "eatery", "bakery", "brasserie",
    "cantina", "taqueria", "garden", "gardens", "palace", "express", "lounge", "pub", "deli",
    "canteen", "brewery", "noodles", "sushi", "bbq",
];

/// Cue words before a venue name
const ORGANIZATION_CUES: &[&str] = &["at", "visited", "tried", "recommend"];

/// Cue words before a place name
const LOCATION_CUES: &[&str] = &["in", "near", "from", "downtown", "around", "uptown"];

/// Cue words before a person name
const PERSON_CUES: &[&str] = &[
    "waiter", "waitress", "server", "chef", "manager", "host", "hostess", "bartender", "owner",
    "cook", "sommelier", "mr", "mrs", "ms", "dr", "named",
];

/// Capitalized words that start sentences but never start an entity
const SENTENCE_STARTERS: &[&str] = &[
    "the", "a", "an", "i", "we", "my", "our", "their", "this", "that", "these", "those", "it",
    "he", "she", "they", "and", "but", "or", "so", "if", "on", "to", "for", "with", "by",
    "also", "then", "when", "after", "before", "overall", "definitely", "highly", "great",
    "good", "best", "loved", "love", "amazing", "excellent", "terrible", "will", "would",
];

/// Words marking a run as food
const FOOD_WORDS: &[&str] = &[
    "naan", "chicken", "curry", "biryani", "tikka", "paneer", "pizza", "pasta", "burger",
    "sushi", "taco", "tacos", "rice", "bread", "salad", "soup", "fish", "beef", "pork", "lamb",
    "noodles", "ramen", "alfredo", "masala", "steak", "wings", "roll", "dumplings", "cake",
    "pie", "tiramisu",
];

/// Capitalized words that are never entities on their own
const NON_ENTITIES: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
    "february", "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december", "ok", "okay", "wow", "yes", "no",
];

/// Built-in city gazetteer
pub const DEFAULT_CITIES: &[&str] = &[
    "new york", "chicago", "san francisco", "los angeles", "boston", "seattle", "austin",
    "houston", "dallas", "miami", "denver", "portland", "atlanta", "philadelphia", "brooklyn",
    "manhattan", "queens", "las vegas", "new orleans", "nashville", "san diego", "washington",
    "toronto", "vancouver", "montreal", "london", "paris", "rome", "milan", "naples", "tokyo",
    "osaka", "seoul", "bangkok", "mumbai", "delhi", "bangalore", "hanoi", "mexico city",
    "sydney", "melbourne", "berlin", "madrid", "barcelona", "lisbon", "dublin", "addis ababa",
    "sao paulo", "rio de janeiro",
];

/// Tagger driven by capitalization and cue words
#[derive(Debug, Clone)]
pub struct HeuristicTagger {
    cities: HashSet<String>,
}

impl Default for HeuristicTagger {
    fn default() -> Self {
        Self::new(DEFAULT_CITIES.iter().copied())
    }
}

impl HeuristicTagger {
    /// Create a tagger with a custom city gazetteer
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cities: cities
                .into_iter()
                .map(|c| c.as_ref().split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Number of known cities
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Classify one capitalized run
    fn classify(&self, words: &[&str], cue: Option<&str>) -> Option<GenericLabel> {
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let phrase = lowered.join(" ");

        if lowered.len() == 1 && NON_ENTITIES.contains(&phrase.as_str()) {
            return None;
        }
        if let Some(last) = lowered.last() {
            if lowered.len() > 1 && VENUE_SUFFIXES.contains(&last.as_str()) {
                return Some(GenericLabel::Organization);
            }
        }
        if self.cities.contains(&phrase) {
            return Some(GenericLabel::Location);
        }
        if lowered.iter().any(|w| FOOD_WORDS.contains(&w.as_str())) {
            return Some(GenericLabel::Food);
        }

        match cue {
            Some(cue) if ORGANIZATION_CUES.contains(&cue) => Some(GenericLabel::Organization),
            Some(cue) if LOCATION_CUES.contains(&cue) => Some(GenericLabel::Location),
            Some(cue) if PERSON_CUES.contains(&cue) => Some(GenericLabel::Person),
            _ => None,
        }
    }
}

impl EntityTagger for HeuristicTagger {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans = Vec::new();

        for run in CAPITALIZED_RUN_REGEX.find_iter(text) {
            let words: Vec<regex::Match<'_>> = RUN_WORD_REGEX.find_iter(run.as_str()).collect();

            // Leading starters and cue words are not part of the name; the
            // last stripped word serves as the cue.
            let mut cue = None;
            let mut first = 0;
            while first < words.len() {
                let word = words[first].as_str().to_lowercase();
                if !is_strippable(&word) {
                    break;
                }
                cue = Some(word);
                first += 1;
            }
            if first == words.len() {
                continue;
            }

            let cue = cue.or_else(|| preceding_cue(text, run.start()));
            let kept: Vec<&str> = words[first..].iter().map(|m| m.as_str()).collect();

            if let Some(label) = self.classify(&kept, cue.as_deref()) {
                spans.push(TaggedSpan {
                    start: run.start() + words[first].start(),
                    end: run.end(),
                    label,
                });
            }
        }

        spans
    }
}

fn is_strippable(word: &str) -> bool {
    SENTENCE_STARTERS.contains(&word)
        || ORGANIZATION_CUES.contains(&word)
        || LOCATION_CUES.contains(&word)
        || PERSON_CUES.contains(&word)
}

/// Lowercase word directly before `start`, if nothing but spaces separate them
///
/// A period only counts after a title abbreviation ("Dr. Lee").
fn preceding_cue(text: &str, start: usize) -> Option<String> {
    let before = text[..start].trim_end();
    let (before, after_period) = match before.strip_suffix('.') {
        Some(rest) => (rest, true),
        None => (before, false),
    };

    if before.ends_with(|c: char| !c.is_alphanumeric() && c != '\'') {
        return None;
    }

    let word = before
        .rsplit(|c: char| !c.is_alphanumeric() && c != '\'')
        .next()?
        .to_lowercase();

    if word.is_empty() || (after_period && !PERSON_CUES.contains(&word.as_str())) {
        return None;
    }
    Some(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(text: &str) -> Vec<(String, GenericLabel)> {
        HeuristicTagger::default()
            .tag(text)
            .into_iter()
            .map(|s| (text[s.start..s.end].to_string(), s.label))
            .collect()
    }

    #[test]
    fn test_venue_after_at() {
        assert_eq!(
            tagged("I loved the Pad Thai at Golden Spoon"),
            vec![("Golden Spoon".to_string(), GenericLabel::Organization)]
        );
    }

    #[test]
    fn test_venue_suffix_and_city() {
        let spans = tagged("I visited Olive Garden in downtown Chicago last night.");
        assert_eq!(
            spans,
            vec![
                ("Olive Garden".to_string(), GenericLabel::Organization),
                ("Chicago".to_string(), GenericLabel::Location),
            ]
        );
    }

    #[test]
    fn test_staff_names() {
        assert_eq!(
            tagged("Our waiter John was very attentive."),
            vec![("John".to_string(), GenericLabel::Person)]
        );
        assert_eq!(
            tagged("Chef Marco came out to say hi"),
            vec![("Marco".to_string(), GenericLabel::Person)]
        );
        assert_eq!(
            tagged("Thanks to Dr. Lee for the tip"),
            vec![("Lee".to_string(), GenericLabel::Person)]
        );
    }

    #[test]
    fn test_food_runs() {
        assert_eq!(
            tagged("The Chicken Alfredo was rich."),
            vec![("Chicken Alfredo".to_string(), GenericLabel::Food)]
        );
    }

    #[test]
    fn test_sentence_starters_dropped() {
        assert!(tagged("Great food. Loved it. We will return.").is_empty());
        assert!(tagged("Went there in December").is_empty());
    }

    #[test]
    fn test_period_breaks_cue() {
        // "in." ends a sentence; "Paris" is still a known city
        assert_eq!(
            tagged("We ate in. Paris was lovely"),
            vec![("Paris".to_string(), GenericLabel::Location)]
        );
        assert!(tagged("We sat at. Marco laughed").is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "Café crème at Le Petit Café was perfect";
        let spans = HeuristicTagger::default().tag(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..spans[0].end], "Le Petit Café");
    }

    #[test]
    fn test_custom_cities() {
        let tagger = HeuristicTagger::new(["Springfield"]);
        assert_eq!(tagger.city_count(), 1);
        let spans = tagger.tag("Best diner in all of Springfield");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].label, GenericLabel::Location);
    }
}
