//! Input sanitization for review text
//!
//! Reviews arrive from web forms, files and stdin. This module repairs
//! encoding problems and strips noise (invisible characters, markup, links)
//! before any analysis runs, so components never see malformed input.

use encoding_rs::UTF_8;
use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static MULTI_NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+").unwrap());

/// Decode raw review bytes as UTF-8, replacing invalid sequences
///
/// A leading byte order mark is consumed. Undecodable bytes become
/// U+FFFD, which [`sanitize_text`] later drops.
///
/// # Examples
///
/// ```
/// use forkast::text::sanitize::decode_lossy;
///
/// let text = decode_lossy(b"caf\xC3\xA9 \xFF ok");
/// assert!(text.starts_with("café"));
/// assert!(text.contains('\u{FFFD}'));
/// ```
pub fn decode_lossy(bytes: &[u8]) -> String {
    let (cow, _had_errors) = UTF_8.decode_with_bom_removal(bytes);
    cow.into_owned()
}

/// Sanitize review text
///
/// This function applies multiple cleaning steps:
/// 1. Remove zero-width characters and replacement characters
/// 2. Remove control characters (except newline/tab)
/// 3. Decode HTML entities and strip tags
/// 4. Remove URLs and e-mail addresses
/// 5. Normalize whitespace, trim lines, collapse blank lines
///
/// # Examples
///
/// ```
/// use forkast::text::sanitize::sanitize_text;
///
/// let dirty = "Great\u{200B} tacos!  See https://example.com  \n\n\n\nWill return";
/// let clean = sanitize_text(dirty);
/// assert_eq!(clean, "Great tacos! See\n\nWill return");
/// ```
pub fn sanitize_text(text: &str) -> String {
    let mut result = remove_invisible(text);

    result = remove_control_chars(&result);
    result = decode_html_entities(&result);
    result = strip_html_tags(&result);
    result = remove_links(&result);
    result = normalize_whitespace(&result);
    result = trim_lines(&result);
    result = collapse_newlines(&result);

    result.trim().to_string()
}

/// Remove zero-width spaces, formatting marks and replacement characters
///
/// Removes:
/// - \u{200B}-\u{200F} Zero-width characters and direction marks
/// - \u{2028}-\u{202F} Line/paragraph separators and embedding controls
/// - \u{FEFF} Byte order mark (BOM)
/// - \u{FFFD} Replacement character left by lossy decoding
pub fn remove_invisible(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}' |
                '\u{FFFD}'
            )
        })
        .collect()
}

/// Remove control characters except newline and tab
///
/// Carriage returns become newlines first so Windows line endings survive.
pub fn remove_control_chars(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Decode common HTML entities to plain text
///
/// Reviews pasted from web pages frequently carry escaped quotes and
/// ampersands ("Mac &amp; Cheese").
pub fn decode_html_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#xa0;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Remove markup tags, keeping their text content
pub fn strip_html_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").to_string()
}

/// Remove URLs and e-mail addresses
pub fn remove_links(text: &str) -> String {
    let without_urls = URL_REGEX.replace_all(text, "");
    EMAIL_REGEX.replace_all(&without_urls, "").to_string()
}

/// Normalize multiple spaces/tabs to single space
///
/// Does NOT affect newlines, which carry sentence boundaries.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").to_string()
}

/// Trim whitespace from each line
pub fn trim_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse excessive newlines to maximum of 2
pub fn collapse_newlines(text: &str) -> String {
    MULTI_NEWLINE_REGEX.replace_all(text, "\n\n").to_string()
}

/// Check if text contains meaningful content
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Truncate text to max length (in characters) with ellipsis
///
/// # Examples
///
/// ```
/// use forkast::text::sanitize::truncate;
///
/// assert_eq!(truncate("Hello World", 5), "He...");
/// assert_eq!(truncate("Hello World", 20), "Hello World");
/// ```
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
