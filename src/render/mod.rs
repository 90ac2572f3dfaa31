//! Report rendering with Handlebars templates
//!
//! Reports are rendered as plain text (terminal), JSON, or an HTML page.
//! Templates are embedded at compile time; the renderer holds no analysis
//! logic and only reshapes an [`AnalysisReport`] for display.

use handlebars::Handlebars;
use serde::Serialize;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::evaluation::SampleReview;
use crate::models::{AnalysisReport, EntityCategory};

/// Default terminal report template
const TEXT_TEMPLATE: &str = include_str!("../../templates/report.txt.hbs");

/// Default web page template
const PAGE_TEMPLATE: &str = include_str!("../../templates/index.html.hbs");

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(Error::invalid_config(
                "format",
                format!("unknown output format '{other}' (expected text, json or html)"),
            )),
        }
    }
}

// ============================================================================
// Template data
// ============================================================================

#[derive(Debug, Serialize)]
struct SentimentView {
    label: String,
    label_upper: String,
    emoji: &'static str,
    confidence: String,
    method: String,
}

#[derive(Debug, Serialize)]
struct AspectRow {
    /// Padded name for the terminal table
    name: String,
    title: &'static str,
    label: &'static str,
    emoji: &'static str,
    phrases: String,
}

#[derive(Debug, Serialize)]
struct CuisineView {
    label: String,
    emoji: &'static str,
    confidence: String,
    method: String,
}

#[derive(Debug, Serialize)]
struct EntityGroup {
    category: &'static str,
    items: String,
}

#[derive(Debug, Serialize)]
struct StatsView {
    word_count: usize,
    sentence_count: usize,
    char_count: usize,
}

/// Display-ready form of an analysis report
#[derive(Debug, Serialize)]
pub struct ReportView {
    sentiment: SentimentView,
    aspects: Vec<AspectRow>,
    cuisine: CuisineView,
    entities: Vec<EntityGroup>,
    stats: StatsView,
}

fn percent(value: f32) -> String {
    format!("{:.2}%", value * 100.0)
}

impl From<&AnalysisReport> for ReportView {
    fn from(report: &AnalysisReport) -> Self {
        let aspects = report
            .aspects
            .iter()
            .map(|(aspect, value)| AspectRow {
                name: format!("{:<9}", aspect.title()),
                title: aspect.title(),
                label: value.display_label(),
                emoji: value.emoji(),
                phrases: value.matched_phrases.join(", "),
            })
            .collect();

        let entities = EntityCategory::all()
            .into_iter()
            .filter_map(|category| {
                let items: Vec<&str> = report
                    .entities
                    .by_category(category)
                    .map(|e| e.text.as_str())
                    .collect();
                (!items.is_empty()).then(|| EntityGroup {
                    category: category_title(category),
                    items: items.join(", "),
                })
            })
            .collect();

        Self {
            sentiment: SentimentView {
                label: report.sentiment.label.to_string(),
                label_upper: report.sentiment.label.as_str().to_uppercase(),
                emoji: report.sentiment.label.emoji(),
                confidence: percent(report.sentiment.score),
                method: report.sentiment.method.clone(),
            },
            aspects,
            cuisine: CuisineView {
                label: report.cuisine.label.clone(),
                emoji: report.cuisine.emoji(),
                confidence: percent(report.cuisine.score),
                method: report.cuisine.method.clone(),
            },
            entities,
            stats: StatsView {
                word_count: report.stats.word_count,
                sentence_count: report.stats.sentence_count,
                char_count: report.stats.char_count,
            },
        }
    }
}

fn category_title(category: EntityCategory) -> &'static str {
    match category {
        EntityCategory::Dish => "Dishes",
        EntityCategory::Location => "Locations",
        EntityCategory::Person => "People",
        EntityCategory::Feature => "Features",
    }
}

/// Data for the web page: form state plus an optional report
#[derive(Debug, Default, Serialize)]
pub struct PageView {
    pub text: String,
    pub restaurant_id: String,
    pub rating: String,
    pub min_chars: usize,
    pub error: Option<String>,
    pub report: Option<ReportView>,
    pub samples: Vec<SampleReview>,
}

impl PageView {
    /// Empty form
    pub fn form(min_chars: usize, samples: &[SampleReview]) -> Self {
        Self {
            min_chars,
            samples: samples.to_vec(),
            ..Default::default()
        }
    }

    /// Form pre-filled from a report
    pub fn with_report(mut self, report: &AnalysisReport) -> Self {
        self.text = report.review.text.clone();
        self.restaurant_id = report.review.restaurant_id.clone().unwrap_or_default();
        self.rating = report.review.rating.map(|r| r.to_string()).unwrap_or_default();
        self.report = Some(ReportView::from(report));
        self
    }

    /// Form showing a validation error
    pub fn with_error(mut self, text: &str, error: impl Into<String>) -> Self {
        self.text = text.to_string();
        self.error = Some(error.into());
        self
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Report renderer holding the compiled templates
pub struct ReportRenderer<'a> {
    /// Plain text templates (no escaping)
    text: Handlebars<'a>,

    /// HTML templates (escaped)
    html: Handlebars<'a>,
}

impl std::fmt::Debug for ReportRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRenderer").finish_non_exhaustive()
    }
}

impl<'a> ReportRenderer<'a> {
    /// Create a renderer with the embedded templates
    pub fn new() -> Result<Self> {
        let mut text = Handlebars::new();
        text.register_escape_fn(handlebars::no_escape);
        text.set_strict_mode(true);
        text.register_template_string("report", TEXT_TEMPLATE)?;

        let mut html = Handlebars::new();
        html.register_template_string("page", PAGE_TEMPLATE)?;

        Ok(Self { text, html })
    }

    /// Render a report in the requested format
    pub fn render(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => self.render_text(report),
            OutputFormat::Json => self.render_json(report),
            OutputFormat::Html => self.render_page(&PageView::default().with_report(report)),
        }
    }

    /// Terminal report
    pub fn render_text(&self, report: &AnalysisReport) -> Result<String> {
        Ok(self.text.render("report", &ReportView::from(report))?)
    }

    /// Pretty-printed JSON
    pub fn render_json(&self, report: &AnalysisReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Full HTML page
    pub fn render_page(&self, page: &PageView) -> Result<String> {
        Ok(self.html.render("page", page)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ReviewAnalyzer;
    use crate::config::Config;

    fn report(text: &str) -> AnalysisReport {
        ReviewAnalyzer::from_config(&Config::default())
            .unwrap()
            .analyze_text(text)
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_text() {
        let renderer = ReportRenderer::new().unwrap();
        let output = renderer
            .render_text(&report("I loved the Pad Thai at Golden Spoon"))
            .unwrap();

        assert!(output.contains("Overall Sentiment: POSITIVE"));
        assert!(output.contains("Cuisine Type: Thai"));
        assert!(output.contains("Dishes: Pad Thai"));
        assert!(output.contains("Locations: Golden Spoon"));
        assert!(output.contains("not mentioned"));
    }

    #[test]
    fn test_render_text_empty_review() {
        let renderer = ReportRenderer::new().unwrap();
        let output = renderer.render_text(&report("")).unwrap();
        assert!(output.contains("NEUTRAL"));
        assert!(output.contains("Unknown"));
        assert!(output.contains("(none)"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let renderer = ReportRenderer::new().unwrap();
        let original = report("Great tacos, rude waiter");
        let json = renderer.render_json(&original).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_render_html_escapes_input() {
        let renderer = ReportRenderer::new().unwrap();
        let page = PageView::form(10, &[]).with_error("<script>", "Review is too short");
        let html = renderer.render_page(&page).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Review is too short"));
    }

    #[test]
    fn test_render_html_report() {
        let renderer = ReportRenderer::new().unwrap();
        let html = renderer
            .render(&report("The sushi was fresh and the staff friendly"), OutputFormat::Html)
            .unwrap();
        assert!(html.contains("Cuisine: Japanese"));
        assert!(html.contains("<table>"));
    }
}
