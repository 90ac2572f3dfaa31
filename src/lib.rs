//! forkast - Restaurant review analyzer
//!
//! Turns free-text restaurant reviews into structured reports: overall
//! sentiment, per-aspect sentiment (food, service, ambiance, price), cuisine
//! classification and named entities (dishes, locations, people, features).
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and report types
//! - [`text`] - Tokenization, sentence/clause splitting, phrase matching
//! - [`sentiment`] - Polarity scoring and thresholds
//! - [`aspect`] - Aspect keyword detection with local sentiment
//! - [`cuisine`] - Keyword-weighted cuisine classification
//! - [`entity`] - Entity recognition with gazetteers and a pluggable tagger
//! - [`analyzer`] - The complete pipeline
//! - [`evaluation`] - Labeled samples and classification metrics
//! - [`render`] - Text/JSON/HTML report rendering
//! - [`web`] - HTML form and JSON API
//!
//! # Example
//!
//! ```no_run
//! use forkast::analyzer::ReviewAnalyzer;
//! use forkast::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let analyzer = ReviewAnalyzer::from_config(&config)?;
//!     let report = analyzer.analyze_text("The pasta was delicious but service was slow");
//!     println!("{}", report.sentiment.label);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod aspect;
pub mod config;
pub mod cuisine;
pub mod entity;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod render;
pub mod sentiment;
pub mod text;
pub mod web;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analyzer::ReviewAnalyzer;
    pub use crate::config::Config;
    pub use crate::entity::{EntityTagger, GenericLabel, TaggedSpan};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{
        AnalysisReport, Aspect, AspectResult, CuisineResult, Entity, EntityCategory,
        EntityResult, Review, SentimentLabel, SentimentResult,
    };
    pub use crate::render::{OutputFormat, ReportRenderer};
    pub use crate::sentiment::PolarityModel;
}

// Direct re-exports for convenience
pub use analyzer::ReviewAnalyzer;
pub use models::{AnalysisReport, Review};
