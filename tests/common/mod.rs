//! Common test utilities

use std::io::Write;

use forkast::analyzer::ReviewAnalyzer;
use forkast::config::Config;
use tempfile::NamedTempFile;

/// Analyzer with the built-in configuration
#[allow(dead_code)]
pub fn analyzer() -> ReviewAnalyzer {
    analyzer_with(&Config::default())
}

/// Analyzer built from a custom configuration
#[allow(dead_code)]
pub fn analyzer_with(config: &Config) -> ReviewAnalyzer {
    ReviewAnalyzer::from_config(config).expect("analyzer should build")
}

/// Write `content` to a fresh temporary file
#[allow(dead_code)]
pub fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
