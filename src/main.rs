use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forkast::analyzer::ReviewAnalyzer;
use forkast::config::Config;
use forkast::evaluation::{evaluate, sample_reviews, EvaluationReport, Metrics};
use forkast::models::Review;
use forkast::render::{OutputFormat, ReportRenderer};
use forkast::text::sanitize::{decode_lossy, has_content, truncate};
use forkast::web::{shutdown_signal, ReviewServer};

#[derive(Parser)]
#[command(
    name = "forkast",
    version,
    about = "Restaurant review analyzer: sentiment, aspects, cuisine and entities",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single review
    Analyze {
        /// Review text; read from stdin when neither TEXT nor --file is given
        #[arg(conflicts_with = "file")]
        text: Option<String>,

        /// Read the review from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Restaurant identifier attached to the report
        #[arg(long)]
        restaurant_id: Option<String>,

        /// Star rating (1-5)
        #[arg(short, long, value_parser = parse_rating)]
        rating: Option<f32>,

        /// Output format (text, json, html)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Start the web interface
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the built-in sample reviews
    Samples {
        /// Also print the analysis of every sample
        #[arg(short, long, default_value = "false")]
        analyze: bool,
    },

    /// Measure accuracy on the built-in samples
    Evaluate {
        /// Print the evaluation as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::debug!(config = ?cli.config, "forkast starting");

    let analyzer = build_analyzer(&config);

    match cli.command {
        Commands::Analyze {
            text,
            file,
            restaurant_id,
            rating,
            format,
        } => {
            let format: OutputFormat = format.parse()?;
            let text = read_input(text, file.as_deref())?;
            let mut review = Review::new(text);
            review.restaurant_id = restaurant_id;
            review.rating = rating;

            tracing::info!(
                chars = review.text.chars().count(),
                restaurant_id = ?review.restaurant_id,
                "Starting analyze command"
            );
            if !has_content(&review.text) {
                tracing::warn!("Review has no text; the report will be empty");
            }
            analyze(&analyzer, &review, format)?;
        }

        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(&config, analyzer).await?;
        }

        Commands::Samples { analyze } => {
            samples(&analyzer, analyze)?;
        }

        Commands::Evaluate { json } => {
            let report = evaluate(&analyzer, sample_reviews());
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_evaluation(&report);
            }
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { level };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new(format!("forkast={level},tower_http={level},warn"))
        })
        .with_context(|| format!("Invalid log level: {level}"))?;

    // Logs go to stderr so reports on stdout stay pipeable.
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

/// Build the analyzer or exit; resource problems are not recoverable
fn build_analyzer(config: &Config) -> ReviewAnalyzer {
    match ReviewAnalyzer::from_config(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            tracing::error!(category = e.category().description(), error = %e, "Failed to initialize analyzer");
            std::process::exit(1);
        }
    }
}

fn parse_rating(raw: &str) -> std::result::Result<f32, String> {
    let rating: f32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if (1.0..=5.0).contains(&rating) {
        Ok(rating)
    } else {
        Err(format!("rating must be between 1 and 5, got {rating}"))
    }
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let bytes = match file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read review file: {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read review from stdin")?;
            buf
        }
    };

    Ok(decode_lossy(&bytes))
}

fn analyze(analyzer: &ReviewAnalyzer, review: &Review, format: OutputFormat) -> Result<()> {
    let renderer = ReportRenderer::new()?;
    let report = analyzer.analyze(review);
    let output = renderer
        .render(&report, format)
        .context("Failed to render report")?;
    println!("{output}");
    Ok(())
}

async fn serve(config: &Config, analyzer: ReviewAnalyzer) -> Result<()> {
    let addr = config.bind_addr()?;
    let server = ReviewServer::new(addr, analyzer, &config.server)?;

    println!("Serving review analyzer on http://{addr} (Ctrl+C to stop)");
    server
        .start_with_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;
    Ok(())
}

fn samples(analyzer: &ReviewAnalyzer, with_analysis: bool) -> Result<()> {
    let renderer = ReportRenderer::new()?;

    for (i, sample) in sample_reviews().iter().enumerate() {
        let text = if with_analysis {
            sample.text.to_string()
        } else {
            truncate(sample.text, 72)
        };
        println!("{}. [{}★ {}] {text}", i + 1, sample.rating, sample.cuisine);
        if with_analysis {
            let report = analyzer.analyze(&sample.to_review());
            println!("{}", renderer.render_text(&report)?);
        }
    }
    Ok(())
}

fn print_metrics(name: &str, metrics: &Metrics) {
    println!(
        "{name:<10} accuracy {:.4}  precision {:.4}  recall {:.4}  f1 {:.4}",
        metrics.accuracy, metrics.precision, metrics.recall, metrics.f1_score
    );
}

fn print_evaluation(report: &EvaluationReport) {
    println!("Evaluated {} sample reviews\n", report.samples);
    print_metrics("Sentiment", &report.sentiment);
    print_metrics("Cuisine", &report.cuisine);
    println!();

    for outcome in &report.outcomes {
        let sentiment_mark = if outcome.expected_sentiment == outcome.predicted_sentiment {
            "✓"
        } else {
            "✗"
        };
        let cuisine_mark = if outcome.expected_cuisine == outcome.predicted_cuisine {
            "✓"
        } else {
            "✗"
        };
        println!(
            "{sentiment_mark} {:<8} (expected {:<8})  {cuisine_mark} {:<13} (expected {})",
            outcome.predicted_sentiment.as_str(),
            outcome.expected_sentiment.as_str(),
            outcome.predicted_cuisine,
            outcome.expected_cuisine
        );
    }
}
