//! HTTP handlers for the review analyzer
//!
//! The HTML form and the JSON API share the same input checks; everything
//! else is delegated to the analyzer and the renderer.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::evaluation::{sample_reviews, SampleReview};
use crate::models::{AnalysisReport, Review};
use crate::render::PageView;

use super::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// JSON analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// HTML form submission; empty inputs arrive as empty strings
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub restaurant_id: String,
    #[serde(default)]
    pub rating: String,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Web interface
        .route("/", get(index))
        .route("/analyze", post(analyze_form))
        // JSON API
        .route("/api/analyze", post(analyze_json))
        .route("/api/samples", get(list_samples))
        .route("/api/health", get(health_check))
        .with_state(state)
}

/// Check a submitted review before analysis
///
/// The analyzer accepts any text; the length floor only exists so users
/// get feedback instead of an empty report.
pub fn validate_submission(
    text: &str,
    rating: Option<f32>,
    min_chars: usize,
) -> Result<(), String> {
    let chars = text.trim().chars().count();
    if chars < min_chars {
        return Err(format!(
            "Review is too short ({chars} characters, at least {min_chars} required)"
        ));
    }
    if let Some(rating) = rating {
        if !(1.0..=5.0).contains(&rating) {
            return Err(format!("Rating must be between 1 and 5, got {rating}"));
        }
    }
    Ok(())
}

fn build_review(text: String, restaurant_id: Option<String>, rating: Option<f32>) -> Review {
    Review {
        text,
        restaurant_id: restaurant_id.filter(|id| !id.trim().is_empty()),
        rating,
    }
}

fn render_page(state: &AppState, page: &PageView) -> Response {
    match state.renderer.render_page(page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

// ============================================================================
// Web Handlers
// ============================================================================

/// Review form
async fn index(State(state): State<AppState>) -> Response {
    let page = PageView::form(state.min_review_chars, sample_reviews());
    render_page(&state, &page)
}

/// Form submission rendered as an HTML report
async fn analyze_form(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let page = PageView::form(state.min_review_chars, &[]);

    let rating = match form.rating.trim() {
        "" => None,
        raw => match raw.parse::<f32>() {
            Ok(value) => Some(value),
            Err(_) => {
                let page = page.with_error(&form.text, format!("Invalid rating '{raw}'"));
                return render_page(&state, &page);
            }
        },
    };

    if let Err(message) = validate_submission(&form.text, rating, state.min_review_chars) {
        tracing::debug!(reason = %message, "Rejected form submission");
        return render_page(&state, &page.with_error(&form.text, message));
    }

    let review = build_review(form.text, Some(form.restaurant_id), rating);
    let report = state.analyzer.analyze(&review);
    render_page(&state, &page.with_report(&report))
}

// ============================================================================
// JSON Handlers
// ============================================================================

/// Analyze a review and return the report
async fn analyze_json(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisReport>>, (StatusCode, Json<ErrorResponse>)> {
    validate_submission(&request.text, request.rating, state.min_review_chars)
        .map_err(|message| (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(message))))?;

    let review = build_review(request.text, request.restaurant_id, request.rating);
    Ok(Json(ApiResponse::success(state.analyzer.analyze(&review))))
}

/// Built-in sample reviews
async fn list_samples() -> Json<ApiResponse<Vec<SampleReview>>> {
    Json(ApiResponse::success(sample_reviews().to_vec()))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_submission() {
        assert!(validate_submission("Great food, will return", None, 10).is_ok());
        assert!(validate_submission("  Good  ", None, 10).is_err());
        assert!(validate_submission("Great food, will return", Some(6.0), 10).is_err());
        assert!(validate_submission("Great food, will return", Some(4.5), 10).is_ok());
    }

    #[test]
    fn test_short_review_message() {
        let err = validate_submission("Yum", None, 10).unwrap_err();
        assert!(err.contains("3 characters"));
    }

    #[test]
    fn test_blank_restaurant_id_dropped() {
        let review = build_review("text".into(), Some("  ".into()), None);
        assert_eq!(review.restaurant_id, None);
    }
}
