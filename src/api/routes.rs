use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::analytics::{
    self, CategoryBreakdown, DayOfWeekBreakdown, FareDistribution, FilterOptions, HourlyBreakdown,
    KpiSummary, MonthlyBreakdown, PageRequest, RatingDistribution, RoutesResponse, StatusFilter,
    SummaryStatistics, SurgeBreakdown, TripFilter, TripPage, ZoneBreakdown,
};
use crate::generator::Dataset;
use crate::middleware::request_logging;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Dataset,
}

/// Create the API router
pub fn create_router(dataset: Dataset) -> Router {
    let state = AppState { dataset };

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .route("/api/kpi", get(get_kpi))
        .route("/api/monthly", get(get_monthly))
        .route("/api/hourly", get(get_hourly))
        .route("/api/dow", get(get_day_of_week))
        .route("/api/categories", get(get_categories))
        .route("/api/fare_distribution", get(get_fare_distribution))
        .route("/api/zones", get(get_zones))
        .route("/api/routes", get(get_routes))
        .route("/api/surge", get(get_surge))
        .route("/api/ratings", get(get_ratings))
        .route("/api/trips", get(get_trips))
        .route("/api/filters", get(get_filters))
        .route("/api/stats", get(get_stats))
        .with_state(state)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

// ===== Route Handlers =====

const INDEX_HTML: &str = include_str!("index.html");

/// Landing page linking the JSON endpoints
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Liveness probe
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.dataset.len(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn get_kpi(State(state): State<AppState>) -> Json<KpiSummary> {
    Json(analytics::kpi_summary(&state.dataset))
}

async fn get_monthly(State(state): State<AppState>) -> Json<MonthlyBreakdown> {
    Json(analytics::monthly_breakdown(&state.dataset))
}

async fn get_hourly(State(state): State<AppState>) -> Json<HourlyBreakdown> {
    Json(analytics::hourly_breakdown(&state.dataset))
}

async fn get_day_of_week(State(state): State<AppState>) -> Json<DayOfWeekBreakdown> {
    Json(analytics::day_of_week_breakdown(&state.dataset))
}

async fn get_categories(State(state): State<AppState>) -> Json<CategoryBreakdown> {
    Json(analytics::category_breakdown(&state.dataset))
}

async fn get_fare_distribution(State(state): State<AppState>) -> Json<FareDistribution> {
    Json(analytics::fare_distribution(&state.dataset))
}

async fn get_zones(State(state): State<AppState>) -> Json<ZoneBreakdown> {
    Json(analytics::top_zones(&state.dataset))
}

async fn get_routes(State(state): State<AppState>) -> Json<RoutesResponse> {
    Json(analytics::top_routes(&state.dataset))
}

async fn get_surge(State(state): State<AppState>) -> Json<SurgeBreakdown> {
    Json(analytics::surge_by_hour(&state.dataset))
}

async fn get_ratings(State(state): State<AppState>) -> Json<RatingDistribution> {
    Json(analytics::rating_distribution(&state.dataset))
}

/// Paginated, filtered trip listing. Parameter errors are rejected before
/// the dataset is touched.
async fn get_trips(
    State(state): State<AppState>,
    params: Result<Query<TripsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = PageRequest::new(params.page, params.per_page)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let filter = params.into_filter();

    let listing: TripPage<'_> = analytics::list_trips(&state.dataset, &filter, page);
    Ok(Json(listing).into_response())
}

async fn get_filters(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(analytics::filter_options(&state.dataset))
}

async fn get_stats(State(state): State<AppState>) -> Json<SummaryStatistics> {
    Json(analytics::summary_statistics(&state.dataset))
}

// ===== Request/Response Types =====

#[derive(Debug, Deserialize)]
struct TripsQuery {
    /// 1-based page index
    page: Option<usize>,
    per_page: Option<usize>,
    /// Exact category name
    category: Option<String>,
    /// Pickup or dropoff zone
    zone: Option<String>,
    /// "completed", "cancelled", or anything else for all
    status: Option<String>,
}

impl TripsQuery {
    fn into_filter(self) -> TripFilter {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        TripFilter {
            category: non_empty(self.category),
            zone: non_empty(self.zone),
            status: self
                .status
                .as_deref()
                .map(StatusFilter::from_param)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    records: usize,
    timestamp: String,
}

// ===== Error Handling =====

/// Client errors, returned as `{"error": ...}` JSON.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::four_trips;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(uri: &str) -> (StatusCode, Value) {
        let app = create_router(four_trips());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let response = ApiError::BadRequest("page must be at least 1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "page must be at least 1");
    }

    #[tokio::test]
    async fn test_trips_category_filter_is_exact() {
        let (status, body) = get("/api/trips?category=Black").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["trips"][0]["category"], "Black");

        let (_, body) = get("/api/trips?category=black").await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_kpi_fixture() {
        let (status, body) = get("/api/kpi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_trips"], 4);
        assert_eq!(body["cancel_rate"], 50.0);
        assert_eq!(body["avg_rating"], 4.5);
    }

    #[tokio::test]
    async fn test_trips_rejects_non_numeric_page() {
        let (status, body) = get("/api/trips?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = get("/api/trips?per_page=ten").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get("/api/trips?page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_trips_empty_filters_mean_unfiltered() {
        let (status, body) = get("/api/trips?category=&zone=&status=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 4);
        assert_eq!(body["per_page"], 20);
        assert_eq!(body["trips"][0]["trip_id"], "TRP1000003");
        assert!(body["trips"][0]["rating"].is_null());
    }

    #[tokio::test]
    async fn test_trips_filtered_to_nothing_is_valid_page() {
        let (status, body) = get("/api/trips?zone=Atlantis").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["pages"], 0);
        assert_eq!(body["trips"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_health_and_cors() {
        let app = create_router(four_trips());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["records"], 4);
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let app = create_router(four_trips());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get("/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
