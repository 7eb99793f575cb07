//! # API REST
//!
//! HTTP surface for SymptomX.
//!
//! Handles:
//! - The HTML symptom form (`GET /`, `POST /`) and its static assets
//! - JSON endpoints with axum (`/api/diagnose`, `/api/diseases`, `/health`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Matching itself lives in `symptomx-core`; handlers only shape requests and responses.

#![warn(rust_2018_idioms)]

pub mod html;

use axum::{
    extract::{rejection::FormRejection, State},
    http::header,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{DiagnoseReq, DiagnoseRes, DiseaseRes, HealthRes, ListDiseasesRes, MatchItem};
use symptomx_core::{CoreConfig, SymptomService};

const THEME_JS: &str = include_str!("../static/theme.js");
const STYLE_CSS: &str = include_str!("../static/style.css");

/// Application state for the REST API server
///
/// Holds the diagnosis service over the loaded dataset and the default
/// number of matches per query. Both are fixed at startup.
#[derive(Clone)]
pub struct AppState {
    service: SymptomService,
    top_k: usize,
}

impl AppState {
    pub fn new(service: SymptomService, top_k: usize) -> Self {
        Self { service, top_k }
    }

    /// Loads the dataset named by `cfg` and keeps its default `top_k`.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(SymptomService::from_config(cfg), cfg.top_k())
    }

    pub fn service(&self) -> &SymptomService {
        &self.service
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, diagnose, list_diseases),
    components(schemas(
        HealthRes,
        DiagnoseReq,
        DiagnoseRes,
        MatchItem,
        DiseaseRes,
        ListDiseasesRes,
    ))
)]
pub struct ApiDoc;

/// Builds the complete router: HTML page, JSON API, static assets and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(health))
        .route("/api/diagnose", post(diagnose))
        .route("/api/diseases", get(list_diseases))
        .route("/static/theme.js", get(theme_js))
        .route("/static/style.css", get(style_css))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Form body posted by the symptom page.
#[derive(Debug, Default, Deserialize)]
pub struct SymptomForm {
    #[serde(default)]
    pub symptoms: String,
}

/// Renders the empty symptom form.
async fn index() -> Html<String> {
    Html(html::render_index(&html::IndexPage::default()))
}

/// Diagnoses the submitted symptoms and renders the page with the result.
///
/// Always answers 200: no match and empty input are shown as neutral messages. A body that is
/// not a form is treated as an empty submission.
#[axum::debug_handler]
async fn submit(
    State(state): State<AppState>,
    form: Result<Form<SymptomForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("unreadable form submission: {}", rejection);
            SymptomForm::default()
        }
    };
    let user_input = form.symptoms.trim();
    let result = state.service.diagnose(user_input, state.top_k);
    tracing::info!(
        "diagnose: {} chars, primary={:?}",
        user_input.len(),
        result.primary.as_ref().map(|m| m.disease.as_str())
    );

    Html(html::render_index(&html::IndexPage {
        user_input,
        result: Some(&result),
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports the loaded dataset: record and vocabulary counts, source and load time.
/// This endpoint is used for monitoring and load balancer health checks.
///
/// # Returns
/// * `Json<HealthRes>` - Health status response
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(state.service.health())
}

#[utoipa::path(
    post,
    path = "/api/diagnose",
    request_body = DiagnoseReq,
    responses(
        (status = 200, description = "Ranked matches, possibly empty", body = DiagnoseRes),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "JSON body with the wrong shape")
    )
)]
/// Diagnose free-text symptoms
///
/// Ranks the dataset against `symptoms` and returns the best match as `primary`
/// and the next ones as `possible`. `top_k` overrides the server default.
///
/// # Returns
/// * `Json<DiagnoseRes>` - Matches, or a neutral `message` when there are none
#[axum::debug_handler]
async fn diagnose(State(state): State<AppState>, Json(req): Json<DiagnoseReq>) -> Json<DiagnoseRes> {
    let top_k = req.top_k.map_or(state.top_k, |k| k as usize);
    Json(state.service.diagnose(&req.symptoms, top_k))
}

#[utoipa::path(
    get,
    path = "/api/diseases",
    responses(
        (status = 200, description = "Loaded disease records", body = ListDiseasesRes)
    )
)]
/// List the loaded disease records in dataset order
#[axum::debug_handler]
async fn list_diseases(State(state): State<AppState>) -> Json<ListDiseasesRes> {
    Json(ListDiseasesRes {
        diseases: state.service.list_diseases(),
    })
}

async fn theme_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        THEME_JS,
    )
}

async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}
