// Axum API Server Module
//
// Purpose: REST API for the Miyawaki planner (locations, plots + layouts,
// projects, mock species/weather/soil guidance, auth and SMS alerts)

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::{AuthError, AuthResponse, AuthService, Claims, LoginRequest, RegisterRequest, User, UserProfile};
use crate::config::ServerConfig;
use crate::layout::{compute_layout, LayoutError, LayoutResult, PlantingMethod, PlotSpecification, SoilType, UnitType};
use crate::models::{
    Alert, Location, LocationCreate, PlantationProject, PlantationProjectCreate, PlotDesign, PlotDesignCreate,
};
use crate::providers::guidance::{
    learning_resources, project_timeline, soil_guidance, standing_alerts, LearningResources, ProjectTimeline,
    SoilGuidance,
};
use crate::providers::weather::RAINY_DAY_CHANCE;
use crate::providers::{
    MockSmsProvider, MockSpeciesProvider, MockWeatherProvider, ProviderError, SmsProvider, SmsReceipt,
    SpeciesProvider, SpeciesReport, WeatherProvider, WeatherReport,
};
use crate::store::RecordStore;

/// Most records returned by a list endpoint
const LIST_LIMIT: usize = 1000;

const DEFAULT_SPECIES_LIMIT: usize = 20;
const MAX_SPECIES_LIMIT: usize = 100;

/// Spacing that matches the 4 plants/m² ground density
const PLANT_SPACING: &str = "0.5m x 0.5m";

/// Years until a Miyawaki plot is self-sustaining
const ESTIMATED_GROWTH_YEARS: u32 = 3;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub locations: Arc<RecordStore<Location>>,
    pub plots: Arc<RecordStore<PlotDesign>>,
    pub projects: Arc<RecordStore<PlantationProject>>,
    pub users: Arc<RecordStore<User>>,
    pub auth: Arc<AuthService>,
    /// Last computed layout per plot id
    pub layout_cache: Cache<String, LayoutResult>,
    pub species: Arc<dyn SpeciesProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub sms: Arc<dyn SmsProvider>,
}

impl AppState {
    /// State with empty stores and the mock providers
    pub fn new(config: &ServerConfig) -> Self {
        tracing::info!("Initializing Moka layout cache...");
        let layout_cache = Cache::builder()
            .max_capacity(config.layout_cache_capacity)
            .time_to_live(config.layout_cache_ttl)
            .build();

        Self {
            locations: Arc::new(RecordStore::new()),
            plots: Arc::new(RecordStore::new()),
            projects: Arc::new(RecordStore::new()),
            users: Arc::new(RecordStore::new()),
            auth: Arc::new(AuthService::new(config.jwt_secret.clone(), config.token_ttl_secs)),
            layout_cache,
            species: Arc::new(MockSpeciesProvider),
            weather: Arc::new(MockWeatherProvider),
            sms: Arc::new(MockSmsProvider::new()),
        }
    }

    pub fn with_species_provider(mut self, provider: Arc<dyn SpeciesProvider>) -> Self {
        self.species = provider;
        self
    }

    pub fn with_weather_provider(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = provider;
        self
    }

    pub fn with_sms_provider(mut self, provider: Arc<dyn SmsProvider>) -> Self {
        self.sms = provider;
        self
    }

    /// Cached layout for a plot, computing and caching it on a miss
    async fn plot_layout(&self, plot: &PlotDesign) -> Result<LayoutResult, AppError> {
        if let Some(cached) = self.layout_cache.get(&plot.id).await {
            tracing::debug!("Layout cache hit for plot {}", plot.id);
            return Ok(cached);
        }

        let layout = compute_layout(&plot.specification())?;
        self.layout_cache.insert(plot.id.clone(), layout.clone()).await;
        Ok(layout)
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api/", get(root))

        // Auth
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))

        // Locations
        .route("/api/locations", post(create_location).get(list_locations))

        // Species recommendations
        .route("/api/species/native", get(native_species))

        // Plots and layouts
        .route("/api/layout", post(preview_layout))
        .route("/api/plots", post(create_plot).get(list_plots))
        .route("/api/plots/:id", get(get_plot))
        .route("/api/plots/:id/3d-design", get(get_3d_design))

        // Projects
        .route("/api/projects", post(create_project).get(list_projects))
        .route("/api/timeline/:project_id", get(get_project_timeline))

        // Weather and soil
        .route("/api/weather/:location_id", get(get_weather))
        .route("/api/soil/guidance", get(get_soil_guidance))

        // Alerts
        .route("/api/alerts/sms", post(send_sms_alert))
        .route("/api/alerts/:project_id", get(get_project_alerts))

        // Learning
        .route("/api/learning/resources", get(get_learning_resources))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Allow all origins
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Request Context
// ============================================================================

/// Claims of the caller, taken from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = state.auth.authenticate(token, Utc::now().timestamp()).await?;
        Ok(AuthUser(claims))
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Miyawaki Forest Planner API" }))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let resp = state.auth.register(&state.users, req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.auth.login(&state.users, req).await?))
}

async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .users
        .get(&claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", claims.sub)))?;
    Ok(Json(UserProfile::from(&user)))
}

async fn logout(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> impl IntoResponse {
    state.auth.revoke(&claims, Utc::now().timestamp()).await;
    tracing::info!("Revoked session {} for user {}", claims.jti, claims.sub);
    Json(serde_json::json!({ "logged_out": true }))
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

async fn create_location(
    State(state): State<AppState>,
    Json(req): Json<LocationCreate>,
) -> Result<Json<Location>, AppError> {
    if !(-90.0..=90.0).contains(&req.latitude) || !(-180.0..=180.0).contains(&req.longitude) {
        return Err(AppError::BadRequest(format!(
            "coordinates out of range: ({}, {})",
            req.latitude, req.longitude
        )));
    }

    let location = Location::from(req);
    state.locations.insert(location.clone()).await;
    tracing::debug!("Created location {}", location.id);
    Ok(Json(location))
}

async fn list_locations(State(state): State<AppState>) -> Json<Vec<Location>> {
    Json(state.locations.list(LIST_LIMIT).await)
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

async fn native_species(
    State(state): State<AppState>,
    Query(query): Query<SpeciesQuery>,
) -> Result<Json<SpeciesReport>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_SPECIES_LIMIT).min(MAX_SPECIES_LIMIT);
    let report = state
        .species
        .native_species(query.latitude, query.longitude, limit)
        .await?;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// Plots and layouts
// ---------------------------------------------------------------------------

/// Checks the request layer owns before a specification reaches the calculator
fn validate_specification(spec: &PlotSpecification) -> Result<(), AppError> {
    if !spec.plot_size.is_finite() || spec.plot_size <= 0.0 {
        return Err(AppError::BadRequest(format!(
            "plot_size must be a positive number, got {}",
            spec.plot_size
        )));
    }
    if spec.selected_species.is_empty() {
        return Err(AppError::BadRequest("selected_species must not be empty".to_string()));
    }
    if spec.selected_species.iter().any(|s| s.trim().is_empty()) {
        return Err(AppError::BadRequest("selected_species contains an empty id".to_string()));
    }
    if !spec.aspect_ratio.is_finite() || spec.aspect_ratio <= 0.0 {
        return Err(AppError::BadRequest(format!(
            "aspect_ratio must be a positive number, got {}",
            spec.aspect_ratio
        )));
    }
    Ok(())
}

async fn preview_layout(Json(spec): Json<PlotSpecification>) -> Result<Json<LayoutResult>, AppError> {
    validate_specification(&spec)?;
    Ok(Json(compute_layout(&spec)?))
}

async fn create_plot(
    State(state): State<AppState>,
    Json(req): Json<PlotDesignCreate>,
) -> Result<Json<PlotDesign>, AppError> {
    let spec = req.specification();
    validate_specification(&spec)?;
    let layout = compute_layout(&spec)?;

    let plot = PlotDesign::new(req, layout.clone());
    state.plots.insert(plot.clone()).await;
    state.layout_cache.insert(plot.id.clone(), layout).await;

    tracing::debug!(
        "Created plot {} ({} plants)",
        plot.id,
        plot.layout_config.as_ref().map_or(0, |l| l.planting_structure.total_plants)
    );
    Ok(Json(plot))
}

async fn list_plots(State(state): State<AppState>) -> Json<Vec<PlotDesign>> {
    Json(state.plots.list(LIST_LIMIT).await)
}

async fn get_plot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlotDesign>, AppError> {
    state
        .plots
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Plot {} not found", id)))
}

async fn get_3d_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Design3d>, AppError> {
    let plot = state
        .plots
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Plot {} not found", id)))?;

    let layout = state.plot_layout(&plot).await?;

    Ok(Json(Design3d {
        plot_id: plot.id,
        plot_size: plot.plot_size,
        unit_type: plot.unit_type,
        planting_method: plot.planting_method,
        soil_type: plot.soil_type,
        species_count: plot.selected_species.len(),
        total_plants: layout.planting_structure.total_plants,
        plant_spacing: PLANT_SPACING,
        estimated_growth_years: ESTIMATED_GROWTH_YEARS,
        layout,
    }))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<PlantationProjectCreate>,
) -> Result<Json<PlantationProject>, AppError> {
    if req.project_name.trim().is_empty() {
        return Err(AppError::BadRequest("project_name must not be empty".to_string()));
    }

    let project = PlantationProject::from(req);
    state.projects.insert(project.clone()).await;
    tracing::debug!("Created project {}", project.id);
    Ok(Json(project))
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<PlantationProject>> {
    Json(state.projects.list(LIST_LIMIT).await)
}

async fn get_project_timeline(Path(project_id): Path<String>) -> Json<ProjectTimeline> {
    Json(project_timeline(&project_id))
}

// ---------------------------------------------------------------------------
// Weather and soil
// ---------------------------------------------------------------------------

async fn get_weather(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
) -> Result<Json<WeatherReport>, AppError> {
    let report = state.weather.current(&location_id).await?;
    tracing::debug!(
        "Weather for {}: {}, {} rainy day(s) in forecast",
        location_id,
        report.weather_condition,
        report.rainy_days(RAINY_DAY_CHANCE).count()
    );
    Ok(Json(report))
}

async fn get_soil_guidance(Query(query): Query<SoilQuery>) -> Json<SoilGuidance> {
    Json(soil_guidance(query.soil_type))
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

async fn get_project_alerts(Path(project_id): Path<String>) -> Json<Vec<Alert>> {
    Json(standing_alerts(&project_id))
}

async fn send_sms_alert(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<SmsAlertRequest>,
) -> Result<Json<SmsAlertResponse>, AppError> {
    let project = state
        .projects
        .get(&req.project_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", req.project_id)))?;

    if !project.weather_alerts {
        return Err(AppError::Conflict(format!(
            "Alerts are disabled for project {}",
            project.id
        )));
    }

    let severity = req.severity.as_deref().unwrap_or("medium");
    if !matches!(severity, "low" | "medium" | "high") {
        return Err(AppError::BadRequest(format!("unknown severity: {}", severity)));
    }

    let body = format!("[{}] {}: {}", severity.to_uppercase(), project.project_name, req.message.trim());
    let receipt = state.sms.send(&project.manager_phone, &body).await?;
    tracing::info!(
        "User {} sent {} alert for project {}",
        claims.sub,
        severity,
        project.id
    );

    Ok(Json(SmsAlertResponse {
        alert: Alert::new(&project.id, "weather", severity, req.message.trim()),
        receipt,
    }))
}

// ---------------------------------------------------------------------------
// Learning
// ---------------------------------------------------------------------------

async fn get_learning_resources() -> Json<LearningResources> {
    Json(learning_resources())
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize, Debug)]
struct SpeciesQuery {
    latitude: f64,
    longitude: f64,
    limit: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct SoilQuery {
    soil_type: SoilType,
}

#[derive(Deserialize, Debug)]
struct SmsAlertRequest {
    project_id: String,
    message: String,
    severity: Option<String>,
}

#[derive(Serialize, Debug)]
struct SmsAlertResponse {
    alert: Alert,
    receipt: SmsReceipt,
}

/// Layout plus the plot fields the visualization needs
#[derive(Serialize, Debug)]
struct Design3d {
    plot_id: String,
    plot_size: f64,
    unit_type: UnitType,
    planting_method: PlantingMethod,
    soil_type: SoilType,
    species_count: usize,
    total_plants: u64,
    plant_spacing: &'static str,
    estimated_growth_years: u32,
    #[serde(flatten)]
    layout: LayoutResult,
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unprocessable(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<LayoutError> for AppError {
    fn from(err: LayoutError) -> Self {
        AppError::Unprocessable(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => AppError::BadRequest(msg),
            AuthError::EmailTaken => AppError::Conflict(err.to_string()),
            AuthError::InvalidSecret | AuthError::TokenLifetime | AuthError::PasswordHash(_) => {
                tracing::error!("Auth failure: {}", err);
                AppError::Internal(err.to_string())
            }
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidRequest(msg) => AppError::BadRequest(msg),
            ProviderError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
