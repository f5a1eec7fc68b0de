use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{Encoder, MatchError, MatchingPipeline};
use crate::models::{
    ErrorResponse, HealthResponse, MatchQuery, MatchResult, ReloadResponse, SearchRequest,
    SearchResponse,
};
use crate::services::{JsonProfileStore, ProfileStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<MatchingPipeline>,
    pub store: Arc<JsonProfileStore>,
    pub matching: MatchingSettings,
}

/// Configure all dating routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dating")
            .route("/search", web::post().to(search_profiles))
            .route("/users", web::get().to(get_all_users))
            .route("/users/reload", web::post().to(reload_users))
            .route("/user/{user_id}", web::get().to(get_user_profile))
            .route("/match/{user_id}", web::post().to(get_matches_for_user)),
    );
}

/// Health check endpoint
///
/// Reports `degraded` when the encoder failed to load.
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.pipeline.encoder_available() { "healthy" } else { "degraded" };
    let embeddings_cached = state
        .pipeline
        .embedding_cache_stats()
        .await
        .map(|stats| stats.entries)
        .unwrap_or(0);

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        encoder: state.pipeline.encoder().name().to_string(),
        profiles: state.store.len().await,
        embeddings_cached,
        timestamp: chrono::Utc::now(),
    })
}

/// Search profiles with a natural-language query
///
/// POST /api/v1/dating/search
///
/// Request body:
/// ```json
/// {
///   "query": "string",
///   "user_id": "string",
///   "top_k": 5
/// }
/// ```
async fn search_profiles(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let top_k = state.matching.resolve_top_k(req.top_k);
    tracing::info!("Searching profiles: query='{}', top_k={}", req.query, top_k);

    match state
        .pipeline
        .search(&req.query, req.user_id.as_deref(), top_k)
        .await
    {
        Ok(results) => {
            let results: Vec<MatchResult> = results.into_iter().map(MatchResult::from).collect();
            HttpResponse::Ok().json(SearchResponse {
                success: true,
                query: req.query.clone(),
                total_results: results.len(),
                results,
                timestamp: chrono::Utc::now(),
            })
        }
        Err(e) => {
            tracing::error!("Search error: {}", e);
            error_response(&e)
        }
    }
}

/// Get user profile by ID
///
/// GET /api/v1/dating/user/{user_id}
async fn get_user_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.store.get(&user_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => error_response(&MatchError::NotFound(format!("user {}", user_id))),
        Err(e) => {
            tracing::error!("Get user error: {}", e);
            error_response(&MatchError::from(e))
        }
    }
}

/// Get all user profiles
///
/// GET /api/v1/dating/users
async fn get_all_users(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_all().await {
        Ok(profiles) => HttpResponse::Ok().json(&*profiles),
        Err(e) => {
            tracing::error!("Get all users error: {}", e);
            error_response(&MatchError::from(e))
        }
    }
}

/// Get matches for a specific user based on their profile
///
/// POST /api/v1/dating/match/{user_id}?top_k=5
async fn get_matches_for_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MatchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = path.into_inner();
    let top_k = state.matching.resolve_top_k(query.top_k);

    match state.pipeline.match_for_user(&user_id, top_k).await {
        Ok(results) => {
            let results: Vec<MatchResult> = results.into_iter().map(MatchResult::from).collect();
            HttpResponse::Ok().json(results)
        }
        Err(e) => {
            tracing::error!("Match error for {}: {}", user_id, e);
            error_response(&e)
        }
    }
}

/// Re-read the profiles file and drop cached embeddings
///
/// POST /api/v1/dating/users/reload
async fn reload_users(state: web::Data<AppState>) -> impl Responder {
    match state.store.reload().await {
        Ok(count) => {
            state.pipeline.invalidate_embeddings();
            HttpResponse::Ok().json(ReloadResponse {
                success: true,
                profiles: count,
            })
        }
        Err(e) => {
            tracing::error!("Failed to reload profiles: {}", e);
            error_response(&MatchError::from(e))
        }
    }
}

/// Map a pipeline error to its JSON response
fn error_response(err: &MatchError) -> HttpResponse {
    let (mut builder, error, status_code) = match err {
        MatchError::InvalidInput(_) => (HttpResponse::BadRequest(), "Invalid input", 400),
        MatchError::NotFound(_) => (HttpResponse::NotFound(), "Not found", 404),
        MatchError::EncoderUnavailable(_) => {
            (HttpResponse::ServiceUnavailable(), "Matching unavailable", 503)
        }
        MatchError::Store(_) | MatchError::Rules(_) => {
            (HttpResponse::InternalServerError(), "Internal error", 500)
        }
    };

    builder.json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code,
    })
}
