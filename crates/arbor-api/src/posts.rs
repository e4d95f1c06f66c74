use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use arbor_social::{posts, trending};
use arbor_types::api::{CreatePostRequest, EditPostRequest, SearchQuery};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::middleware::Claims;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let post = run_blocking(move || {
        posts::create_post(&state.db, &actor, &req.content, req.image.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<EditPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let post = run_blocking(move || {
        posts::edit_post(
            &state.db,
            &actor,
            post_id,
            req.content.as_deref(),
            req.image.as_deref(),
        )
    })
    .await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    run_blocking(move || posts::delete_post(&state.db, &actor, post_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let pinned = run_blocking(move || posts::toggle_pin(&state.db, &actor, post_id)).await?;
    Ok(Json(serde_json::json!({ "pinned": pinned })))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let feed = run_blocking(move || posts::list_posts(&state.db)).await?;
    Ok(Json(feed))
}

pub async fn user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let listed = run_blocking(move || posts::user_posts(&state.db, &username)).await?;
    Ok(Json(listed))
}

pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let hits = run_blocking(move || posts::search_posts(&state.db, &query.q)).await?;
    Ok(Json(hits))
}

pub async fn posts_by_hashtag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tagged = run_blocking(move || posts::posts_by_hashtag(&state.db, &tag)).await?;
    Ok(Json(tagged))
}

pub async fn trending_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let ranked =
        run_blocking(move || trending::trending_posts(&state.db, chrono::Utc::now())).await?;
    Ok(Json(ranked))
}
