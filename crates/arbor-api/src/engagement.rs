use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use arbor_social::engagement;
use arbor_types::api::{CreateCommentRequest, ReactRequest};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::middleware::Claims;

pub async fn like_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let like = run_blocking(move || engagement::like_post(&state.db, &actor, post_id)).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

pub async fn unlike_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    run_blocking(move || engagement::unlike_post(&state.db, &actor, post_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn react_to_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ReactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let reaction = run_blocking(move || {
        engagement::react_to_post(&state.db, &actor, post_id, &req.reaction_type)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(reaction)))
}

pub async fn comment_on_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let comment = run_blocking(move || {
        engagement::comment_on_post(&state.db, &actor, post_id, &req.content)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = run_blocking(move || engagement::post_comments(&state.db, post_id)).await?;
    Ok(Json(comments))
}

pub async fn post_reactions(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let reactions = run_blocking(move || engagement::post_reactions(&state.db, post_id)).await?;
    Ok(Json(reactions))
}
