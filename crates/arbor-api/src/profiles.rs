use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use arbor_social::profiles;
use arbor_types::api::{CreateProfileRequest, PageQuery, UpdateProfileRequest};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::middleware::Claims;

pub async fn create_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let profile = run_blocking(move || {
        profiles::create_profile(&state.db, &actor, &req.bio, req.avatar.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let profile = run_blocking(move || {
        profiles::update_profile(&state.db, &actor, req.bio.as_deref(), req.avatar.as_deref())
    })
    .await?;
    Ok(Json(profile))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = run_blocking(move || profiles::profile_of(&state.db, &username)).await?;
    Ok(Json(profile))
}

pub async fn list_profiles(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = page.limit.min(200);
    let listed =
        run_blocking(move || profiles::list_profiles(&state.db, limit, page.offset)).await?;
    Ok(Json(listed))
}
