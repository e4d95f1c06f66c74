use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use arbor_social::friends;
use arbor_types::api::{PageQuery, RespondFriendRequest, SendFriendRequest};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::middleware::Claims;

pub async fn send_friend_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendFriendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let friendship =
        run_blocking(move || friends::send_friend_request(&state.db, &actor, req.receiver_id))
            .await?;
    Ok((StatusCode::CREATED, Json(friendship)))
}

pub async fn respond_friend_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RespondFriendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let friendship = run_blocking(move || {
        friends::respond_friend_request(&state.db, &actor, request_id, req.decision)
    })
    .await?;
    Ok(Json(friendship))
}

pub async fn list_friends(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = page.limit.min(200);
    let listed = run_blocking(move || {
        friends::list_friends(&state.db, claims.sub, limit, page.offset)
    })
    .await?;
    Ok(Json(listed))
}

pub async fn pending_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let pending = run_blocking(move || friends::pending_requests(&state.db, claims.sub)).await?;
    Ok(Json(pending))
}
