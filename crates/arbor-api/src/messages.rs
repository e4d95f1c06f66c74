use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use arbor_social::messages;
use arbor_types::api::SendMessageRequest;

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::middleware::Claims;

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let message = run_blocking(move || {
        messages::send_message(&state.db, &actor, req.receiver_id, &req.content)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn conversation(
    State(state): State<AppState>,
    Path(other_user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    let thread =
        run_blocking(move || messages::conversation(&state.db, &actor, other_user_id)).await?;
    Ok(Json(thread))
}
