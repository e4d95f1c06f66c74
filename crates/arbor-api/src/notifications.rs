use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use arbor_social::notifications;

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::middleware::Claims;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let inbox =
        run_blocking(move || notifications::list_notifications(&state.db, claims.sub)).await?;
    Ok(Json(inbox))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = claims.actor();
    run_blocking(move || notifications::mark_read(&state.db, &actor, notification_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
