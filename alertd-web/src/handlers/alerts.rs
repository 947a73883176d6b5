use alertd_core::Alert;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    error_handling::AppResult,
    validation::{CreateAlertRequest, Validator},
    AppState,
};

pub async fn create_alert(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Alert>)> {
    let Json(request) = payload?;

    let new_alert = Validator::validate_create_request(&request).map_err(|e| {
        tracing::warn!("Alert creation validation failed: {}", e.to_message());
        e
    })?;

    let alert = state.engine.create_alert(new_alert).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn list_alerts(State(state): State<AppState>) -> AppResult<Json<Vec<Alert>>> {
    Ok(Json(state.engine.get_all_alerts().await?))
}

pub async fn list_alerts_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<Alert>>> {
    Ok(Json(state.engine.get_alerts_by_status(&status).await?))
}

pub async fn list_alerts_by_service(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> AppResult<Json<Vec<Alert>>> {
    Ok(Json(state.engine.get_alerts_by_service(&service).await?))
}

pub async fn list_alerts_by_severity(
    State(state): State<AppState>,
    Path(severity): Path<String>,
) -> AppResult<Json<Vec<Alert>>> {
    Ok(Json(state.engine.get_alerts_by_severity(&severity).await?))
}
