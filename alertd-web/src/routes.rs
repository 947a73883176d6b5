use axum::{routing::get, Router};

use crate::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/alerts",
            get(handlers::list_alerts).post(handlers::create_alert),
        )
        .route("/alerts/status/:status", get(handlers::list_alerts_by_status))
        .route("/alerts/service/:service", get(handlers::list_alerts_by_service))
        .route("/alerts/severity/:severity", get(handlers::list_alerts_by_severity))
}
