use axum::{routing::get, Router};
use crate::controllers::estimate_controller::{
    // Estimation
    get_estimate,
    // Comparison session
    get_comparison, post_comparison, clear_comparison,
    // Settings
    get_panel,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` or `State<PanelConfig>` via
/// `FromRef<AppState>`.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/estimate",   get(get_estimate))
        .route("/comparison", get(get_comparison).post(post_comparison).delete(clear_comparison))
        .route("/panel",      get(get_panel))
        .with_state(state)
}
