//! firstdate-server
//!
//! HTTP backend for the First Date web UI: accounts, the questionnaire
//! wizard, the dashboard, and the admin response export.

pub mod audit;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/admin/responses", get(routes::admin::list_responses))
        .route("/admin/responses/refresh", post(routes::admin::refresh_responses))
        .route("/admin/responses/export", get(routes::admin::export_responses))
        .route_layer(axum_mw::from_fn(middleware::auth::require_admin));

    let protected = Router::new()
        .route("/auth/signout", post(routes::auth::sign_out))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/verification", post(routes::auth::request_verification))
        .route("/questionnaire", get(routes::questionnaire::get_wizard))
        .route("/questionnaire/answers", put(routes::questionnaire::set_answers))
        .route("/questionnaire/next", post(routes::questionnaire::next))
        .route("/questionnaire/previous", post(routes::questionnaire::previous))
        .route("/questionnaire/submit", post(routes::questionnaire::submit))
        .route("/questionnaire/confirm", post(routes::questionnaire::confirm))
        .route("/questionnaire/cancel", post(routes::questionnaire::cancel))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .merge(admin)
        .route_layer(axum_mw::from_fn_with_state(state.clone(), middleware::auth::require_auth));

    Router::new()
        // Public
        .route("/health", get(routes::health::health_check))
        .route("/questionnaire/catalog", get(routes::questionnaire::catalog))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/signin", post(routes::auth::sign_in))
        .route(
            "/auth/recovery",
            post(routes::auth::request_recovery).put(routes::auth::confirm_recovery),
        )
        .route("/auth/verification", put(routes::auth::confirm_verification))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
