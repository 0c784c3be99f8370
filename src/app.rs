use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::form_create))
        .route("/habits/:id", post(handlers::form_update))
        .route("/habits/:id/toggle", post(handlers::form_toggle))
        .route("/habits/:id/delete", post(handlers::form_delete))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/:id", put(handlers::update_habit).delete(handlers::delete_habit))
        .route("/api/habits/:id/toggle", post(handlers::toggle_today))
        .route("/api/habits/:id/stats", get(handlers::get_stats))
        .with_state(state)
}
