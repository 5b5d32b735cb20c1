use crate::models::AppState;
use axum::Router;

pub mod anamnese_routes;
pub mod appointment_routes;
pub mod auth_routes;
pub mod finance_routes;
pub mod professional_routes;
pub mod stock_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", auth_routes::router())
        .nest("/api", appointment_routes::router())
        .nest("/api", anamnese_routes::router())
        .nest("/api", finance_routes::router())
        .nest("/api", professional_routes::router())
        .nest("/api", stock_routes::router())
        .with_state(state)
}
