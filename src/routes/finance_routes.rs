// src/routes/finance_routes.rs

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, AppointmentStatus, FinancialSummaryRow},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/resumo_financeiro", get(financial_summary))
}

/// Revenue per payment method. Everything not cancelled counts, including
/// appointments that are only scheduled.
pub async fn financial_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<FinancialSummaryRow>>, ApiError> {
    let rows: Vec<FinancialSummaryRow> = sqlx::query_as::<_, FinancialSummaryRow>(
        r#"
        SELECT forma_pagamento, SUM(valor) AS total
        FROM agendamentos
        WHERE status != ?1
        GROUP BY forma_pagamento
        "#,
    )
    .bind(AppointmentStatus::Cancelled.as_str())
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(rows))
}
