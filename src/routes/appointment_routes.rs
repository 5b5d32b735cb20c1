// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    error::ApiError,
    extract::{AppJson, AppPath},
    models::{
        AppState, AppointmentRow, AppointmentStatus, CreateAppointmentRequest, MessageResponse,
        UpdateStatusRequest,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/agendar", post(create_appointment))
        .route("/agendamentos", get(list_active_appointments))
        .route("/agendamentos/{id}/status", post(update_status))
}

/* ============================================================
   POST /agendar
   ============================================================ */

/// Stock is only touched when both a product and a positive quantity come in.
fn stock_usage(req: &CreateAppointmentRequest) -> Option<(i64, i64)> {
    match (req.produto_id, req.qtd_usada) {
        (Some(produto_id), Some(qtd)) if qtd > 0 => Some((produto_id, qtd)),
        _ => None,
    }
}

pub async fn create_appointment(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateAppointmentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut tx = state.db.begin().await.map_err(ApiError::db)?;

    // No existence or sufficiency check: an unknown id updates nothing and
    // the quantity is allowed to go negative.
    if let Some((produto_id, qtd)) = stock_usage(&req) {
        sqlx::query(
            r#"
            UPDATE estoque
            SET quantidade = quantidade - ?1
            WHERE id = ?2
            "#,
        )
        .bind(qtd)
        .bind(produto_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::db)?;

        tracing::info!(produto_id, qtd, "stock decremented for appointment");
    }

    // Status is always forced; the request type has no status field at all.
    sqlx::query(
        r#"
        INSERT INTO agendamentos (
          cliente,
          profissional_id,
          procedimento,
          data_hora,
          valor,
          forma_pagamento,
          produto_usado_id,
          qtd_usada,
          status
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(req.cliente)
    .bind(req.profissional_id)
    .bind(req.procedimento)
    .bind(req.data_hora)
    .bind(req.valor)
    .bind(req.forma_pagamento)
    .bind(req.produto_id)
    .bind(req.qtd_usada)
    .bind(AppointmentStatus::Scheduled.as_str())
    .execute(&mut *tx)
    .await
    .map_err(ApiError::db)?;

    tx.commit().await.map_err(ApiError::db)?;

    Ok(Json(MessageResponse { message: "Agendado!" }))
}

/* ============================================================
   POST /agendamentos/{id}/status
   ============================================================ */

/// Overwrites the status with whatever was sent. Unknown ids and unknown
/// status values are not reported to the caller.
pub async fn update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    match req.status.as_deref() {
        Some(s) if AppointmentStatus::from_stored(s).is_some() => {}
        other => tracing::warn!(id, status = ?other, "storing unrecognized appointment status"),
    }

    sqlx::query(
        r#"
        UPDATE agendamentos
        SET status = ?1
        WHERE id = ?2
        "#,
    )
    .bind(req.status)
    .bind(id)
    .execute(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(MessageResponse { message: "Status atualizado" }))
}

/* ============================================================
   GET /agendamentos
   ============================================================ */

/// Scheduled appointments only. `data_hora` is ordered as text, so callers
/// need a sortable format such as ISO 8601.
pub async fn list_active_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentRow>>, ApiError> {
    let rows: Vec<AppointmentRow> = sqlx::query_as::<_, AppointmentRow>(
        r#"
        SELECT
          a.id,
          a.cliente,
          a.profissional_id,
          a.procedimento,
          a.data_hora,
          a.valor,
          a.forma_pagamento,
          a.produto_usado_id,
          a.qtd_usada,
          a.status,
          p.nome AS nome_profissional
        FROM agendamentos a
        LEFT JOIN profissionais p ON a.profissional_id = p.id
        WHERE a.status = ?1
        ORDER BY a.data_hora ASC
        "#,
    )
    .bind(AppointmentStatus::Scheduled.as_str())
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(rows))
}
