// src/routes/anamnese_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    error::ApiError,
    extract::{AppJson, AppPath},
    models::{AnamneseRow, AppState, CreateNoteRequest, MessageResponse},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/anamnese", post(create_note))
        .route("/anamnese/{cliente}", get(list_notes))
}

/// Notes for one client name (exact match), newest first.
pub async fn list_notes(
    State(state): State<AppState>,
    AppPath(cliente): AppPath<String>,
) -> Result<Json<Vec<AnamneseRow>>, ApiError> {
    let rows: Vec<AnamneseRow> = sqlx::query_as::<_, AnamneseRow>(
        r#"
        SELECT id, cliente_nome, texto, data_registro
        FROM anamnese
        WHERE cliente_nome = ?1
        ORDER BY id DESC
        "#,
    )
    .bind(cliente)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(rows))
}

/// Append-only; `data_registro` is filled in by SQLite.
pub async fn create_note(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateNoteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    sqlx::query(r#"INSERT INTO anamnese (cliente_nome, texto) VALUES (?1, ?2)"#)
        .bind(req.cliente_nome)
        .bind(req.texto)
        .execute(&state.db)
        .await
        .map_err(ApiError::db)?;

    Ok(Json(MessageResponse { message: "Nota salva" }))
}
