// src/routes/professional_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get},
};

use crate::{
    error::ApiError,
    extract::{AppJson, AppPath},
    models::{AppState, CreateProfessionalRequest, MessageResponse, MsgResponse, ProfessionalRow},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profissionais", get(list_professionals).post(create_professional))
        .route("/profissionais/{id}", delete(delete_professional))
}

pub async fn list_professionals(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfessionalRow>>, ApiError> {
    let rows: Vec<ProfessionalRow> = sqlx::query_as::<_, ProfessionalRow>(
        r#"
        SELECT id, nome
        FROM profissionais
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(rows))
}

pub async fn create_professional(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProfessionalRequest>,
) -> Result<Json<MsgResponse>, ApiError> {
    sqlx::query(r#"INSERT INTO profissionais (nome) VALUES (?1)"#)
        .bind(req.nome)
        .execute(&state.db)
        .await
        .map_err(ApiError::db)?;

    Ok(Json(MsgResponse { msg: "Ok" }))
}

/// Appointments keep pointing at the deleted id; listings show no name for it.
pub async fn delete_professional(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    sqlx::query(r#"DELETE FROM profissionais WHERE id = ?1"#)
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(ApiError::db)?;

    Ok(Json(MessageResponse { message: "Profissional excluído" }))
}
