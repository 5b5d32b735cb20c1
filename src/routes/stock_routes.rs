// src/routes/stock_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get},
};

use crate::{
    error::ApiError,
    extract::{AppJson, AppPath},
    models::{AppState, MessageResponse, MsgResponse, StockItemRow, UpsertStockRequest},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/estoque", get(list_stock).post(upsert_stock))
        .route("/estoque/{id}", delete(delete_stock))
}

pub async fn list_stock(
    State(state): State<AppState>,
) -> Result<Json<Vec<StockItemRow>>, ApiError> {
    let rows: Vec<StockItemRow> = sqlx::query_as::<_, StockItemRow>(
        r#"
        SELECT id, produto, quantidade, unidade
        FROM estoque
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(rows))
}

/// Adds to an existing row with the same product name, or creates one.
///
/// Lookup and write are separate statements with no unique constraint behind
/// them, so two concurrent first-time upserts of a name can both insert.
pub async fn upsert_stock(
    State(state): State<AppState>,
    AppJson(req): AppJson<UpsertStockRequest>,
) -> Result<Json<MsgResponse>, ApiError> {
    let existing: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id
        FROM estoque
        WHERE produto = ?1
        LIMIT 1
        "#,
    )
    .bind(req.produto.as_deref())
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::db)?;

    match existing {
        Some(id) => {
            // unit stays as first recorded
            sqlx::query(
                r#"
                UPDATE estoque
                SET quantidade = quantidade + ?1
                WHERE id = ?2
                "#,
            )
            .bind(req.quantidade)
            .bind(id)
            .execute(&state.db)
            .await
            .map_err(ApiError::db)?;

            Ok(Json(MsgResponse { msg: "Atualizado" }))
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO estoque (produto, quantidade, unidade)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(req.produto)
            .bind(req.quantidade)
            .bind(req.unidade)
            .execute(&state.db)
            .await
            .map_err(ApiError::db)?;

            Ok(Json(MsgResponse { msg: "Criado" }))
        }
    }
}

/// Appointments that used this item keep the dangling id.
pub async fn delete_stock(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    sqlx::query(r#"DELETE FROM estoque WHERE id = ?1"#)
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(ApiError::db)?;

    Ok(Json(MessageResponse { message: "Item excluído" }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::models::AppState;
    use crate::routes::testing::{send, test_state};

    async fn stock(state: &AppState) -> Vec<Value> {
        let (status, body) = send(state, "GET", "/api/estoque", None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().cloned().unwrap()
    }

    #[tokio::test]
    async fn same_name_twice_increments_one_row() {
        let state = test_state().await;

        let (_, first) = send(
            &state,
            "POST",
            "/api/estoque",
            Some(json!({ "produto": "Botox", "quantidade": 5, "unidade": "frasco" })),
        )
        .await;
        let (_, second) = send(
            &state,
            "POST",
            "/api/estoque",
            Some(json!({ "produto": "Botox", "quantidade": 3, "unidade": "ml" })),
        )
        .await;

        assert_eq!(first, json!({ "msg": "Criado" }));
        assert_eq!(second, json!({ "msg": "Atualizado" }));

        let rows = stock(&state).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["quantidade"], 8);
        assert_eq!(rows[0]["unidade"], "frasco");
    }

    #[tokio::test]
    async fn different_names_make_two_rows() {
        let state = test_state().await;
        send(&state, "POST", "/api/estoque", Some(json!({ "produto": "Botox", "quantidade": 5, "unidade": "frasco" }))).await;
        send(&state, "POST", "/api/estoque", Some(json!({ "produto": "Luvas", "quantidade": 100, "unidade": "un" }))).await;

        let rows = stock(&state).await;
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn name_match_is_exact() {
        let state = test_state().await;
        send(&state, "POST", "/api/estoque", Some(json!({ "produto": "Botox", "quantidade": 5 }))).await;
        send(&state, "POST", "/api/estoque", Some(json!({ "produto": "botox", "quantidade": 5 }))).await;

        assert_eq!(stock(&state).await.len(), 2);
    }

    #[tokio::test]
    async fn quantity_from_form_string_is_accepted() {
        let state = test_state().await;
        send(&state, "POST", "/api/estoque", Some(json!({ "produto": "Gaze", "quantidade": "12", "unidade": "pct" }))).await;

        assert_eq!(stock(&state).await[0]["quantidade"], 12);
    }

    #[tokio::test]
    async fn delete_removes_row_and_unknown_id_acknowledges() {
        let state = test_state().await;
        send(&state, "POST", "/api/estoque", Some(json!({ "produto": "Gaze", "quantidade": 1, "unidade": "pct" }))).await;
        let id = stock(&state).await[0]["id"].as_i64().unwrap();

        let (status, body) = send(&state, "DELETE", &format!("/api/estoque/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Item excluído" }));
        assert!(stock(&state).await.is_empty());

        let (status, body) = send(&state, "DELETE", &format!("/api/estoque/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Item excluído" }));
    }

    #[tokio::test]
    async fn appointment_keeps_dangling_product_reference() {
        let state = test_state().await;
        send(&state, "POST", "/api/estoque", Some(json!({ "produto": "Botox", "quantidade": 5, "unidade": "frasco" }))).await;
        let id = stock(&state).await[0]["id"].as_i64().unwrap();
        send(&state, "POST", "/api/agendar", Some(json!({ "cliente": "Ana", "produto_id": id, "qtd_usada": 1 }))).await;

        send(&state, "DELETE", &format!("/api/estoque/{id}"), None).await;

        let (_, rows) = send(&state, "GET", "/api/agendamentos", None).await;
        assert_eq!(rows[0]["produto_usado_id"], id);
        assert_eq!(rows[0]["qtd_usada"], 1);
    }
}
