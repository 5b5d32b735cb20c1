use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};

use crate::{
    error::ApiError,
    models::{AppState, LoginRequest, MessageResponse},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Credential check only: no token is issued and nothing is stored.
///
/// Any body that is not the exact configured pair, including a missing or
/// malformed one, is a plain login failure.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(%rejection, "login rejected: unreadable body");
            return Err(ApiError::login_failed());
        }
    };

    let (Some(usuario), Some(senha)) = (req.usuario, req.senha) else {
        tracing::warn!("login rejected: missing credentials");
        return Err(ApiError::login_failed());
    };

    if !state.auth.authenticate(&usuario, &senha).await? {
        tracing::warn!(%usuario, "login rejected");
        return Err(ApiError::login_failed());
    }

    Ok(Json(MessageResponse { message: "Sucesso" }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::testing::{send, test_state};

    #[tokio::test]
    async fn exact_pair_logs_in() {
        let state = test_state().await;
        let (status, body) = send(
            &state,
            "POST",
            "/api/login",
            Some(json!({ "usuario": "admin", "senha": "1234" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Sucesso" }));
    }

    #[tokio::test]
    async fn anything_else_is_401() {
        let state = test_state().await;
        let attempts = [
            json!({ "usuario": "admin", "senha": "4321" }),
            json!({ "usuario": "root", "senha": "1234" }),
            json!({ "usuario": "admin" }),
            json!({}),
            json!({ "usuario": "admin", "senha": 1234 }),
            json!({ "usuario": null, "senha": null }),
            json!(["admin", "1234"]),
        ];

        for attempt in attempts {
            let (status, body) = send(&state, "POST", "/api/login", Some(attempt.clone())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "attempt: {attempt}");
            assert_eq!(body, json!({ "error": "Falha no login" }));
        }
    }

    #[tokio::test]
    async fn missing_body_is_401() {
        let state = test_state().await;
        let (status, body) = send(&state, "POST", "/api/login", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Falha no login" }));
    }
}
