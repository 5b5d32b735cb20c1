use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

use crate::auth::Authenticator;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub auth: Arc<dyn Authenticator>,
}

/* -------------------------
   Appointment status
--------------------------*/

/// Status values as stored in `agendamentos.status`.
///
/// The column itself is free text: the status endpoint writes whatever the
/// caller sends, so rows are read back as `Option<String>`, not as this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn from_stored(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Agendado",
            AppointmentStatus::Completed => "Concluido",
            AppointmentStatus::Cancelled => "Cancelado",
        }
    }
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Some endpoints acknowledge with `msg` instead of `message`.
#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: &'static str,
}

/// Non-string credentials (numbers, null, objects) deserialize as `None`
/// and can never match.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "text_only")]
    pub usuario: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    pub senha: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub cliente: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub profissional_id: Option<i64>,
    pub procedimento: Option<String>,
    pub data_hora: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub valor: Option<f64>,
    pub forma_pagamento: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub produto_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub qtd_usada: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertStockRequest {
    pub produto: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantidade: Option<i64>,
    pub unidade: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfessionalRequest {
    pub nome: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub cliente_nome: Option<String>,
    pub texto: Option<String>,
}

/* -------------------------
   DB Row Models
--------------------------*/

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfessionalRow {
    pub id: i64,
    pub nome: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockItemRow {
    pub id: i64,
    pub produto: Option<String>,
    pub quantidade: Option<i64>,
    pub unidade: Option<String>,
}

/// Appointment joined with its professional's name. `profissional_id` and
/// `produto_usado_id` are weak references: the target may be gone.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppointmentRow {
    pub id: i64,
    pub cliente: Option<String>,
    pub profissional_id: Option<i64>,
    pub procedimento: Option<String>,
    pub data_hora: Option<String>,
    pub valor: Option<f64>,
    pub forma_pagamento: Option<String>,
    pub produto_usado_id: Option<i64>,
    pub qtd_usada: Option<i64>,
    pub status: Option<String>,
    pub nome_profissional: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnamneseRow {
    pub id: i64,
    pub cliente_nome: Option<String>,
    pub texto: Option<String>,
    #[serde(serialize_with = "sqlite_timestamp")]
    pub data_registro: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FinancialSummaryRow {
    pub forma_pagamento: Option<String>,
    pub total: Option<f64>,
}

/* -------------------------
   Helpers
--------------------------*/

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Float(f64),
    Text(String),
}

/// `3.0` into an integer field becomes `3`; fractions are rejected rather
/// than silently truncated.
fn from_whole<T: FromStr>(n: f64) -> Option<T> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{n:.0}").parse().ok()
    } else {
        None
    }
}

/// Accepts a JSON number, a numeric string (what HTML form inputs send) or
/// null. Empty strings count as absent.
pub fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Float(n)) => from_whole(n)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a whole number, got {n}"))),
        Some(NumberOrText::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<T>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_whole))
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid number: {s:?}")))
        }
    }
}

fn text_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Renders timestamps the way SQLite's CURRENT_TIMESTAMP stores them.
fn sqlite_timestamp<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.collect_str(&ts.format("%Y-%m-%d %H:%M:%S")),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn appointment_request_accepts_numeric_strings() {
        let req: CreateAppointmentRequest = serde_json::from_value(json!({
            "cliente": "Ana",
            "profissional_id": "2",
            "valor": "150.5",
            "produto_id": 7,
            "qtd_usada": ""
        }))
        .unwrap();

        assert_eq!(req.profissional_id, Some(2));
        assert_eq!(req.valor, Some(150.5));
        assert_eq!(req.produto_id, Some(7));
        assert_eq!(req.qtd_usada, None);
        assert_eq!(req.procedimento, None);
    }

    #[test]
    fn appointment_request_rejects_non_numeric_text() {
        let res = serde_json::from_value::<CreateAppointmentRequest>(json!({
            "valor": "cento e cinquenta"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn integer_fields_take_whole_floats_but_not_fractions() {
        let req: UpsertStockRequest =
            serde_json::from_value(json!({ "produto": "Gaze", "quantidade": 3.0 })).unwrap();
        assert_eq!(req.quantidade, Some(3));

        let req: UpsertStockRequest =
            serde_json::from_value(json!({ "produto": "Gaze", "quantidade": "4.0" })).unwrap();
        assert_eq!(req.quantidade, Some(4));

        assert!(serde_json::from_value::<UpsertStockRequest>(json!({ "quantidade": 2.5 })).is_err());
        assert!(serde_json::from_value::<CreateAppointmentRequest>(json!({ "qtd_usada": 1.5 })).is_err());
    }

    #[test]
    fn login_request_tolerates_missing_and_non_text_fields() {
        let req: LoginRequest = serde_json::from_value(json!({ "usuario": "admin" })).unwrap();
        assert_eq!(req.usuario.as_deref(), Some("admin"));
        assert_eq!(req.senha, None);

        let req: LoginRequest =
            serde_json::from_value(json!({ "usuario": null, "senha": 1234 })).unwrap();
        assert_eq!(req.usuario, None);
        assert_eq!(req.senha, None);
    }

    #[test]
    fn note_timestamp_uses_sqlite_text_form() {
        let ts = NaiveDateTime::parse_from_str("2026-10-18 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let row = AnamneseRow {
            id: 1,
            cliente_nome: Some("Ana".into()),
            texto: Some("alergia a dipirona".into()),
            data_registro: Some(ts),
        };

        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["data_registro"], "2026-10-18 09:30:00");
    }

    #[test]
    fn status_strings_match_stored_values() {
        assert_eq!(AppointmentStatus::Scheduled.as_str(), "Agendado");
        assert_eq!(AppointmentStatus::Completed.as_str(), "Concluido");
        assert_eq!(AppointmentStatus::Cancelled.as_str(), "Cancelado");
    }

    #[test]
    fn from_stored_recognises_only_exact_values() {
        assert_eq!(AppointmentStatus::from_stored("Concluido"), Some(AppointmentStatus::Completed));
        assert_eq!(AppointmentStatus::from_stored("Agendado"), Some(AppointmentStatus::Scheduled));
        assert_eq!(AppointmentStatus::from_stored("cancelado"), None);
        assert_eq!(AppointmentStatus::from_stored("Completed"), None);
    }
}
