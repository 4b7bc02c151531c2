// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

// Erros de domínio. Os serviços e repositórios só conhecem este tipo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Cliente {0} não encontrado")]
    CustomerNotFound(Uuid),

    #[error("Serviço {0} não encontrado")]
    JobNotFound(Uuid),

    #[error("Já existe um serviço para este cliente em {0}")]
    JobDateConflict(NaiveDate),

    #[error("Horizonte de {0} meses fora do calendário suportado")]
    InvalidHorizon(i32),

    #[error("Política de agendamento inválida: {0}")]
    InvalidSchedulePolicy(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro que sai pela API: status + mensagem.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: "Um ou mais campos são inválidos.".to_string(),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::CustomerNotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::JobNotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Serviço não encontrado."),
            e @ AppError::JobDateConflict(_) => ApiError::new(StatusCode::CONFLICT, e.to_string()),
            e @ AppError::InvalidHorizon(_) => ApiError::new(StatusCode::BAD_REQUEST, e.to_string()),

            // Todo o resto (banco, política, interno) vira 500 e vai pro log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn not_found_maps_to_404() {
        let api: ApiError = AppError::CustomerNotFound(Uuid::nil()).into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn date_conflict_maps_to_409_with_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let api: ApiError = AppError::JobDateConflict(date).into();

        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.message.contains("2025-04-02"));
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("required".into());
        errors.add("name", err);

        let api: ApiError = AppError::ValidationError(errors).into();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["name"][0], "required");
    }

    #[test]
    fn database_errors_are_hidden_behind_500() {
        let api: ApiError = AppError::DatabaseError(sqlx::Error::RowNotFound).into();

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Ocorreu um erro inesperado.");
    }
}
