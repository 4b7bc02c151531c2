// src/handlers/schedule.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    models::schedule::{BatchScheduleResponse, GenerateSchedulePayload},
};

// POST /api/schedule
// Gera a agenda de todos os clientes. Falha de um cliente não interrompe os demais;
// ela aparece em `failures` e `success` continua true.
#[utoipa::path(
    post,
    path = "/api/schedule",
    tag = "Agenda",
    request_body = GenerateSchedulePayload,
    responses(
        (status = 200, description = "Total criado e falhas por cliente", body = BatchScheduleResponse),
        (status = 400, description = "Horizonte inválido")
    )
)]
pub async fn generate_all_schedules(
    State(app_state): State<AppState>,
    payload: Option<Json<GenerateSchedulePayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate().map_err(AppError::from)?;

    let report = app_state
        .schedule_service
        .generate_for_all_customers(payload.months)
        .await?;

    Ok((
        StatusCode::OK,
        Json(BatchScheduleResponse {
            success: true,
            months: payload.months,
            report,
        }),
    ))
}
