// src/handlers/jobs.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    models::job::{CreateJobPayload, Job, JobFilter, UpdateJobPayload},
};

// GET /api/jobs
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Serviços",
    params(
        ("status" = Option<String>, Query, description = "SCHEDULED, COMPLETED, INVOICED, PAID ou CANCELLED"),
        ("operatorName" = Option<String>, Query, description = "Operador"),
        ("salesName" = Option<String>, Query, description = "Parceiro de vendas"),
        ("customerId" = Option<Uuid>, Query, description = "ID do Cliente"),
        ("startDate" = Option<String>, Query, description = "Data inicial (inclusiva)"),
        ("endDate" = Option<String>, Query, description = "Data final (inclusiva)")
    ),
    responses(
        (status = 200, description = "Serviços ordenados por data", body = Vec<Job>)
    )
)]
pub async fn list_jobs(
    State(app_state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = app_state
        .job_service
        .list_jobs(&app_state.db_pool, &filter)
        .await?;

    Ok((StatusCode::OK, Json(jobs)))
}

// POST /api/jobs
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Serviços",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Serviço criado", body = Job),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Já existe serviço para o cliente nesta data")
    )
)]
pub async fn create_job(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let job = app_state
        .job_service
        .create_job(&app_state.db_pool, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

// GET /api/jobs/{id}
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Serviços",
    params(
        ("id" = Uuid, Path, description = "ID do Serviço")
    ),
    responses(
        (status = 200, description = "Serviço", body = Job),
        (status = 404, description = "Serviço não encontrado")
    )
)]
pub async fn get_job(
    State(app_state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = app_state
        .job_service
        .get_job(&app_state.db_pool, job_id)
        .await?;

    Ok((StatusCode::OK, Json(job)))
}

// PUT /api/jobs/{id}
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "Serviços",
    request_body = UpdateJobPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Serviço")
    ),
    responses(
        (status = 200, description = "Serviço atualizado", body = Job),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Serviço não encontrado"),
        (status = 409, description = "Já existe serviço para o cliente nesta data")
    )
)]
pub async fn update_job(
    State(app_state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let job = app_state
        .job_service
        .update_job(&app_state.db_pool, job_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(job)))
}

// DELETE /api/jobs/{id}
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Serviços",
    params(
        ("id" = Uuid, Path, description = "ID do Serviço")
    ),
    responses(
        (status = 204, description = "Serviço removido"),
        (status = 404, description = "Serviço não encontrado")
    )
)]
pub async fn delete_job(
    State(app_state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .job_service
        .delete_job(&app_state.db_pool, job_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
