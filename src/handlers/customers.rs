// src/handlers/customers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    models::{
        customer::{CreateCustomerPayload, Customer, CustomerSearch, UpdateCustomerPayload},
        schedule::{GenerateSchedulePayload, GenerateScheduleResponse, HorizonQuery, SchedulePreview},
    },
};

// =============================================================================
//  ÁREA 1: CADASTRO
// =============================================================================

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Clientes",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado (agenda de 12 meses gerada)", body = Customer),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::from)?;

    let customer = app_state
        .customer_service
        .create_customer(&app_state.db_pool, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers?search=...
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Clientes",
    params(
        ("search" = Option<String>, Query, description = "Busca por nome, cidade ou telefone")
    ),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Customer>)
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    Query(query): Query<CustomerSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .customer_service
        .list_customers(&app_state.db_pool, query.search.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Clientes",
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .customer_service
        .get_customer(&app_state.db_pool, customer_id)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Clientes",
    request_body = UpdateCustomerPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::from)?;

    let customer = app_state
        .customer_service
        .update_customer(&app_state.db_pool, customer_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Clientes",
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 204, description = "Cliente e seus serviços removidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customer_service
        .delete_customer(&app_state.db_pool, customer_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: AGENDA DO CLIENTE
// =============================================================================

// POST /api/customers/{id}/schedule
#[utoipa::path(
    post,
    path = "/api/customers/{id}/schedule",
    tag = "Agenda",
    request_body = GenerateSchedulePayload,
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 200, description = "Serviços criados (datas já ocupadas são puladas)", body = GenerateScheduleResponse),
        (status = 400, description = "Horizonte inválido"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn generate_customer_schedule(
    State(app_state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    payload: Option<Json<GenerateSchedulePayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate().map_err(AppError::from)?;

    let jobs_created = app_state
        .schedule_service
        .generate_for_customer(customer_id, payload.months)
        .await?;

    Ok((
        StatusCode::OK,
        Json(GenerateScheduleResponse {
            success: true,
            jobs_created,
            months: payload.months,
        }),
    ))
}

// GET /api/customers/{id}/schedule/preview?months=12
#[utoipa::path(
    get,
    path = "/api/customers/{id}/schedule/preview",
    tag = "Agenda",
    params(
        ("id" = Uuid, Path, description = "ID do Cliente"),
        ("months" = Option<i32>, Query, description = "Horizonte em meses (padrão 12)")
    ),
    responses(
        (status = 200, description = "Datas que seriam geradas, sem gravar nada", body = SchedulePreview),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn preview_customer_schedule(
    State(app_state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Query(query): Query<HorizonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query.validate().map_err(AppError::from)?;

    let preview = app_state
        .schedule_service
        .preview_schedule(customer_id, query.months)
        .await?;

    Ok((StatusCode::OK, Json(preview)))
}
