// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HoodCare Backend",
        description = "Clientes, serviços de limpeza de coifas e agenda recorrente"
    ),
    paths(
        // --- Clientes ---
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Agenda ---
        handlers::customers::generate_customer_schedule,
        handlers::customers::preview_customer_schedule,
        handlers::schedule::generate_all_schedules,

        // --- Serviços ---
        handlers::jobs::list_jobs,
        handlers::jobs::create_job,
        handlers::jobs::get_job,
        handlers::jobs::update_job,
        handlers::jobs::delete_job,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::customer::FrequencyType,
            models::customer::Customer,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Serviços ---
            models::job::JobStatus,
            models::job::Job,
            models::job::JobShares,
            models::job::CreateJobPayload,
            models::job::UpdateJobPayload,

            // --- Agenda ---
            models::schedule::WeekendPolicy,
            models::schedule::ScheduledSlot,
            models::schedule::SchedulePreview,
            models::schedule::CustomerScheduleFailure,
            models::schedule::BatchScheduleReport,
            models::schedule::GenerateSchedulePayload,
            models::schedule::GenerateScheduleResponse,
            models::schedule::BatchScheduleResponse,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de restaurantes atendidos"),
        (name = "Serviços", description = "Limpezas agendadas e executadas, com divisão da receita"),
        (name = "Agenda", description = "Geração da agenda recorrente")
    )
)]
pub struct ApiDoc;
