// src/models/job.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Scheduled, // Agendado
    Completed, // Executado
    Invoiced,  // Faturado
    Paid,      // Pago
    Cancelled, // Cancelado
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Scheduled
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-04-02")]
    pub scheduled_date: NaiveDate,
    pub status: JobStatus,

    // Valores congelados no momento da criação
    #[schema(example = "500.00")]
    pub price: Decimal,
    #[schema(example = "400.00")]
    pub operator_share: Decimal,
    #[schema(example = "50.00")]
    pub admin_share: Decimal,
    #[schema(example = "50.00")]
    pub sales_share: Decimal,

    #[schema(example = "Baha")]
    pub operator_name: String,
    #[schema(example = "Eren")]
    pub sales_name: String,
    #[schema(example = "Kazim")]
    pub admin_name: String,

    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Divisão do preço entre operador, administração e vendas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobShares {
    pub operator_share: Decimal,
    pub admin_share: Decimal,
    pub sales_share: Decimal,
}

impl JobShares {
    pub fn total(&self) -> Decimal {
        self.operator_share + self.admin_share + self.sales_share
    }
}

/// Registro pronto para inserção (o id vem do banco).
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub customer_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub status: JobStatus,
    pub price: Decimal,
    pub shares: JobShares,
    pub operator_name: String,
    pub sales_name: String,
    pub admin_name: String,
    pub notes: Option<String>,
}

// Filtros da listagem (GET /api/jobs)
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub operator_name: Option<String>,
    pub sales_name: Option<String>,
    pub customer_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-01-01")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-12-31")]
    pub end_date: Option<NaiveDate>,
}

// --- PAYLOADS ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    pub customer_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-05-20")]
    pub scheduled_date: NaiveDate,
    pub status: Option<JobStatus>,
    // Sem preço, usa o padrão da política
    #[schema(example = "650.00")]
    pub price: Option<Decimal>,
    pub operator_name: Option<String>,
    pub sales_name: Option<String>,
    pub admin_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_date: Option<NaiveDate>,
    pub status: Option<JobStatus>,
    // Alterar o preço recalcula as cotas
    pub price: Option<Decimal>,
    pub operator_name: Option<String>,
    pub sales_name: Option<String>,
    pub admin_name: Option<String>,
    pub notes: Option<String>,
}
