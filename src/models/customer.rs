// src/models/customer.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Gravado como TEXT no banco. Valores desconhecidos (dados legados) viram QUARTERLY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrequencyType {
    Quarterly,
    Semiannual,
    Custom,
}

impl FrequencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyType::Quarterly => "QUARTERLY",
            FrequencyType::Semiannual => "SEMIANNUAL",
            FrequencyType::Custom => "CUSTOM",
        }
    }
}

impl Default for FrequencyType {
    fn default() -> Self {
        FrequencyType::Quarterly
    }
}

impl From<&str> for FrequencyType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "SEMIANNUAL" => FrequencyType::Semiannual,
            "CUSTOM" => FrequencyType::Custom,
            _ => FrequencyType::Quarterly,
        }
    }
}

// Usado pelo `#[sqlx(try_from = "String")]` das linhas lidas do banco
impl From<String> for FrequencyType {
    fn from(value: String) -> Self {
        FrequencyType::from(value.as_str())
    }
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Mario's Italian Kitchen")]
    pub name: String,

    // Endereço
    #[schema(example = "123 Main Street")]
    pub address_line1: String,
    pub address_line2: Option<String>,
    #[schema(example = "Houston")]
    pub city: String,
    #[schema(example = "TX")]
    pub state: String,
    #[schema(example = "77001")]
    pub zip: String,

    // Contato
    #[schema(example = "Mario Rossi")]
    pub contact_name: String,
    #[schema(example = "713-555-0101")]
    pub contact_phone: String,
    pub contact_email: Option<String>,

    #[schema(example = 12)]
    pub hood_length_ft: i32,
    pub notes: Option<String>,

    // Política de recorrência
    #[sqlx(try_from = "String")]
    pub frequency_type: FrequencyType,
    #[schema(example = 45)]
    pub custom_interval_days: Option<i32>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-01-01")]
    pub first_service_date: Option<NaiveDate>,

    #[schema(example = "Baha")]
    pub assigned_operator: String,
    #[schema(example = "Eren")]
    pub sales_partner: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOADS ---

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Golden Dragon Chinese")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "456 Oak Avenue")]
    pub address_line1: String,
    #[schema(example = "Suite 100")]
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Houston")]
    pub city: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "TX")]
    pub state: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "77002")]
    pub zip: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "David Chen")]
    pub contact_name: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "713-555-0102")]
    pub contact_phone: String,
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "david@goldendragon.com")]
    pub contact_email: Option<String>,

    #[schema(example = 16)]
    pub hood_length_ft: Option<i32>,
    pub notes: Option<String>,

    pub frequency_type: Option<FrequencyType>,
    #[schema(example = 45)]
    pub custom_interval_days: Option<i32>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-01-01")]
    pub first_service_date: Option<NaiveDate>,

    pub assigned_operator: Option<String>,
    pub sales_partner: Option<String>,

    // Gera os próximos 12 meses logo após criar (padrão: sim)
    #[serde(default = "default_true")]
    #[schema(example = true)]
    pub generate_schedule: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub city: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub state: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub zip: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub contact_name: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub contact_phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub contact_email: Option<String>,
    pub hood_length_ft: Option<i32>,
    pub notes: Option<String>,
    pub frequency_type: Option<FrequencyType>,
    pub custom_interval_days: Option<i32>,
    #[schema(value_type = Option<String>, format = Date)]
    pub first_service_date: Option<NaiveDate>,
    pub assigned_operator: Option<String>,
    pub sales_partner: Option<String>,
}

// Filtro da listagem (GET /api/customers?search=...)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSearch {
    pub search: Option<String>,
}
