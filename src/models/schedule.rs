// src/models/schedule.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::{customer::{Customer, FrequencyType}, job::JobShares},
};

// =========================================================================
//  POLÍTICA (preço padrão + divisão da receita)
// =========================================================================

/// O que fazer quando uma data calculada cai no fim de semana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekendPolicy {
    #[default]
    Keep,
    /// Sábado e domingo vão para a segunda-feira seguinte.
    ShiftToMonday,
}

impl WeekendPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" | "" => Some(WeekendPolicy::Keep),
            "shift" | "shift_to_monday" | "monday" => Some(WeekendPolicy::ShiftToMonday),
            _ => None,
        }
    }
}

/// Configuração imutável injetada no scheduler e nos serviços de job.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePolicy {
    pub default_price: Decimal,
    pub operator_split: Decimal,
    pub admin_split: Decimal,
    pub sales_split: Decimal,
    pub default_operator_name: String,
    pub default_sales_name: String,
    pub admin_name: String,
    pub weekend: WeekendPolicy,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            default_price: Decimal::new(500, 0),
            operator_split: Decimal::new(8, 1),
            admin_split: Decimal::new(1, 1),
            sales_split: Decimal::new(1, 1),
            default_operator_name: "Baha".to_string(),
            default_sales_name: "Eren".to_string(),
            admin_name: "Kazim".to_string(),
            weekend: WeekendPolicy::Keep,
        }
    }
}

impl SchedulePolicy {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_price.is_sign_negative() {
            return Err(AppError::InvalidSchedulePolicy(format!(
                "preço padrão negativo: {}",
                self.default_price
            )));
        }

        let splits = [self.operator_split, self.admin_split, self.sales_split];
        if splits.iter().any(|s| s.is_sign_negative()) {
            return Err(AppError::InvalidSchedulePolicy(
                "percentuais de divisão não podem ser negativos".to_string(),
            ));
        }

        let sum: Decimal = splits.iter().sum();
        if sum != Decimal::ONE {
            return Err(AppError::InvalidSchedulePolicy(format!(
                "percentuais de divisão devem somar 1 (somam {})",
                sum
            )));
        }

        Ok(())
    }

    /// Calcula as cotas a partir do preço. Vendas fica com o resto do arredondamento,
    /// então a soma das três cotas é sempre igual ao preço.
    pub fn calculate_shares(&self, price: Decimal) -> JobShares {
        let operator_share = (price * self.operator_split).round_dp(2);
        let admin_share = (price * self.admin_split).round_dp(2);
        let sales_share = price - operator_share - admin_share;

        JobShares {
            operator_share,
            admin_share,
            sales_share,
        }
    }
}

// =========================================================================
//  ALVO DO SCHEDULER (projeção do cliente)
// =========================================================================

/// Apenas os campos do cliente que o scheduler consome.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ScheduleTarget {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub frequency_type: FrequencyType,
    pub custom_interval_days: Option<i32>,
    pub first_service_date: Option<NaiveDate>,
    pub assigned_operator: String,
    pub sales_partner: String,
}

impl From<&Customer> for ScheduleTarget {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            frequency_type: customer.frequency_type,
            custom_interval_days: customer.custom_interval_days,
            first_service_date: customer.first_service_date,
            assigned_operator: customer.assigned_operator.clone(),
            sales_partner: customer.sales_partner.clone(),
        }
    }
}

// =========================================================================
//  RESULTADOS
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSlot {
    #[schema(value_type = String, format = Date, example = "2025-04-02")]
    pub date: NaiveDate,
    // true se já existe um job nessa data
    pub occupied: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePreview {
    pub customer_id: Uuid,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    #[schema(example = 91)]
    pub interval_days: i64,
    pub slots: Vec<ScheduledSlot>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerScheduleFailure {
    pub customer_id: Uuid,
    pub error: String,
}

/// Resultado do lote: total criado + falhas por cliente (o lote não aborta).
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchScheduleReport {
    #[schema(example = 42)]
    pub total_jobs_created: u64,
    #[schema(example = 10)]
    pub customers_processed: usize,
    pub failures: Vec<CustomerScheduleFailure>,
}

// =========================================================================
//  PAYLOADS
// =========================================================================

fn default_months() -> i32 {
    12
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSchedulePayload {
    #[serde(default = "default_months")]
    #[validate(range(min = 0, max = 120, message = "invalid_months"))]
    #[schema(example = 12)]
    pub months: i32,
}

impl Default for GenerateSchedulePayload {
    fn default() -> Self {
        Self { months: default_months() }
    }
}

// GET .../schedule/preview?months=24
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HorizonQuery {
    #[serde(default = "default_months")]
    #[validate(range(min = 0, max = 120, message = "invalid_months"))]
    pub months: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleResponse {
    pub success: bool,
    #[schema(example = 4)]
    pub jobs_created: u64,
    #[schema(example = 12)]
    pub months: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchScheduleResponse {
    pub success: bool,
    pub months: i32,
    #[serde(flatten)]
    pub report: BatchScheduleReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(SchedulePolicy::default().validate().is_ok());
    }

    #[test]
    fn default_split_is_80_10_10() {
        let shares = SchedulePolicy::default().calculate_shares(dec("500"));

        assert_eq!(shares.operator_share, dec("400"));
        assert_eq!(shares.admin_share, dec("50"));
        assert_eq!(shares.sales_share, dec("50"));
        assert_eq!(shares.total(), dec("500"));
    }

    #[test]
    fn shares_always_sum_to_price() {
        let policy = SchedulePolicy::default();

        for price in ["333.33", "0.01", "0", "999.99", "1234.57", "17"] {
            let shares = policy.calculate_shares(dec(price));
            assert_eq!(shares.total(), dec(price), "price {}", price);
        }
    }

    #[test]
    fn rounding_remainder_goes_to_sales() {
        let shares = SchedulePolicy::default().calculate_shares(dec("333.33"));

        assert_eq!(shares.operator_share, dec("266.66"));
        assert_eq!(shares.admin_share, dec("33.33"));
        assert_eq!(shares.sales_share, dec("33.34"));
    }

    #[test]
    fn rejects_splits_that_do_not_sum_to_one() {
        let policy = SchedulePolicy {
            sales_split: dec("0.2"),
            ..SchedulePolicy::default()
        };

        assert!(matches!(policy.validate(), Err(AppError::InvalidSchedulePolicy(_))));
    }

    #[test]
    fn rejects_negative_price() {
        let policy = SchedulePolicy {
            default_price: dec("-1"),
            ..SchedulePolicy::default()
        };

        assert!(policy.validate().is_err());
    }

    #[test]
    fn months_default_to_twelve_and_are_bounded() {
        let payload: GenerateSchedulePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.months, 12);
        assert!(payload.validate().is_ok());

        let payload: GenerateSchedulePayload = serde_json::from_str(r#"{"months": 24}"#).unwrap();
        assert_eq!(payload.months, 24);

        let payload: GenerateSchedulePayload = serde_json::from_str(r#"{"months": 500}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn parses_weekend_policy() {
        assert_eq!(WeekendPolicy::parse("keep"), Some(WeekendPolicy::Keep));
        assert_eq!(WeekendPolicy::parse("SHIFT"), Some(WeekendPolicy::ShiftToMonday));
        assert_eq!(WeekendPolicy::parse("sometimes"), None);
    }
}
