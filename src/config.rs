// src/config.rs

use std::{env, fmt::Display, str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::clock::{Clock, SystemClock},
    db::{CustomerRepository, JobRepository, PgJobStore},
    models::schedule::{SchedulePolicy, WeekendPolicy},
    services::{
        customer_service::CustomerService, job_service::JobService,
        schedule_service::ScheduleService,
    },
};

// Variável ausente ou vazia usa o padrão; valor presente precisa ser válido
fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|e| anyhow!("{name} inválida ({value}): {e}")),
    }
}

fn text_or(raw: Option<String>, default: &str) -> String {
    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Monta a política a partir de um leitor de variáveis (o `env::var` em produção).
fn policy_from<F>(read: F) -> anyhow::Result<SchedulePolicy>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = SchedulePolicy::default();

    let weekend = match read("SCHEDULE_WEEKEND_POLICY") {
        None => defaults.weekend,
        Some(raw) => WeekendPolicy::parse(&raw)
            .ok_or_else(|| anyhow!("SCHEDULE_WEEKEND_POLICY inválida ({raw}): use keep ou shift"))?,
    };

    let policy = SchedulePolicy {
        default_price: parse_or::<Decimal>("DEFAULT_JOB_PRICE", read("DEFAULT_JOB_PRICE"), defaults.default_price)?,
        operator_split: parse_or::<Decimal>("OPERATOR_SPLIT", read("OPERATOR_SPLIT"), defaults.operator_split)?,
        admin_split: parse_or::<Decimal>("ADMIN_SPLIT", read("ADMIN_SPLIT"), defaults.admin_split)?,
        sales_split: parse_or::<Decimal>("SALES_SPLIT", read("SALES_SPLIT"), defaults.sales_split)?,
        default_operator_name: text_or(read("DEFAULT_OPERATOR_NAME"), &defaults.default_operator_name),
        default_sales_name: text_or(read("DEFAULT_SALES_NAME"), &defaults.default_sales_name),
        admin_name: text_or(read("ADMIN_NAME"), &defaults.admin_name),
        weekend,
    };

    policy.validate().map_err(|e| anyhow!(e.to_string()))?;

    Ok(policy)
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub policy: SchedulePolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let read = |name: &str| env::var(name).ok();

        let database_url = read("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        Ok(Self {
            database_url,
            bind_addr: text_or(read("BIND_ADDR"), "0.0.0.0:3000"),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", read("DATABASE_MAX_CONNECTIONS"), 5)?,
            policy: policy_from(read)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub schedule_service: ScheduleService,
    pub customer_service: CustomerService,
    pub job_service: JobService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let policy = Arc::new(config.policy.clone());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let customer_repo = CustomerRepository::new();
        let job_repo = JobRepository::new();

        let store = Arc::new(PgJobStore::new(db_pool.clone(), customer_repo.clone(), job_repo.clone()));
        let schedule_service = ScheduleService::new(store, policy.clone(), clock.clone());
        let customer_service = CustomerService::new(customer_repo, schedule_service.clone(), policy.clone(), clock);
        let job_service = JobService::new(job_repo, policy);

        Ok(Self {
            db_pool,
            schedule_service,
            customer_service,
            job_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn reader(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_default_policy() {
        let policy = policy_from(reader(&[])).unwrap();
        assert_eq!(policy, SchedulePolicy::default());
    }

    #[test]
    fn reads_overrides() {
        let policy = policy_from(reader(&[
            ("DEFAULT_JOB_PRICE", "650.00"),
            ("OPERATOR_SPLIT", "0.7"),
            ("ADMIN_SPLIT", "0.15"),
            ("SALES_SPLIT", "0.15"),
            ("ADMIN_NAME", "Selin"),
            ("SCHEDULE_WEEKEND_POLICY", "shift"),
        ]))
        .unwrap();

        assert_eq!(policy.default_price, "650.00".parse::<Decimal>().unwrap());
        assert_eq!(policy.operator_split, "0.7".parse::<Decimal>().unwrap());
        assert_eq!(policy.admin_name, "Selin");
        assert_eq!(policy.default_operator_name, "Baha");
        assert_eq!(policy.weekend, WeekendPolicy::ShiftToMonday);
    }

    #[test]
    fn rejects_splits_that_do_not_add_up() {
        let result = policy_from(reader(&[("OPERATOR_SPLIT", "0.9")]));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_garbage_values() {
        assert!(policy_from(reader(&[("DEFAULT_JOB_PRICE", "quinhentos")])).is_err());
        assert!(policy_from(reader(&[("SCHEDULE_WEEKEND_POLICY", "sometimes")])).is_err());
        assert!(parse_or::<u32>("DATABASE_MAX_CONNECTIONS", Some("-1".to_string()), 5).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_default() {
        assert_eq!(parse_or::<u32>("DATABASE_MAX_CONNECTIONS", Some("  ".to_string()), 5).unwrap(), 5);
        assert_eq!(text_or(Some(String::new()), "0.0.0.0:3000"), "0.0.0.0:3000");
    }
}
