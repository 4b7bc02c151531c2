// src/services/job_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::JobRepository,
    models::{
        job::{CreateJobPayload, Job, JobFilter, JobStatus, NewJob, UpdateJobPayload},
        schedule::SchedulePolicy,
    },
};

fn validation_error(field: &'static str, code: &'static str, message: &str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new(code);
    err.message = Some(message.to_string().into());
    errors.add(field, err);
    AppError::ValidationError(errors)
}

fn check_price(price: Decimal) -> Result<Decimal, AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(validation_error("price", "negative_price", "O preço não pode ser negativo"));
    }
    Ok(price.round_dp(2))
}

fn name_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Monta o job manual com os padrões da política.
fn build_new_job(payload: CreateJobPayload, policy: &SchedulePolicy) -> Result<NewJob, AppError> {
    let price = check_price(payload.price.unwrap_or(policy.default_price))?;

    Ok(NewJob {
        customer_id: payload.customer_id,
        scheduled_date: payload.scheduled_date,
        status: payload.status.unwrap_or_default(),
        price,
        shares: policy.calculate_shares(price),
        operator_name: name_or(payload.operator_name, &policy.default_operator_name),
        sales_name: name_or(payload.sales_name, &policy.default_sales_name),
        admin_name: name_or(payload.admin_name, &policy.admin_name),
        notes: payload.notes,
    })
}

/// Aplica a edição sobre o job carregado.
/// COMPLETED carimba `completed_at`; voltar a SCHEDULED limpa o carimbo.
fn apply_job_update(
    mut job: Job,
    payload: UpdateJobPayload,
    policy: &SchedulePolicy,
    now: DateTime<Utc>,
) -> Result<Job, AppError> {
    if let Some(date) = payload.scheduled_date {
        job.scheduled_date = date;
    }

    if let Some(status) = payload.status {
        match status {
            JobStatus::Completed if job.status != JobStatus::Completed => job.completed_at = Some(now),
            JobStatus::Scheduled => job.completed_at = None,
            _ => {}
        }
        job.status = status;
    }

    if let Some(price) = payload.price {
        let price = check_price(price)?;
        let shares = policy.calculate_shares(price);
        job.price = price;
        job.operator_share = shares.operator_share;
        job.admin_share = shares.admin_share;
        job.sales_share = shares.sales_share;
    }

    if let Some(name) = payload.operator_name {
        job.operator_name = name_or(Some(name), &job.operator_name);
    }
    if let Some(name) = payload.sales_name {
        job.sales_name = name_or(Some(name), &job.sales_name);
    }
    if let Some(name) = payload.admin_name {
        job.admin_name = name_or(Some(name), &job.admin_name);
    }
    if payload.notes.is_some() {
        job.notes = payload.notes.filter(|n| !n.trim().is_empty());
    }

    Ok(job)
}

#[derive(Clone)]
pub struct JobService {
    repo: JobRepository,
    policy: Arc<SchedulePolicy>,
}

impl JobService {
    pub fn new(repo: JobRepository, policy: Arc<SchedulePolicy>) -> Self {
        Self { repo, policy }
    }

    pub async fn list_jobs<'e, E>(&self, executor: E, filter: &JobFilter) -> Result<Vec<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_jobs(executor, filter).await
    }

    pub async fn get_job<'e, E>(&self, executor: E, job_id: Uuid) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, job_id)
            .await?
            .ok_or(AppError::JobNotFound(job_id))
    }

    pub async fn create_job<'e, E>(&self, executor: E, payload: CreateJobPayload) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let new_job = build_new_job(payload, &self.policy)?;
        let job = self.repo.create_job(executor, &new_job).await?;

        tracing::info!(
            job_id = %job.id,
            customer_id = %job.customer_id,
            date = %job.scheduled_date,
            "Serviço criado manualmente"
        );

        Ok(job)
    }

    pub async fn update_job<'e, E>(
        &self,
        executor: E,
        job_id: Uuid,
        payload: UpdateJobPayload,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .repo
            .find_by_id(&mut *tx, job_id)
            .await?
            .ok_or(AppError::JobNotFound(job_id))?;

        let job = apply_job_update(existing, payload, &self.policy, Utc::now())?;
        let updated = self.repo.update_job(&mut *tx, &job).await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete_job<'e, E>(&self, executor: E, job_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete_job(executor, job_id).await? {
            return Err(AppError::JobNotFound(job_id));
        }
        Ok(())
    }
}
