// src/db/job_store.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, JobRepository},
    models::{job::NewJob, schedule::ScheduleTarget},
};

/// Tudo que o scheduler precisa do armazenamento. Ele só lê e insere;
/// nunca altera nem apaga jobs existentes.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Datas ocupadas do cliente em `[start, end]` (inclusivo).
    async fn find_job_dates(
        &self,
        customer_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AppError>;

    /// Insere tudo numa operação só. Datas que já existem são puladas;
    /// retorna quantos jobs foram realmente criados.
    async fn insert_jobs(&self, jobs: &[NewJob]) -> Result<u64, AppError>;

    async fn list_schedule_targets(&self) -> Result<Vec<ScheduleTarget>, AppError>;

    async fn find_schedule_target(&self, customer_id: Uuid) -> Result<Option<ScheduleTarget>, AppError>;
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
    customers: CustomerRepository,
    jobs: JobRepository,
}

impl PgJobStore {
    pub fn new(pool: PgPool, customers: CustomerRepository, jobs: JobRepository) -> Self {
        Self { pool, customers, jobs }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_job_dates(
        &self,
        customer_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AppError> {
        self.jobs.find_dates_in_range(&self.pool, customer_id, start, end).await
    }

    async fn insert_jobs(&self, jobs: &[NewJob]) -> Result<u64, AppError> {
        // Tudo ou nada por cliente
        let mut tx = self.pool.begin().await?;
        let inserted = self.jobs.insert_jobs_skip_existing(&mut *tx, jobs).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    async fn list_schedule_targets(&self) -> Result<Vec<ScheduleTarget>, AppError> {
        self.customers.list_schedule_targets(&self.pool).await
    }

    async fn find_schedule_target(&self, customer_id: Uuid) -> Result<Option<ScheduleTarget>, AppError> {
        self.customers.find_schedule_target(&self.pool, customer_id).await
    }
}
