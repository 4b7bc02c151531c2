// src/db/job_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::job::{Job, JobFilter, NewJob},
};

const JOB_COLUMNS: &str = r#"
    id, customer_id, scheduled_date, status, price,
    operator_share, admin_share, sales_share,
    operator_name, sales_name, admin_name, notes,
    completed_at, created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct JobRepository;

impl JobRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    /// Datas (já ocupadas) de um cliente dentro de `[start, end]`, em ordem.
    pub async fn find_dates_in_range<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT scheduled_date
            FROM jobs
            WHERE customer_id = $1
              AND scheduled_date BETWEEN $2 AND $3
            ORDER BY scheduled_date ASC
            "#,
        )
            .bind(customer_id)
            .bind(start)
            .bind(end)
            .fetch_all(executor)
            .await?;

        Ok(dates)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        job_id: Uuid,
    ) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");

        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(job_id)
            .fetch_optional(executor)
            .await?;

        Ok(job)
    }

    /// Listagem com filtros opcionais; as datas do filtro são inclusivas.
    pub async fn list_jobs<'e, E>(
        &self,
        executor: E,
        filter: &JobFilter,
    ) -> Result<Vec<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE TRUE"));

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(operator_name) = &filter.operator_name {
            builder.push(" AND operator_name = ").push_bind(operator_name.clone());
        }
        if let Some(sales_name) = &filter.sales_name {
            builder.push(" AND sales_name = ").push_bind(sales_name.clone());
        }
        if let Some(customer_id) = filter.customer_id {
            builder.push(" AND customer_id = ").push_bind(customer_id);
        }
        if let Some(start_date) = filter.start_date {
            builder.push(" AND scheduled_date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            builder.push(" AND scheduled_date <= ").push_bind(end_date);
        }
        builder.push(" ORDER BY scheduled_date ASC");

        let jobs = builder
            .build_query_as::<Job>()
            .fetch_all(executor)
            .await?;

        Ok(jobs)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    /// Insere em lote num único comando. Datas já ocupadas (mesmo cliente/dia)
    /// são ignoradas pela constraint única; retorna quantas linhas entraram.
    pub async fn insert_jobs_skip_existing<'e, E>(
        &self,
        executor: E,
        jobs: &[NewJob],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if jobs.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            INSERT INTO jobs (
                customer_id, scheduled_date, status, price,
                operator_share, admin_share, sales_share,
                operator_name, sales_name, admin_name, notes
            )
            "#,
        );

        builder.push_values(jobs, |mut row, job| {
            row.push_bind(job.customer_id)
                .push_bind(job.scheduled_date)
                .push_bind(job.status)
                .push_bind(job.price)
                .push_bind(job.shares.operator_share)
                .push_bind(job.shares.admin_share)
                .push_bind(job.shares.sales_share)
                .push_bind(job.operator_name.clone())
                .push_bind(job.sales_name.clone())
                .push_bind(job.admin_name.clone())
                .push_bind(job.notes.clone());
        });

        builder.push(" ON CONFLICT (customer_id, scheduled_date) DO NOTHING");

        let result = builder.build().execute(executor).await?;

        Ok(result.rows_affected())
    }

    /// Criação manual: aqui a data duplicada é erro, não silêncio.
    pub async fn create_job<'e, E>(
        &self,
        executor: E,
        job: &NewJob,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO jobs (
                customer_id, scheduled_date, status, price,
                operator_share, admin_share, sales_share,
                operator_name, sales_name, admin_name, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {JOB_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Job>(&sql)
            .bind(job.customer_id)
            .bind(job.scheduled_date)
            .bind(job.status)
            .bind(job.price)
            .bind(job.shares.operator_share)
            .bind(job.shares.admin_share)
            .bind(job.shares.sales_share)
            .bind(&job.operator_name)
            .bind(&job.sales_name)
            .bind(&job.admin_name)
            .bind(&job.notes)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::CustomerNotFound(job.customer_id);
                }
                map_date_conflict(e, job.scheduled_date)
            })
    }

    /// Regrava todos os campos editáveis de um job já carregado e ajustado pelo serviço.
    pub async fn update_job<'e, E>(
        &self,
        executor: E,
        job: &Job,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE jobs SET
                scheduled_date = $2, status = $3, price = $4,
                operator_share = $5, admin_share = $6, sales_share = $7,
                operator_name = $8, sales_name = $9, admin_name = $10,
                notes = $11, completed_at = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Job>(&sql)
            .bind(job.id)
            .bind(job.scheduled_date)
            .bind(job.status)
            .bind(job.price)
            .bind(job.operator_share)
            .bind(job.admin_share)
            .bind(job.sales_share)
            .bind(&job.operator_name)
            .bind(&job.sales_name)
            .bind(&job.admin_name)
            .bind(&job.notes)
            .bind(job.completed_at)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_date_conflict(e, job.scheduled_date))?
            .ok_or(AppError::JobNotFound(job.id))
    }

    pub async fn delete_job<'e, E>(
        &self,
        executor: E,
        job_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Violação de uq_jobs_customer_date vira conflito de data
fn map_date_conflict(e: sqlx::Error, date: NaiveDate) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::JobDateConflict(date);
        }
    }
    e.into()
}

// jobs.customer_id aponta para um cliente inexistente
fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
