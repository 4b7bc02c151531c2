//! JobStore em memória para os testes dos serviços.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::JobStore,
    models::{job::NewJob, schedule::ScheduleTarget},
};

#[derive(Default)]
pub struct MemoryJobStore {
    targets: RwLock<Vec<ScheduleTarget>>,
    jobs: RwLock<Vec<NewJob>>,
    // Espelha a constraint única (customer_id, scheduled_date)
    occupied: RwLock<BTreeSet<(Uuid, NaiveDate)>>,
    failing_customers: RwLock<HashSet<Uuid>>,
    fail_on_list: RwLock<bool>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_target(&self, target: ScheduleTarget) {
        self.targets.write().await.push(target);
    }

    /// Marca uma data como ocupada, como se um job já existisse.
    pub async fn seed_job(&self, customer_id: Uuid, date: NaiveDate) {
        self.occupied.write().await.insert((customer_id, date));
    }

    pub async fn fail_for_customer(&self, customer_id: Uuid) {
        self.failing_customers.write().await.insert(customer_id);
    }

    pub async fn set_fail_on_list(&self, fail: bool) {
        *self.fail_on_list.write().await = fail;
    }

    pub async fn inserted_jobs(&self) -> Vec<NewJob> {
        self.jobs.read().await.clone()
    }

    pub async fn dates_for(&self, customer_id: Uuid) -> Vec<NaiveDate> {
        self.occupied
            .read()
            .await
            .iter()
            .filter(|(id, _)| *id == customer_id)
            .map(|(_, date)| *date)
            .collect()
    }

    async fn check_failure(&self, customer_id: Uuid) -> Result<(), AppError> {
        if self.failing_customers.read().await.contains(&customer_id) {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "falha simulada para o cliente {}",
                customer_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find_job_dates(
        &self,
        customer_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AppError> {
        self.check_failure(customer_id).await?;
        if start > end {
            return Ok(Vec::new());
        }

        Ok(self
            .occupied
            .read()
            .await
            .range((customer_id, start)..=(customer_id, end))
            .map(|(_, date)| *date)
            .collect())
    }

    async fn insert_jobs(&self, jobs: &[NewJob]) -> Result<u64, AppError> {
        let mut occupied = self.occupied.write().await;
        let mut stored = self.jobs.write().await;
        let mut inserted = 0;

        for job in jobs {
            if occupied.insert((job.customer_id, job.scheduled_date)) {
                stored.push(job.clone());
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn list_schedule_targets(&self) -> Result<Vec<ScheduleTarget>, AppError> {
        if *self.fail_on_list.read().await {
            return Err(AppError::InternalServerError(anyhow::anyhow!("falha simulada na listagem")));
        }
        Ok(self.targets.read().await.clone())
    }

    async fn find_schedule_target(&self, customer_id: Uuid) -> Result<Option<ScheduleTarget>, AppError> {
        Ok(self
            .targets
            .read()
            .await
            .iter()
            .find(|t| t.id == customer_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{job::JobStatus, schedule::SchedulePolicy};

    fn new_job(customer_id: Uuid, date: NaiveDate) -> NewJob {
        let policy = SchedulePolicy::default();
        NewJob {
            customer_id,
            scheduled_date: date,
            status: JobStatus::Scheduled,
            price: policy.default_price,
            shares: policy.calculate_shares(policy.default_price),
            operator_name: "Baha".to_string(),
            sales_name: "Eren".to_string(),
            admin_name: "Kazim".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn duplicate_inserts_are_skipped() {
        let store = MemoryJobStore::new();
        let customer = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();

        // duas requisições concorrentes que leram o mesmo snapshot
        let first = store.insert_jobs(&[new_job(customer, date)]).await.unwrap();
        let second = store.insert_jobs(&[new_job(customer, date)]).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert_eq!(store.inserted_jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn range_query_is_per_customer_and_inclusive() {
        let store = MemoryJobStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();

        store.seed_job(a, d(1, 1)).await;
        store.seed_job(a, d(3, 1)).await;
        store.seed_job(a, d(6, 1)).await;
        store.seed_job(b, d(3, 1)).await;

        let dates = store.find_job_dates(a, d(1, 1), d(3, 1)).await.unwrap();
        assert_eq!(dates, vec![d(1, 1), d(3, 1)]);
    }
}
