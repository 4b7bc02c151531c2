// src/services/schedule_service.rs

use std::{collections::HashSet, sync::Arc};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::{clock::Clock, error::AppError},
    db::JobStore,
    models::{
        job::{JobStatus, NewJob},
        schedule::{
            BatchScheduleReport, CustomerScheduleFailure, SchedulePolicy, SchedulePreview,
            ScheduleTarget, ScheduledSlot,
        },
    },
    services::recurrence::RecurrencePlan,
};

pub const DEFAULT_HORIZON_MONTHS: i32 = 12;

/// Gera a agenda recorrente dos clientes. Só insere jobs em datas livres;
/// rodar de novo com os mesmos parâmetros não cria nada.
#[derive(Clone)]
pub struct ScheduleService {
    store: Arc<dyn JobStore>,
    policy: Arc<SchedulePolicy>,
    clock: Arc<dyn Clock>,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn JobStore>, policy: Arc<SchedulePolicy>, clock: Arc<dyn Clock>) -> Self {
        Self { store, policy, clock }
    }

    // Cliente sem primeira data de serviço começa hoje
    fn plan_for(&self, target: &ScheduleTarget, horizon_months: i32) -> Result<RecurrencePlan, AppError> {
        let anchor = target
            .first_service_date
            .unwrap_or_else(|| self.clock.today());

        RecurrencePlan::new(
            anchor,
            horizon_months,
            target.frequency_type,
            target.custom_interval_days,
            self.policy.weekend,
        )
    }

    fn stage_job(&self, target: &ScheduleTarget, date: NaiveDate) -> NewJob {
        let price = self.policy.default_price;

        NewJob {
            customer_id: target.id,
            scheduled_date: date,
            status: JobStatus::Scheduled,
            price,
            shares: self.policy.calculate_shares(price),
            operator_name: target.assigned_operator.clone(),
            sales_name: target.sales_partner.clone(),
            admin_name: self.policy.admin_name.clone(),
            notes: None,
        }
    }

    async fn occupied_dates(&self, customer_id: Uuid, plan: &RecurrencePlan) -> Result<HashSet<NaiveDate>, AppError> {
        let dates = self.store.find_job_dates(customer_id, plan.start, plan.end).await?;
        Ok(dates.into_iter().collect())
    }

    /// Lê as datas ocupadas, calcula as candidatas e insere as livres em lote.
    /// Retorna quantos jobs foram criados.
    pub async fn generate_schedule(&self, target: &ScheduleTarget, horizon_months: i32) -> Result<u64, AppError> {
        let plan = self.plan_for(target, horizon_months)?;
        let candidates = plan.dates();
        if candidates.is_empty() {
            return Ok(0);
        }

        let occupied = self.occupied_dates(target.id, &plan).await?;

        let staged: Vec<NewJob> = candidates
            .iter()
            .filter(|date| !occupied.contains(*date))
            .map(|date| self.stage_job(target, *date))
            .collect();

        if staged.is_empty() {
            tracing::debug!(customer_id = %target.id, "Agenda já completa, nada a criar");
            return Ok(0);
        }

        let created = self.store.insert_jobs(&staged).await?;

        tracing::info!(
            customer_id = %target.id,
            start = %plan.start,
            end = %plan.end,
            interval_days = plan.interval_days,
            created,
            skipped = candidates.len() as u64 - created,
            "Agenda gerada"
        );

        Ok(created)
    }

    pub async fn generate_for_customer(&self, customer_id: Uuid, horizon_months: i32) -> Result<u64, AppError> {
        let target = self
            .store
            .find_schedule_target(customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))?;

        self.generate_schedule(&target, horizon_months).await
    }

    /// Roda para todos os clientes. A falha de um cliente não aborta o lote:
    /// ela vai para `failures` e o total soma só o que foi gravado.
    pub async fn generate_for_all_customers(&self, horizon_months: i32) -> Result<BatchScheduleReport, AppError> {
        let targets = self.store.list_schedule_targets().await?;
        let mut report = BatchScheduleReport::default();

        for target in &targets {
            match self.generate_schedule(target, horizon_months).await {
                Ok(created) => report.total_jobs_created += created,
                Err(e) => {
                    tracing::warn!(customer_id = %target.id, "Falha ao gerar agenda: {}", e);
                    report.failures.push(CustomerScheduleFailure {
                        customer_id: target.id,
                        error: e.to_string(),
                    });
                }
            }
            report.customers_processed += 1;
        }

        tracing::info!(
            customers = report.customers_processed,
            total_jobs_created = report.total_jobs_created,
            failures = report.failures.len(),
            horizon_months,
            "Geração em lote concluída"
        );

        Ok(report)
    }

    /// Mesmas datas que `generate_schedule` usaria, sem gravar nada.
    pub async fn preview_schedule(&self, customer_id: Uuid, horizon_months: i32) -> Result<SchedulePreview, AppError> {
        let target = self
            .store
            .find_schedule_target(customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))?;

        let plan = self.plan_for(&target, horizon_months)?;
        let candidates = plan.dates();
        let occupied = if candidates.is_empty() {
            HashSet::new()
        } else {
            self.occupied_dates(customer_id, &plan).await?
        };

        let slots = candidates
            .into_iter()
            .map(|date| ScheduledSlot {
                date,
                occupied: occupied.contains(&date),
            })
            .collect();

        Ok(SchedulePreview {
            customer_id,
            start_date: plan.start,
            end_date: plan.end,
            interval_days: plan.interval_days,
            slots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::clock::FixedClock,
        db::MemoryJobStore,
        models::{customer::FrequencyType, schedule::WeekendPolicy},
    };
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn target(frequency: FrequencyType, custom: Option<i32>, first: Option<NaiveDate>) -> ScheduleTarget {
        ScheduleTarget {
            id: Uuid::new_v4(),
            frequency_type: frequency,
            custom_interval_days: custom,
            first_service_date: first,
            assigned_operator: "Baha".to_string(),
            sales_partner: "Eren".to_string(),
        }
    }

    fn service_with(store: Arc<MemoryJobStore>, policy: SchedulePolicy) -> ScheduleService {
        ScheduleService::new(store, Arc::new(policy), Arc::new(FixedClock(d(2025, 3, 10))))
    }

    fn service(store: Arc<MemoryJobStore>) -> ScheduleService {
        service_with(store, SchedulePolicy::default())
    }

    #[tokio::test]
    async fn quarterly_creates_one_job_per_step() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));

        let created = svc.generate_schedule(&customer, 12).await.unwrap();

        assert_eq!(created, 5);
        assert_eq!(
            store.dates_for(customer.id).await,
            vec![d(2025, 1, 1), d(2025, 4, 2), d(2025, 7, 2), d(2025, 10, 1), d(2025, 12, 31)]
        );
    }

    #[tokio::test]
    async fn custom_interval_over_six_months() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Custom, Some(45), Some(d(2025, 1, 1)));

        assert_eq!(svc.generate_schedule(&customer, 6).await.unwrap(), 5);
        assert_eq!(store.dates_for(customer.id).await.last(), Some(&d(2025, 6, 30)));
    }

    #[tokio::test]
    async fn second_run_creates_nothing() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Semiannual, None, Some(d(2025, 1, 1)));

        let first = svc.generate_schedule(&customer, 12).await.unwrap();
        let second = svc.generate_schedule(&customer, 12).await.unwrap();

        assert_eq!(first, 3);
        assert_eq!(second, 0);
        assert_eq!(store.inserted_jobs().await.len(), 3);
    }

    #[tokio::test]
    async fn existing_dates_are_skipped() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));
        store.seed_job(customer.id, d(2025, 4, 2)).await;

        let created = svc.generate_schedule(&customer, 12).await.unwrap();

        assert_eq!(created, 4);
        let inserted: Vec<NaiveDate> = store
            .inserted_jobs()
            .await
            .iter()
            .map(|j| j.scheduled_date)
            .collect();
        assert!(!inserted.contains(&d(2025, 4, 2)));
    }

    #[tokio::test]
    async fn longer_horizon_only_adds_the_tail() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));

        assert_eq!(svc.generate_schedule(&customer, 12).await.unwrap(), 5);
        // 24 meses: 2025-01-01 .. 2027-01-01 -> 9 datas, 5 já existem
        assert_eq!(svc.generate_schedule(&customer, 24).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn generated_jobs_are_scheduled_with_frozen_shares() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));

        svc.generate_schedule(&customer, 12).await.unwrap();

        for job in store.inserted_jobs().await {
            assert_eq!(job.status, JobStatus::Scheduled);
            assert_eq!(job.price, Decimal::new(500, 0));
            assert_eq!(job.shares.total(), job.price);
            assert_eq!(job.shares.operator_share, Decimal::new(400, 0));
            assert_eq!(job.operator_name, "Baha");
            assert_eq!(job.sales_name, "Eren");
            assert_eq!(job.admin_name, "Kazim");
        }
    }

    #[tokio::test]
    async fn injected_policy_price_is_used() {
        let store = Arc::new(MemoryJobStore::new());
        let policy = SchedulePolicy {
            default_price: Decimal::new(75000, 2),
            ..SchedulePolicy::default()
        };
        let svc = service_with(store.clone(), policy);
        let customer = target(FrequencyType::Semiannual, None, Some(d(2025, 1, 1)));

        svc.generate_schedule(&customer, 6).await.unwrap();

        let jobs = store.inserted_jobs().await;
        assert!(!jobs.is_empty());
        assert!(jobs.iter().all(|j| j.price == Decimal::new(750, 0)
            && j.shares.sales_share == Decimal::new(75, 0)));
    }

    #[tokio::test]
    async fn missing_first_service_date_starts_today() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Quarterly, None, None);

        svc.generate_schedule(&customer, 3).await.unwrap();

        assert_eq!(store.dates_for(customer.id).await.first(), Some(&d(2025, 3, 10)));
    }

    #[tokio::test]
    async fn zero_horizon_only_schedules_the_anchor() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));

        assert_eq!(svc.generate_schedule(&customer, 0).await.unwrap(), 1);
        assert_eq!(svc.generate_schedule(&customer, 0).await.unwrap(), 0);
        assert_eq!(svc.generate_schedule(&customer, -6).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn store_failure_propagates_for_single_customer() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store.clone());
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));
        store.fail_for_customer(customer.id).await;

        assert!(svc.generate_schedule(&customer, 12).await.is_err());
        assert!(store.inserted_jobs().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let store = Arc::new(MemoryJobStore::new());
        let svc = service(store);

        let result = svc.generate_for_customer(Uuid::new_v4(), 12).await;
        assert!(matches!(result, Err(AppError::CustomerNotFound(_))));
    }

    #[tokio::test]
    async fn generate_for_customer_looks_up_the_target() {
        let store = Arc::new(MemoryJobStore::new());
        let customer = target(FrequencyType::Custom, Some(0), Some(d(2025, 1, 1)));
        store.add_target(customer.clone()).await;
        let svc = service(store.clone());

        // intervalo inválido -> 90 dias: 01-01, 04-01, 06-30, 09-28, 12-27
        assert_eq!(svc.generate_for_customer(customer.id, 12).await.unwrap(), 5);
        assert_eq!(store.dates_for(customer.id).await[1], d(2025, 4, 1));
    }

    #[tokio::test]
    async fn batch_sums_per_customer_counts() {
        let store = Arc::new(MemoryJobStore::new());
        store.add_target(target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)))).await;
        store.add_target(target(FrequencyType::Semiannual, None, Some(d(2025, 1, 1)))).await;
        store.add_target(target(FrequencyType::Custom, Some(45), Some(d(2025, 1, 1)))).await;
        let svc = service(store.clone());

        let report = svc.generate_for_all_customers(6).await.unwrap();

        // 6 meses até 2025-07-01: trimestral 2, semestral 1, 45 dias 5
        assert_eq!(report.total_jobs_created, 2 + 1 + 5);
        assert_eq!(report.customers_processed, 3);
        assert!(report.failures.is_empty());

        let again = svc.generate_for_all_customers(6).await.unwrap();
        assert_eq!(again.total_jobs_created, 0);
    }

    #[tokio::test]
    async fn batch_collects_failures_and_keeps_going() {
        let store = Arc::new(MemoryJobStore::new());
        let broken = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));
        let healthy = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));
        store.add_target(broken.clone()).await;
        store.add_target(healthy.clone()).await;
        store.fail_for_customer(broken.id).await;
        let svc = service(store.clone());

        let report = svc.generate_for_all_customers(12).await.unwrap();

        assert_eq!(report.total_jobs_created, 5);
        assert_eq!(report.customers_processed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].customer_id, broken.id);
        assert_eq!(store.dates_for(healthy.id).await.len(), 5);
    }

    #[tokio::test]
    async fn batch_fails_when_customers_cannot_be_listed() {
        let store = Arc::new(MemoryJobStore::new());
        store.set_fail_on_list(true).await;
        let svc = service(store);

        assert!(svc.generate_for_all_customers(12).await.is_err());
    }

    #[tokio::test]
    async fn preview_flags_occupied_dates_and_writes_nothing() {
        let store = Arc::new(MemoryJobStore::new());
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 1)));
        store.add_target(customer.clone()).await;
        store.seed_job(customer.id, d(2025, 7, 2)).await;
        let svc = service(store.clone());

        let preview = svc.preview_schedule(customer.id, 12).await.unwrap();

        assert_eq!(preview.interval_days, 91);
        assert_eq!(preview.end_date, d(2026, 1, 1));
        assert_eq!(preview.slots.len(), 5);
        let occupied: Vec<NaiveDate> = preview
            .slots
            .iter()
            .filter(|s| s.occupied)
            .map(|s| s.date)
            .collect();
        assert_eq!(occupied, vec![d(2025, 7, 2)]);
        assert!(store.inserted_jobs().await.is_empty());
    }

    #[tokio::test]
    async fn weekend_policy_moves_generated_dates() {
        let store = Arc::new(MemoryJobStore::new());
        let policy = SchedulePolicy {
            weekend: WeekendPolicy::ShiftToMonday,
            ..SchedulePolicy::default()
        };
        let svc = service_with(store.clone(), policy);
        // 2025-01-04 é sábado
        let customer = target(FrequencyType::Quarterly, None, Some(d(2025, 1, 4)));

        svc.generate_schedule(&customer, 4).await.unwrap();

        assert_eq!(store.dates_for(customer.id).await, vec![d(2025, 1, 6), d(2025, 4, 7)]);
    }
}
