// src/services/customer_service.rs

use std::sync::Arc;

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{clock::Clock, error::AppError},
    db::{CustomerRecord, CustomerRepository},
    models::{
        customer::{CreateCustomerPayload, Customer, UpdateCustomerPayload},
        schedule::{SchedulePolicy, ScheduleTarget},
    },
    services::schedule_service::{ScheduleService, DEFAULT_HORIZON_MONTHS},
};

const DEFAULT_HOOD_LENGTH_FT: i32 = 10;

// "" e espaços contam como ausente
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Intervalo não positivo não é guardado; o scheduler usa o padrão
fn positive_interval(days: Option<i32>) -> Option<i32> {
    days.filter(|d| *d > 0)
}

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    schedule_service: ScheduleService,
    policy: Arc<SchedulePolicy>,
    clock: Arc<dyn Clock>,
}

impl CustomerService {
    pub fn new(
        repo: CustomerRepository,
        schedule_service: ScheduleService,
        policy: Arc<SchedulePolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            schedule_service,
            policy,
            clock,
        }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    fn record_from_create(&self, payload: CreateCustomerPayload) -> CustomerRecord {
        CustomerRecord {
            name: payload.name.trim().to_string(),
            address_line1: payload.address_line1,
            address_line2: non_empty(payload.address_line2),
            city: payload.city,
            state: payload.state,
            zip: payload.zip,
            contact_name: payload.contact_name,
            contact_phone: payload.contact_phone,
            contact_email: non_empty(payload.contact_email),
            hood_length_ft: payload.hood_length_ft.unwrap_or(DEFAULT_HOOD_LENGTH_FT),
            notes: non_empty(payload.notes),
            frequency_type: payload.frequency_type.unwrap_or_default().as_str().to_string(),
            custom_interval_days: positive_interval(payload.custom_interval_days),
            first_service_date: Some(payload.first_service_date.unwrap_or_else(|| self.clock.today())),
            assigned_operator: non_empty(payload.assigned_operator)
                .unwrap_or_else(|| self.policy.default_operator_name.clone()),
            sales_partner: non_empty(payload.sales_partner)
                .unwrap_or_else(|| self.policy.default_sales_name.clone()),
        }
    }

    /// Cria o cliente e, salvo `generateSchedule = false`, já gera os próximos 12 meses.
    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        payload: CreateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let generate_schedule = payload.generate_schedule;
        let record = self.record_from_create(payload);

        let customer = self.repo.create_customer(executor, &record).await?;
        tracing::info!(customer_id = %customer.id, "Cliente criado: {}", customer.name);

        if generate_schedule {
            self.schedule_service
                .generate_schedule(&ScheduleTarget::from(&customer), DEFAULT_HORIZON_MONTHS)
                .await?;
        }

        Ok(customer)
    }

    // =========================================================================
    //  CONSULTA
    // =========================================================================

    pub async fn get_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))
    }

    pub async fn list_customers<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_customers(executor, search).await
    }

    // =========================================================================
    //  ATUALIZAÇÃO / REMOÇÃO
    // =========================================================================

    /// Campos ausentes no payload mantêm o valor atual.
    fn apply_update(existing: &Customer, payload: UpdateCustomerPayload) -> CustomerRecord {
        let mut record = CustomerRecord::from(existing);

        if let Some(name) = payload.name {
            record.name = name.trim().to_string();
        }
        if let Some(address_line1) = payload.address_line1 {
            record.address_line1 = address_line1;
        }
        if payload.address_line2.is_some() {
            record.address_line2 = non_empty(payload.address_line2);
        }
        if let Some(city) = payload.city {
            record.city = city;
        }
        if let Some(state) = payload.state {
            record.state = state;
        }
        if let Some(zip) = payload.zip {
            record.zip = zip;
        }
        if let Some(contact_name) = payload.contact_name {
            record.contact_name = contact_name;
        }
        if let Some(contact_phone) = payload.contact_phone {
            record.contact_phone = contact_phone;
        }
        if payload.contact_email.is_some() {
            record.contact_email = non_empty(payload.contact_email);
        }
        if let Some(hood_length_ft) = payload.hood_length_ft {
            record.hood_length_ft = hood_length_ft;
        }
        if payload.notes.is_some() {
            record.notes = non_empty(payload.notes);
        }
        if let Some(frequency_type) = payload.frequency_type {
            record.frequency_type = frequency_type.as_str().to_string();
        }
        if payload.custom_interval_days.is_some() {
            record.custom_interval_days = positive_interval(payload.custom_interval_days);
        }
        if payload.first_service_date.is_some() {
            record.first_service_date = payload.first_service_date;
        }
        if let Some(operator) = non_empty(payload.assigned_operator) {
            record.assigned_operator = operator;
        }
        if let Some(partner) = non_empty(payload.sales_partner) {
            record.sales_partner = partner;
        }

        record
    }

    /// Jobs já criados não mudam; para refletir a nova frequência, regenere a agenda.
    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        payload: UpdateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .repo
            .find_by_id(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))?;

        let record = Self::apply_update(&existing, payload);

        let updated = self
            .repo
            .update_customer(&mut *tx, customer_id, &record)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete_customer(executor, customer_id).await? {
            return Err(AppError::CustomerNotFound(customer_id));
        }
        tracing::info!(customer_id = %customer_id, "Cliente removido");
        Ok(())
    }
}
