// src/db/customer_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{customer::Customer, schedule::ScheduleTarget},
};

const CUSTOMER_COLUMNS: &str = r#"
    id, name, address_line1, address_line2, city, state, zip,
    contact_name, contact_phone, contact_email, hood_length_ft, notes,
    frequency_type, custom_interval_days, first_service_date,
    assigned_operator, sales_partner, created_at, updated_at
"#;

const SCHEDULE_TARGET_COLUMNS: &str = r#"
    id, frequency_type, custom_interval_days, first_service_date,
    assigned_operator, sales_partner
"#;

/// Dados já normalizados para gravar um cliente (criação ou atualização completa).
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub hood_length_ft: i32,
    pub notes: Option<String>,
    pub frequency_type: String,
    pub custom_interval_days: Option<i32>,
    pub first_service_date: Option<NaiveDate>,
    pub assigned_operator: String,
    pub sales_partner: String,
}

impl From<&Customer> for CustomerRecord {
    fn from(c: &Customer) -> Self {
        Self {
            name: c.name.clone(),
            address_line1: c.address_line1.clone(),
            address_line2: c.address_line2.clone(),
            city: c.city.clone(),
            state: c.state.clone(),
            zip: c.zip.clone(),
            contact_name: c.contact_name.clone(),
            contact_phone: c.contact_phone.clone(),
            contact_email: c.contact_email.clone(),
            hood_length_ft: c.hood_length_ft,
            notes: c.notes.clone(),
            frequency_type: c.frequency_type.as_str().to_string(),
            custom_interval_days: c.custom_interval_days,
            first_service_date: c.first_service_date,
            assigned_operator: c.assigned_operator.clone(),
            sales_partner: c.sales_partner.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct CustomerRepository;

impl CustomerRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        record: &CustomerRecord,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO customers (
                name, address_line1, address_line2, city, state, zip,
                contact_name, contact_phone, contact_email, hood_length_ft, notes,
                frequency_type, custom_interval_days, first_service_date,
                assigned_operator, sales_partner
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(&record.name)
            .bind(&record.address_line1)
            .bind(&record.address_line2)
            .bind(&record.city)
            .bind(&record.state)
            .bind(&record.zip)
            .bind(&record.contact_name)
            .bind(&record.contact_phone)
            .bind(&record.contact_email)
            .bind(record.hood_length_ft)
            .bind(&record.notes)
            .bind(&record.frequency_type)
            .bind(record.custom_interval_days)
            .bind(record.first_service_date)
            .bind(&record.assigned_operator)
            .bind(&record.sales_partner)
            .fetch_one(executor)
            .await?;

        Ok(customer)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .fetch_optional(executor)
            .await?;

        Ok(customer)
    }

    /// Lista por nome. Com `search`, filtra nome, cidade ou telefone (ILIKE).
    pub async fn list_customers<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customers = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let sql = format!(
                    r#"
                    SELECT {CUSTOMER_COLUMNS}
                    FROM customers
                    WHERE name ILIKE $1 OR city ILIKE $1 OR contact_phone ILIKE $1
                    ORDER BY name ASC
                    "#
                );
                sqlx::query_as::<_, Customer>(&sql)
                    .bind(format!("%{}%", term))
                    .fetch_all(executor)
                    .await?
            }
            None => {
                let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name ASC");
                sqlx::query_as::<_, Customer>(&sql).fetch_all(executor).await?
            }
        };

        Ok(customers)
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        record: &CustomerRecord,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE customers SET
                name = $2, address_line1 = $3, address_line2 = $4,
                city = $5, state = $6, zip = $7,
                contact_name = $8, contact_phone = $9, contact_email = $10,
                hood_length_ft = $11, notes = $12,
                frequency_type = $13, custom_interval_days = $14, first_service_date = $15,
                assigned_operator = $16, sales_partner = $17,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .bind(&record.name)
            .bind(&record.address_line1)
            .bind(&record.address_line2)
            .bind(&record.city)
            .bind(&record.state)
            .bind(&record.zip)
            .bind(&record.contact_name)
            .bind(&record.contact_phone)
            .bind(&record.contact_email)
            .bind(record.hood_length_ft)
            .bind(&record.notes)
            .bind(&record.frequency_type)
            .bind(record.custom_interval_days)
            .bind(record.first_service_date)
            .bind(&record.assigned_operator)
            .bind(&record.sales_partner)
            .fetch_optional(executor)
            .await?;

        Ok(customer)
    }

    /// Remove o cliente (os jobs caem junto via ON DELETE CASCADE).
    pub async fn delete_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PROJEÇÃO PARA O SCHEDULER
    // =========================================================================

    pub async fn list_schedule_targets<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<ScheduleTarget>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {SCHEDULE_TARGET_COLUMNS} FROM customers ORDER BY created_at ASC");

        let targets = sqlx::query_as::<_, ScheduleTarget>(&sql)
            .fetch_all(executor)
            .await?;

        Ok(targets)
    }

    pub async fn find_schedule_target<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<ScheduleTarget>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {SCHEDULE_TARGET_COLUMNS} FROM customers WHERE id = $1");

        let target = sqlx::query_as::<_, ScheduleTarget>(&sql)
            .bind(customer_id)
            .fetch_optional(executor)
            .await?;

        Ok(target)
    }
}
