// src/services/recurrence.rs
//
// Expansão da política de frequência em datas concretas. Sem I/O: o
// ScheduleService lê as datas ocupadas e grava o resultado.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::{
    common::error::AppError,
    models::{customer::FrequencyType, schedule::WeekendPolicy},
};

pub const QUARTERLY_INTERVAL_DAYS: i64 = 91;
pub const SEMIANNUAL_INTERVAL_DAYS: i64 = 182;
pub const DEFAULT_CUSTOM_INTERVAL_DAYS: i64 = 90;

/// Intervalo em dias para a frequência do cliente.
/// CUSTOM sem intervalo positivo cai no padrão de 90 dias.
pub fn resolve_interval_days(frequency: FrequencyType, custom_interval_days: Option<i32>) -> i64 {
    match frequency {
        FrequencyType::Quarterly => QUARTERLY_INTERVAL_DAYS,
        FrequencyType::Semiannual => SEMIANNUAL_INTERVAL_DAYS,
        FrequencyType::Custom => match custom_interval_days {
            Some(days) if days > 0 => i64::from(days),
            _ => DEFAULT_CUSTOM_INTERVAL_DAYS,
        },
    }
}

/// Fim do horizonte: `start` avançado `months` meses de calendário
/// (31/01 + 1 mês = 28/02 ou 29/02). Meses negativos recuam, o que deixa a janela vazia.
pub fn horizon_end(start: NaiveDate, months: i32) -> Result<NaiveDate, AppError> {
    let shifted = if months >= 0 {
        start.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        start.checked_sub_months(Months::new(months.unsigned_abs()))
    };

    shifted.ok_or(AppError::InvalidHorizon(months))
}

fn shift_weekend(date: NaiveDate, policy: WeekendPolicy) -> NaiveDate {
    let offset = match (policy, date.weekday()) {
        (WeekendPolicy::ShiftToMonday, Weekday::Sat) => 2,
        (WeekendPolicy::ShiftToMonday, Weekday::Sun) => 1,
        _ => 0,
    };
    date.checked_add_days(Days::new(offset)).unwrap_or(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrencePlan {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval_days: i64,
    pub weekend: WeekendPolicy,
}

impl RecurrencePlan {
    pub fn new(
        anchor: NaiveDate,
        horizon_months: i32,
        frequency: FrequencyType,
        custom_interval_days: Option<i32>,
        weekend: WeekendPolicy,
    ) -> Result<Self, AppError> {
        Ok(Self {
            start: anchor,
            end: horizon_end(anchor, horizon_months)?,
            interval_days: resolve_interval_days(frequency, custom_interval_days),
            weekend,
        })
    }

    /// Datas candidatas em ordem estritamente crescente, `end` incluso.
    /// O passo sempre parte da data sem ajuste de fim de semana.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let step = Days::new(self.interval_days.max(1) as u64);
        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut current = self.start;

        while current <= self.end {
            let date = shift_weekend(current, self.weekend);
            if date <= self.end && dates.last().map_or(true, |last| *last < date) {
                dates.push(date);
            }

            current = match current.checked_add_days(step) {
                Some(next) => next,
                None => break,
            };
        }

        dates
    }
}
