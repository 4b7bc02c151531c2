pub mod customer_service;
pub mod job_service;
pub mod recurrence;
pub mod schedule_service;
