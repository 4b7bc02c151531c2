pub mod customer;
pub mod job;
pub mod schedule;
