pub mod customers;
pub mod jobs;
pub mod schedule;
