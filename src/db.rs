pub mod customer_repo;
pub use customer_repo::{CustomerRecord, CustomerRepository};
pub mod job_repo;
pub use job_repo::JobRepository;
pub mod job_store;
pub use job_store::{JobStore, PgJobStore};

#[cfg(test)]
pub mod memory_store;
#[cfg(test)]
pub use memory_store::MemoryJobStore;
