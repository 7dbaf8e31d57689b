//! Persistence for users, companies, jobs and applications.
//!
//! Services depend on the [`Store`] trait object. Two backends exist:
//! - [`PgStore`]: PostgreSQL via sqlx, schema created at startup
//! - [`MemoryStore`]: in-process collections for development and tests

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use models::{
    Application, Company, CompanyPatch, Job, JobFilter, JobLocation, JobPatch, NewApplication,
    NewCompany, NewJob, NewUser, SeniorityLevel, User, UserPatch, UserProfile, UserStatus,
    WorkingTime,
};
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already holds this value. Carries the API field name.
    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to a model.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn user_by_mobile(&self, mobile_number: &str) -> StoreResult<Option<User>>;
    async fn users_by_recovery_email(&self, recovery_email: &str) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>>;
    async fn set_user_status(&self, id: Uuid, status: UserStatus) -> StoreResult<bool>;
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;
    /// Also removes the user's companies, jobs and applications.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn create_company(&self, company: NewCompany) -> StoreResult<Company>;
    async fn company_by_id(&self, id: Uuid) -> StoreResult<Option<Company>>;
    async fn company_by_hr(&self, hr_id: Uuid) -> StoreResult<Option<Company>>;
    /// Exact name, ignoring case.
    async fn company_by_name(&self, name: &str) -> StoreResult<Option<Company>>;
    /// Names containing `fragment`, ignoring case.
    async fn search_companies(&self, fragment: &str) -> StoreResult<Vec<Company>>;
    async fn update_company(&self, id: Uuid, patch: CompanyPatch) -> StoreResult<Option<Company>>;
    async fn delete_company(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create_job(&self, job: NewJob) -> StoreResult<Job>;
    async fn job_by_id(&self, id: Uuid) -> StoreResult<Option<Job>>;
    async fn update_job(&self, id: Uuid, patch: JobPatch) -> StoreResult<Option<Job>>;
    /// Also removes the job's applications.
    async fn delete_job(&self, id: Uuid) -> StoreResult<bool>;
    async fn all_jobs(&self) -> StoreResult<Vec<Job>>;
    async fn jobs_added_by(&self, hr_id: Uuid) -> StoreResult<Vec<Job>>;
    async fn filter_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn create_application(&self, application: NewApplication) -> StoreResult<Application>;
    async fn applications_for_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>>;
}

/// Everything the services need from persistence.
#[async_trait]
pub trait Store: UserStore + CompanyStore + JobStore + ApplicationStore {
    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> StoreResult<()>;
}
