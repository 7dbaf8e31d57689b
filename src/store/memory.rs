//! In-process store.
//!
//! One lock guards all collections so uniqueness checks and the cascading
//! deletes are atomic. Collections keep insertion order.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::*;
use super::{
    ApplicationStore, CompanyStore, JobStore, Store, StoreError, StoreResult, UserStore,
};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    companies: Vec<Company>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
}

impl Collections {
    fn check_user_unique(&self, email: &str, mobile: &str, except: Option<Uuid>) -> StoreResult<()> {
        for user in self.users.iter().filter(|u| Some(u.id) != except) {
            if user.email == email {
                return Err(StoreError::Conflict("email"));
            }
            if user.mobile_number == mobile {
                return Err(StoreError::Conflict("mobileNumber"));
            }
        }
        Ok(())
    }

    fn check_company_unique(&self, name: &str, email: &str, except: Option<Uuid>) -> StoreResult<()> {
        for company in self.companies.iter().filter(|c| Some(c.id) != except) {
            if company.company_name == name {
                return Err(StoreError::Conflict("companyName"));
            }
            if company.company_email == email {
                return Err(StoreError::Conflict("companyEmail"));
            }
        }
        Ok(())
    }

    fn remove_jobs_where(&mut self, pred: impl Fn(&Job) -> bool) {
        let doomed: Vec<Uuid> = self.jobs.iter().filter(|j| pred(j)).map(|j| j.id).collect();
        self.jobs.retain(|j| !doomed.contains(&j.id));
        self.applications.retain(|a| !doomed.contains(&a.job_id));
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut db = self.inner.write().await;
        db.check_user_unique(&user.email, &user.mobile_number, None)?;
        let user = user.into_user(Uuid::new_v4());
        db.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_mobile(&self, mobile_number: &str) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db
            .users
            .iter()
            .find(|u| u.mobile_number == mobile_number)
            .cloned())
    }

    async fn users_by_recovery_email(&self, recovery_email: &str) -> StoreResult<Vec<User>> {
        let db = self.inner.read().await;
        Ok(db
            .users
            .iter()
            .filter(|u| u.recovery_email.as_deref() == Some(recovery_email))
            .cloned()
            .collect())
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut db = self.inner.write().await;
        let Some(current) = db.users.iter().find(|u| u.id == id).cloned() else {
            return Ok(None);
        };
        let mut updated = current;
        patch.apply(&mut updated);
        db.check_user_unique(&updated.email, &updated.mobile_number, Some(id))?;
        if let Some(slot) = db.users.iter_mut().find(|u| u.id == id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn set_user_status(&self, id: Uuid, status: UserStatus) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        Ok(match db.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.status = status;
                true
            }
            None => false,
        })
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        Ok(match db.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                true
            }
            None => false,
        })
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        let before = db.users.len();
        db.users.retain(|u| u.id != id);
        if db.users.len() == before {
            return Ok(false);
        }
        db.companies.retain(|c| c.company_hr != id);
        db.remove_jobs_where(|j| j.added_by == id);
        db.applications.retain(|a| a.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn create_company(&self, company: NewCompany) -> StoreResult<Company> {
        let mut db = self.inner.write().await;
        db.check_company_unique(&company.company_name, &company.company_email, None)?;
        let company = company.into_company(Uuid::new_v4());
        db.companies.push(company.clone());
        Ok(company)
    }

    async fn company_by_id(&self, id: Uuid) -> StoreResult<Option<Company>> {
        let db = self.inner.read().await;
        Ok(db.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn company_by_hr(&self, hr_id: Uuid) -> StoreResult<Option<Company>> {
        let db = self.inner.read().await;
        Ok(db.companies.iter().find(|c| c.company_hr == hr_id).cloned())
    }

    async fn company_by_name(&self, name: &str) -> StoreResult<Option<Company>> {
        let db = self.inner.read().await;
        let wanted = name.to_lowercase();
        Ok(db
            .companies
            .iter()
            .find(|c| c.company_name.to_lowercase() == wanted)
            .cloned())
    }

    async fn search_companies(&self, fragment: &str) -> StoreResult<Vec<Company>> {
        let db = self.inner.read().await;
        let wanted = fragment.to_lowercase();
        Ok(db
            .companies
            .iter()
            .filter(|c| c.company_name.to_lowercase().contains(&wanted))
            .cloned()
            .collect())
    }

    async fn update_company(&self, id: Uuid, patch: CompanyPatch) -> StoreResult<Option<Company>> {
        let mut db = self.inner.write().await;
        let Some(mut updated) = db.companies.iter().find(|c| c.id == id).cloned() else {
            return Ok(None);
        };
        patch.apply(&mut updated);
        db.check_company_unique(&updated.company_name, &updated.company_email, Some(id))?;
        if let Some(slot) = db.companies.iter_mut().find(|c| c.id == id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete_company(&self, id: Uuid) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        let before = db.companies.len();
        db.companies.retain(|c| c.id != id);
        Ok(db.companies.len() != before)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let mut db = self.inner.write().await;
        let job = job.into_job(Uuid::new_v4());
        db.jobs.push(job.clone());
        Ok(job)
    }

    async fn job_by_id(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let db = self.inner.read().await;
        Ok(db.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> StoreResult<Option<Job>> {
        let mut db = self.inner.write().await;
        Ok(db.jobs.iter_mut().find(|j| j.id == id).map(|job| {
            patch.apply(job);
            job.clone()
        }))
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        let before = db.jobs.len();
        db.remove_jobs_where(|j| j.id == id);
        Ok(db.jobs.len() != before)
    }

    async fn all_jobs(&self) -> StoreResult<Vec<Job>> {
        Ok(self.inner.read().await.jobs.clone())
    }

    async fn jobs_added_by(&self, hr_id: Uuid) -> StoreResult<Vec<Job>> {
        let db = self.inner.read().await;
        Ok(db.jobs.iter().filter(|j| j.added_by == hr_id).cloned().collect())
    }

    async fn filter_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let db = self.inner.read().await;
        Ok(db.jobs.iter().filter(|j| filter.matches(j)).cloned().collect())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn create_application(&self, application: NewApplication) -> StoreResult<Application> {
        let mut db = self.inner.write().await;
        let application = application.into_application(Uuid::new_v4());
        db.applications.push(application.clone());
        Ok(application)
    }

    async fn applications_for_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>> {
        let db = self.inner.read().await;
        Ok(db
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
