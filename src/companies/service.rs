//! Company records owned by HR accounts.

use std::sync::Arc;

use uuid::Uuid;

use super::types::{AddCompanyRequest, ApplicationView, CompanyData, UpdateCompanyRequest};
use crate::error::{AppError, AppResult};
use crate::store::{Company, NewCompany, Store, UserProfile};

pub struct CompanyService {
    store: Arc<dyn Store>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn add(&self, hr_id: Uuid, req: AddCompanyRequest) -> AppResult<Company> {
        let company = self
            .store
            .create_company(NewCompany {
                company_name: req.company_name,
                description: req.description,
                industry: req.industry,
                address: req.address,
                number_of_employees: req.number_of_employees,
                company_email: req.company_email,
                company_hr: hr_id,
            })
            .await?;

        tracing::info!(company_id = %company.id, %hr_id, "company created");
        Ok(company)
    }

    /// Load a company the caller owns.
    async fn owned(&self, hr_id: Uuid, company_id: Uuid) -> AppResult<Company> {
        let company = self
            .store
            .company_by_id(company_id)
            .await?
            .ok_or(AppError::NotFound("Company not found"))?;
        if company.company_hr != hr_id {
            tracing::info!(%company_id, %hr_id, "company owned by another HR");
            return Err(AppError::Forbidden);
        }
        Ok(company)
    }

    pub async fn update(
        &self,
        hr_id: Uuid,
        company_id: Uuid,
        req: UpdateCompanyRequest,
    ) -> AppResult<Company> {
        self.owned(hr_id, company_id).await?;
        self.store
            .update_company(company_id, req.into())
            .await?
            .ok_or(AppError::NotFound("Company not found"))
    }

    pub async fn delete(&self, hr_id: Uuid, company_id: Uuid) -> AppResult<()> {
        self.owned(hr_id, company_id).await?;
        self.store.delete_company(company_id).await?;
        tracing::info!(%company_id, "company deleted");
        Ok(())
    }

    /// Company with its HR profile and every job that HR posted.
    pub async fn data(&self, company_id: Uuid) -> AppResult<CompanyData> {
        let company = self
            .store
            .company_by_id(company_id)
            .await?
            .ok_or(AppError::NotFound("Company not found"))?;
        let hr = self.store.user_by_id(company.company_hr).await?;
        let jobs = self.store.jobs_added_by(company.company_hr).await?;

        Ok(CompanyData {
            company_hr: hr.as_ref().map(UserProfile::from),
            jobs: jobs.into(),
            company,
        })
    }

    /// Case-insensitive substring search; an empty result is a 404.
    pub async fn search(&self, name: &str) -> AppResult<Vec<Company>> {
        let companies = self.store.search_companies(name).await?;
        if companies.is_empty() {
            return Err(AppError::NotFound("No companies match this name."));
        }
        Ok(companies)
    }

    /// Applications for a job the caller posted, each with the applicant.
    pub async fn applications(&self, hr_id: Uuid, job_id: Uuid) -> AppResult<Vec<ApplicationView>> {
        let job = self
            .store
            .job_by_id(job_id)
            .await?
            .ok_or(AppError::NotFound("Job not found"))?;
        if job.added_by != hr_id {
            return Err(AppError::Forbidden);
        }

        let applications = self.store.applications_for_job(job_id).await?;
        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let applicant = self.store.user_by_id(application.user_id).await?;
            views.push(ApplicationView {
                applicant: applicant.as_ref().map(UserProfile::from),
                application,
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::store::{MemoryStore, NewUser, UserStore};
    use chrono::NaiveDate;

    async fn hr(store: &MemoryStore, email: &str, mobile: &str) -> Uuid {
        store
            .create_user(NewUser {
                first_name: "H".into(),
                last_name: "R".into(),
                email: email.into(),
                password_hash: "x".into(),
                recovery_email: None,
                dob: NaiveDate::from_ymd_opt(1985, 5, 5).unwrap(),
                mobile_number: mobile.into(),
                role: Role::CompanyHr,
            })
            .await
            .unwrap()
            .id
    }

    fn acme() -> AddCompanyRequest {
        AddCompanyRequest {
            company_name: "Acme Corp".into(),
            description: "anvils".into(),
            industry: "manufacturing".into(),
            address: "Desert Rd".into(),
            number_of_employees: "11-20".into(),
            company_email: "hr@acme.com".into(),
        }
    }

    #[tokio::test]
    async fn test_only_owner_may_update() {
        let store = Arc::new(MemoryStore::new());
        let owner = hr(&store, "o@x.com", "1").await;
        let other = hr(&store, "p@x.com", "2").await;
        let svc = CompanyService::new(store);

        let company = svc.add(owner, acme()).await.unwrap();
        let patch = || UpdateCompanyRequest {
            industry: Some("retail".into()),
            ..Default::default()
        };

        assert!(matches!(
            svc.update(other, company.id, patch()).await,
            Err(AppError::Forbidden)
        ));
        let updated = svc.update(owner, company.id, patch()).await.unwrap();
        assert_eq!(updated.industry, "retail");
        assert!(matches!(
            svc.update(owner, Uuid::new_v4(), patch()).await,
            Err(AppError::NotFound("Company not found"))
        ));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_404s_when_empty() {
        let store = Arc::new(MemoryStore::new());
        let owner = hr(&store, "o@x.com", "1").await;
        let svc = CompanyService::new(store);
        svc.add(owner, acme()).await.unwrap();

        assert_eq!(svc.search("acme").await.unwrap().len(), 1);
        assert!(matches!(
            svc.search("globex").await,
            Err(AppError::NotFound("No companies match this name."))
        ));
    }

    #[tokio::test]
    async fn test_company_data_without_jobs() {
        let store = Arc::new(MemoryStore::new());
        let owner = hr(&store, "o@x.com", "1").await;
        let svc = CompanyService::new(store);
        let company = svc.add(owner, acme()).await.unwrap();

        let data = svc.data(company.id).await.unwrap();
        assert_eq!(data.company_hr.map(|p| p.id), Some(owner));
        let json = serde_json::to_value(&data.jobs).unwrap();
        assert_eq!(json, "This company has no jobs for now.");
    }
}
