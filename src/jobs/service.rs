//! Job postings and applications.

use std::sync::Arc;

use uuid::Uuid;

use super::types::{AddJobRequest, ApplyRequest, JobWithCompany, UpdateJobRequest};
use crate::error::{AppError, AppResult};
use crate::store::{
    Application, Company, Job, JobFilter, NewApplication, NewJob, Store, UserProfile,
};

pub struct JobService {
    store: Arc<dyn Store>,
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn add(&self, hr_id: Uuid, req: AddJobRequest) -> AppResult<Job> {
        let job = self
            .store
            .create_job(NewJob {
                job_title: req.job_title,
                job_location: req.job_location,
                working_time: req.working_time,
                seniority_level: req.seniority_level,
                job_description: req.job_description,
                technical_skills: req.technical_skills,
                soft_skills: req.soft_skills,
                added_by: hr_id,
            })
            .await?;

        tracing::info!(job_id = %job.id, %hr_id, "job posted");
        Ok(job)
    }

    async fn owned(&self, hr_id: Uuid, job_id: Uuid) -> AppResult<Job> {
        let job = self
            .store
            .job_by_id(job_id)
            .await?
            .ok_or(AppError::NotFound("Job not found"))?;
        if job.added_by != hr_id {
            tracing::info!(%job_id, %hr_id, "job posted by another HR");
            return Err(AppError::Forbidden);
        }
        Ok(job)
    }

    pub async fn update(&self, hr_id: Uuid, job_id: Uuid, req: UpdateJobRequest) -> AppResult<Job> {
        self.owned(hr_id, job_id).await?;
        self.store
            .update_job(job_id, req.into())
            .await?
            .ok_or(AppError::NotFound("Job not found"))
    }

    pub async fn delete(&self, hr_id: Uuid, job_id: Uuid) -> AppResult<()> {
        self.owned(hr_id, job_id).await?;
        self.store.delete_job(job_id).await?;
        tracing::info!(%job_id, "job deleted");
        Ok(())
    }

    /// Every job with its poster's profile and company.
    pub async fn all_with_companies(&self) -> AppResult<Vec<JobWithCompany>> {
        let jobs = self.store.all_jobs().await?;
        let mut out = Vec::with_capacity(jobs.len());
        for job in jobs {
            let hr = self.store.user_by_id(job.added_by).await?;
            let company: Option<Company> = self.store.company_by_hr(job.added_by).await?;
            out.push(JobWithCompany {
                hr: hr.as_ref().map(UserProfile::from),
                company,
                job,
            });
        }
        Ok(out)
    }

    /// Jobs posted by the HR of the company with this exact name.
    pub async fn for_company(&self, company_name: &str) -> AppResult<(Company, Vec<Job>)> {
        let company = self
            .store
            .company_by_name(company_name)
            .await?
            .ok_or(AppError::NotFound("Company not found"))?;
        let jobs = self.store.jobs_added_by(company.company_hr).await?;
        Ok((company, jobs))
    }

    pub async fn filter(&self, filter: JobFilter) -> AppResult<Vec<Job>> {
        Ok(self.store.filter_jobs(&filter).await?)
    }

    pub async fn apply(&self, user_id: Uuid, req: ApplyRequest) -> AppResult<Application> {
        if self.store.job_by_id(req.job_id).await?.is_none() {
            return Err(AppError::NotFound("Job not found"));
        }

        let application = self
            .store
            .create_application(NewApplication {
                job_id: req.job_id,
                user_id,
                user_tech_skills: req.user_tech_skills,
                user_soft_skills: req.user_soft_skills,
                user_resume: req.user_resume,
            })
            .await?;

        tracing::info!(application_id = %application.id, job_id = %req.job_id, "application submitted");
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::store::{
        CompanyStore, JobLocation, MemoryStore, NewCompany, NewUser, SeniorityLevel, UserStore,
        WorkingTime,
    };
    use chrono::NaiveDate;

    async fn user(store: &MemoryStore, email: &str, role: Role) -> Uuid {
        store
            .create_user(NewUser {
                first_name: "F".into(),
                last_name: "L".into(),
                email: email.into(),
                password_hash: "x".into(),
                recovery_email: None,
                dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                mobile_number: email.into(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    fn posting(title: &str, skills: &[&str]) -> AddJobRequest {
        AddJobRequest {
            job_title: title.into(),
            job_location: JobLocation::Hybrid,
            working_time: WorkingTime::FullTime,
            seniority_level: SeniorityLevel::MidLevel,
            job_description: "ship it".into(),
            technical_skills: skills.iter().map(|s| s.to_string()).collect(),
            soft_skills: vec!["teamwork".into()],
        }
    }

    #[tokio::test]
    async fn test_jobs_listed_with_hr_and_company() {
        let store = Arc::new(MemoryStore::new());
        let hr = user(&store, "hr@acme.com", Role::CompanyHr).await;
        store
            .create_company(NewCompany {
                company_name: "Acme".into(),
                description: "d".into(),
                industry: "i".into(),
                address: "a".into(),
                number_of_employees: "1-10".into(),
                company_email: "c@acme.com".into(),
                company_hr: hr,
            })
            .await
            .unwrap();
        let svc = JobService::new(store);
        svc.add(hr, posting("Rust Dev", &["rust"])).await.unwrap();

        let listed = svc.all_with_companies().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].hr.as_ref().map(|h| h.id), Some(hr));
        assert_eq!(
            listed[0].company.as_ref().map(|c| c.company_name.as_str()),
            Some("Acme")
        );

        let (company, jobs) = svc.for_company("ACME").await.unwrap();
        assert_eq!(company.company_hr, hr);
        assert_eq!(jobs.len(), 1);
        assert!(matches!(
            svc.for_company("Acm").await,
            Err(AppError::NotFound("Company not found"))
        ));
    }

    #[tokio::test]
    async fn test_only_poster_may_delete() {
        let store = Arc::new(MemoryStore::new());
        let hr = user(&store, "hr@acme.com", Role::CompanyHr).await;
        let rival = user(&store, "hr@globex.com", Role::CompanyHr).await;
        let svc = JobService::new(store);
        let job = svc.add(hr, posting("Rust Dev", &["rust"])).await.unwrap();

        assert!(matches!(
            svc.delete(rival, job.id).await,
            Err(AppError::Forbidden)
        ));
        svc.delete(hr, job.id).await.unwrap();
        assert!(matches!(
            svc.delete(hr, job.id).await,
            Err(AppError::NotFound("Job not found"))
        ));
    }

    #[tokio::test]
    async fn test_apply_requires_existing_job() {
        let store = Arc::new(MemoryStore::new());
        let hr = user(&store, "hr@acme.com", Role::CompanyHr).await;
        let seeker = user(&store, "me@home.com", Role::User).await;
        let svc = JobService::new(store);
        let job = svc.add(hr, posting("Go Dev", &["go"])).await.unwrap();

        let apply = |job_id| ApplyRequest {
            job_id,
            user_tech_skills: vec!["go".into()],
            user_soft_skills: vec![],
            user_resume: "uploads/me.pdf".into(),
        };
        let app = svc.apply(seeker, apply(job.id)).await.unwrap();
        assert_eq!(app.user_id, seeker);
        assert!(matches!(
            svc.apply(seeker, apply(Uuid::new_v4())).await,
            Err(AppError::NotFound("Job not found"))
        ));
    }

    #[tokio::test]
    async fn test_filter_by_skill() {
        let store = Arc::new(MemoryStore::new());
        let hr = user(&store, "hr@acme.com", Role::CompanyHr).await;
        let svc = JobService::new(store);
        svc.add(hr, posting("Rust Dev", &["rust"])).await.unwrap();
        svc.add(hr, posting("Go Dev", &["go"])).await.unwrap();

        let found = svc
            .filter(JobFilter {
                technical_skills: vec!["go".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].job_title, "Go Dev");
    }
}
