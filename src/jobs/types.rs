use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::store::{
    Application, Company, Job, JobFilter, JobLocation, JobPatch, SeniorityLevel, UserProfile,
    WorkingTime,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddJobRequest {
    #[validate(length(min = 1, message = "\"jobTitle\" is not allowed to be empty"))]
    #[schema(example = "Backend Engineer")]
    pub job_title: String,
    pub job_location: JobLocation,
    pub working_time: WorkingTime,
    pub seniority_level: SeniorityLevel,
    #[validate(length(min = 1, message = "\"jobDescription\" is not allowed to be empty"))]
    pub job_description: String,
    #[schema(example = json!(["rust", "postgres"]))]
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, message = "\"jobTitle\" is not allowed to be empty"))]
    pub job_title: Option<String>,
    pub job_location: Option<JobLocation>,
    pub working_time: Option<WorkingTime>,
    pub seniority_level: Option<SeniorityLevel>,
    pub job_description: Option<String>,
    pub technical_skills: Option<Vec<String>>,
    pub soft_skills: Option<Vec<String>>,
}

impl From<UpdateJobRequest> for JobPatch {
    fn from(req: UpdateJobRequest) -> Self {
        Self {
            job_title: req.job_title,
            job_location: req.job_location,
            working_time: req.working_time,
            seniority_level: req.seniority_level,
            job_description: req.job_description,
            technical_skills: req.technical_skills,
            soft_skills: req.soft_skills,
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJobsQuery {
    #[validate(length(min = 1, message = "\"companyName\" is not allowed to be empty"))]
    pub company_name: String,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub working_time: Option<WorkingTime>,
    pub job_location: Option<JobLocation>,
    pub seniority_level: Option<SeniorityLevel>,
    pub job_title: Option<String>,
    /// Comma-separated; a job matches if it lists any of them.
    #[param(example = "rust,go")]
    pub technical_skills: Option<String>,
}

impl From<FilterQuery> for JobFilter {
    fn from(q: FilterQuery) -> Self {
        let technical_skills = q
            .technical_skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Self {
            working_time: q.working_time,
            job_location: q.job_location,
            seniority_level: q.seniority_level,
            job_title: q.job_title.filter(|t| !t.is_empty()),
            technical_skills,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: Uuid,
    pub user_tech_skills: Vec<String>,
    pub user_soft_skills: Vec<String>,
    /// Where the resume was uploaded.
    #[validate(length(min = 1, message = "\"userResume\" is not allowed to be empty"))]
    #[schema(example = "uploads/resumes/ada.pdf")]
    pub user_resume: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct JobEnvelope {
    pub message: String,
    pub job: Job,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobList {
    pub message: String,
    pub jobs: Vec<Job>,
}

/// A job with the HR who posted it and that HR's company.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: Job,
    #[serde(rename = "HR")]
    pub hr: Option<UserProfile>,
    pub company: Option<Company>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobsWithCompanies {
    pub message: String,
    pub jobs: Vec<JobWithCompany>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationEnvelope {
    pub message: String,
    pub application: Application,
}
