use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::types::*;
use crate::auth::Identity;
use crate::error::{AppResult, ErrorBody};
use crate::gateway::extract::{ValidatedJson, ValidatedQuery};
use crate::gateway::state::AppState;
use crate::users::types::MessageResponse;

#[utoipa::path(
    post,
    path = "/api/jobs/addJob",
    request_body = AddJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobEnvelope),
        (status = 403, description = "Caller is not Company_HR", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn add_job(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(req): ValidatedJson<AddJobRequest>,
) -> AppResult<(StatusCode, Json<JobEnvelope>)> {
    let job = state.jobs.add(identity.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(JobEnvelope {
            message: "Job created successfully".into(),
            job,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/jobs/updateJob/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job id")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = JobEnvelope),
        (status = 403, description = "Not the poster", body = ErrorBody),
        (status = 404, description = "Job not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateJobRequest>,
) -> AppResult<Json<JobEnvelope>> {
    let job = state.jobs.update(identity.user_id, job_id, req).await?;
    Ok(Json(JobEnvelope {
        message: "Job updated successfully".into(),
        job,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/deleteJob/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job deleted", body = MessageResponse),
        (status = 403, description = "Not the poster", body = ErrorBody),
        (status = 404, description = "Job not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.jobs.delete(identity.user_id, job_id).await?;
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses((status = 200, description = "Jobs with HR and company", body = JobsWithCompanies)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> AppResult<Json<JobsWithCompanies>> {
    let jobs = state.jobs.all_with_companies().await?;
    Ok(Json(JobsWithCompanies {
        message: "Jobs retrieved successfully".into(),
        jobs,
    }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/companyJobs",
    params(CompanyJobsQuery),
    responses(
        (status = 200, description = "Jobs of the company", body = JobList),
        (status = 404, description = "Company not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn company_jobs(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<CompanyJobsQuery>,
) -> AppResult<Json<JobList>> {
    let (company, jobs) = state.jobs.for_company(&query.company_name).await?;
    Ok(Json(JobList {
        message: format!(
            "Jobs retrieved successfully for {} company",
            company.company_name
        ),
        jobs,
    }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/filter",
    params(FilterQuery),
    responses(
        (status = 200, description = "Matching jobs", body = JobList),
        (status = 400, description = "Unknown filter value", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn filter_jobs(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> AppResult<Json<JobList>> {
    let jobs = state.jobs.filter(query.into()).await?;
    Ok(Json(JobList {
        message: "Jobs retrieved successfully".into(),
        jobs,
    }))
}

#[utoipa::path(
    post,
    path = "/api/jobs/apply",
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationEnvelope),
        (status = 403, description = "Only job seekers may apply", body = ErrorBody),
        (status = 404, description = "Job not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn apply(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(req): ValidatedJson<ApplyRequest>,
) -> AppResult<(StatusCode, Json<ApplicationEnvelope>)> {
    let application = state.jobs.apply(identity.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationEnvelope {
            message: "Application submitted successfully".into(),
            application,
        }),
    ))
}
