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
    path = "/api/companies/addCompany",
    request_body = AddCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyEnvelope),
        (status = 403, description = "Caller is not Company_HR", body = ErrorBody),
        (status = 409, description = "Name or email taken", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Companies"
)]
pub async fn add_company(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(req): ValidatedJson<AddCompanyRequest>,
) -> AppResult<(StatusCode, Json<CompanyEnvelope>)> {
    let company = state.companies.add(identity.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CompanyEnvelope {
            message: "Company created successfully".into(),
            company,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/companies/updateCompany/{company_id}",
    params(("company_id" = Uuid, Path, description = "Company id")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyEnvelope),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Company not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Companies"
)]
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(company_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCompanyRequest>,
) -> AppResult<Json<CompanyEnvelope>> {
    let company = state
        .companies
        .update(identity.user_id, company_id, req)
        .await?;
    Ok(Json(CompanyEnvelope {
        message: "Company updated successfully".into(),
        company,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/companies/deleteCompany/{company_id}",
    params(("company_id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Company not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Companies"
)]
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.companies.delete(identity.user_id, company_id).await?;
    Ok(Json(MessageResponse::new("Company deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/companies/companyData/{company_id}",
    params(("company_id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company, HR and jobs", body = CompanyData),
        (status = 404, description = "Company not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Companies"
)]
pub async fn company_data(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<CompanyData>> {
    Ok(Json(state.companies.data(company_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/companies/searchCompany",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching companies", body = CompanyList),
        (status = 404, description = "No match", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Companies"
)]
pub async fn search_company(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> AppResult<Json<CompanyList>> {
    let companies = state.companies.search(&query.name).await?;
    Ok(Json(CompanyList {
        message: "Companies retrieved successfully".into(),
        companies,
    }))
}

#[utoipa::path(
    get,
    path = "/api/companies/jobApplications/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Applications with applicant profiles", body = ApplicationList),
        (status = 403, description = "Job posted by another HR", body = ErrorBody),
        (status = 404, description = "Job not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Companies"
)]
pub async fn job_applications(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
) -> AppResult<Json<ApplicationList>> {
    let applications = state
        .companies
        .applications(identity.user_id, job_id)
        .await?;
    let message = if applications.is_empty() {
        "No applications yet"
    } else {
        "Applications retrieved successfully"
    };
    Ok(Json(ApplicationList {
        message: message.into(),
        applications,
    }))
}
