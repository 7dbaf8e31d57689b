use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::store::{Application, Company, CompanyPatch, Job, UserProfile};

/// Head-count band such as `11-20`.
static EMPLOYEE_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+-\d+$").unwrap());

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCompanyRequest {
    #[validate(length(min = 1, message = "\"companyName\" is not allowed to be empty"))]
    #[schema(example = "Acme")]
    pub company_name: String,
    #[validate(length(min = 1, message = "\"description\" is not allowed to be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "\"industry\" is not allowed to be empty"))]
    pub industry: String,
    #[validate(length(min = 1, message = "\"address\" is not allowed to be empty"))]
    pub address: String,
    #[validate(regex(
        path = *EMPLOYEE_RANGE,
        message = "\"numberOfEmployees\" must look like 11-20"
    ))]
    #[schema(example = "11-20")]
    pub number_of_employees: String,
    #[validate(email(message = "\"companyEmail\" must be a valid email"))]
    #[schema(example = "hr@acme.com")]
    pub company_email: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, message = "\"companyName\" is not allowed to be empty"))]
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub address: Option<String>,
    #[validate(regex(
        path = *EMPLOYEE_RANGE,
        message = "\"numberOfEmployees\" must look like 11-20"
    ))]
    pub number_of_employees: Option<String>,
    #[validate(email(message = "\"companyEmail\" must be a valid email"))]
    pub company_email: Option<String>,
}

impl From<UpdateCompanyRequest> for CompanyPatch {
    fn from(req: UpdateCompanyRequest) -> Self {
        Self {
            company_name: req.company_name,
            description: req.description,
            industry: req.industry,
            address: req.address,
            number_of_employees: req.number_of_employees,
            company_email: req.company_email,
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "\"name\" is not allowed to be empty"))]
    pub name: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyEnvelope {
    pub message: String,
    pub company: Company,
}

/// Jobs of a company, or a note when it has none.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CompanyJobs {
    Jobs(Vec<Job>),
    Note(String),
}

impl From<Vec<Job>> for CompanyJobs {
    fn from(jobs: Vec<Job>) -> Self {
        if jobs.is_empty() {
            Self::Note("This company has no jobs for now.".into())
        } else {
            Self::Jobs(jobs)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData {
    pub company: Company,
    #[serde(rename = "companyHR")]
    pub company_hr: Option<UserProfile>,
    pub jobs: CompanyJobs,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyList {
    pub message: String,
    pub companies: Vec<Company>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub applicant: Option<UserProfile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationList {
    pub message: String,
    pub applications: Vec<ApplicationView>,
}
