//! Role authorization.
//!
//! Each protected operation declares its permitted roles in
//! [`Operation::allowed_roles`]; the single [`authorize`] middleware checks the
//! authenticated caller's role against that table. It must be layered inside
//! [`authenticate`](super::middleware::authenticate).

use axum::{
    Extension,
    body::Body,
    extract::State,
    http::Request,
    middleware::{Next, from_fn_with_state},
    response::Response,
    routing::MethodRouter,
};

use super::models::{Identity, Role};
use crate::error::AppError;

const ANY_ROLE: &[Role] = &[Role::User, Role::CompanyHr];
const COMPANY_HR: &[Role] = &[Role::CompanyHr];
const JOB_SEEKER: &[Role] = &[Role::User];

/// Protected operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // accounts
    UpdateAccount,
    DeleteAccount,
    GetAccount,
    GetOtherProfile,
    ListByRecoveryEmail,
    UpdatePassword,
    SignOut,
    // companies
    AddCompany,
    UpdateCompany,
    DeleteCompany,
    GetCompanyData,
    SearchCompany,
    ListJobApplications,
    // jobs
    AddJob,
    UpdateJob,
    DeleteJob,
    ListJobs,
    ListCompanyJobs,
    FilterJobs,
    ApplyToJob,
}

impl Operation {
    pub const fn allowed_roles(self) -> &'static [Role] {
        use Operation::*;
        match self {
            UpdateAccount | DeleteAccount | GetAccount | GetOtherProfile | ListByRecoveryEmail
            | UpdatePassword | SignOut => ANY_ROLE,
            AddCompany | UpdateCompany | DeleteCompany | GetCompanyData | ListJobApplications
            | AddJob | UpdateJob | DeleteJob => COMPANY_HR,
            SearchCompany | ListJobs | ListCompanyJobs | FilterJobs => ANY_ROLE,
            ApplyToJob => JOB_SEEKER,
        }
    }

    pub fn permits(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

pub async fn authorize(
    State(operation): State<Operation>,
    Extension(identity): Extension<Identity>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !operation.permits(identity.role) {
        tracing::info!(
            user_id = %identity.user_id,
            role = %identity.role,
            ?operation,
            "role not permitted"
        );
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Attach the role check for `operation` to a method router.
pub fn guarded<S>(route: MethodRouter<S>, operation: Operation) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(operation, authorize))
}
