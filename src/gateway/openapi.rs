//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:3000/docs`
//! - OpenAPI JSON: `http://localhost:3000/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorBody;
use crate::gateway::health::HealthResponse;

/// JWT bearer scheme referenced by every protected path.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token returned by /api/users/signin: `Authorization: Bearer <token>`",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Board API",
        version = "1.0.0",
        description = "Accounts, companies, job postings and applications."
    ),
    servers(
        (url = "http://localhost:3000", description = "Development"),
    ),
    paths(
        crate::gateway::health::health_check,
        // users
        crate::users::handlers::sign_up,
        crate::users::handlers::sign_in,
        crate::users::handlers::sign_out,
        crate::users::handlers::update_account,
        crate::users::handlers::delete_account,
        crate::users::handlers::account_data,
        crate::users::handlers::other_profile,
        crate::users::handlers::accounts_by_recovery_email,
        crate::users::handlers::update_password,
        crate::users::handlers::forget_password,
        crate::users::handlers::reset_password,
        // companies
        crate::companies::handlers::add_company,
        crate::companies::handlers::update_company,
        crate::companies::handlers::delete_company,
        crate::companies::handlers::company_data,
        crate::companies::handlers::search_company,
        crate::companies::handlers::job_applications,
        // jobs
        crate::jobs::handlers::add_job,
        crate::jobs::handlers::update_job,
        crate::jobs::handlers::delete_job,
        crate::jobs::handlers::list_jobs,
        crate::jobs::handlers::company_jobs,
        crate::jobs::handlers::filter_jobs,
        crate::jobs::handlers::apply,
    ),
    components(schemas(ErrorBody, HealthResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Accounts, sign-in and password recovery"),
        (name = "Companies", description = "Company records (Company_HR)"),
        (name = "Jobs", description = "Job postings and applications"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Job Board API");
        assert!(spec.to_json().is_ok());
    }

    #[test]
    fn test_routes_registered() {
        let spec = ApiDoc::openapi();
        let paths = spec.paths.paths;
        for path in [
            "/api/health",
            "/api/users/signup",
            "/api/users/forgetPassword",
            "/api/users/resetPassword",
            "/api/companies/updateCompany/{company_id}",
            "/api/jobs",
            "/api/jobs/apply",
        ] {
            assert!(paths.contains_key(path), "{path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("should have components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
