pub mod extract;
pub mod health;
pub mod openapi;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use anyhow::{Context, Result};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{Operation, authenticate, guarded};
use crate::companies::handlers as companies;
use crate::jobs::handlers as jobs;
use crate::users::handlers as users;
use state::AppState;

fn user_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/signup", post(users::sign_up))
        .route("/signin", post(users::sign_in))
        .route("/forgetPassword", post(users::forget_password))
        .route("/resetPassword", put(users::reset_password));

    let private = Router::new()
        .route(
            "/updateAccount",
            guarded(put(users::update_account), Operation::UpdateAccount),
        )
        .route(
            "/deleteAccount",
            guarded(delete(users::delete_account), Operation::DeleteAccount),
        )
        .route(
            "/getUserAccountData",
            guarded(get(users::account_data), Operation::GetAccount),
        )
        .route(
            "/getProfileDataForAnotherUser",
            guarded(get(users::other_profile), Operation::GetOtherProfile),
        )
        .route(
            "/getAccountsByRecoveryEmail",
            guarded(
                get(users::accounts_by_recovery_email),
                Operation::ListByRecoveryEmail,
            ),
        )
        .route(
            "/updatePassword",
            guarded(put(users::update_password), Operation::UpdatePassword),
        )
        .route("/signout", guarded(post(users::sign_out), Operation::SignOut))
        .layer(from_fn_with_state(state.tokens.clone(), authenticate));

    public.merge(private)
}

fn company_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/addCompany",
            guarded(post(companies::add_company), Operation::AddCompany),
        )
        .route(
            "/updateCompany/{company_id}",
            guarded(put(companies::update_company), Operation::UpdateCompany),
        )
        .route(
            "/deleteCompany/{company_id}",
            guarded(delete(companies::delete_company), Operation::DeleteCompany),
        )
        .route(
            "/companyData/{company_id}",
            guarded(get(companies::company_data), Operation::GetCompanyData),
        )
        .route(
            "/searchCompany",
            guarded(get(companies::search_company), Operation::SearchCompany),
        )
        .route(
            "/jobApplications/{job_id}",
            guarded(
                get(companies::job_applications),
                Operation::ListJobApplications,
            ),
        )
        .layer(from_fn_with_state(state.tokens.clone(), authenticate))
}

fn job_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", guarded(get(jobs::list_jobs), Operation::ListJobs))
        .route("/addJob", guarded(post(jobs::add_job), Operation::AddJob))
        .route(
            "/updateJob/{job_id}",
            guarded(put(jobs::update_job), Operation::UpdateJob),
        )
        .route(
            "/deleteJob/{job_id}",
            guarded(delete(jobs::delete_job), Operation::DeleteJob),
        )
        .route(
            "/companyJobs",
            guarded(get(jobs::company_jobs), Operation::ListCompanyJobs),
        )
        .route(
            "/filter",
            guarded(get(jobs::filter_jobs), Operation::FilterJobs),
        )
        .route("/apply", guarded(post(jobs::apply), Operation::ApplyToJob))
        .layer(from_fn_with_state(state.tokens.clone(), authenticate))
}

/// Full application router. Every protected route runs
/// authenticate -> authorize -> handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/users", user_routes(&state))
        .nest("/api/companies", company_routes(&state))
        .nest("/api/jobs", job_routes(&state))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} (port already in use?)", addr))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API docs: http://{}/docs", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
