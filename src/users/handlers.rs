use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode};

use super::types::*;
use crate::auth::Identity;
use crate::error::{AppResult, ErrorBody};
use crate::gateway::extract::{ValidatedJson, ValidatedQuery};
use crate::gateway::state::AppState;

/// Register an account
#[utoipa::path(
    post,
    path = "/api/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 409, description = "Email or mobile number taken", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserEnvelope>)> {
    let user = state.accounts.sign_up(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User created successfully".into(),
            user,
        }),
    ))
}

/// Sign in with email or mobile number
#[utoipa::path(
    post,
    path = "/api/users/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SigninRequest>,
) -> AppResult<Json<SigninResponse>> {
    let token = state.accounts.sign_in(req).await?;
    Ok(Json(SigninResponse {
        message: "Signed in successfully".into(),
        token,
    }))
}

/// Sign out (status becomes offline)
#[utoipa::path(
    post,
    path = "/api/users/signout",
    responses((status = 200, description = "Signed out", body = MessageResponse)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<MessageResponse>> {
    state.accounts.sign_out(identity.user_id).await?;
    Ok(Json(MessageResponse::new("Signed out successfully")))
}

#[utoipa::path(
    put,
    path = "/api/users/updateAccount",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = UserEnvelope),
        (status = 409, description = "Email or mobile number taken", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<UserEnvelope>> {
    let user = state.accounts.update_account(identity.user_id, req).await?;
    Ok(Json(UserEnvelope {
        message: "Account updated successfully".into(),
        user,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/deleteAccount",
    responses((status = 200, description = "Account deleted", body = MessageResponse)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<MessageResponse>> {
    state.accounts.delete_account(identity.user_id).await?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/users/getUserAccountData",
    responses((status = 200, description = "Caller's account", body = UserEnvelope)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn account_data(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<UserEnvelope>> {
    let user = state.accounts.account(identity.user_id).await?;
    Ok(Json(UserEnvelope {
        message: "User data retrieved successfully".into(),
        user,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/getProfileDataForAnotherUser",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Public profile", body = ProfileEnvelope),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn other_profile(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ProfileQuery>,
) -> AppResult<Json<ProfileEnvelope>> {
    let user = state.accounts.profile(query.user_id).await?;
    Ok(Json(ProfileEnvelope {
        message: "User profile retrieved successfully".into(),
        user,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/getAccountsByRecoveryEmail",
    params(RecoveryEmailQuery),
    responses((status = 200, description = "Accounts sharing the recovery email", body = AccountsResponse)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn accounts_by_recovery_email(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<RecoveryEmailQuery>,
) -> AppResult<Json<AccountsResponse>> {
    let accounts = state
        .accounts
        .accounts_by_recovery_email(&query.recovery_email)
        .await?;
    Ok(Json(AccountsResponse {
        message: "Accounts retrieved successfully".into(),
        accounts,
    }))
}

#[utoipa::path(
    put,
    path = "/api/users/updatePassword",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Old password is incorrect", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(req): ValidatedJson<UpdatePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.accounts.update_password(identity.user_id, req).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// Request a password-reset code by email
#[utoipa::path(
    post,
    path = "/api/users/forgetPassword",
    request_body = ForgetPasswordRequest,
    responses(
        (status = 200, description = "Code sent if the account exists", body = MessageResponse),
        (status = 502, description = "Mail relay failed", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn forget_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ForgetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.accounts.forget_password(&req.email).await?;
    Ok(Json(MessageResponse::new(
        "If the email is registered, an OTP has been sent",
    )))
}

/// Set a new password using the mailed code
#[utoipa::path(
    put,
    path = "/api/users/resetPassword",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired OTP", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.accounts.reset_password(req).await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}
