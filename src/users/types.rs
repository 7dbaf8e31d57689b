//! Account request / response bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::Role;
use crate::store::{User, UserPatch, UserProfile};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "\"firstName\" is not allowed to be empty"))]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(min = 1, message = "\"lastName\" is not allowed to be empty"))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[validate(email(message = "\"email\" must be a valid email"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "\"password\" is not allowed to be empty"))]
    pub password: String,
    #[validate(email(message = "\"recoveryEmail\" must be a valid email"))]
    pub recovery_email: Option<String>,
    #[serde(rename = "DOB")]
    pub dob: NaiveDate,
    #[validate(length(min = 1, message = "\"mobileNumber\" is not allowed to be empty"))]
    #[schema(example = "01001234567")]
    pub mobile_number: String,
    pub role: Role,
}

/// Sign in with either `email` or `mobileNumber`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    #[validate(email(message = "\"email\" must be a valid email"))]
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    #[validate(length(min = 1, message = "\"password\" is not allowed to be empty"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(email(message = "\"email\" must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "\"mobileNumber\" is not allowed to be empty"))]
    pub mobile_number: Option<String>,
    #[validate(email(message = "\"recoveryEmail\" must be a valid email"))]
    pub recovery_email: Option<String>,
    #[serde(rename = "DOB")]
    pub dob: Option<NaiveDate>,
    #[validate(length(min = 1, message = "\"firstName\" is not allowed to be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "\"lastName\" is not allowed to be empty"))]
    pub last_name: Option<String>,
}

impl From<UpdateAccountRequest> for UserPatch {
    fn from(req: UpdateAccountRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            recovery_email: req.recovery_email,
            dob: req.dob,
            mobile_number: req.mobile_number,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "\"oldPassword\" is not allowed to be empty"))]
    pub old_password: String,
    #[validate(length(min = 1, message = "\"newPassword\" is not allowed to be empty"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgetPasswordRequest {
    #[validate(email(message = "\"email\" must be a valid email"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "\"email\" must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "\"otp\" is not allowed to be empty"))]
    #[schema(example = "482913")]
    pub otp: String,
    #[validate(length(min = 1, message = "\"newPassword\" is not allowed to be empty"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryEmailQuery {
    #[validate(email(message = "\"recoveryEmail\" must be a valid email"))]
    pub recovery_email: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Password updated successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileEnvelope {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SigninResponse {
    #[schema(example = "Signed in successfully")]
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountsResponse {
    pub message: String,
    pub accounts: Vec<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_wire_names() {
        let req: SignupRequest = serde_json::from_str(
            r#"{
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "pw",
                "DOB": "1990-12-10",
                "mobileNumber": "0100",
                "role": "Company_HR"
            }"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::CompanyHr);
        assert_eq!(req.dob, NaiveDate::from_ymd_opt(1990, 12, 10).unwrap());
        assert!(req.recovery_email.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_signup_rejects_unknown_role() {
        let res = serde_json::from_str::<SignupRequest>(
            r#"{"firstName":"a","lastName":"b","email":"a@b.co","password":"p",
                "DOB":"1990-01-01","mobileNumber":"1","role":"Admin"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_update_account_rules_skip_absent_fields() {
        let empty = UpdateAccountRequest::default();
        assert!(empty.validate().is_ok());

        let bad = UpdateAccountRequest {
            recovery_email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
