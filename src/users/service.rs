//! Account lifecycle: sign-up / sign-in, profile edits and password recovery.

use std::sync::Arc;

use uuid::Uuid;

use super::types::{
    ResetPasswordRequest, SigninRequest, SignupRequest, UpdateAccountRequest,
    UpdatePasswordRequest,
};
use crate::auth::TokenService;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::mail::{EmailMessage, EmailSender, MailFrom};
use crate::otp::OtpManager;
use crate::store::{NewUser, Store, User, UserProfile, UserStatus};

pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenService>,
    otp: Arc<OtpManager>,
    mailer: Arc<dyn EmailSender>,
    mail_from: MailFrom,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn Store>,
        tokens: Arc<TokenService>,
        otp: Arc<OtpManager>,
        mailer: Arc<dyn EmailSender>,
        mail_from: MailFrom,
    ) -> Self {
        Self {
            store,
            tokens,
            otp,
            mailer,
            mail_from,
        }
    }

    pub async fn sign_up(&self, req: SignupRequest) -> AppResult<User> {
        let password_hash = hash_password(&req.password)?;
        let user = self
            .store
            .create_user(NewUser {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
                recovery_email: req.recovery_email,
                dob: req.dob,
                mobile_number: req.mobile_number,
                role: req.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Returns a bearer token. Unknown account and wrong password look the same.
    pub async fn sign_in(&self, req: SigninRequest) -> AppResult<String> {
        let user = match (&req.email, &req.mobile_number) {
            (Some(email), _) => self.store.user_by_email(email).await?,
            (None, Some(mobile)) => self.store.user_by_mobile(mobile).await?,
            (None, None) => {
                return Err(AppError::Validation(
                    "\"email\" or \"mobileNumber\" is required".into(),
                ));
            }
        };

        let user = match user {
            Some(u) if verify_password(&req.password, &u.password_hash) => u,
            _ => {
                tracing::info!("sign-in rejected");
                return Err(AppError::LoginFailed);
            }
        };

        let token = self.tokens.issue(user.id, user.role)?;
        self.store.set_user_status(user.id, UserStatus::Online).await?;

        tracing::info!(user_id = %user.id, "user signed in");
        Ok(token)
    }

    pub async fn sign_out(&self, user_id: Uuid) -> AppResult<()> {
        if !self
            .store
            .set_user_status(user_id, UserStatus::Offline)
            .await?
        {
            return Err(AppError::NotFound("User not found"));
        }
        Ok(())
    }

    pub async fn account(&self, user_id: Uuid) -> AppResult<User> {
        self.store
            .user_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User not found"))
    }

    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        self.account(user_id).await.map(|u| UserProfile::from(&u))
    }

    pub async fn update_account(&self, user_id: Uuid, req: UpdateAccountRequest) -> AppResult<User> {
        let user = self
            .store
            .update_user(user_id, req.into())
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        tracing::info!(user_id = %user.id, "account updated");
        Ok(user)
    }

    pub async fn delete_account(&self, user_id: Uuid) -> AppResult<()> {
        if !self.store.delete_user(user_id).await? {
            return Err(AppError::NotFound("User not found"));
        }
        tracing::info!(%user_id, "account deleted");
        Ok(())
    }

    pub async fn accounts_by_recovery_email(
        &self,
        recovery_email: &str,
    ) -> AppResult<Vec<UserProfile>> {
        let users = self.store.users_by_recovery_email(recovery_email).await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }

    pub async fn update_password(&self, user_id: Uuid, req: UpdatePasswordRequest) -> AppResult<()> {
        let user = self.account(user_id).await?;
        if !verify_password(&req.old_password, &user.password_hash) {
            return Err(AppError::Validation("Old password is incorrect".into()));
        }

        let hash = hash_password(&req.new_password)?;
        self.store.set_password_hash(user.id, &hash).await?;
        tracing::info!(%user_id, "password changed");
        Ok(())
    }

    /// Issue a reset code and mail it. Unregistered addresses are accepted
    /// silently so the endpoint cannot be used to probe for accounts.
    ///
    /// The code is stored before dispatch; a mail failure leaves it usable.
    pub async fn forget_password(&self, email: &str) -> AppResult<()> {
        if self.store.user_by_email(email).await?.is_none() {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        }

        let code = self.otp.issue(email);
        let message = EmailMessage::password_reset(
            &self.mail_from,
            email,
            &code,
            self.otp.ttl().num_minutes(),
        );
        self.mailer.send(&message).await?;

        tracing::info!("password reset code dispatched");
        Ok(())
    }

    pub async fn reset_password(&self, req: ResetPasswordRequest) -> AppResult<()> {
        if !self.otp.verify(&req.email, &req.otp) {
            return Err(AppError::OtpInvalid);
        }

        // Account removed between issue and reset.
        let user = self
            .store
            .user_by_email(&req.email)
            .await?
            .ok_or(AppError::OtpInvalid)?;

        let hash = hash_password(&req.new_password)?;
        self.store.set_password_hash(user.id, &hash).await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::mail::LogEmailSender;
    use crate::otp::DEFAULT_OTP_TTL;
    use crate::store::MemoryStore;
    use chrono::{Duration, NaiveDate};

    fn service() -> (AccountService, Arc<OtpManager>) {
        let otp = Arc::new(OtpManager::new(DEFAULT_OTP_TTL));
        let svc = AccountService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TokenService::new("test-secret", Duration::hours(1))),
            otp.clone(),
            Arc::new(LogEmailSender),
            MailFrom {
                name: "Job Board".into(),
                address: "no-reply@jobboard.local".into(),
            },
        );
        (svc, otp)
    }

    fn signup(email: &str, mobile: &str) -> SignupRequest {
        SignupRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            password: "secret-1".into(),
            recovery_email: Some("family@example.com".into()),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            mobile_number: mobile.into(),
            role: Role::User,
        }
    }

    fn signin_email(email: &str, password: &str) -> SigninRequest {
        SigninRequest {
            email: Some(email.into()),
            mobile_number: None,
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_by_email_or_mobile() {
        let (svc, _) = service();
        let user = svc.sign_up(signup("ada@example.com", "0100")).await.unwrap();
        assert_eq!(user.username, "AdaLovelace");

        let token = svc
            .sign_in(signin_email("ada@example.com", "secret-1"))
            .await
            .unwrap();
        assert!(!token.is_empty());
        assert_eq!(
            svc.account(user.id).await.unwrap().status,
            UserStatus::Online
        );

        let by_mobile = svc
            .sign_in(SigninRequest {
                email: None,
                mobile_number: Some("0100".into()),
                password: "secret-1".into(),
            })
            .await;
        assert!(by_mobile.is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_uniform() {
        let (svc, _) = service();
        svc.sign_up(signup("ada@example.com", "0100")).await.unwrap();

        let wrong = svc.sign_in(signin_email("ada@example.com", "nope")).await;
        let unknown = svc.sign_in(signin_email("bob@example.com", "secret-1")).await;
        assert!(matches!(wrong, Err(AppError::LoginFailed)));
        assert!(matches!(unknown, Err(AppError::LoginFailed)));
    }

    #[tokio::test]
    async fn test_sign_in_needs_an_identifier() {
        let (svc, _) = service();
        let res = svc
            .sign_in(SigninRequest {
                email: None,
                mobile_number: None,
                password: "x".into(),
            })
            .await;
        assert!(matches!(res, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let (svc, _) = service();
        svc.sign_up(signup("ada@example.com", "0100")).await.unwrap();
        let dup = svc.sign_up(signup("ada@example.com", "0200")).await;
        assert!(matches!(dup, Err(AppError::Conflict(ref m)) if m == "email already exists"));
    }

    #[tokio::test]
    async fn test_update_password_checks_old() {
        let (svc, _) = service();
        let user = svc.sign_up(signup("ada@example.com", "0100")).await.unwrap();

        let bad = svc
            .update_password(
                user.id,
                UpdatePasswordRequest {
                    old_password: "guess".into(),
                    new_password: "next".into(),
                },
            )
            .await;
        assert!(matches!(bad, Err(AppError::Validation(_))));

        svc.update_password(
            user.id,
            UpdatePasswordRequest {
                old_password: "secret-1".into(),
                new_password: "next".into(),
            },
        )
        .await
        .unwrap();
        assert!(svc.sign_in(signin_email("ada@example.com", "next")).await.is_ok());
    }

    #[tokio::test]
    async fn test_forget_password_unknown_email_issues_nothing() {
        let (svc, otp) = service();
        svc.forget_password("ghost@example.com").await.unwrap();
        assert!(otp.is_empty());
    }

    #[tokio::test]
    async fn test_reset_consumes_code() {
        let (svc, otp) = service();
        svc.sign_up(signup("ada@example.com", "0100")).await.unwrap();
        svc.forget_password("ada@example.com").await.unwrap();
        assert_eq!(otp.len(), 1);

        // Replace the mailed code with one the test knows.
        let code = otp.issue("ada@example.com");
        let reset = |otp: &str| ResetPasswordRequest {
            email: "ada@example.com".into(),
            otp: otp.into(),
            new_password: "fresh".into(),
        };

        assert!(matches!(
            svc.reset_password(reset("000000")).await,
            Err(AppError::OtpInvalid)
        ));
        svc.reset_password(reset(&code)).await.unwrap();
        assert!(matches!(
            svc.reset_password(reset(&code)).await,
            Err(AppError::OtpInvalid)
        ));
        assert!(svc.sign_in(signin_email("ada@example.com", "fresh")).await.is_ok());
    }

    #[tokio::test]
    async fn test_recovery_email_lookup() {
        let (svc, _) = service();
        svc.sign_up(signup("a@example.com", "1")).await.unwrap();
        svc.sign_up(signup("b@example.com", "2")).await.unwrap();

        let found = svc
            .accounts_by_recovery_email("family@example.com")
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(
            svc.accounts_by_recovery_email("other@example.com")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
