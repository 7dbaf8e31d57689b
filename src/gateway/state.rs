use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};

use crate::auth::TokenService;
use crate::companies::CompanyService;
use crate::config::AppConfig;
use crate::jobs::JobService;
use crate::mail::{EmailSender, LogEmailSender, MailFrom, RelayEmailSender};
use crate::otp::OtpManager;
use crate::store::{MemoryStore, PgStore, Store};
use crate::users::AccountService;

/// Shared gateway state, one per process.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub otp: Arc<OtpManager>,
    pub accounts: Arc<AccountService>,
    pub companies: Arc<CompanyService>,
    pub jobs: Arc<JobService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        tokens: Arc<TokenService>,
        otp: Arc<OtpManager>,
        mailer: Arc<dyn EmailSender>,
        mail_from: MailFrom,
    ) -> Self {
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            tokens.clone(),
            otp.clone(),
            mailer,
            mail_from,
        ));
        Self {
            companies: Arc::new(CompanyService::new(store.clone())),
            jobs: Arc::new(JobService::new(store.clone())),
            store,
            tokens,
            otp,
            accounts,
        }
    }

    /// Wire every collaborator from configuration and start the OTP sweeper.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn Store> = match &config.postgres_url {
            Some(url) => {
                let pg = PgStore::connect(url)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                pg.init_schema()
                    .await
                    .context("Failed to create database schema")?;
                Arc::new(pg)
            }
            None => {
                tracing::warn!("postgres_url not set, data is kept in memory only");
                Arc::new(MemoryStore::new())
            }
        };

        let tokens = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            chrono::Duration::hours(config.auth.token_ttl_hours),
        ));

        let otp_ttl = chrono::Duration::seconds(config.otp.ttl_secs as i64);
        let otp = Arc::new(OtpManager::new(otp_ttl));
        otp.spawn_sweeper(StdDuration::from_secs(config.otp.sweep_interval_secs.max(1)));

        let mailer: Arc<dyn EmailSender> = match &config.mail.relay_url {
            Some(url) => {
                tracing::info!(relay = %url, "mail relay configured");
                Arc::new(RelayEmailSender::new(
                    url.as_str(),
                    config.mail.username.clone().unwrap_or_default(),
                    config.mail.password.clone().unwrap_or_default(),
                ))
            }
            None => {
                tracing::warn!("mail.relay_url not set, outgoing mail is only logged");
                Arc::new(LogEmailSender)
            }
        };

        let mail_from = MailFrom {
            name: config.mail.from_name.clone(),
            address: config.mail.from_address.clone(),
        };

        Ok(Self::new(store, tokens, otp, mailer, mail_from))
    }
}
