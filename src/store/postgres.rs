//! PostgreSQL store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::models::*;
use super::{
    ApplicationStore, CompanyStore, JobStore, Store, StoreError, StoreResult, UserStore,
};

/// Idempotent DDL, executed in order by [`PgStore::init_schema`].
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        username TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        recovery_email TEXT,
        dob DATE NOT NULL,
        mobile_number TEXT NOT NULL,
        role TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'offline',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT users_email_key UNIQUE (email),
        CONSTRAINT users_mobile_number_key UNIQUE (mobile_number)
    )"#,
    r#"CREATE INDEX IF NOT EXISTS users_recovery_email_idx ON users (recovery_email)"#,
    r#"CREATE TABLE IF NOT EXISTS companies (
        id UUID PRIMARY KEY,
        company_name TEXT NOT NULL,
        description TEXT NOT NULL,
        industry TEXT NOT NULL,
        address TEXT NOT NULL,
        number_of_employees TEXT NOT NULL,
        company_email TEXT NOT NULL,
        company_hr UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT companies_company_name_key UNIQUE (company_name),
        CONSTRAINT companies_company_email_key UNIQUE (company_email)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS jobs (
        id UUID PRIMARY KEY,
        job_title TEXT NOT NULL,
        job_location TEXT NOT NULL,
        working_time TEXT NOT NULL,
        seniority_level TEXT NOT NULL,
        job_description TEXT NOT NULL,
        technical_skills TEXT[] NOT NULL,
        soft_skills TEXT[] NOT NULL,
        added_by UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS applications (
        id UUID PRIMARY KEY,
        job_id UUID NOT NULL REFERENCES jobs (id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        user_tech_skills TEXT[] NOT NULL,
        user_soft_skills TEXT[] NOT NULL,
        user_resume TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
];

const USER_COLUMNS: &str = "id, first_name, last_name, username, email, password_hash, \
     recovery_email, dob, mobile_number, role, status";
const COMPANY_COLUMNS: &str = "id, company_name, description, industry, address, \
     number_of_employees, company_email, company_hr";
const JOB_COLUMNS: &str = "id, job_title, job_location, working_time, seniority_level, \
     job_description, technical_skills, soft_skills, added_by";
const APPLICATION_COLUMNS: &str =
    "id, job_id, user_id, user_tech_skills, user_soft_skills, user_resume";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("database schema ready");
        Ok(())
    }
}

/// Map unique-constraint violations to the API field they guard.
fn map_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_email_key") => "email",
                Some("users_mobile_number_key") => "mobileNumber",
                Some("companies_company_name_key") => "companyName",
                Some("companies_company_email_key") => "companyEmail",
                _ => "record",
            };
            return StoreError::Conflict(field);
        }
    }
    StoreError::Database(err)
}

/// Escape LIKE metacharacters so user input matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn parse_text<T: std::str::FromStr<Err = String>>(row: &PgRow, column: &str) -> StoreResult<T> {
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(StoreError::Corrupt)
}

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        recovery_email: row.try_get("recovery_email")?,
        dob: row.try_get("dob")?,
        mobile_number: row.try_get("mobile_number")?,
        role: parse_text(row, "role")?,
        status: parse_text(row, "status")?,
    })
}

fn company_from_row(row: &PgRow) -> StoreResult<Company> {
    Ok(Company {
        id: row.try_get("id")?,
        company_name: row.try_get("company_name")?,
        description: row.try_get("description")?,
        industry: row.try_get("industry")?,
        address: row.try_get("address")?,
        number_of_employees: row.try_get("number_of_employees")?,
        company_email: row.try_get("company_email")?,
        company_hr: row.try_get("company_hr")?,
    })
}

fn job_from_row(row: &PgRow) -> StoreResult<Job> {
    Ok(Job {
        id: row.try_get("id")?,
        job_title: row.try_get("job_title")?,
        job_location: parse_text(row, "job_location")?,
        working_time: parse_text(row, "working_time")?,
        seniority_level: parse_text(row, "seniority_level")?,
        job_description: row.try_get("job_description")?,
        technical_skills: row.try_get("technical_skills")?,
        soft_skills: row.try_get("soft_skills")?,
        added_by: row.try_get("added_by")?,
    })
}

fn application_from_row(row: &PgRow) -> StoreResult<Application> {
    Ok(Application {
        id: row.try_get("id")?,
        job_id: row.try_get("job_id")?,
        user_id: row.try_get("user_id")?,
        user_tech_skills: row.try_get("user_tech_skills")?,
        user_soft_skills: row.try_get("user_soft_skills")?,
        user_resume: row.try_get("user_resume")?,
    })
}

fn collect<T>(rows: &[PgRow], map: fn(&PgRow) -> StoreResult<T>) -> StoreResult<Vec<T>> {
    rows.iter().map(map).collect()
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let user = user.into_user(Uuid::new_v4());
        sqlx::query(
            r#"INSERT INTO users (id, first_name, last_name, username, email, password_hash,
                                  recovery_email, dob, mobile_number, role, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.recovery_email)
        .bind(user.dob)
        .bind(&user.mobile_number)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn user_by_mobile(&self, mobile_number: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE mobile_number = $1"
        ))
        .bind(mobile_number)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn users_by_recovery_email(&self, recovery_email: &str) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE recovery_email = $1 ORDER BY created_at"
        ))
        .bind(recovery_email)
        .fetch_all(&self.pool)
        .await?;
        collect(&rows, user_from_row)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>> {
        // SET expressions see the old row, so username is rebuilt from the
        // effective new names.
        let row = sqlx::query(&format!(
            r#"UPDATE users SET
                   first_name = COALESCE($2, first_name),
                   last_name = COALESCE($3, last_name),
                   username = COALESCE($2, first_name) || COALESCE($3, last_name),
                   email = COALESCE($4, email),
                   recovery_email = COALESCE($5, recovery_email),
                   dob = COALESCE($6, dob),
                   mobile_number = COALESCE($7, mobile_number)
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.first_name)
        .bind(patch.last_name)
        .bind(patch.email)
        .bind(patch.recovery_email)
        .bind(patch.dob)
        .bind(patch.mobile_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn set_user_status(&self, id: Uuid, status: UserStatus) -> StoreResult<bool> {
        let res = sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let res = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn create_company(&self, company: NewCompany) -> StoreResult<Company> {
        let company = company.into_company(Uuid::new_v4());
        sqlx::query(
            r#"INSERT INTO companies (id, company_name, description, industry, address,
                                      number_of_employees, company_email, company_hr)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(company.id)
        .bind(&company.company_name)
        .bind(&company.description)
        .bind(&company.industry)
        .bind(&company.address)
        .bind(&company.number_of_employees)
        .bind(&company.company_email)
        .bind(company.company_hr)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(company)
    }

    async fn company_by_id(&self, id: Uuid) -> StoreResult<Option<Company>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(company_from_row).transpose()
    }

    async fn company_by_hr(&self, hr_id: Uuid) -> StoreResult<Option<Company>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE company_hr = $1 ORDER BY created_at LIMIT 1"
        ))
        .bind(hr_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(company_from_row).transpose()
    }

    async fn company_by_name(&self, name: &str) -> StoreResult<Option<Company>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE lower(company_name) = lower($1) LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(company_from_row).transpose()
    }

    async fn search_companies(&self, fragment: &str) -> StoreResult<Vec<Company>> {
        let rows = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE company_name ILIKE $1 ORDER BY created_at"
        ))
        .bind(like_pattern(fragment))
        .fetch_all(&self.pool)
        .await?;
        collect(&rows, company_from_row)
    }

    async fn update_company(&self, id: Uuid, patch: CompanyPatch) -> StoreResult<Option<Company>> {
        let row = sqlx::query(&format!(
            r#"UPDATE companies SET
                   company_name = COALESCE($2, company_name),
                   description = COALESCE($3, description),
                   industry = COALESCE($4, industry),
                   address = COALESCE($5, address),
                   number_of_employees = COALESCE($6, number_of_employees),
                   company_email = COALESCE($7, company_email)
               WHERE id = $1
               RETURNING {COMPANY_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.company_name)
        .bind(patch.description)
        .bind(patch.industry)
        .bind(patch.address)
        .bind(patch.number_of_employees)
        .bind(patch.company_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;
        row.as_ref().map(company_from_row).transpose()
    }

    async fn delete_company(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let job = job.into_job(Uuid::new_v4());
        sqlx::query(
            r#"INSERT INTO jobs (id, job_title, job_location, working_time, seniority_level,
                                 job_description, technical_skills, soft_skills, added_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(job.id)
        .bind(&job.job_title)
        .bind(job.job_location.as_str())
        .bind(job.working_time.as_str())
        .bind(job.seniority_level.as_str())
        .bind(&job.job_description)
        .bind(&job.technical_skills)
        .bind(&job.soft_skills)
        .bind(job.added_by)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(job)
    }

    async fn job_by_id(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let row = sqlx::query(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(job_from_row).transpose()
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> StoreResult<Option<Job>> {
        let row = sqlx::query(&format!(
            r#"UPDATE jobs SET
                   job_title = COALESCE($2, job_title),
                   job_location = COALESCE($3, job_location),
                   working_time = COALESCE($4, working_time),
                   seniority_level = COALESCE($5, seniority_level),
                   job_description = COALESCE($6, job_description),
                   technical_skills = COALESCE($7, technical_skills),
                   soft_skills = COALESCE($8, soft_skills)
               WHERE id = $1
               RETURNING {JOB_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.job_title)
        .bind(patch.job_location.map(JobLocation::as_str))
        .bind(patch.working_time.map(WorkingTime::as_str))
        .bind(patch.seniority_level.map(SeniorityLevel::as_str))
        .bind(patch.job_description)
        .bind(patch.technical_skills)
        .bind(patch.soft_skills)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;
        row.as_ref().map(job_from_row).transpose()
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn all_jobs(&self) -> StoreResult<Vec<Job>> {
        let rows = sqlx::query(&format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await?;
        collect(&rows, job_from_row)
    }

    async fn jobs_added_by(&self, hr_id: Uuid) -> StoreResult<Vec<Job>> {
        let rows = sqlx::query(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE added_by = $1 ORDER BY created_at"
        ))
        .bind(hr_id)
        .fetch_all(&self.pool)
        .await?;
        collect(&rows, job_from_row)
    }

    async fn filter_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE TRUE"));
        if let Some(v) = filter.working_time {
            qb.push(" AND working_time = ").push_bind(v.as_str());
        }
        if let Some(v) = filter.job_location {
            qb.push(" AND job_location = ").push_bind(v.as_str());
        }
        if let Some(v) = filter.seniority_level {
            qb.push(" AND seniority_level = ").push_bind(v.as_str());
        }
        if let Some(title) = &filter.job_title {
            qb.push(" AND job_title ILIKE ").push_bind(like_pattern(title));
        }
        if !filter.technical_skills.is_empty() {
            qb.push(" AND technical_skills && ")
                .push_bind(filter.technical_skills.clone());
        }
        qb.push(" ORDER BY created_at");

        let rows = qb.build().fetch_all(&self.pool).await?;
        collect(&rows, job_from_row)
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn create_application(&self, application: NewApplication) -> StoreResult<Application> {
        let application = application.into_application(Uuid::new_v4());
        sqlx::query(
            r#"INSERT INTO applications (id, job_id, user_id, user_tech_skills,
                                         user_soft_skills, user_resume)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.user_id)
        .bind(&application.user_tech_skills)
        .bind(&application.user_soft_skills)
        .bind(&application.user_resume)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(application)
    }

    async fn applications_for_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>> {
        let rows = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 ORDER BY created_at"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        collect(&rows, application_from_row)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
