//! Persisted entities and their write-side inputs.
//!
//! Field names serialize in camelCase to match the public JSON API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;

/// Closed string-valued enum stored as TEXT and sent as its wire name.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(concat!("invalid ", stringify!($name), ": {}"), other)),
                }
            }
        }
    };
}

text_enum!(
    /// Presence flag, flipped by sign-in / sign-out.
    UserStatus {
        Online => "online",
        Offline => "offline",
    }
);

text_enum!(JobLocation {
    Onsite => "onsite",
    Remotely => "remotely",
    Hybrid => "hybrid",
});

text_enum!(WorkingTime {
    PartTime => "part-time",
    FullTime => "full-time",
});

text_enum!(SeniorityLevel {
    Junior => "Junior",
    MidLevel => "Mid-Level",
    Senior => "Senior",
    TeamLead => "Team-Lead",
    Cto => "CTO",
});

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub recovery_email: Option<String>,
    #[serde(rename = "DOB")]
    pub dob: NaiveDate,
    pub mobile_number: String,
    pub role: Role,
    pub status: UserStatus,
}

/// Username is always first name followed by last name.
pub fn derive_username(first_name: &str, last_name: &str) -> String {
    format!("{first_name}{last_name}")
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub recovery_email: Option<String>,
    pub dob: NaiveDate,
    pub mobile_number: String,
    pub role: Role,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: derive_username(&self.first_name, &self.last_name),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            recovery_email: self.recovery_email,
            dob: self.dob,
            mobile_number: self.mobile_number,
            role: self.role,
            status: UserStatus::Offline,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub recovery_email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub mobile_number: Option<String>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.recovery_email {
            user.recovery_email = Some(v);
        }
        if let Some(v) = self.dob {
            user.dob = v;
        }
        if let Some(v) = self.mobile_number {
            user.mobile_number = v;
        }
        user.username = derive_username(&user.first_name, &user.last_name);
    }
}

/// What other users may see of an account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub role: Role,
    pub status: UserStatus,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            mobile_number: user.mobile_number.clone(),
            role: user.role,
            status: user.status,
        }
    }
}

// ============================================================================
// Companies
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub company_name: String,
    pub description: String,
    pub industry: String,
    pub address: String,
    #[schema(example = "11-20")]
    pub number_of_employees: String,
    pub company_email: String,
    #[serde(rename = "companyHR")]
    pub company_hr: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub company_name: String,
    pub description: String,
    pub industry: String,
    pub address: String,
    pub number_of_employees: String,
    pub company_email: String,
    pub company_hr: Uuid,
}

impl NewCompany {
    pub fn into_company(self, id: Uuid) -> Company {
        Company {
            id,
            company_name: self.company_name,
            description: self.description,
            industry: self.industry,
            address: self.address,
            number_of_employees: self.number_of_employees,
            company_email: self.company_email,
            company_hr: self.company_hr,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub address: Option<String>,
    pub number_of_employees: Option<String>,
    pub company_email: Option<String>,
}

impl CompanyPatch {
    pub fn apply(self, company: &mut Company) {
        if let Some(v) = self.company_name {
            company.company_name = v;
        }
        if let Some(v) = self.description {
            company.description = v;
        }
        if let Some(v) = self.industry {
            company.industry = v;
        }
        if let Some(v) = self.address {
            company.address = v;
        }
        if let Some(v) = self.number_of_employees {
            company.number_of_employees = v;
        }
        if let Some(v) = self.company_email {
            company.company_email = v;
        }
    }
}

// ============================================================================
// Jobs
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub job_title: String,
    pub job_location: JobLocation,
    pub working_time: WorkingTime,
    pub seniority_level: SeniorityLevel,
    pub job_description: String,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub added_by: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_title: String,
    pub job_location: JobLocation,
    pub working_time: WorkingTime,
    pub seniority_level: SeniorityLevel,
    pub job_description: String,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub added_by: Uuid,
}

impl NewJob {
    pub fn into_job(self, id: Uuid) -> Job {
        Job {
            id,
            job_title: self.job_title,
            job_location: self.job_location,
            working_time: self.working_time,
            seniority_level: self.seniority_level,
            job_description: self.job_description,
            technical_skills: self.technical_skills,
            soft_skills: self.soft_skills,
            added_by: self.added_by,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub job_title: Option<String>,
    pub job_location: Option<JobLocation>,
    pub working_time: Option<WorkingTime>,
    pub seniority_level: Option<SeniorityLevel>,
    pub job_description: Option<String>,
    pub technical_skills: Option<Vec<String>>,
    pub soft_skills: Option<Vec<String>>,
}

impl JobPatch {
    pub fn apply(self, job: &mut Job) {
        if let Some(v) = self.job_title {
            job.job_title = v;
        }
        if let Some(v) = self.job_location {
            job.job_location = v;
        }
        if let Some(v) = self.working_time {
            job.working_time = v;
        }
        if let Some(v) = self.seniority_level {
            job.seniority_level = v;
        }
        if let Some(v) = self.job_description {
            job.job_description = v;
        }
        if let Some(v) = self.technical_skills {
            job.technical_skills = v;
        }
        if let Some(v) = self.soft_skills {
            job.soft_skills = v;
        }
    }
}

/// Conjunction of optional criteria; an empty filter matches every job.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub working_time: Option<WorkingTime>,
    pub job_location: Option<JobLocation>,
    pub seniority_level: Option<SeniorityLevel>,
    /// Case-insensitive substring of the title.
    pub job_title: Option<String>,
    /// Job must list at least one of these.
    pub technical_skills: Vec<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if self.working_time.is_some_and(|v| v != job.working_time) {
            return false;
        }
        if self.job_location.is_some_and(|v| v != job.job_location) {
            return false;
        }
        if self.seniority_level.is_some_and(|v| v != job.seniority_level) {
            return false;
        }
        if let Some(title) = &self.job_title {
            if !job
                .job_title
                .to_lowercase()
                .contains(&title.to_lowercase())
            {
                return false;
            }
        }
        self.technical_skills.is_empty()
            || job
                .technical_skills
                .iter()
                .any(|skill| self.technical_skills.contains(skill))
    }
}

// ============================================================================
// Applications
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub user_tech_skills: Vec<String>,
    pub user_soft_skills: Vec<String>,
    /// Reference to the uploaded resume (URL or storage path).
    pub user_resume: String,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub user_tech_skills: Vec<String>,
    pub user_soft_skills: Vec<String>,
    pub user_resume: String,
}

impl NewApplication {
    pub fn into_application(self, id: Uuid) -> Application {
        Application {
            id,
            job_id: self.job_id,
            user_id: self.user_id,
            user_tech_skills: self.user_tech_skills,
            user_soft_skills: self.user_soft_skills,
            user_resume: self.user_resume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, skills: &[&str]) -> Job {
        NewJob {
            job_title: title.to_string(),
            job_location: JobLocation::Remotely,
            working_time: WorkingTime::FullTime,
            seniority_level: SeniorityLevel::Senior,
            job_description: "build things".to_string(),
            technical_skills: skills.iter().map(|s| s.to_string()).collect(),
            soft_skills: vec![],
            added_by: Uuid::new_v4(),
        }
        .into_job(Uuid::new_v4())
    }

    #[test]
    fn test_text_enum_wire_names() {
        assert_eq!(SeniorityLevel::MidLevel.as_str(), "Mid-Level");
        assert_eq!("part-time".parse::<WorkingTime>(), Ok(WorkingTime::PartTime));
        assert!("Part-Time".parse::<WorkingTime>().is_err());
        assert_eq!(
            serde_json::to_string(&SeniorityLevel::Cto).unwrap(),
            "\"CTO\""
        );
    }

    #[test]
    fn test_username_follows_names() {
        let mut user = NewUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "x".into(),
            recovery_email: None,
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            mobile_number: "0100".into(),
            role: Role::User,
        }
        .into_user(Uuid::new_v4());
        assert_eq!(user.username, "AdaLovelace");
        assert_eq!(user.status, UserStatus::Offline);

        UserPatch {
            last_name: Some("King".into()),
            ..Default::default()
        }
        .apply(&mut user);
        assert_eq!(user.username, "AdaKing");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = NewUser {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.c".into(),
            password_hash: "$argon2id$secret".into(),
            recovery_email: None,
            dob: NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
            mobile_number: "1".into(),
            role: Role::CompanyHr,
        }
        .into_user(Uuid::new_v4());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["DOB"], "2000-02-29");
        assert_eq!(json["role"], "Company_HR");
    }

    #[test]
    fn test_filter_title_and_skills() {
        let rust = job("Senior Rust Engineer", &["rust", "sql"]);

        assert!(JobFilter::default().matches(&rust));
        assert!(
            JobFilter {
                job_title: Some("rust".into()),
                ..Default::default()
            }
            .matches(&rust)
        );
        assert!(
            JobFilter {
                technical_skills: vec!["go".into(), "sql".into()],
                ..Default::default()
            }
            .matches(&rust)
        );
        assert!(
            !JobFilter {
                technical_skills: vec!["go".into()],
                ..Default::default()
            }
            .matches(&rust)
        );
        assert!(
            !JobFilter {
                working_time: Some(WorkingTime::PartTime),
                ..Default::default()
            }
            .matches(&rust)
        );
    }
}
