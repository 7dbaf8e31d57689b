//! Identity types carried by bearer tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Caller role, a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Job seeker
    #[serde(rename = "User")]
    User,
    /// Company representative
    #[serde(rename = "Company_HR")]
    CompanyHr,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::CompanyHr => "Company_HR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Self::User),
            "Company_HR" => Ok(Self::CompanyHr),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// JWT claims as signed into the bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Verified caller identity, attached to request extensions by the
/// authenticator and read by the authorizer and handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"User\"");
        assert_eq!(
            serde_json::to_string(&Role::CompanyHr).unwrap(),
            "\"Company_HR\""
        );
        let parsed: Role = serde_json::from_str("\"Company_HR\"").unwrap();
        assert_eq!(parsed, Role::CompanyHr);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("User".parse::<Role>().unwrap(), Role::User);
        assert_eq!("Company_HR".parse::<Role>().unwrap(), Role::CompanyHr);
        assert!("admin".parse::<Role>().is_err());
        assert!("user".parse::<Role>().is_err());
    }
}
