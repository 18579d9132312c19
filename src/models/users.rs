use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const TABLE: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }

    /// Dashboard the frontend lands on for this role.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Doctor => "/doctor",
            Role::Admin => "/admin",
            Role::Unknown => "/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow::anyhow!("Unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Just enough of a `users` row to gate a session.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    pub role: Role,
}

pub const PROFILE_COLUMNS: &str = "name,specialty,role";

#[derive(Debug, Serialize)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub specialty: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    pub fn doctor(id: String, email: String, name: String, specialty: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            name,
            specialty,
            role: Role::Doctor,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parses_loosely_and_serializes_lowercase() {
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("nurse".parse::<Role>().is_err());
        assert_eq!(serde_json::to_value(Role::Doctor).unwrap(), json!("doctor"));
        assert_eq!(
            serde_json::from_value::<Role>(json!("receptionist")).unwrap(),
            Role::Unknown
        );
    }

    #[test]
    fn new_doctor_row_shape() {
        let row = NewUser::doctor(
            "u-1".into(),
            "a@b.c".into(),
            "Dr. Grey".into(),
            "Neurology".into(),
        );
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["role"], "doctor");
        assert_eq!(value["name"], "Dr. Grey");
        assert_eq!(value["created_at"], value["updated_at"]);
    }
}
