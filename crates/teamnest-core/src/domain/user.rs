//! Team members

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;
use super::snapshot::RoleSnapshot;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";

/// Membership status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    #[default]
    Pending,
    Suspended,
}

impl UserStatus {
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Pending,
        UserStatus::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Pending => "PENDING",
            UserStatus::Suspended => "SUSPENDED",
        }
    }

    /// Parse a status name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(UserStatus::Active),
            "INACTIVE" => Some(UserStatus::Inactive),
            "PENDING" => Some(UserStatus::Pending),
            "SUSPENDED" => Some(UserStatus::Suspended),
            _ => None,
        }
    }
}

/// A team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: String,
    pub initials: String,
    pub phone: Option<String>,
    pub department: String,
    pub job_title: String,
    pub role_id: u64,
    /// Role as it looked when the user was last written
    pub role: Option<RoleSnapshot>,
    pub status: UserStatus,
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Identified for User {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Uppercased first letters of the first and last name
pub fn initials_for(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .take(1)
        .chain(last_name.chars().take(1))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Generated avatar URL seeded by the given name
pub fn avatar_for(seed: &str) -> String {
    format!("{}?seed={}", AVATAR_BASE_URL, seed)
}
