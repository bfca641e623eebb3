use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracker account. Records are joined to users by `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    pub fn new(id: i64, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// `first last` when both names are known, the login otherwise.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.login.clone(),
        }
    }
}

/// Operating territory of a record or release.
///
/// Accepts both the code (`CETC_WEST`) and the display form (`CETC WEST`). Anything else is
/// kept verbatim as [`Territory::Other`] so a new territory never breaks a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Territory {
    CetcWest,
    Hudson,
    Sed,
    Ned,
    Chicago,
    Pscc,
    Unified,
    Other(String),
}

impl Territory {
    pub fn code(&self) -> &str {
        match self {
            Territory::CetcWest => "CETC_WEST",
            Territory::Hudson => "HUDSON",
            Territory::Sed => "SED",
            Territory::Ned => "NED",
            Territory::Chicago => "CHICAGO",
            Territory::Pscc => "PSCC",
            Territory::Unified => "UNIFIED",
            Territory::Other(raw) => raw,
        }
    }
}

impl From<&str> for Territory {
    fn from(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "CETC_WEST" => Territory::CetcWest,
            "HUDSON" => Territory::Hudson,
            "SED" => Territory::Sed,
            "NED" => Territory::Ned,
            "CHICAGO" => Territory::Chicago,
            "PSCC" => Territory::Pscc,
            "UNIFIED" => Territory::Unified,
            _ => Territory::Other(raw.trim().to_string()),
        }
    }
}

impl From<String> for Territory {
    fn from(raw: String) -> Self {
        Territory::from(raw.as_str())
    }
}

impl From<Territory> for String {
    fn from(t: Territory) -> Self {
        t.code().to_string()
    }
}

impl fmt::Display for Territory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Showstopper,
    Emergency,
    High,
    Low,
    Routine,
    Defer,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    New,
    Released,
    Duplicate,
    Tested,
    Fixed,
    #[serde(alias = "PARTIALLY FIXED")]
    PartiallyFixed,
    Reviewed,
    #[serde(alias = "CANNOT REPRODUCE")]
    CannotReproduce,
    /// Any value this build does not know; neither open nor reviewed.
    #[serde(other)]
    Unknown,
}

impl Resolution {
    /// Still waiting on its owner: new, partially fixed or flagged as duplicate.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            Resolution::New | Resolution::PartiallyFixed | Resolution::Duplicate
        )
    }

    pub fn is_reviewed(self) -> bool {
        self == Resolution::Reviewed
    }
}

/// Software problem report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spr {
    #[serde(default)]
    pub id: i64,
    pub territory: Territory,
    pub number: i64,
    #[serde(default)]
    pub full_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<i64>,
    #[serde(rename = "user", alias = "owner", default)]
    pub owner: Option<User>,
}

impl Spr {
    pub fn new(territory: Territory, number: i64) -> Self {
        Self {
            id: 0,
            territory,
            number,
            full_number: String::new(),
            description: None,
            priority: None,
            resolution: None,
            jira_link: None,
            reviewer_id: None,
            owner: None,
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn owned_by(mut self, owner: User) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Login of the owner, if the record resolves to one. Empty logins do not count.
    pub fn owner_login(&self) -> Option<&str> {
        self.owner
            .as_ref()
            .map(|u| u.login.as_str())
            .filter(|login| !login.is_empty())
    }

    pub fn is_owned_by(&self, login: &str) -> bool {
        !login.is_empty() && self.owner_login() == Some(login)
    }
}

/// A build shipped (or scheduled) for a territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub territory: Territory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tma_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_features: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_features: Option<String>,
    #[serde(default)]
    pub current: bool,
}

impl Release {
    pub fn new(territory: Territory, date: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            date: Some(date),
            territory,
            build: None,
            release_letter: None,
            prefix_letter: None,
            database_version: None,
            ws_version: None,
            tma_version: None,
            port: None,
            new_features: None,
            updated_features: None,
            current: false,
        }
    }
}

/// Share of all records owned by one user. `percentage` is rounded half up and is 0
/// for an empty record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipShare {
    pub total: usize,
    pub owned_by_user: usize,
    pub percentage: u32,
}

/// Ownership share of one roster user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserShare {
    pub login: String,
    #[serde(flatten)]
    pub share: OwnershipShare,
}

/// Open-record count of one roster user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTally {
    pub login: String,
    pub open: usize,
}

/// One row of the ownership chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub login: String,
    pub name: String,
    pub open: usize,
    pub reviewed: usize,
    pub share: OwnershipShare,
}
