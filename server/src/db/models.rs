use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Service {
    Plumbing,
    Shutters,
    Locks,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Plumbing, Service::Shutters, Service::Locks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Plumbing => "plumbing",
            Service::Shutters => "shutters",
            Service::Locks => "locks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Contacted,
    Completed,
    Cancelled,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 4] = [
        QuoteStatus::Pending,
        QuoteStatus::Contacted,
        QuoteStatus::Completed,
        QuoteStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Contacted => "contacted",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum PrivacyConsent {
    #[serde(rename = "allowed")]
    #[sqlx(rename = "allowed")]
    Allowed,
    #[default]
    #[serde(rename = "not allowed")]
    #[sqlx(rename = "not allowed")]
    NotAllowed,
}

impl PrivacyConsent {
    pub const ALL: [PrivacyConsent; 2] = [PrivacyConsent::Allowed, PrivacyConsent::NotAllowed];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyConsent::Allowed => "allowed",
            PrivacyConsent::NotAllowed => "not allowed",
        }
    }
}

impl From<bool> for PrivacyConsent {
    fn from(allowed: bool) -> Self {
        if allowed {
            PrivacyConsent::Allowed
        } else {
            PrivacyConsent::NotAllowed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    #[default]
    New,
    InProgress,
    Completed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::New => "new",
            SubmissionStatus::InProgress => "in-progress",
            SubmissionStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! impl_from_str {
    ($($ty:ty),+) => {$(
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )+};
}

impl_from_str!(Service, QuoteStatus, PrivacyConsent);

/// A customer quote request as stored and as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: Service,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub privacy_consent: PrivacyConsent,
    pub status: QuoteStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new quote row.
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: Service,
    pub message: Option<String>,
    pub privacy_consent: PrivacyConsent,
}

/// Legacy contact form submission with an explicit GDPR consent flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub gdpr_consent: bool,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFormSubmission {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub gdpr_consent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Filter and page window for the admin quote listing.
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub status: Option<QuoteStatus>,
    pub service: Option<Service>,
    pub created_since: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteStats {
    pub total: i64,
    pub pending: i64,
    pub contacted: i64,
    pub completed: i64,
    pub cancelled: i64,
}
