//! Contact form wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ContactSubmissionId;

/// Body of `POST /api/contact/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// A stored contact submission as returned by `GET /api/contact/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: ContactSubmissionId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}
