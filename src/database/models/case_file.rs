use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "case_file_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseFileStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CaseFile {
    pub id: i32,
    pub case_file_number: String,
    pub project_id: i32,
    pub lead_officer_id: Option<i32>,
    pub initiation_id: i32,
    pub case_file_status: CaseFileStatus,
    pub date_created: DateTime<Utc>,
    pub created_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_deleted: bool,
}

/// Request body for creating or updating a case file.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseFilePayload {
    pub project_id: i32,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub lead_officer_id: Option<i32>,
    pub initiation_id: i32,
    #[serde(default)]
    pub case_file_number: Option<String>,
    #[serde(default)]
    pub officer_ids: Option<Vec<i32>>,
}

impl CaseFilePayload {
    /// The supplied number, ignoring blank strings.
    pub fn requested_number(&self) -> Option<&str> {
        self.case_file_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Complete set of persisted case file fields, assembled once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFileRecord {
    case_file_number: String,
    project_id: i32,
    lead_officer_id: Option<i32>,
    initiation_id: i32,
    case_file_status: CaseFileStatus,
    date_created: DateTime<Utc>,
}

impl CaseFileRecord {
    pub fn new(payload: &CaseFilePayload, case_file_number: String, status: CaseFileStatus) -> Self {
        Self {
            case_file_number,
            project_id: payload.project_id,
            lead_officer_id: payload.lead_officer_id,
            initiation_id: payload.initiation_id,
            case_file_status: status,
            date_created: payload.date_created,
        }
    }

    pub fn case_file_number(&self) -> &str {
        &self.case_file_number
    }

    pub fn project_id(&self) -> i32 {
        self.project_id
    }

    pub fn lead_officer_id(&self) -> Option<i32> {
        self.lead_officer_id
    }

    pub fn initiation_id(&self) -> i32 {
        self.initiation_id
    }

    pub fn status(&self) -> CaseFileStatus {
        self.case_file_status
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }
}
