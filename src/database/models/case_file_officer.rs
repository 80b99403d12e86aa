use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CaseFileOfficer {
    pub id: i32,
    pub case_file_id: i32,
    pub officer_id: i32,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_date: DateTime<Utc>,
}
