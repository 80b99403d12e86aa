use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Staff member who can lead or be assigned to a case file.
///
/// `full_name` is derived as `"<first_name> <last_name>"`; the Postgres store
/// computes it in the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StaffUser {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub auth_user_id: String,
    pub is_active: bool,
}

impl StaffUser {
    pub fn new(id: i32, first_name: &str, last_name: &str, auth_user_id: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            full_name: full_name(first_name, last_name),
            auth_user_id: auth_user_id.to_string(),
            is_active: true,
        }
    }
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}
