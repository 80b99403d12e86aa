use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How a case file was opened (complaint, inspection, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InitiationOption {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
}
