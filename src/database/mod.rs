pub mod manager;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgCaseFileStore;
pub use store::CaseFileStore;
