// handlers/protected/mod.rs - JWT authentication required (/api/*)
pub mod case_files;
pub mod projects;
pub mod staff_users;
