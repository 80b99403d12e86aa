pub mod case_file_number;
pub mod case_file_service;

pub use case_file_service::{CaseFileError, CaseFileService, OfficerSetDiff};
