pub mod case_file;
pub mod case_file_officer;
pub mod initiation_option;
pub mod project;
pub mod staff_user;

pub use case_file::{CaseFile, CaseFilePayload, CaseFileRecord, CaseFileStatus};
pub use case_file_officer::CaseFileOfficer;
pub use initiation_option::InitiationOption;
pub use project::Project;
pub use staff_user::StaffUser;
