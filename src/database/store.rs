use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::case_file::{CaseFile, CaseFileRecord};
use crate::database::models::case_file_officer::CaseFileOfficer;
use crate::database::models::initiation_option::InitiationOption;
use crate::database::models::project::Project;
use crate::database::models::staff_user::StaffUser;

/// Persistence contract for case files and their officer assignments.
///
/// Writes take the caller's transaction handle so that a case file and its
/// officer rows commit or roll back together. Dropping a `Tx` without
/// calling [`CaseFileStore::commit`] discards every write made through it.
#[async_trait]
pub trait CaseFileStore: Send + Sync + 'static {
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, DatabaseError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), DatabaseError>;

    /// Connectivity check for `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn find_by_id(&self, case_file_id: i32) -> Result<Option<CaseFile>, DatabaseError>;

    async fn find_by_case_file_number(&self, case_file_number: &str) -> Result<Option<CaseFile>, DatabaseError>;

    /// Largest numeric case file number among case files created in `year`
    /// that is at least `<year>0001`, or 0 when there is none
    async fn max_case_file_number_for_year(&self, year: i32) -> Result<i64, DatabaseError>;

    async fn list_all(&self) -> Result<Vec<CaseFile>, DatabaseError>;

    async fn list_by_project(&self, project_id: i32) -> Result<Vec<CaseFile>, DatabaseError>;

    /// Ordered by `sort_order`
    async fn list_initiation_options(&self) -> Result<Vec<InitiationOption>, DatabaseError>;

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError>;

    /// Active staff, ordered by last then first name
    async fn list_staff_users(&self) -> Result<Vec<StaffUser>, DatabaseError>;

    async fn create(&self, record: &CaseFileRecord, tx: &mut Self::Tx) -> Result<CaseFile, DatabaseError>;

    /// Returns `None` when no case file has `case_file_id`
    async fn update(
        &self,
        case_file_id: i32,
        record: &CaseFileRecord,
        tx: &mut Self::Tx,
    ) -> Result<Option<CaseFile>, DatabaseError>;

    async fn list_active_assignments(
        &self,
        case_file_id: i32,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CaseFileOfficer>, DatabaseError>;

    async fn bulk_insert_assignments(
        &self,
        case_file_id: i32,
        officer_ids: &[i32],
        tx: &mut Self::Tx,
    ) -> Result<(), DatabaseError>;

    /// Takes the officers out of the active set
    async fn bulk_remove_assignments(
        &self,
        case_file_id: i32,
        officer_ids: &[i32],
        tx: &mut Self::Tx,
    ) -> Result<(), DatabaseError>;
}
