use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{debug, info, warn};

use crate::database::manager::DatabaseError;
use crate::database::models::case_file::{CaseFile, CaseFilePayload, CaseFileRecord, CaseFileStatus};
use crate::database::models::case_file_officer::CaseFileOfficer;
use crate::database::models::initiation_option::InitiationOption;
use crate::database::models::project::Project;
use crate::database::models::staff_user::StaffUser;
use crate::database::store::CaseFileStore;
use crate::services::case_file_number;

#[derive(Debug, thiserror::Error)]
pub enum CaseFileError {
    #[error("Case file with the number {0} exists")]
    AlreadyExists(String),
    #[error("Case file not found: {0}")]
    NotFound(i32),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Officer ids to add to and remove from a case file's active set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfficerSetDiff {
    pub to_add: Vec<i32>,
    pub to_remove: Vec<i32>,
}

impl OfficerSetDiff {
    pub fn between(active: &BTreeSet<i32>, desired: &BTreeSet<i32>) -> Self {
        Self {
            to_add: desired.difference(active).copied().collect(),
            to_remove: active.difference(desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Create/update orchestration for case files and their officer assignments
pub struct CaseFileService<S> {
    store: Arc<S>,
}

impl<S: CaseFileStore> CaseFileService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get_all(&self) -> Result<Vec<CaseFile>, CaseFileError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn get_by_project(&self, project_id: i32) -> Result<Vec<CaseFile>, CaseFileError> {
        Ok(self.store.list_by_project(project_id).await?)
    }

    pub async fn get_by_id(&self, case_file_id: i32) -> Result<CaseFile, CaseFileError> {
        self.store
            .find_by_id(case_file_id)
            .await?
            .ok_or(CaseFileError::NotFound(case_file_id))
    }

    pub async fn get_by_file_number(&self, case_file_number: &str) -> Result<Option<CaseFile>, CaseFileError> {
        Ok(self.store.find_by_case_file_number(case_file_number).await?)
    }

    pub async fn get_initiation_options(&self) -> Result<Vec<InitiationOption>, CaseFileError> {
        Ok(self.store.list_initiation_options().await?)
    }

    pub async fn get_projects(&self) -> Result<Vec<Project>, CaseFileError> {
        Ok(self.store.list_projects().await?)
    }

    pub async fn get_staff_users(&self) -> Result<Vec<StaffUser>, CaseFileError> {
        Ok(self.store.list_staff_users().await?)
    }

    /// Active officer assignments of an existing case file
    pub async fn get_officers(&self, case_file_id: i32) -> Result<Vec<CaseFileOfficer>, CaseFileError> {
        self.get_by_id(case_file_id).await?;
        let mut tx = self.store.begin().await?;
        let officers = self.store.list_active_assignments(case_file_id, &mut tx).await?;
        self.store.commit(tx).await?;
        Ok(officers)
    }

    /// Create a case file and its officer assignments in one transaction.
    pub async fn create(&self, payload: &CaseFilePayload) -> Result<CaseFile, CaseFileError> {
        let case_file_number = match payload.requested_number() {
            Some(number) => number.to_string(),
            None => case_file_number::generate(self.store.as_ref(), Utc::now().year()).await?,
        };
        let record = CaseFileRecord::new(payload, case_file_number, CaseFileStatus::Open);
        self.validate_number_is_free(record.case_file_number(), None).await?;

        let mut tx = self.store.begin().await?;
        let created = self.store.create(&record, &mut tx).await?;
        self.insert_or_update_officers(created.id, payload.officer_ids.as_deref(), &mut tx)
            .await?;
        self.store.commit(tx).await?;

        info!("Created case file {} (id {})", created.case_file_number, created.id);
        Ok(created)
    }

    /// Update a case file and reconcile its officers in one transaction.
    ///
    /// Without a number in the payload the case file keeps its current one.
    pub async fn update(&self, case_file_id: i32, payload: &CaseFilePayload) -> Result<CaseFile, CaseFileError> {
        let existing = self.get_by_id(case_file_id).await?;
        let case_file_number = payload
            .requested_number()
            .map(str::to_string)
            .unwrap_or(existing.case_file_number);
        let record = CaseFileRecord::new(payload, case_file_number, existing.case_file_status);
        self.validate_number_is_free(record.case_file_number(), Some(case_file_id))
            .await?;

        let mut tx = self.store.begin().await?;
        let updated = self
            .store
            .update(case_file_id, &record, &mut tx)
            .await?
            .ok_or(CaseFileError::NotFound(case_file_id))?;
        self.insert_or_update_officers(case_file_id, payload.officer_ids.as_deref(), &mut tx)
            .await?;
        self.store.commit(tx).await?;

        info!("Updated case file {} (id {})", updated.case_file_number, updated.id);
        Ok(updated)
    }

    /// Make the active officer set of `case_file_id` equal `officer_ids`.
    ///
    /// `None` or an empty list leaves the assignments untouched.
    pub async fn insert_or_update_officers(
        &self,
        case_file_id: i32,
        officer_ids: Option<&[i32]>,
        tx: &mut S::Tx,
    ) -> Result<OfficerSetDiff, CaseFileError> {
        let desired: BTreeSet<i32> = match officer_ids {
            Some(ids) if !ids.is_empty() => ids.iter().copied().collect(),
            _ => return Ok(OfficerSetDiff::default()),
        };

        let active: BTreeSet<i32> = self
            .store
            .list_active_assignments(case_file_id, tx)
            .await?
            .into_iter()
            .map(|officer| officer.officer_id)
            .collect();

        let diff = OfficerSetDiff::between(&active, &desired);
        if !diff.to_remove.is_empty() {
            self.store
                .bulk_remove_assignments(case_file_id, &diff.to_remove, tx)
                .await?;
        }
        if !diff.to_add.is_empty() {
            self.store
                .bulk_insert_assignments(case_file_id, &diff.to_add, tx)
                .await?;
        }

        debug!(
            "Case file {} officers: added {:?}, removed {:?}",
            case_file_id, diff.to_add, diff.to_remove
        );
        Ok(diff)
    }

    async fn validate_number_is_free(
        &self,
        case_file_number: &str,
        case_file_id: Option<i32>,
    ) -> Result<(), CaseFileError> {
        if let Some(existing) = self.store.find_by_case_file_number(case_file_number).await? {
            if case_file_id != Some(existing.id) {
                warn!(
                    "Rejected case file number {}: held by case file {}",
                    case_file_number, existing.id
                );
                return Err(CaseFileError::AlreadyExists(case_file_number.to_string()));
            }
        }
        Ok(())
    }
}
