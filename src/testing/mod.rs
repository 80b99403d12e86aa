//! In-memory [`CaseFileStore`] for unit tests.
//!
//! A transaction is a private copy of the committed state; `commit` swaps it
//! in and dropping it discards the writes. Writes enforce the same unique
//! and foreign-key rules as the Postgres schema.
//!
//! [`MemoryStore::commit_number_on_next_begin`] simulates a concurrent writer
//! that commits a case file number after the service checked it was free.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::database::manager::DatabaseError;
use crate::database::models::case_file::{CaseFile, CaseFileRecord, CaseFileStatus};
use crate::database::models::case_file_officer::CaseFileOfficer;
use crate::database::models::initiation_option::InitiationOption;
use crate::database::models::project::Project;
use crate::database::models::staff_user::StaffUser;
use crate::database::store::CaseFileStore;
use crate::services::case_file_number;

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    case_files: Vec<CaseFile>,
    assignments: Vec<CaseFileOfficer>,
    next_case_file_id: i32,
    next_assignment_id: i32,
    /// Known staff ids; `None` accepts any officer id
    staff: Option<BTreeSet<i32>>,
    staff_users: Vec<StaffUser>,
    initiation_options: Vec<InitiationOption>,
    projects: Vec<Project>,
    /// Committed by another writer when the next transaction begins
    racing_number: Option<String>,
}

impl MemoryState {
    fn push_committed(&mut self, case_file_number: &str, project_id: i32, created_date: DateTime<Utc>) -> i32 {
        self.next_case_file_id += 1;
        self.case_files.push(CaseFile {
            id: self.next_case_file_id,
            case_file_number: case_file_number.to_string(),
            project_id,
            lead_officer_id: None,
            initiation_id: 1,
            case_file_status: CaseFileStatus::Open,
            date_created: created_date,
            created_date,
            updated_date: None,
            is_active: true,
            is_deleted: false,
        });
        self.next_case_file_id
    }

    fn insert_case_file(&mut self, record: &CaseFileRecord) -> Result<CaseFile, DatabaseError> {
        self.check_number(record.case_file_number(), None)?;
        self.next_case_file_id += 1;
        let now = Utc::now();
        let case_file = CaseFile {
            id: self.next_case_file_id,
            case_file_number: record.case_file_number().to_string(),
            project_id: record.project_id(),
            lead_officer_id: record.lead_officer_id(),
            initiation_id: record.initiation_id(),
            case_file_status: record.status(),
            date_created: record.date_created(),
            created_date: now,
            updated_date: None,
            is_active: true,
            is_deleted: false,
        };
        self.case_files.push(case_file.clone());
        Ok(case_file)
    }

    fn check_number(&self, number: &str, own_id: Option<i32>) -> Result<(), DatabaseError> {
        let taken = self
            .case_files
            .iter()
            .any(|c| c.case_file_number == number && Some(c.id) != own_id);
        if taken {
            return Err(DatabaseError::UniqueViolation("case_files_case_file_number_key".to_string()));
        }
        Ok(())
    }

    fn active_officer_ids(&self, case_file_id: i32) -> BTreeSet<i32> {
        self.assignments
            .iter()
            .filter(|a| a.case_file_id == case_file_id && a.is_active)
            .map(|a| a.officer_id)
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            state.initiation_options = vec![
                InitiationOption { id: 1, name: "Inspection".to_string(), sort_order: 1 },
                InitiationOption { id: 2, name: "Complaint".to_string(), sort_order: 2 },
            ];
            state.projects = vec![Project { id: 10, name: "Coastal Pipeline".to_string() }];
        }
        store
    }

    /// Store that rejects officer ids outside `staff_ids`
    pub fn with_staff(staff_ids: &[i32]) -> Self {
        let store = Self::new();
        {
            let mut state = store.lock();
            state.staff = Some(staff_ids.iter().copied().collect());
            state.staff_users = staff_ids
                .iter()
                .map(|&id| StaffUser::new(id, "Officer", &id.to_string(), &format!("officer{id}@idir")))
                .collect();
        }
        store
    }

    /// Insert a committed OPEN case file created now, returning its id
    pub fn seed_case_file(&self, case_file_number: &str, project_id: i32) -> i32 {
        self.lock().push_committed(case_file_number, project_id, Utc::now())
    }

    /// Insert a committed OPEN case file created during `year`, returning its id
    pub fn seed_case_file_in_year(&self, case_file_number: &str, project_id: i32, year: i32) -> i32 {
        let created_date = Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap();
        self.lock().push_committed(case_file_number, project_id, created_date)
    }

    /// Have another writer commit `case_file_number` just before the next
    /// transaction starts
    pub fn commit_number_on_next_begin(&self, case_file_number: &str) {
        self.lock().racing_number = Some(case_file_number.to_string());
    }

    pub fn case_file_count(&self) -> usize {
        self.lock().case_files.len()
    }

    pub fn assignment_row_count(&self) -> usize {
        self.lock().assignments.len()
    }

    pub fn active_officers(&self, case_file_id: i32) -> BTreeSet<i32> {
        self.lock().active_officer_ids(case_file_id)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CaseFileStore for MemoryStore {
    type Tx = MemoryState;

    async fn begin(&self) -> Result<Self::Tx, DatabaseError> {
        let mut state = self.lock();
        if let Some(number) = state.racing_number.take() {
            state.push_committed(&number, 10, Utc::now());
        }
        Ok(state.clone())
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), DatabaseError> {
        *self.lock() = tx;
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_by_id(&self, case_file_id: i32) -> Result<Option<CaseFile>, DatabaseError> {
        Ok(self
            .lock()
            .case_files
            .iter()
            .find(|c| c.id == case_file_id && !c.is_deleted)
            .cloned())
    }

    async fn find_by_case_file_number(&self, case_file_number: &str) -> Result<Option<CaseFile>, DatabaseError> {
        Ok(self
            .lock()
            .case_files
            .iter()
            .find(|c| c.case_file_number == case_file_number)
            .cloned())
    }

    async fn max_case_file_number_for_year(&self, year: i32) -> Result<i64, DatabaseError> {
        Ok(self
            .lock()
            .case_files
            .iter()
            .filter(|c| c.created_date.year() == year)
            .filter_map(|c| case_file_number::issued_for_year(&c.case_file_number, year))
            .max()
            .unwrap_or(0))
    }

    async fn list_all(&self) -> Result<Vec<CaseFile>, DatabaseError> {
        Ok(self.lock().case_files.iter().filter(|c| !c.is_deleted).cloned().collect())
    }

    async fn list_by_project(&self, project_id: i32) -> Result<Vec<CaseFile>, DatabaseError> {
        Ok(self
            .lock()
            .case_files
            .iter()
            .filter(|c| c.project_id == project_id && !c.is_deleted)
            .cloned()
            .collect())
    }

    async fn list_initiation_options(&self) -> Result<Vec<InitiationOption>, DatabaseError> {
        let mut options = self.lock().initiation_options.clone();
        options.sort_by_key(|o| o.sort_order);
        Ok(options)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        Ok(self.lock().projects.clone())
    }

    async fn list_staff_users(&self) -> Result<Vec<StaffUser>, DatabaseError> {
        let mut users: Vec<StaffUser> = self.lock().staff_users.iter().filter(|u| u.is_active).cloned().collect();
        users.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(users)
    }

    async fn create(&self, record: &CaseFileRecord, tx: &mut Self::Tx) -> Result<CaseFile, DatabaseError> {
        tx.insert_case_file(record)
    }

    async fn update(
        &self,
        case_file_id: i32,
        record: &CaseFileRecord,
        tx: &mut Self::Tx,
    ) -> Result<Option<CaseFile>, DatabaseError> {
        tx.check_number(record.case_file_number(), Some(case_file_id))?;
        let Some(case_file) = tx
            .case_files
            .iter_mut()
            .find(|c| c.id == case_file_id && !c.is_deleted)
        else {
            return Ok(None);
        };
        case_file.case_file_number = record.case_file_number().to_string();
        case_file.project_id = record.project_id();
        case_file.lead_officer_id = record.lead_officer_id();
        case_file.initiation_id = record.initiation_id();
        case_file.case_file_status = record.status();
        case_file.date_created = record.date_created();
        case_file.updated_date = Some(Utc::now());
        Ok(Some(case_file.clone()))
    }

    async fn list_active_assignments(
        &self,
        case_file_id: i32,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CaseFileOfficer>, DatabaseError> {
        let mut rows: Vec<CaseFileOfficer> = tx
            .assignments
            .iter()
            .filter(|a| a.case_file_id == case_file_id && a.is_active)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.officer_id);
        Ok(rows)
    }

    async fn bulk_insert_assignments(
        &self,
        case_file_id: i32,
        officer_ids: &[i32],
        tx: &mut Self::Tx,
    ) -> Result<(), DatabaseError> {
        if !tx.case_files.iter().any(|c| c.id == case_file_id) {
            return Err(DatabaseError::ForeignKeyViolation("case_file_officers_case_file_id_fkey".to_string()));
        }
        let active = tx.active_officer_ids(case_file_id);
        for &officer_id in officer_ids {
            if let Some(staff) = &tx.staff {
                if !staff.contains(&officer_id) {
                    return Err(DatabaseError::ForeignKeyViolation(
                        "case_file_officers_officer_id_fkey".to_string(),
                    ));
                }
            }
            if active.contains(&officer_id) {
                return Err(DatabaseError::UniqueViolation("ux_case_file_officers_active".to_string()));
            }
            tx.next_assignment_id += 1;
            let row = CaseFileOfficer {
                id: tx.next_assignment_id,
                case_file_id,
                officer_id,
                is_active: true,
                is_deleted: false,
                created_date: Utc::now(),
            };
            tx.assignments.push(row);
        }
        Ok(())
    }

    async fn bulk_remove_assignments(
        &self,
        case_file_id: i32,
        officer_ids: &[i32],
        tx: &mut Self::Tx,
    ) -> Result<(), DatabaseError> {
        for row in tx
            .assignments
            .iter_mut()
            .filter(|a| a.case_file_id == case_file_id && a.is_active && officer_ids.contains(&a.officer_id))
        {
            row.is_active = false;
            row.is_deleted = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropped_transaction_discards_writes() {
        let store = MemoryStore::new();
        let id = store.seed_case_file("20240001", 10);

        let mut tx = store.begin().await.unwrap();
        store.bulk_insert_assignments(id, &[1, 2], &mut tx).await.unwrap();
        drop(tx);

        assert!(store.active_officers(id).is_empty());
    }

    #[tokio::test]
    async fn max_number_counts_case_files_created_in_the_year() {
        let store = MemoryStore::new();
        store.seed_case_file_in_year("20240007", 10, 2024);
        store.seed_case_file_in_year("20250003", 10, 2024);
        store.seed_case_file_in_year("20240099", 10, 2023);

        assert_eq!(store.max_case_file_number_for_year(2024).await.unwrap(), 20250003);
        assert_eq!(store.max_case_file_number_for_year(2025).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn racing_number_is_committed_when_the_transaction_begins() {
        let store = MemoryStore::new();
        store.commit_number_on_next_begin("20240001");
        assert!(store.find_by_case_file_number("20240001").await.unwrap().is_none());

        let tx = store.begin().await.unwrap();
        drop(tx);
        assert!(store.find_by_case_file_number("20240001").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_number_violates_unique_index() {
        let store = MemoryStore::new();
        let existing = store.seed_case_file("20240001", 10);
        let other = store.seed_case_file("20240002", 10);
        let mut tx = store.begin().await.unwrap();

        let record = CaseFileRecord::new(
            &crate::database::models::case_file::CaseFilePayload {
                project_id: 10,
                date_created: Utc::now(),
                lead_officer_id: None,
                initiation_id: 1,
                case_file_number: None,
                officer_ids: None,
            },
            "20240001".to_string(),
            CaseFileStatus::Open,
        );

        assert!(matches!(
            store.create(&record, &mut tx).await,
            Err(DatabaseError::UniqueViolation(_))
        ));
        assert!(matches!(
            store.update(other, &record, &mut tx).await,
            Err(DatabaseError::UniqueViolation(_))
        ));
        assert!(store.update(existing, &record, &mut tx).await.unwrap().is_some());
    }
}
