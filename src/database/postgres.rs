use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::case_file::{CaseFile, CaseFileRecord};
use crate::database::models::case_file_officer::CaseFileOfficer;
use crate::database::models::initiation_option::InitiationOption;
use crate::database::models::project::Project;
use crate::database::models::staff_user::StaffUser;
use crate::database::store::CaseFileStore;
use crate::services::case_file_number;

const CASE_FILE_COLUMNS: &str = "id, case_file_number, project_id, lead_officer_id, initiation_id, \
     case_file_status, date_created, created_date, updated_date, is_active, is_deleted";

/// [`CaseFileStore`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgCaseFileStore {
    pool: PgPool,
}

impl PgCaseFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CaseFileStore for PgCaseFileStore {
    type Tx = Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Tx, DatabaseError> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), DatabaseError> {
        tx.commit().await.map_err(DatabaseError::from_write)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn find_by_id(&self, case_file_id: i32) -> Result<Option<CaseFile>, DatabaseError> {
        let sql = format!("SELECT {CASE_FILE_COLUMNS} FROM case_files WHERE id = $1 AND is_deleted = false");
        let case_file = sqlx::query_as::<_, CaseFile>(&sql)
            .bind(case_file_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(case_file)
    }

    async fn find_by_case_file_number(&self, case_file_number: &str) -> Result<Option<CaseFile>, DatabaseError> {
        // Deleted rows still hold their number in the unique index
        let sql = format!("SELECT {CASE_FILE_COLUMNS} FROM case_files WHERE case_file_number = $1");
        let case_file = sqlx::query_as::<_, CaseFile>(&sql)
            .bind(case_file_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(case_file)
    }

    async fn max_case_file_number_for_year(&self, year: i32) -> Result<i64, DatabaseError> {
        // The CASE keeps the cast away from non-numeric numbers
        let max: (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(MAX(numbers.value), 0)::BIGINT
            FROM (
                SELECT CASE
                    WHEN case_file_number ~ '^[0-9]{1,18}$' THEN case_file_number::BIGINT
                END AS value
                FROM case_files
                WHERE EXTRACT(YEAR FROM created_date) = $1
            ) AS numbers
            WHERE numbers.value >= $2
            "#,
        )
        .bind(year)
        .bind(case_file_number::sequence_floor(year))
        .fetch_one(&self.pool)
        .await?;
        Ok(max.0)
    }

    async fn list_all(&self) -> Result<Vec<CaseFile>, DatabaseError> {
        let sql = format!("SELECT {CASE_FILE_COLUMNS} FROM case_files WHERE is_deleted = false ORDER BY id");
        let rows = sqlx::query_as::<_, CaseFile>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_by_project(&self, project_id: i32) -> Result<Vec<CaseFile>, DatabaseError> {
        let sql = format!(
            "SELECT {CASE_FILE_COLUMNS} FROM case_files WHERE project_id = $1 AND is_deleted = false ORDER BY id"
        );
        let rows = sqlx::query_as::<_, CaseFile>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_initiation_options(&self) -> Result<Vec<InitiationOption>, DatabaseError> {
        let rows = sqlx::query_as::<_, InitiationOption>(
            "SELECT id, name, sort_order FROM case_file_initiation_options \
             WHERE is_active = true ORDER BY sort_order",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let rows = sqlx::query_as::<_, Project>("SELECT id, name FROM projects ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_staff_users(&self) -> Result<Vec<StaffUser>, DatabaseError> {
        let rows = sqlx::query_as::<_, StaffUser>(
            r#"
            SELECT id, first_name, last_name, first_name || ' ' || last_name AS full_name,
                   auth_user_id, is_active
            FROM staff_users
            WHERE is_active = true AND is_deleted = false
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, record: &CaseFileRecord, tx: &mut Self::Tx) -> Result<CaseFile, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO case_files
            (case_file_number, project_id, lead_officer_id, initiation_id, case_file_status, date_created)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CASE_FILE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, CaseFile>(&sql)
            .bind(record.case_file_number())
            .bind(record.project_id())
            .bind(record.lead_officer_id())
            .bind(record.initiation_id())
            .bind(record.status())
            .bind(record.date_created())
            .fetch_one(&mut **tx)
            .await
            .map_err(DatabaseError::from_write)
    }

    async fn update(
        &self,
        case_file_id: i32,
        record: &CaseFileRecord,
        tx: &mut Self::Tx,
    ) -> Result<Option<CaseFile>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE case_files
            SET case_file_number = $2,
                project_id = $3,
                lead_officer_id = $4,
                initiation_id = $5,
                case_file_status = $6,
                date_created = $7,
                updated_date = NOW()
            WHERE id = $1 AND is_deleted = false
            RETURNING {CASE_FILE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, CaseFile>(&sql)
            .bind(case_file_id)
            .bind(record.case_file_number())
            .bind(record.project_id())
            .bind(record.lead_officer_id())
            .bind(record.initiation_id())
            .bind(record.status())
            .bind(record.date_created())
            .fetch_optional(&mut **tx)
            .await
            .map_err(DatabaseError::from_write)
    }

    async fn list_active_assignments(
        &self,
        case_file_id: i32,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CaseFileOfficer>, DatabaseError> {
        let rows = sqlx::query_as::<_, CaseFileOfficer>(
            r#"
            SELECT id, case_file_id, officer_id, is_active, is_deleted, created_date
            FROM case_file_officers
            WHERE case_file_id = $1 AND is_active = true
            ORDER BY officer_id
            "#,
        )
        .bind(case_file_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows)
    }

    async fn bulk_insert_assignments(
        &self,
        case_file_id: i32,
        officer_ids: &[i32],
        tx: &mut Self::Tx,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO case_file_officers (case_file_id, officer_id, is_active, is_deleted)
            SELECT $1, officer_id, true, false
            FROM UNNEST($2::INTEGER[]) AS officer_id
            "#,
        )
        .bind(case_file_id)
        .bind(officer_ids)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(())
    }

    async fn bulk_remove_assignments(
        &self,
        case_file_id: i32,
        officer_ids: &[i32],
        tx: &mut Self::Tx,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE case_file_officers
            SET is_active = false, is_deleted = true
            WHERE case_file_id = $1 AND officer_id = ANY($2) AND is_active = true
            "#,
        )
        .bind(case_file_id)
        .bind(officer_ids)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(())
    }
}
