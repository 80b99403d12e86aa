// handlers/protected/case_files.rs - /api/case-files

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{CaseFile, CaseFileOfficer, CaseFilePayload, InitiationOption};
use crate::database::store::CaseFileStore;
use crate::error::ApiError;
use crate::middleware::{ensure_write_role, ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct CaseFileQuery {
    /// Restrict the listing to one project
    pub project_id: Option<i32>,
}

/// GET /api/case-files[?project_id=]
pub async fn list<S: CaseFileStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<CaseFileQuery>,
) -> ApiResult<Vec<CaseFile>> {
    let case_files = match query.project_id {
        Some(project_id) => state.case_files.get_by_project(project_id).await?,
        None => state.case_files.get_all().await?,
    };
    Ok(ApiResponse::success(case_files))
}

/// POST /api/case-files - create, generating the number when none is given
pub async fn create<S: CaseFileStore>(
    State(state): State<AppState<S>>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<CaseFilePayload>, JsonRejection>,
) -> ApiResult<CaseFile> {
    ensure_write_role(&auth_user)?;
    let Json(payload) = payload?;

    tracing::debug!("Case file create requested by '{}'", auth_user.subject);
    let created = state.case_files.create(&payload).await?;
    Ok(ApiResponse::created(created))
}

/// GET /api/case-files/:case_file_id
pub async fn get<S: CaseFileStore>(
    State(state): State<AppState<S>>,
    Path(case_file_id): Path<i32>,
) -> ApiResult<CaseFile> {
    let case_file = state.case_files.get_by_id(case_file_id).await?;
    Ok(ApiResponse::success(case_file))
}

/// PATCH /api/case-files/:case_file_id
pub async fn update<S: CaseFileStore>(
    State(state): State<AppState<S>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(case_file_id): Path<i32>,
    payload: Result<Json<CaseFilePayload>, JsonRejection>,
) -> ApiResult<CaseFile> {
    ensure_write_role(&auth_user)?;
    let Json(payload) = payload?;

    tracing::debug!("Case file {} update requested by '{}'", case_file_id, auth_user.subject);
    let updated = state.case_files.update(case_file_id, &payload).await?;
    Ok(ApiResponse::success(updated))
}

/// GET /api/case-files/case-file-numbers/:case_file_number
pub async fn get_by_number<S: CaseFileStore>(
    State(state): State<AppState<S>>,
    Path(case_file_number): Path<String>,
) -> ApiResult<CaseFile> {
    state
        .case_files
        .get_by_file_number(&case_file_number)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Case file {} not found", case_file_number)))
}

/// GET /api/case-files/:case_file_id/officers - active assignments
pub async fn officers<S: CaseFileStore>(
    State(state): State<AppState<S>>,
    Path(case_file_id): Path<i32>,
) -> ApiResult<Vec<CaseFileOfficer>> {
    let officers = state.case_files.get_officers(case_file_id).await?;
    Ok(ApiResponse::success(officers))
}

/// GET /api/case-files/initiation-options
pub async fn initiation_options<S: CaseFileStore>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<InitiationOption>> {
    let options = state.case_files.get_initiation_options().await?;
    Ok(ApiResponse::success(options))
}
