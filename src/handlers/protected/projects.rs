use axum::extract::State;

use crate::app::AppState;
use crate::database::models::Project;
use crate::database::store::CaseFileStore;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/projects - projects a case file can be opened against
pub async fn list<S: CaseFileStore>(State(state): State<AppState<S>>) -> ApiResult<Vec<Project>> {
    let projects = state.case_files.get_projects().await?;
    Ok(ApiResponse::success(projects))
}
