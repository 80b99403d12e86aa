use axum::extract::State;

use crate::app::AppState;
use crate::database::models::StaffUser;
use crate::database::store::CaseFileStore;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/staff-users - officers available for lead and assignment
pub async fn list<S: CaseFileStore>(State(state): State<AppState<S>>) -> ApiResult<Vec<StaffUser>> {
    let staff_users = state.case_files.get_staff_users().await?;
    Ok(ApiResponse::success(staff_users))
}
