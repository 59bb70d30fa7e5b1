//! Client Wheelchair Handlers

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{PaginatedResponse, Pagination, Wheelchair, WheelchairStatus};

use crate::api::{ApiResult, AppPath, AppQuery};
use crate::db::repository::wheelchair::{self, WheelchairFilter, WheelchairSort};
use crate::state::AppState;

/// Raw query; numbers stay strings so bad values clamp instead of failing
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub sort_type: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/wheelchair/search - 检索在售轮椅
pub async fn search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> ApiResult<PaginatedResponse<Wheelchair>> {
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref());
    let filter = WheelchairFilter {
        keyword: query.keyword,
        sort: WheelchairSort::parse(query.sort_type.as_deref()),
        include_offline: false,
    };

    let (list, total) = wheelchair::search(&state.pool, &filter, pagination)
        .await?;

    Ok(ApiResponse::success(PaginatedResponse::new(
        list, total, pagination,
    )))
}

/// GET /api/wheelchair/detail/{id} - 轮椅详情
pub async fn detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Wheelchair> {
    let w = wheelchair::find_by_id(&state.pool, id)
        .await?
        .filter(|w| w.status != WheelchairStatus::Deleted)
        .ok_or_else(|| AppError::new(ErrorCode::WheelchairNotFound))?;

    if w.status == WheelchairStatus::Offline {
        return Err(AppError::new(ErrorCode::WheelchairOffline));
    }

    Ok(ApiResponse::success(w))
}
