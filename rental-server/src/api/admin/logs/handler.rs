//! Operation Log Handlers

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    OperateType, OperationLog, OperationLogStats, PaginatedResponse, Pagination,
};

use crate::api::{ApiResult, AppQuery};
use crate::db::repository::operation_log::{self, LogFilter};
use crate::state::AppState;
use crate::utils::validation::present;

/// 查询参数 (时间为 Unix 毫秒，均为可选)
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub operator_id: Option<String>,
    pub operate_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl LogQuery {
    fn to_filter(&self) -> Result<LogFilter, AppError> {
        let operate_type = match present(&self.operate_type) {
            Some(raw) => Some(OperateType::from_db(raw).ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidOperateType,
                    format!("无效的操作类型: {raw}"),
                )
            })?),
            None => None,
        };
        Ok(LogFilter {
            operator_id: parse_i64(&self.operator_id, "operator_id")?,
            operate_type,
            start_time: parse_i64(&self.start_time, "start_time")?,
            end_time: parse_i64(&self.end_time, "end_time")?,
        })
    }
}

fn parse_i64(value: &Option<String>, field: &str) -> Result<Option<i64>, AppError> {
    present(value)
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| AppError::invalid_format(format!("{field} 必须是整数: {raw}")))
        })
        .transpose()
}

/// GET /api/admin/log/list - 操作日志 (按时间倒序)
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LogQuery>,
) -> ApiResult<PaginatedResponse<OperationLog>> {
    let filter = query.to_filter()?;
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref());

    let (list, total) = operation_log::list(&state.pool, &filter, pagination).await?;
    Ok(ApiResponse::success(PaginatedResponse::new(
        list, total, pagination,
    )))
}

/// GET /api/admin/log/stats - 按类型与操作人统计
pub async fn stats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LogQuery>,
) -> ApiResult<OperationLogStats> {
    let filter = query.to_filter()?;
    let stats = operation_log::stats(&state.pool, &filter).await?;
    Ok(ApiResponse::success(stats))
}
