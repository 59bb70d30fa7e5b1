//! Admin Inventory Handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    OperateType, PaginatedResponse, Pagination, Wheelchair, WheelchairOperate, WheelchairSave,
    WheelchairStatus,
};

use crate::api::{ApiResult, AppJson, AppPath, AppQuery, internal_error};
use crate::audit;
use crate::auth::CurrentUser;
use crate::db::repository::RepoError;
use crate::db::repository::wheelchair::{self, WheelchairFields, WheelchairFilter, WheelchairSort};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_MANUFACTURER_LEN, MAX_NAME_LEN, present, require_fields,
    validate_optional_text, validate_price, validate_stock, validate_text_len,
};

/// 未提供库存时的默认值
const DEFAULT_STOCK: i64 = 1;

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub keyword: Option<String>,
    pub sort_type: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `false` 时只看在售
    pub include_offline: Option<String>,
}

/// `{wheelchair}` payload of save / operate
#[derive(Debug, Serialize)]
pub struct WheelchairResult {
    pub wheelchair: Wheelchair,
}

/// `{updated}` payload of batch_status
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub updated: u64,
}

/// GET /api/admin/inventory/list - 库存列表 (在售 + 已下架)
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<InventoryQuery>,
) -> ApiResult<PaginatedResponse<Wheelchair>> {
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref());
    let include_offline = !matches!(
        query.include_offline.as_deref().map(str::trim),
        Some("false") | Some("0")
    );
    let filter = WheelchairFilter {
        keyword: query.keyword,
        sort: WheelchairSort::parse(query.sort_type.as_deref()),
        include_offline,
    };

    let (list, total) = wheelchair::search(&state.pool, &filter, pagination).await?;
    Ok(ApiResponse::success(PaginatedResponse::new(
        list, total, pagination,
    )))
}

/// GET /api/admin/inventory/detail/{id} - 任意状态的轮椅
pub async fn detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Wheelchair> {
    let w = wheelchair::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::WheelchairNotFound))?;
    Ok(ApiResponse::success(w))
}

/// POST /api/admin/inventory/save - 新增 (无 id) 或修改轮椅
pub async fn save(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(req): AppJson<WheelchairSave>,
) -> ApiResult<WheelchairResult> {
    let fields = validate_save(&req)?;

    match req.id {
        None => {
            let created = wheelchair::create(&state.pool, &fields).await?;
            audit::record(
                &state.pool,
                &current_user,
                OperateType::AddWheelchair,
                Some(created.id),
            )
            .await;
            tracing::info!(wheelchair_id = created.id, name = %created.name, "Wheelchair created");
            Ok(ApiResponse::created(
                "轮椅添加成功",
                WheelchairResult { wheelchair: created },
            ))
        }
        Some(id) => {
            let previous = wheelchair::find_by_id(&state.pool, id)
                .await?
                .filter(|w| w.status != WheelchairStatus::Deleted)
                .ok_or_else(|| AppError::new(ErrorCode::WheelchairNotFound))?;

            let updated = match wheelchair::update(&state.pool, id, &fields).await {
                Ok(w) => w,
                Err(RepoError::NotFound(_)) => {
                    return Err(AppError::new(ErrorCode::WheelchairNotFound));
                }
                Err(e) => return Err(e.into()),
            };

            audit::record(
                &state.pool,
                &current_user,
                OperateType::UpdateWheelchair,
                Some(id),
            )
            .await;
            if previous.stock != updated.stock {
                audit::record(&state.pool, &current_user, OperateType::UpdateStock, Some(id)).await;
            }
            Ok(ApiResponse::success_with_message(
                "轮椅信息更新成功",
                WheelchairResult { wheelchair: updated },
            ))
        }
    }
}

fn validate_save(req: &WheelchairSave) -> Result<WheelchairFields, AppError> {
    let name = present(&req.name);
    require_fields(&[("name", name.is_some()), ("price", req.price.is_some())])?;
    let (Some(name), Some(price)) = (name, req.price) else {
        return Err(AppError::missing_fields(&["name", "price"]));
    };
    let stock = req.stock.unwrap_or(DEFAULT_STOCK);

    validate_text_len(name, "轮椅名称", MAX_NAME_LEN)?;
    validate_price(price)?;
    validate_stock(stock)?;
    let description = present(&req.description).map(str::to_string);
    let manufacturer = present(&req.manufacturer).map(str::to_string);
    validate_optional_text(&description, "描述", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&manufacturer, "制造商", MAX_MANUFACTURER_LEN)?;

    Ok(WheelchairFields {
        name: name.to_string(),
        description,
        price,
        stock,
        manufacturer,
    })
}

/// POST /api/admin/inventory/operate - 删除 / 下架 / 上架 / 批量改状态
pub async fn operate(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(req): AppJson<WheelchairOperate>,
) -> ApiResult<serde_json::Value> {
    let operate_type = present(&req.operate_type);
    require_fields(&[("operate_type", operate_type.is_some())])?;
    let Some(operate_type) = operate_type else {
        return Err(AppError::missing_fields(&["operate_type"]));
    };

    if operate_type == "batch_status" {
        return batch_status(&state, &current_user, &req).await;
    }

    let (status, log_type, message) = match operate_type {
        "delete" => (
            WheelchairStatus::Deleted,
            OperateType::DeleteWheelchair,
            "轮椅删除成功",
        ),
        "offline" => (
            WheelchairStatus::Offline,
            OperateType::OfflineWheelchair,
            "轮椅下架成功",
        ),
        "online" => (
            WheelchairStatus::Active,
            OperateType::OnlineWheelchair,
            "轮椅上架成功",
        ),
        _ => return Err(AppError::new(ErrorCode::InvalidOperateType)),
    };

    require_fields(&[("id", req.id.is_some())])?;
    let Some(id) = req.id else {
        return Err(AppError::missing_fields(&["id"]));
    };

    if !wheelchair::set_status(&state.pool, id, status).await? {
        return Err(AppError::new(ErrorCode::WheelchairNotFound));
    }
    let w = wheelchair::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::WheelchairNotFound))?;

    audit::record(&state.pool, &current_user, log_type, Some(id)).await;
    tracing::info!(wheelchair_id = id, status = status.as_str(), "Wheelchair status changed");

    Ok(ApiResponse::success_with_message(
        message,
        to_value(WheelchairResult { wheelchair: w })?,
    ))
}

async fn batch_status(
    state: &AppState,
    current_user: &CurrentUser,
    req: &WheelchairOperate,
) -> ApiResult<serde_json::Value> {
    let ids = req.ids.as_deref().filter(|ids| !ids.is_empty());
    let status = present(&req.status);
    require_fields(&[("ids", ids.is_some()), ("status", status.is_some())])?;
    let (Some(ids), Some(status)) = (ids, status) else {
        return Err(AppError::missing_fields(&["ids", "status"]));
    };
    let status = WheelchairStatus::from_db(status).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidOperateType,
            format!("无效的轮椅状态: {status}"),
        )
    })?;
    let log_type = match status {
        WheelchairStatus::Active => OperateType::OnlineWheelchair,
        WheelchairStatus::Offline => OperateType::OfflineWheelchair,
        WheelchairStatus::Deleted => OperateType::DeleteWheelchair,
    };

    let changed = wheelchair::batch_set_status(&state.pool, ids, status).await?;
    for id in &changed {
        audit::record(&state.pool, current_user, log_type, Some(*id)).await;
    }
    let updated = changed.len() as u64;
    tracing::info!(count = updated, status = status.as_str(), "Wheelchair batch status changed");

    Ok(ApiResponse::success_with_message(
        format!("已更新{updated}个轮椅的状态"),
        to_value(BatchResult { updated })?,
    ))
}

fn to_value<T: Serialize>(value: T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| internal_error("Failed to serialize response", e))
}
