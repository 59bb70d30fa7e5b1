//! Admin Account Handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    OperateType, PaginatedResponse, Pagination, Role, UserDelete, UserInfo, UserSave,
};

use crate::api::{ApiResult, AppJson, AppQuery, internal_error};
use crate::audit;
use crate::auth::{CurrentUser, hash_password};
use crate::db::repository::{RepoError, admin_user};
use crate::security_log;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_USERNAME_LEN, present, require_fields, validate_password, validate_text_len,
};

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResult {
    pub user: UserInfo,
}

fn parse_role(raw: &str) -> Result<Role, AppError> {
    Role::from_db(raw).ok_or_else(|| AppError::new(ErrorCode::InvalidRole))
}

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| internal_error("Failed to hash password", e))
}

/// GET /api/admin/user/list - 账号列表
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserListQuery>,
) -> ApiResult<PaginatedResponse<UserInfo>> {
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref());
    let role = present(&query.role).map(parse_role).transpose()?;

    let (users, total) = admin_user::list(&state.pool, role, pagination).await?;
    let list = users.iter().map(UserInfo::from).collect();
    Ok(ApiResponse::success(PaginatedResponse::new(
        list, total, pagination,
    )))
}

/// POST /api/admin/user/save - 新增 (无 id) 或修改账号
///
/// 修改时 `password` 为空表示保留原密码。
pub async fn save(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(req): AppJson<UserSave>,
) -> ApiResult<UserResult> {
    let username = present(&req.username);
    let role = present(&req.role);
    require_fields(&[("username", username.is_some()), ("role", role.is_some())])?;
    let (Some(username), Some(role)) = (username, role) else {
        return Err(AppError::missing_fields(&["username", "role"]));
    };
    validate_text_len(username, "用户名", MAX_USERNAME_LEN)?;
    let role = parse_role(role)?;
    let password = present(&req.password);
    if let Some(password) = password {
        validate_password(password)?;
    }

    match req.id {
        None => {
            let Some(password) = password else {
                return Err(AppError::new(ErrorCode::PasswordRequired));
            };
            if admin_user::username_taken(&state.pool, username, None).await? {
                return Err(AppError::new(ErrorCode::UsernameExists));
            }

            let user = admin_user::create(&state.pool, username, &hash(password)?, role)
                .await
                .map_err(save_error)?;

            audit::record(&state.pool, &current_user, OperateType::AddUser, Some(user.id)).await;
            tracing::info!(user_id = user.id, username = %user.username, role = role.as_str(), "Admin user created");
            Ok(ApiResponse::created(
                "用户添加成功",
                UserResult {
                    user: UserInfo::from(&user),
                },
            ))
        }
        Some(id) => {
            let existing = admin_user::find_live_by_id(&state.pool, id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
            if admin_user::username_taken(&state.pool, username, Some(id)).await? {
                return Err(AppError::new(ErrorCode::UsernameExists));
            }

            let password_hash = password.map(hash).transpose()?;
            let user = admin_user::update(&state.pool, id, username, role, password_hash.as_deref())
                .await
                .map_err(save_error)?;

            audit::record(&state.pool, &current_user, OperateType::UpdateUser, Some(id)).await;
            if existing.role != role {
                security_log!(
                    "INFO",
                    "role_changed",
                    user_id = id,
                    from = existing.role.as_str(),
                    to = role.as_str(),
                    by = current_user.id
                );
                audit::record(&state.pool, &current_user, OperateType::UpdateUserRole, Some(id))
                    .await;
            }
            Ok(ApiResponse::success_with_message(
                "用户信息更新成功",
                UserResult {
                    user: UserInfo::from(&user),
                },
            ))
        }
    }
}

/// POST /api/admin/user/delete - 逻辑删除账号
pub async fn delete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(req): AppJson<UserDelete>,
) -> ApiResult<()> {
    require_fields(&[("id", req.id.is_some())])?;
    let Some(id) = req.id else {
        return Err(AppError::missing_fields(&["id"]));
    };
    if id == current_user.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    if !admin_user::soft_delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }

    audit::record(&state.pool, &current_user, OperateType::DeleteUser, Some(id)).await;
    tracing::info!(user_id = id, by = current_user.id, "Admin user deleted");
    Ok(ApiResponse::ok_with_message("用户删除成功"))
}

/// 并发创建同名账号时由唯一索引兜底；降级最后一个管理员由 UPDATE 条件拒绝
fn save_error(e: RepoError) -> AppError {
    match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::UsernameExists),
        RepoError::NotFound(_) => AppError::new(ErrorCode::UserNotFound),
        RepoError::Validation(_) => AppError::new(ErrorCode::LastAdminRequired),
        other => other.into(),
    }
}
