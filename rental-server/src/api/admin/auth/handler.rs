//! Admin Auth Handlers

use axum::extract::State;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{ChangePassword, LoginRequest, LoginResponse, OperateType, UserInfo};

use crate::api::{ApiResult, AppJson, internal_error};
use crate::audit;
use crate::auth::{CurrentUser, hash_password, verify_dummy_password, verify_password};
use crate::db::repository::admin_user;
use crate::security_log;
use crate::state::AppState;
use crate::utils::validation::{present, require_fields, validate_password};

/// POST /api/admin/login - 后台登录
///
/// 用户不存在与密码错误返回相同的 401，避免泄露账号是否存在。
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = present(&req.username);
    let password = req.password.as_deref().filter(|p| !p.is_empty());
    require_fields(&[
        ("username", username.is_some()),
        ("password", password.is_some()),
    ])?;
    let (Some(username), Some(password)) = (username, password) else {
        return Err(AppError::missing_fields(&["username", "password"]));
    };

    let found = admin_user::find_live_by_username(&state.pool, username).await?;
    // 未知用户同样执行一次 argon2 校验，两条失败路径耗时一致
    let verified = match &found {
        Some(user) => verify_password(password, &user.password_hash),
        None => verify_dummy_password(password),
    };
    let user = match found {
        Some(user) if verified => user,
        found => {
            let reason = if found.is_some() { "bad_password" } else { "unknown_user" };
            security_log!(
                "WARN",
                "login_failed",
                username = username.to_string(),
                reason = reason
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt
        .generate_token(user.id, &user.username, user.role)
        .map_err(|e| internal_error("Failed to generate token", e))?;

    let operator = CurrentUser::from(&user);
    audit::record(&state.pool, &operator, OperateType::Login, None).await;
    tracing::info!(user_id = user.id, username = %user.username, "Admin logged in");

    Ok(ApiResponse::success_with_message(
        "登录成功",
        LoginResponse {
            token,
            user_info: UserInfo::from(&user),
        },
    ))
}

/// POST /api/admin/logout - 登出 (令牌无状态，仅记录日志)
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<()> {
    audit::record(&state.pool, &current_user, OperateType::Logout, None).await;
    Ok(ApiResponse::ok_with_message("登出成功"))
}

/// GET /api/admin/profile - 当前账号信息
pub async fn profile(current_user: CurrentUser) -> ApiResult<UserInfo> {
    Ok(ApiResponse::success(UserInfo {
        id: current_user.id,
        username: current_user.username,
        role: current_user.role,
    }))
}

/// POST /api/admin/change-password - 修改自己的密码
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(req): AppJson<ChangePassword>,
) -> ApiResult<()> {
    let old_password = req.old_password.as_deref().filter(|p| !p.is_empty());
    let new_password = req.new_password.as_deref().filter(|p| !p.is_empty());
    require_fields(&[
        ("old_password", old_password.is_some()),
        ("new_password", new_password.is_some()),
    ])?;
    let (Some(old_password), Some(new_password)) = (old_password, new_password) else {
        return Err(AppError::missing_fields(&["old_password", "new_password"]));
    };

    let user = admin_user::find_live_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AccountDisabled))?;
    if !verify_password(old_password, &user.password_hash) {
        security_log!(
            "WARN",
            "change_password_denied",
            user_id = user.id,
            username = user.username.clone()
        );
        return Err(AppError::new(ErrorCode::OldPasswordIncorrect));
    }
    validate_password(new_password)?;

    let hash = hash_password(new_password)
        .map_err(|e| internal_error("Failed to hash password", e))?;
    if !admin_user::update_password(&state.pool, user.id, &hash).await? {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    audit::record(&state.pool, &current_user, OperateType::UpdateUser, Some(user.id)).await;
    Ok(ApiResponse::ok_with_message("密码修改成功"))
}
