//! 认证中间件
//!
//! 为 JWT 认证和角色授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::Role;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::db::repository::admin_user;
use crate::security_log;
use crate::state::AppState;

/// 操作员及以上 (库存、订单、日志)
pub const STAFF: &[Role] = &[Role::Admin, Role::Operator];

/// 仅管理员 (账号管理)
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// 认证中间件 - 要求后台账号登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，再确认令牌对应的账号
/// 仍然存在且未被删除。成功后将 [`CurrentUser`] 注入请求扩展 (响应扩展中也带一份，
/// 供请求日志使用)。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 格式错误 / 签名无效 | 401 TokenInvalid |
/// | 令牌过期 | 401 TokenExpired |
/// | 账号不存在或已删除 | 401 AccountDisabled |
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => match JwtService::extract_from_header(header) {
            Some(token) => token,
            None => {
                security_log!("WARN", "auth_malformed", uri = req.uri().to_string());
                return Err(AppError::invalid_token());
            }
        },
        None => {
            security_log!("WARN", "auth_missing", uri = req.uri().to_string());
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = req.uri().to_string()
            );
            return match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token()),
            };
        }
    };

    let user_id = claims.user_id().map_err(|_| AppError::invalid_token())?;
    let user = admin_user::find_live_by_id(&state.pool, user_id).await?;

    let Some(user) = user else {
        security_log!(
            "WARN",
            "auth_account_gone",
            user_id = user_id,
            username = claims.username.clone()
        );
        return Err(AppError::new(ErrorCode::AccountDisabled));
    };

    let current = CurrentUser::from(&user);
    req.extensions_mut().insert(current.clone());
    let mut response = next.run(req).await;
    response.extensions_mut().insert(current);
    Ok(response)
}

/// 角色检查中间件 - 要求当前用户角色在允许列表中
///
/// 必须放在 [`require_auth`] 之后。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/user/list", get(handler::list))
///     .route_layer(middleware::from_fn(require_role(ADMIN_ONLY)));
/// ```
///
/// # 错误
///
/// 角色不符返回 403 (`需要操作员权限` / `需要管理员权限`)
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_role(allowed) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id,
                    username = user.username.clone(),
                    user_role = user.role.as_str()
                );
                let code = if allowed.contains(&Role::Operator) {
                    ErrorCode::OperatorRequired
                } else {
                    ErrorCode::AdminRequired
                };
                return Err(AppError::new(code));
            }

            Ok(next.run(req).await)
        })
    }
}
