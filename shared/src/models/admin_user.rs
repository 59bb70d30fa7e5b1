//! Admin User Model

use serde::{Deserialize, Serialize};

/// 后台账号角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Role {
    /// 管理员: 全部权限 (含账号管理)
    Admin,
    /// 操作员: 库存与订单管理
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "operator" => Some(Self::Operator),
            _ => None,
        }
    }
}

/// Admin user entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_deleted: bool,
    pub create_time: i64,
}

/// Public view of a user (login response `user_info`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<&AdminUser> for UserInfo {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_info: UserInfo,
}

/// Create / update user payload (`id` absent means create)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSave {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Delete user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDelete {
    pub id: Option<i64>,
}

/// Change own password payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangePassword {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}
