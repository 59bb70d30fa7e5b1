//! Operation Log Model

use serde::{Deserialize, Serialize};

use super::admin_user::Role;

/// 操作类型 (固定词表)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OperateType {
    #[serde(rename = "新增轮椅")]
    #[cfg_attr(feature = "db", sqlx(rename = "新增轮椅"))]
    AddWheelchair,
    #[serde(rename = "修改轮椅")]
    #[cfg_attr(feature = "db", sqlx(rename = "修改轮椅"))]
    UpdateWheelchair,
    #[serde(rename = "删除轮椅")]
    #[cfg_attr(feature = "db", sqlx(rename = "删除轮椅"))]
    DeleteWheelchair,
    #[serde(rename = "下架轮椅")]
    #[cfg_attr(feature = "db", sqlx(rename = "下架轮椅"))]
    OfflineWheelchair,
    #[serde(rename = "上架轮椅")]
    #[cfg_attr(feature = "db", sqlx(rename = "上架轮椅"))]
    OnlineWheelchair,
    #[serde(rename = "更新库存")]
    #[cfg_attr(feature = "db", sqlx(rename = "更新库存"))]
    UpdateStock,
    #[serde(rename = "修改订单状态")]
    #[cfg_attr(feature = "db", sqlx(rename = "修改订单状态"))]
    UpdateOrderStatus,
    #[serde(rename = "取消订单")]
    #[cfg_attr(feature = "db", sqlx(rename = "取消订单"))]
    CancelOrder,
    #[serde(rename = "清理预订单")]
    #[cfg_attr(feature = "db", sqlx(rename = "清理预订单"))]
    CleanupTempOrders,
    #[serde(rename = "新增用户")]
    #[cfg_attr(feature = "db", sqlx(rename = "新增用户"))]
    AddUser,
    #[serde(rename = "修改用户")]
    #[cfg_attr(feature = "db", sqlx(rename = "修改用户"))]
    UpdateUser,
    #[serde(rename = "删除用户")]
    #[cfg_attr(feature = "db", sqlx(rename = "删除用户"))]
    DeleteUser,
    #[serde(rename = "修改用户角色")]
    #[cfg_attr(feature = "db", sqlx(rename = "修改用户角色"))]
    UpdateUserRole,
    #[serde(rename = "用户登录")]
    #[cfg_attr(feature = "db", sqlx(rename = "用户登录"))]
    Login,
    #[serde(rename = "用户登出")]
    #[cfg_attr(feature = "db", sqlx(rename = "用户登出"))]
    Logout,
}

impl OperateType {
    pub const ALL: [OperateType; 15] = [
        Self::AddWheelchair,
        Self::UpdateWheelchair,
        Self::DeleteWheelchair,
        Self::OfflineWheelchair,
        Self::OnlineWheelchair,
        Self::UpdateStock,
        Self::UpdateOrderStatus,
        Self::CancelOrder,
        Self::CleanupTempOrders,
        Self::AddUser,
        Self::UpdateUser,
        Self::DeleteUser,
        Self::UpdateUserRole,
        Self::Login,
        Self::Logout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddWheelchair => "新增轮椅",
            Self::UpdateWheelchair => "修改轮椅",
            Self::DeleteWheelchair => "删除轮椅",
            Self::OfflineWheelchair => "下架轮椅",
            Self::OnlineWheelchair => "上架轮椅",
            Self::UpdateStock => "更新库存",
            Self::UpdateOrderStatus => "修改订单状态",
            Self::CancelOrder => "取消订单",
            Self::CleanupTempOrders => "清理预订单",
            Self::AddUser => "新增用户",
            Self::UpdateUser => "修改用户",
            Self::DeleteUser => "删除用户",
            Self::UpdateUserRole => "修改用户角色",
            Self::Login => "用户登录",
            Self::Logout => "用户登出",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Operation log entry, joined with its operator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OperationLog {
    pub id: i64,
    pub operator_id: i64,
    pub operator_name: Option<String>,
    pub operator_role: Option<Role>,
    pub operate_type: OperateType,
    pub target_id: Option<i64>,
    pub operate_time: i64,
}

/// Count per operation type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OperateTypeCount {
    pub operate_type: OperateType,
    pub count: i64,
}

/// Count per operator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OperatorCount {
    pub operator_id: i64,
    pub operator_name: Option<String>,
    pub count: i64,
}

/// Operation log statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLogStats {
    pub total: i64,
    pub by_type: Vec<OperateTypeCount>,
    pub by_operator: Vec<OperatorCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_is_closed() {
        for t in OperateType::ALL {
            assert_eq!(OperateType::from_db(t.as_str()), Some(t));
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        assert_eq!(OperateType::from_db("随便操作"), None);
        let parsed: Result<OperateType, _> = serde_json::from_str("\"随便操作\"");
        assert!(parsed.is_err());
    }
}
