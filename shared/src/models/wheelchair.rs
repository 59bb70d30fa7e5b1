//! Wheelchair Model

use serde::{Deserialize, Serialize};

/// 轮椅生命周期状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum WheelchairStatus {
    /// 在售 (客户端可见)
    Active,
    /// 已下架
    Offline,
    /// 已删除 (逻辑删除)
    Deleted,
}

impl WheelchairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Offline => "offline",
            Self::Deleted => "deleted",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "offline" => Some(Self::Offline),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Wheelchair entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Wheelchair {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 租赁价格 (下单时作为定金)
    pub price: f64,
    pub stock: i64,
    pub manufacturer: Option<String>,
    pub status: WheelchairStatus,
    pub create_time: i64,
    pub update_time: i64,
}

impl Wheelchair {
    /// 可租赁: 在售且有库存
    pub fn is_available(&self) -> bool {
        self.status == WheelchairStatus::Active && self.stock > 0
    }
}

/// Create / update wheelchair payload (`id` absent means create)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WheelchairSave {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
}

/// Inventory operation payload
///
/// `operate_type` is one of `delete`, `offline`, `online`, or
/// `batch_status` (which uses `ids` + `status` instead of `id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WheelchairOperate {
    pub id: Option<i64>,
    pub operate_type: Option<String>,
    pub ids: Option<Vec<i64>>,
    pub status: Option<String>,
}
