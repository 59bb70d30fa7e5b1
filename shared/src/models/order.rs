//! Order Models (formal orders and pre-orders)

use serde::{Deserialize, Serialize};

use super::wheelchair::Wheelchair;

/// 正式订单状态
///
/// Stored and serialized as the Chinese label shown to staff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    #[serde(rename = "待配送")]
    #[cfg_attr(feature = "db", sqlx(rename = "待配送"))]
    Pending,
    #[serde(rename = "配送中")]
    #[cfg_attr(feature = "db", sqlx(rename = "配送中"))]
    Delivering,
    #[serde(rename = "已完成")]
    #[cfg_attr(feature = "db", sqlx(rename = "已完成"))]
    Completed,
    #[serde(rename = "已取消")]
    #[cfg_attr(feature = "db", sqlx(rename = "已取消"))]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        Self::Pending,
        Self::Delivering,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "待配送",
            Self::Delivering => "配送中",
            Self::Completed => "已完成",
            Self::Cancelled => "已取消",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// 占用库存的状态 (除已取消外)
    pub fn holds_stock(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Formal order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub user_name: String,
    pub user_phone: String,
    pub user_address: String,
    pub wheelchair_id: i64,
    /// Joined from wheelchair for display
    pub wheelchair_name: Option<String>,
    /// 定金 (= 下单时轮椅价格)
    pub deposit: f64,
    pub status: OrderStatus,
    pub create_time: i64,
}

/// Pre-order (temporary reservation) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TempOrder {
    /// UUID v4
    pub id: String,
    pub user_name: String,
    pub user_phone: String,
    pub user_address: String,
    pub wheelchair_id: i64,
    pub create_time: i64,
}

impl TempOrder {
    /// 预订单保留时长 (30 分钟)
    pub const HOLD_MILLIS: i64 = 30 * 60 * 1000;

    pub fn expire_time(&self) -> i64 {
        self.create_time + Self::HOLD_MILLIS
    }

    /// Expired strictly after `create_time + 30min`
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis > self.expire_time()
    }
}

/// Pre-order request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreOrderCreate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub wheelchair_id: Option<i64>,
}

/// Pre-order response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreOrderCreated {
    pub pre_order_id: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub expire_time: String,
    pub wheelchair: Wheelchair,
}

/// Order submit request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSubmit {
    pub pre_order_id: Option<String>,
}

/// Order submit response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmitted {
    pub order_no: String,
    pub order_id: i64,
    pub order_info: Order,
}

/// Admin order status update request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub order_id: Option<i64>,
    pub new_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_order(create_time: i64) -> TempOrder {
        TempOrder {
            id: "t".to_string(),
            user_name: "张三".to_string(),
            user_phone: "13800138000".to_string(),
            user_address: "北京市朝阳区".to_string(),
            wheelchair_id: 1,
            create_time,
        }
    }

    #[test]
    fn test_status_labels() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_db(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(OrderStatus::from_db("已退款"), None);
        assert_eq!(OrderStatus::from_db("pending"), None);
    }

    #[test]
    fn test_holds_stock() {
        assert!(OrderStatus::Pending.holds_stock());
        assert!(OrderStatus::Delivering.holds_stock());
        assert!(OrderStatus::Completed.holds_stock());
        assert!(!OrderStatus::Cancelled.holds_stock());
    }

    #[test]
    fn test_temp_order_expiry_boundary() {
        let created = 1_700_000_000_000;
        let order = temp_order(created);
        let thirty_min = 30 * 60 * 1000;

        assert!(!order.is_expired_at(created + thirty_min - 1000));
        assert!(!order.is_expired_at(created + thirty_min));
        assert!(order.is_expired_at(created + thirty_min + 1000));
        assert!(order.is_expired_at(created + 31 * 60 * 1000));
    }
}
