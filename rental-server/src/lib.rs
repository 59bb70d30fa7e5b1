//! 在线轮椅租赁系统 - 后端服务
//!
//! # 功能
//!
//! - **客户端** (`api::wheelchairs`, `api::orders`): 轮椅检索、预订单 (保留 30 分钟)、
//!   提交正式订单、订单查询
//! - **后台** (`api::admin`): JWT 登录，库存、订单、账号、操作日志管理
//! - **数据库** (`db`): SQLite (sqlx)，启动时执行内嵌迁移
//!
//! # 模块结构
//!
//! ```text
//! rental-server/src/
//! ├── api/          # HTTP 路由和处理器
//! ├── auth/         # JWT、Argon2、角色中间件
//! ├── db/           # 连接池与仓储
//! ├── orders/       # 预订单 → 正式订单转换、状态流转
//! ├── audit.rs      # 操作日志
//! ├── config.rs     # 环境变量配置
//! ├── state.rs      # AppState
//! └── utils/        # 日志、输入校验
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod orders;
pub mod state;
pub mod utils;

// Re-export 公共类型
pub use api::build_app;
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
pub use utils::logger::init_logger;

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
