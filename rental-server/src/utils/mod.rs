//! 工具模块
//!
//! - [`validation`] - 输入校验 (必填字段、手机号、长度与数值范围)
//! - [`logger`] - 日志初始化

pub mod logger;
pub mod validation;
