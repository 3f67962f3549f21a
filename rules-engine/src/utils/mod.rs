//! 工具模块
//!
//! - [`logger`] - 日志初始化与清理
//! - [`validation`] - 请求校验

pub mod logger;
pub mod validation;

pub use validation::validate_request;
