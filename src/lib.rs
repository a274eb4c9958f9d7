//! Source Library 批量页面处理工具
//!
//! 面向历史文献数字化后端的批处理客户端：对一本书选定的页面
//! 批量执行 OCR 识别和翻译，结果由后端直接保存。
//!
//! ## 架构分层
//!
//! 1. **基础设施层** (`client`)：HTTP 客户端、认证与令牌刷新
//! 2. **业务能力层** (`services`)：OCR、翻译、书库查询
//! 3. **流程层** (`workflow`)：单页两阶段的处理流程
//! 4. **编排层** (`batch`)：并发调度、状态板、取消与统计
//!
//! 依赖方向自上而下：编排层 → 流程层 → 业务能力层 → 基础设施层。

pub mod app;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
