//! 应用程序错误类型
//!
//! 错误分类：
//! - `Api`：与 Source Library 后端交互失败（网络、HTTP 状态、解析）
//! - `Batch`：批处理校验和单页阶段错误
//! - `File`：任务文件（TOML）读取和解析错误
//! - `Config`：环境变量配置错误

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),

    /// 批处理错误
    #[error("批处理错误: {0}")]
    Batch(#[from] BatchError),

    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// API 返回错误响应（非 2xx，附带后端 detail 信息）
    #[error("API返回错误响应 ({endpoint}): HTTP {status}: {detail}")]
    BadResponse {
        endpoint: String,
        status: u16,
        detail: String,
    },

    /// 认证失败（刷新令牌后仍然 401）
    #[error("认证失败 ({endpoint}): 令牌刷新后仍然未授权")]
    Unauthorized { endpoint: String },

    /// 尚未登录，但端点需要令牌
    #[error("尚未登录: 请先调用 login")]
    NotAuthenticated,

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
}

/// 批处理错误
///
/// 校验错误在批处理开始前直接返回给调用者；
/// 阶段错误在运行中被编排器捕获并转换为状态记录。
#[derive(Debug, Error)]
pub enum BatchError {
    /// 没有选择任何页面
    #[error("没有选择任何页面")]
    EmptySelection,

    /// OCR 和翻译阶段都未启用
    #[error("OCR 和翻译阶段都未启用，无事可做")]
    NoStageEnabled,

    /// 页面在已知页面列表中不存在
    #[error("Page not found")]
    PageNotFound { page_id: String },

    /// 后端没有该页的 OCR 数据（翻译阶段读取时发现）
    #[error("OCR data not found. OCR might have failed.")]
    OcrDataMissing { page_id: String },

    /// 请求被用户取消
    #[error("Request cancelled")]
    Cancelled,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },

    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
