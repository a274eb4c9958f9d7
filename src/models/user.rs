//! 用户数据模型

use serde::{Deserialize, Serialize};

use crate::models::tenant::{EntityStatus, RoleName};

/// 注册新用户
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub password: String,
    pub roles: Vec<RoleName>,
}

/// 更新用户（管理员：状态、角色）
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<RoleName>>,
}

/// 用户列表项
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub status: EntityStatus,
    #[serde(default)]
    pub roles: Vec<RoleName>,
}

/// 当前用户的资源权限映射（资源名 → 操作列表）
pub type UserPermissions = std::collections::HashMap<String, Vec<String>>;

/// 登录/刷新返回的令牌
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
