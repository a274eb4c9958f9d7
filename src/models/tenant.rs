//! 租户数据模型
//!
//! 租户是后端中隔离数据和权限的客户/组织上下文，
//! 所有请求都带 X-Tenant-Slug 请求头来限定作用域。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 实体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Inactive,
    Suspended,
    Archived,
}

/// 角色名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Editor,
    User,
    Guest,
}

/// 订阅计划
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanName {
    Basic,
    Premium,
    Enterprise,
}

/// 租户品牌配置（登录前即可通过 /tenant/validate 获取）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantBrandingConfig {
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub header_video_url: Option<String>,
    #[serde(default)]
    pub heading_text: String,
    #[serde(default)]
    pub subheading_text: String,
    #[serde(default)]
    pub primary_hex_color: String,
}

/// 角色 → 资源操作映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRolePermissions {
    pub role: RoleName,
    /// 资源名 → 允许的操作列表（read / create / update / delete）
    #[serde(default)]
    pub permissions: HashMap<String, Vec<String>>,
}

/// 完整租户信息（仅超级管理员可见）
#[derive(Debug, Clone, Deserialize)]
pub struct Tenant {
    pub id: String,
    #[serde(default)]
    pub external_sys_id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub cell_id: String,
    pub status: EntityStatus,
    pub plan: PlanName,
    #[serde(default)]
    pub branding_config: TenantBrandingConfig,
    #[serde(default)]
    pub role_permissions: Vec<TenantRolePermissions>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// 租户列表项
#[derive(Debug, Clone, Deserialize)]
pub struct TenantSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub status: EntityStatus,
    pub plan: PlanName,
}

/// 创建租户（超级管理员）
#[derive(Debug, Clone, Serialize)]
pub struct TenantCreate {
    pub name: String,
    pub slug: String,
    pub cell_id: String,
    pub plan: PlanName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding_config: Option<TenantBrandingConfig>,
}

/// 更新租户（超级管理员：名称、slug、计划、状态等）
#[derive(Debug, Clone, Default, Serialize)]
pub struct TenantUpdate {
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

/// 租户自定义设置（租户管理员：品牌、权限映射等）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding_config: Option<TenantBrandingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_permissions: Option<Vec<TenantRolePermissions>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_plan_use_lowercase_wire_format() {
        let summary: TenantSummary = serde_json::from_str(
            r#"{"id": "t-1", "name": "Root", "slug": "root", "status": "active", "plan": "premium"}"#,
        )
        .expect("租户摘要 JSON 应该能解析");

        assert_eq!(summary.status, EntityStatus::Active);
        assert_eq!(summary.plan, PlanName::Premium);

        let role = serde_json::to_string(&RoleName::Admin).expect("序列化失败");
        assert_eq!(role, r#""admin""#);
    }
}
