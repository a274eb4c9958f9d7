//! 分类数据模型

use serde::{Deserialize, Serialize};

/// 书籍分类
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 创建/编辑分类的表单数据
#[derive(Debug, Clone, Serialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
