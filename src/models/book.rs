//! 书籍数据模型

use serde::{Deserialize, Serialize};

use crate::models::page::Page;

/// 书籍元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_title: Option<String>,
    pub author: String,
    #[serde(default)]
    pub pages_count: u32,
    /// 出版信息（自由文本，历史文献常常没有准确年份）
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// 已关联的分类名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// 书籍详情：书籍本身 + 页面列表（后端按页码升序返回，但本层不强制去重）
#[derive(Debug, Clone, Deserialize)]
pub struct BookDetails {
    pub book: Book,
    pub pages: Vec<Page>,
}

/// 下一个可用页码
#[derive(Debug, Clone, Deserialize)]
pub struct NextPageNumber {
    pub next_page_number: u32,
}

/// 创建/编辑书籍的表单数据
#[derive(Debug, Clone, Serialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub language: String,
    pub published: String,
}

/// 精选页面（发现页展示用）
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedPage {
    pub id: String,
    pub book_id: String,
    pub page_number: u32,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub compressed_photo: String,
    #[serde(default)]
    pub translation: FeaturedTranslation,
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub book_author: String,
    #[serde(default)]
    pub book_language: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedTranslation {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub language: String,
}
