//! 页面数据模型
//!
//! 与后端 `/page/` 端点的 JSON 结构一一对应

use serde::{Deserialize, Serialize};

/// OCR 或翻译结果
///
/// 两个阶段共用同一结构：语言 + 模型 + 文本内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrTranslation {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub data: String,
}

/// 书籍中的单个页面
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub book_id: String,
    pub page_number: u32,
    /// 原始扫描图片地址
    pub photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_photo: Option<String>,
    #[serde(default)]
    pub ocr: Option<OcrTranslation>,
    #[serde(default)]
    pub translation: Option<OcrTranslation>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Page {
    /// 该页是否已有 OCR 文本（任意非空字符串都算）
    pub fn has_ocr_data(&self) -> bool {
        self.ocr
            .as_ref()
            .map(|o| !o.data.is_empty())
            .unwrap_or(false)
    }
}

/// 创建新页面的表单数据
#[derive(Debug, Clone, Serialize)]
pub struct PageForm {
    pub book_id: String,
    pub page_number: u32,
    pub photo: String,
}
