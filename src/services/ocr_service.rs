//! OCR 服务 - 业务能力层
//!
//! 只负责"为单个页面跑一次 OCR"这一能力，不关心批处理流程。

use std::sync::Arc;

use tracing::debug;

use crate::client::{ApiClient, OcrRunParams};
use crate::error::AppResult;
use crate::models::{BatchSettings, Page};

/// OCR 服务
pub struct OcrService {
    client: Arc<ApiClient>,
}

impl OcrService {
    /// 创建新的 OCR 服务
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 为单个页面执行 OCR，结果由后端直接保存到页面记录
    ///
    /// # 返回
    /// 返回识别出的文本
    pub async fn run(&self, page: &Page, settings: &BatchSettings) -> AppResult<String> {
        debug!(
            "[页面 {}] 发起 OCR 请求 (语言: {}, 模型: {})",
            page.page_number, settings.ocr_language, settings.ocr_model
        );

        let response = self
            .client
            .perform_ocr(&OcrRunParams {
                page_id: page.id.clone(),
                photo_url: page.photo.clone(),
                language: settings.ocr_language.clone(),
                ai_model: settings.ocr_model.clone(),
                custom_prompt: Some(build_ocr_prompt(&settings.ocr_language)),
                auto_save: true,
            })
            .await?;

        Ok(response.ocr)
    }
}

/// 构建 OCR 提示词
pub(crate) fn build_ocr_prompt(language: &str) -> String {
    format!("OCR the page in {} only return ocr", language)
}
