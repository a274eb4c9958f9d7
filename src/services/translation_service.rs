//! 翻译服务 - 业务能力层
//!
//! 只负责"为单个页面跑一次翻译"这一能力。
//!
//! 关键约定：翻译前总是从后端重新读取该页的最新 OCR 文本，
//! 而不是用本地缓存——OCR 阶段刚写回的结果和手工编辑都可能
//! 让本地数据过期。

use std::sync::Arc;

use tracing::debug;

use crate::client::{ApiClient, TranslationRunParams};
use crate::error::{AppError, AppResult, BatchError};
use crate::models::{BatchSettings, Page};
use crate::utils::logging::truncate_text;

/// 翻译服务
pub struct TranslationService {
    client: Arc<ApiClient>,
}

impl TranslationService {
    /// 创建新的翻译服务
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 为单个页面执行翻译
    ///
    /// # 参数
    /// - `page`: 页面（只用 id / 页码，OCR 文本会重新拉取）
    /// - `settings`: 本次批处理设置
    /// - `previous_translation`: 上一页的翻译结果，作为上下文拼进提示词
    ///
    /// # 返回
    /// 返回翻译文本
    pub async fn run(
        &self,
        page: &Page,
        settings: &BatchSettings,
        previous_translation: Option<&str>,
    ) -> AppResult<String> {
        // 重新读取最新页面数据，防止使用过期的 OCR 文本
        let current_page = self.client.get_page(&page.id).await?;

        if !current_page.has_ocr_data() {
            return Err(AppError::Batch(BatchError::OcrDataMissing {
                page_id: page.id.clone(),
            }));
        }

        let ocr_text = current_page
            .ocr
            .map(|o| o.data)
            .unwrap_or_default();

        let text = build_translation_prompt(previous_translation, &ocr_text);

        debug!(
            "[页面 {}] 发起翻译请求 ({} → {}, 模型: {}), 源文本: {}",
            page.page_number,
            settings.ocr_language,
            settings.translation_language,
            settings.translation_model,
            truncate_text(&ocr_text, 60)
        );

        let response = self
            .client
            .perform_translation(&TranslationRunParams {
                page_id: page.id.clone(),
                text,
                source_lang: settings.ocr_language.clone(),
                target_lang: settings.translation_language.clone(),
                ai_model: settings.translation_model.clone(),
                custom_prompt: None,
                auto_save: true,
            })
            .await?;

        Ok(response.translation)
    }
}

/// 构建翻译提示词：上一页译文（若有）作为上下文放在最前面
pub(crate) fn build_translation_prompt(previous_translation: Option<&str>, ocr_text: &str) -> String {
    let context = match previous_translation {
        Some(previous) => format!(
            "The translation of the previous page was: \"{}\".\n\nUsing that as context internally, ",
            previous
        ),
        None => String::new(),
    };

    format!(
        "{}\nTranslate the following text:-\n**Text to translate:**\n{}",
        context, ocr_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_context_has_no_preamble() {
        let prompt = build_translation_prompt(None, "Lorem ipsum");
        assert!(prompt.starts_with("\nTranslate the following text:-"));
        assert!(prompt.ends_with("Lorem ipsum"));
        assert!(!prompt.contains("previous page"));
    }

    #[test]
    fn prompt_with_context_prepends_previous_translation() {
        let prompt = build_translation_prompt(Some("The hidden doctrine"), "Lorem ipsum");
        assert!(prompt.starts_with(
            "The translation of the previous page was: \"The hidden doctrine\"."
        ));
        assert!(prompt.contains("Using that as context internally, "));
        assert!(prompt.ends_with("Lorem ipsum"));
    }
}
