//! 页面处理流程 - 流程层
//!
//! 核心职责：定义"一页"的两个阶段各自怎么跑
//!
//! - OCR 阶段：调用 OcrService，后端直接保存结果
//! - 翻译阶段：调用 TranslationService（内部重新拉取最新 OCR 文本）
//!
//! 本层不持有任何调度状态，什么时候跑、并发多少由编排层决定。
//! `PageProcessor` trait 是编排层与业务能力之间的接缝，
//! 测试时可以用假实现替换整个网络栈。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::client::ApiClient;
use crate::error::AppResult;
use crate::models::{BatchSettings, Page};
use crate::services::{OcrService, TranslationService};

/// 单页处理能力
#[async_trait]
pub trait PageProcessor: Send + Sync {
    /// 为一页执行 OCR，返回识别文本
    async fn run_ocr(&self, page: &Page, settings: &BatchSettings) -> AppResult<String>;

    /// 为一页执行翻译，返回翻译文本
    ///
    /// `previous_translation` 是上一页的成功译文（如有），
    /// 会被拼进提示词作为上下文。
    async fn run_translation(
        &self,
        page: &Page,
        settings: &BatchSettings,
        previous_translation: Option<&str>,
    ) -> AppResult<String>;
}

/// 页面处理流程
///
/// - 只依赖业务能力（services）
/// - 不持有任何资源（HTTP 客户端在 services 内部共享）
pub struct PageFlow {
    ocr_service: OcrService,
    translation_service: TranslationService,
}

impl PageFlow {
    /// 创建新的页面处理流程
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            ocr_service: OcrService::new(client.clone()),
            translation_service: TranslationService::new(client),
        }
    }
}

#[async_trait]
impl PageProcessor for PageFlow {
    async fn run_ocr(&self, page: &Page, settings: &BatchSettings) -> AppResult<String> {
        info!("[页面 {}] 🔍 正在执行 OCR...", page.page_number);
        let text = self.ocr_service.run(page, settings).await?;
        info!("[页面 {}] ✓ OCR 完成", page.page_number);
        Ok(text)
    }

    async fn run_translation(
        &self,
        page: &Page,
        settings: &BatchSettings,
        previous_translation: Option<&str>,
    ) -> AppResult<String> {
        if previous_translation.is_some() {
            info!("[页面 {}] 📖 正在翻译（带上一页上下文）...", page.page_number);
        } else {
            info!("[页面 {}] 📖 正在翻译...", page.page_number);
        }
        let text = self
            .translation_service
            .run(page, settings, previous_translation)
            .await?;
        info!("[页面 {}] ✓ 翻译完成", page.page_number);
        Ok(text)
    }
}
