//! 批处理任务文件
//!
//! 一次批处理的输入描述：处理哪本书的哪些页，用什么语言和模型。
//! 未填写的字段回落到 `Config` 的默认值。

use serde::Deserialize;

use crate::config::Config;
use crate::models::batch::BatchSettings;

/// TOML 任务文件内容
#[derive(Debug, Clone, Deserialize)]
pub struct BatchJob {
    /// 目标书籍 ID
    pub book_id: String,
    /// 要处理的页码列表；缺省表示整本书
    #[serde(default)]
    pub pages: Option<Vec<u32>>,
    #[serde(default)]
    pub ocr_language: Option<String>,
    #[serde(default)]
    pub translation_language: Option<String>,
    #[serde(default = "default_true")]
    pub process_ocr: bool,
    #[serde(default = "default_true")]
    pub process_translation: bool,
    #[serde(default)]
    pub ocr_model: Option<String>,
    #[serde(default)]
    pub translation_model: Option<String>,
}

fn default_true() -> bool {
    true
}

impl BatchJob {
    /// 合并任务文件与全局配置，得到本次运行的设置
    pub fn settings(&self, config: &Config) -> BatchSettings {
        BatchSettings {
            ocr_language: self
                .ocr_language
                .clone()
                .unwrap_or_else(|| config.default_ocr_language.clone()),
            translation_language: self
                .translation_language
                .clone()
                .unwrap_or_else(|| config.default_translation_language.clone()),
            process_ocr: self.process_ocr,
            process_translation: self.process_translation,
            ocr_model: self
                .ocr_model
                .clone()
                .unwrap_or_else(|| config.default_ocr_model.clone()),
            translation_model: self
                .translation_model
                .clone()
                .unwrap_or_else(|| config.default_translation_model.clone()),
        }
    }
}
