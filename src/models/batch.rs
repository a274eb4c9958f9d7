//! 批处理数据模型（全部为内存中的瞬态数据，绝不持久化）

use serde::{Deserialize, Serialize};

/// 一次批处理调用的用户设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    pub ocr_language: String,
    pub translation_language: String,
    pub process_ocr: bool,
    pub process_translation: bool,
    pub ocr_model: String,
    pub translation_model: String,
}

impl BatchSettings {
    /// 是否至少启用了一个阶段
    pub fn any_stage_enabled(&self) -> bool {
        self.process_ocr || self.process_translation
    }
}

/// 单页单阶段的状态
///
/// 状态机：pending → processing → {completed | error}；
/// 未请求的阶段始终停留在 not_queued。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Processing,
    Completed,
    Error,
    NotQueued,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            StageStatus::Pending => "pending",
            StageStatus::Processing => "processing",
            StageStatus::Completed => "completed",
            StageStatus::Error => "error",
            StageStatus::NotQueued => "not_queued",
        };
        write!(f, "{}", text)
    }
}

/// 批处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ocr,
    Translation,
    /// 不属于任何具体页面的编排级错误
    System,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Stage::Ocr => "OCR",
            Stage::Translation => "Translation",
            Stage::System => "System",
        };
        write!(f, "{}", text)
    }
}

/// 单页处理状态记录
///
/// 每次批处理为每个被选中的页面创建一条，整条记录按页面 ID
/// 键入状态板；运行结束或会话关闭后整体丢弃。
#[derive(Debug, Clone)]
pub struct PageProcessingStatus {
    pub page_id: String,
    pub page_number: u32,
    pub ocr_status: StageStatus,
    pub translation_status: StageStatus,
    pub ocr_error: Option<String>,
    pub translation_error: Option<String>,
}

impl PageProcessingStatus {
    /// 按设置初始化：请求的阶段为 pending，未请求的为 not_queued
    pub fn new(page_id: String, page_number: u32, settings: &BatchSettings) -> Self {
        Self {
            page_id,
            page_number,
            ocr_status: if settings.process_ocr {
                StageStatus::Pending
            } else {
                StageStatus::NotQueued
            },
            translation_status: if settings.process_translation {
                StageStatus::Pending
            } else {
                StageStatus::NotQueued
            },
            ocr_error: None,
            translation_error: None,
        }
    }

    /// 所有被请求的阶段是否都已成功完成
    pub fn all_requested_completed(&self, settings: &BatchSettings) -> bool {
        let ocr_ok = !settings.process_ocr || self.ocr_status == StageStatus::Completed;
        let translation_ok =
            !settings.process_translation || self.translation_status == StageStatus::Completed;
        ocr_ok && translation_ok
    }
}

/// 整体运行状态（由各页状态派生）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    NotStarted,
    Pending,
    Processing,
    Success,
    Error,
}

/// 错误列表条目
#[derive(Debug, Clone)]
pub struct StageErrorEntry {
    /// 出错页面的页码；编排级错误使用 0
    pub page_number: u32,
    pub stage: Stage,
    pub message: String,
}

/// 批处理最终汇总
#[derive(Debug, Clone, Default)]
pub struct ProcessingResults {
    pub total_pages: usize,
    pub completed_pages: usize,
    pub error_pages: usize,
    pub errors: Vec<StageErrorEntry>,
}

/// 一次批处理的最终结局
///
/// 用户主动取消不参与成功/失败分类，汇总结果被抑制。
#[derive(Debug)]
pub enum BatchOutcome {
    Completed(ProcessingResults),
    Cancelled,
}
