//! 批处理状态板
//!
//! 按页面 ID 键入的瞬态状态表，批处理运行期间由并发任务更新，
//! 运行结束或被取消后整体丢弃，绝不持久化。

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::models::{BatchSettings, OverallStatus, PageProcessingStatus, StageStatus};

/// 批处理状态板
///
/// 内部用 `parking_lot::Mutex` 保护，更新都是短临界区的内存操作。
pub struct StatusBoard {
    inner: Mutex<HashMap<String, PageProcessingStatus>>,
}

impl StatusBoard {
    /// 创建空状态板
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// 为一次新的批处理初始化状态板
    ///
    /// 被请求的阶段初始为 pending，未请求的为 not_queued。
    /// 旧的状态记录全部丢弃。
    pub fn init(&self, entries: &[(String, u32)], settings: &BatchSettings) {
        let mut map = self.inner.lock();
        map.clear();
        for (page_id, page_number) in entries {
            map.insert(
                page_id.clone(),
                PageProcessingStatus::new(page_id.clone(), *page_number, settings),
            );
        }
    }

    /// 原子地更新一条页面状态记录
    ///
    /// 页面不在状态板上时返回 false（例如会话已被清空）。
    pub fn update<F>(&self, page_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut PageProcessingStatus),
    {
        let mut map = self.inner.lock();
        match map.get_mut(page_id) {
            Some(status) => {
                f(status);
                true
            }
            None => false,
        }
    }

    /// 读取一条页面状态记录
    pub fn get(&self, page_id: &str) -> Option<PageProcessingStatus> {
        self.inner.lock().get(page_id).cloned()
    }

    /// 按页码升序返回所有状态记录的快照
    pub fn snapshot(&self) -> Vec<PageProcessingStatus> {
        let mut statuses: Vec<PageProcessingStatus> = self.inner.lock().values().cloned().collect();
        statuses.sort_by_key(|s| s.page_number);
        statuses
    }

    /// 派生整体运行状态
    ///
    /// 优先级：processing > error > pending > success；
    /// 只要出现过错误且没有请求在途，整体即为 error。空板为 not_started。
    pub fn overall_status(&self) -> OverallStatus {
        let map = self.inner.lock();
        if map.is_empty() {
            return OverallStatus::NotStarted;
        }

        let stage_statuses = map
            .values()
            .flat_map(|s| [s.ocr_status, s.translation_status]);

        let mut any_pending = false;
        let mut any_error = false;
        for status in stage_statuses {
            match status {
                StageStatus::Processing => return OverallStatus::Processing,
                StageStatus::Pending => any_pending = true,
                StageStatus::Error => any_error = true,
                StageStatus::Completed | StageStatus::NotQueued => {}
            }
        }

        if any_error {
            OverallStatus::Error
        } else if any_pending {
            OverallStatus::Pending
        } else {
            OverallStatus::Success
        }
    }

    /// 计算进度百分比
    ///
    /// 以"被请求的阶段步骤"为单位：每页每个启用的阶段算一步，
    /// 只有 completed 计为完成——失败的步骤不推进进度条。
    pub fn progress_percentage(&self, settings: &BatchSettings) -> u8 {
        let map = self.inner.lock();
        let steps_per_page =
            settings.process_ocr as usize + settings.process_translation as usize;
        let total_steps = map.len() * steps_per_page;
        if total_steps == 0 {
            return 0;
        }

        let mut done_steps = 0;
        for status in map.values() {
            if settings.process_ocr && status.ocr_status == StageStatus::Completed {
                done_steps += 1;
            }
            if settings.process_translation
                && status.translation_status == StageStatus::Completed
            {
                done_steps += 1;
            }
        }

        (done_steps * 100 / total_steps) as u8
    }

    /// 统计所有被请求的阶段都成功完成的页面数
    pub fn successful_pages(&self, settings: &BatchSettings) -> usize {
        self.inner
            .lock()
            .values()
            .filter(|s| s.all_requested_completed(settings))
            .count()
    }

    /// 状态板上的页面数
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// 状态板是否为空
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// 把所有记录重置回初始状态（pending / not_queued），清除错误消息
    ///
    /// 用于"停止处理但保留页面列表"的取消：同一批页面可以重新运行。
    pub fn reset_to_pending(&self, settings: &BatchSettings) {
        let mut map = self.inner.lock();
        for status in map.values_mut() {
            status.ocr_status = if settings.process_ocr {
                StageStatus::Pending
            } else {
                StageStatus::NotQueued
            };
            status.translation_status = if settings.process_translation {
                StageStatus::Pending
            } else {
                StageStatus::NotQueued
            };
            status.ocr_error = None;
            status.translation_error = None;
        }
    }

    /// 丢弃所有状态记录
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
