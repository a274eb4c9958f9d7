//! 批量页面处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是批处理的入口，负责页面的调度和状态管理。
//!
//! ## 核心功能
//!
//! 1. **前置校验**：选区非空、至少启用一个阶段
//! 2. **状态板初始化**：按页面 ID 建立瞬态状态记录
//! 3. **OCR 阶段**：使用 Semaphore 限制并发（最多同时 3 页），
//!    按页码升序派发，一页完成立即补位
//! 4. **翻译阶段**：严格按页码顺序逐页进行，上一页的成功译文
//!    作为下一页的翻译上下文
//! 5. **协作式取消**：watch 信号 + 任务中止句柄，两种取消语义
//! 6. **全局统计**：completed_pages + error_pages == total_pages
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单页阶段的细节，向下委托给 `PageProcessor`
//! - **并发安全**：通过 Semaphore 和 tokio::spawn 实现并发
//! - **跳过规则**：OCR 失败的页面，其翻译标记为
//!   "Skipped due to OCR failure."，且不重置上下文链

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{watch, Semaphore};
use tokio::task::AbortHandle;
use tracing::{error, info, warn};

use crate::batch::StatusBoard;
use crate::error::{AppError, AppResult, BatchError};
use crate::models::{
    BatchOutcome, BatchSettings, Page, ProcessingResults, Stage, StageErrorEntry, StageStatus,
};
use crate::utils::logging;
use crate::workflow::PageProcessor;

/// 翻译阶段跳过 OCR 失败页面时写入的状态消息
const SKIPPED_MESSAGE: &str = "Skipped due to OCR failure.";

/// 编排级故障写入错误列表的消息
const SYSTEM_FAILURE_MESSAGE: &str = "Batch processing failed. Please try again.";

/// 批量页面处理器
///
/// 对处理能力 `P` 泛型，生产代码使用 [`PageFlow`](crate::workflow::PageFlow)，
/// 测试可以注入假实现。
pub struct BatchProcessor<P: PageProcessor> {
    flow: Arc<P>,
    board: Arc<StatusBoard>,
    max_parallel_ocr: usize,
    cancel_tx: watch::Sender<bool>,
    cancel_all: Arc<AtomicBool>,
    abort_handles: Arc<Mutex<HashMap<String, AbortHandle>>>,
}

/// 取消句柄
///
/// 从处理器分离出来，可以跨任务传递（例如交给 Ctrl+C 处理器）。
#[derive(Clone)]
pub struct BatchHandle {
    cancel_tx: watch::Sender<bool>,
    cancel_all: Arc<AtomicBool>,
    abort_handles: Arc<Mutex<HashMap<String, AbortHandle>>>,
}

impl BatchHandle {
    /// 停止处理但保留页面列表
    ///
    /// 进行中的请求被中止；运行结束时所有状态重置回
    /// pending / not_queued，错误清空，同一批页面可以重新运行。
    pub fn cancel_processing_only(&self) {
        info!("🛑 收到取消请求：停止处理，保留页面列表");
        self.cancel_tx.send_replace(true);
        self.abort_in_flight();
    }

    /// 停止处理并丢弃整个状态板
    ///
    /// 对应用户直接放弃本次批处理，不再报告任何汇总结果。
    pub fn cancel_all(&self) {
        info!("🛑 收到取消请求：停止处理并丢弃状态");
        self.cancel_all.store(true, Ordering::SeqCst);
        self.cancel_tx.send_replace(true);
        self.abort_in_flight();
    }

    fn abort_in_flight(&self) {
        let handles = self.abort_handles.lock();
        for handle in handles.values() {
            handle.abort();
        }
    }
}

impl<P: PageProcessor + 'static> BatchProcessor<P> {
    /// 创建新的批量页面处理器
    pub fn new(flow: Arc<P>, max_parallel_ocr: usize) -> Self {
        let (cancel_tx, _cancel_rx) = watch::channel(false);
        Self {
            flow,
            board: Arc::new(StatusBoard::new()),
            max_parallel_ocr,
            cancel_tx,
            cancel_all: Arc::new(AtomicBool::new(false)),
            abort_handles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 共享状态板（供进度显示等只读用途）
    pub fn board(&self) -> Arc<StatusBoard> {
        self.board.clone()
    }

    /// 获取取消句柄
    pub fn handle(&self) -> BatchHandle {
        BatchHandle {
            cancel_tx: self.cancel_tx.clone(),
            cancel_all: self.cancel_all.clone(),
            abort_handles: self.abort_handles.clone(),
        }
    }

    /// 运行一次批处理
    ///
    /// - `book_pages`：书中已知的全部页面
    /// - `selected_ids`：被选中处理的页面 ID（未知 ID 记为 "Page not found"）
    ///
    /// 校验失败直接返回错误；运行中的阶段错误被捕获为状态记录，
    /// 编排级故障转换为页码 0 的 System 错误条目。
    pub async fn run(
        &self,
        book_pages: &[Page],
        selected_ids: &[String],
        settings: &BatchSettings,
    ) -> AppResult<BatchOutcome> {
        if selected_ids.is_empty() {
            return Err(BatchError::EmptySelection.into());
        }
        if !settings.any_stage_enabled() {
            return Err(BatchError::NoStageEnabled.into());
        }

        // 重置上一次运行遗留的取消状态
        self.cancel_all.store(false, Ordering::SeqCst);
        self.cancel_tx.send_replace(false);

        // 解析选区并按页码升序排列
        let mut selected: Vec<(String, u32, Option<Page>)> = selected_ids
            .iter()
            .map(|id| match book_pages.iter().find(|p| p.id == *id) {
                Some(page) => (id.clone(), page.page_number, Some(page.clone())),
                None => {
                    let number = id
                        .strip_prefix("missing:")
                        .and_then(|n| n.parse().ok())
                        .unwrap_or(0);
                    (id.clone(), number, None)
                }
            })
            .collect();
        selected.sort_by_key(|(_, number, _)| *number);

        let entries: Vec<(String, u32)> = selected
            .iter()
            .map(|(id, number, _)| (id.clone(), *number))
            .collect();
        self.board.init(&entries, settings);

        logging::log_pages_loaded(selected.len(), self.max_parallel_ocr);

        let errors = Arc::new(Mutex::new(Vec::new()));
        let run_result = self.run_stages(&selected, settings, errors.clone()).await;

        self.abort_handles.lock().clear();

        if self.cancel_all.load(Ordering::SeqCst) {
            self.board.clear();
            warn!("🛑 批处理已被用户取消，结果已丢弃");
            return Ok(BatchOutcome::Cancelled);
        }

        // 仅停止处理的取消：状态重置回初始值，页面列表保留，可重新运行
        if *self.cancel_tx.borrow() {
            self.board.reset_to_pending(settings);
            self.cancel_tx.send_replace(false);
            warn!("🛑 批处理已停止，页面状态已重置");
            return Ok(BatchOutcome::Cancelled);
        }

        if let Err(e) = run_result {
            error!("❌ 批处理编排失败: {}", e);
            errors.lock().push(StageErrorEntry {
                page_number: 0,
                stage: Stage::System,
                message: SYSTEM_FAILURE_MESSAGE.to_string(),
            });
        }

        let total_pages = selected.len();
        let completed_pages = self.board.successful_pages(settings);
        let results = ProcessingResults {
            total_pages,
            completed_pages,
            error_pages: total_pages - completed_pages,
            errors: std::mem::take(&mut *errors.lock()),
        };
        Ok(BatchOutcome::Completed(results))
    }

    /// 依次运行 OCR 阶段和翻译阶段
    async fn run_stages(
        &self,
        selected: &[(String, u32, Option<Page>)],
        settings: &BatchSettings,
        errors: Arc<Mutex<Vec<StageErrorEntry>>>,
    ) -> AppResult<()> {
        if settings.process_ocr {
            self.run_ocr_stage(selected, settings, errors.clone()).await?;
        }
        if settings.process_translation {
            self.run_translation_stage(selected, settings, errors).await;
        }
        Ok(())
    }

    /// OCR 阶段：受 Semaphore 限制的并发池
    ///
    /// 按页码升序派发；一个任务完成释放许可后，下一页立即补位，
    /// 任意时刻在途页面数不超过 `max_parallel_ocr`。
    async fn run_ocr_stage(
        &self,
        selected: &[(String, u32, Option<Page>)],
        settings: &BatchSettings,
        errors: Arc<Mutex<Vec<StageErrorEntry>>>,
    ) -> AppResult<()> {
        logging::log_stage_start("OCR", selected.len());

        let semaphore = Arc::new(Semaphore::new(self.max_parallel_ocr));
        let mut handles = Vec::new();

        for (page_id, page_number, page) in selected {
            if self.cancel_all.load(Ordering::SeqCst) {
                break;
            }

            let Some(page) = page else {
                self.record_stage_error(
                    page_id,
                    *page_number,
                    Stage::Ocr,
                    BatchError::PageNotFound {
                        page_id: page_id.clone(),
                    }
                    .to_string(),
                    &errors,
                );
                continue;
            };

            if *self.cancel_tx.borrow() {
                self.mark_cancelled(page_id, Stage::Ocr);
                continue;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Other(format!("并发许可获取失败: {}", e)))?;

            self.board
                .update(page_id, |s| s.ocr_status = StageStatus::Processing);

            let flow = self.flow.clone();
            let page = page.clone();
            let task_settings = settings.clone();
            let mut cancel_rx = self.cancel_tx.subscribe();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                tokio::select! {
                    res = flow.run_ocr(&page, &task_settings) => res,
                    _ = cancel_rx.wait_for(|cancelled| *cancelled) => {
                        Err(BatchError::Cancelled.into())
                    }
                }
            });

            self.abort_handles
                .lock()
                .insert(format!("ocr:{}", page_id), handle.abort_handle());
            handles.push((page_id.clone(), *page_number, handle));
        }

        let dispatched = handles.len();
        let mut success = 0usize;

        for (page_id, page_number, handle) in handles {
            let outcome = handle.await;
            self.abort_handles.lock().remove(&format!("ocr:{}", page_id));

            match outcome {
                Ok(Ok(_text)) => {
                    self.board
                        .update(&page_id, |s| s.ocr_status = StageStatus::Completed);
                    success += 1;
                }
                Ok(Err(e)) => {
                    if is_cancel(&e) {
                        self.mark_cancelled(&page_id, Stage::Ocr);
                    } else {
                        let message = stage_error_message(&e);
                        error!("[页面 {}] ❌ OCR 失败: {}", page_number, message);
                        self.record_stage_error(
                            &page_id,
                            page_number,
                            Stage::Ocr,
                            message,
                            &errors,
                        );
                    }
                }
                Err(join_err) if join_err.is_cancelled() => {
                    self.mark_cancelled(&page_id, Stage::Ocr);
                }
                Err(join_err) => {
                    error!("[页面 {}] ❌ OCR 任务执行失败: {}", page_number, join_err);
                    self.record_stage_error(
                        &page_id,
                        page_number,
                        Stage::Ocr,
                        join_err.to_string(),
                        &errors,
                    );
                }
            }
        }

        logging::log_stage_complete("OCR", success, dispatched);
        Ok(())
    }

    /// 翻译阶段：严格按页码顺序逐页进行
    ///
    /// 上一页的成功译文作为下一页的上下文；翻译失败把上下文链
    /// 重置为空，OCR 失败导致的跳过不触碰上下文链。
    async fn run_translation_stage(
        &self,
        selected: &[(String, u32, Option<Page>)],
        settings: &BatchSettings,
        errors: Arc<Mutex<Vec<StageErrorEntry>>>,
    ) {
        logging::log_stage_start("翻译", selected.len());

        let mut previous_translation: Option<String> = None;
        let mut success = 0usize;

        for (page_id, page_number, page) in selected {
            if self.cancel_all.load(Ordering::SeqCst) {
                break;
            }

            if *self.cancel_tx.borrow() {
                self.mark_cancelled(page_id, Stage::Translation);
                continue;
            }

            // 跳过规则：本次批处理包含 OCR 时，OCR 未成功完成的页面不再尝试翻译
            if settings.process_ocr {
                let ocr_incomplete = self
                    .board
                    .get(page_id)
                    .map(|s| s.ocr_status != StageStatus::Completed)
                    .unwrap_or(true);
                if ocr_incomplete {
                    warn!("[页面 {}] ⚠️ OCR 失败，跳过翻译", page_number);
                    self.board.update(page_id, |s| {
                        if s.translation_status == StageStatus::Pending {
                            s.translation_status = StageStatus::Error;
                            s.translation_error = Some(SKIPPED_MESSAGE.to_string());
                        }
                    });
                    continue;
                }
            }

            let Some(page) = page else {
                self.record_stage_error(
                    page_id,
                    *page_number,
                    Stage::Translation,
                    BatchError::PageNotFound {
                        page_id: page_id.clone(),
                    }
                    .to_string(),
                    &errors,
                );
                continue;
            };

            self.board
                .update(page_id, |s| s.translation_status = StageStatus::Processing);

            let flow = self.flow.clone();
            let page = page.clone();
            let task_settings = settings.clone();
            let previous = previous_translation.clone();
            let mut cancel_rx = self.cancel_tx.subscribe();

            let handle = tokio::spawn(async move {
                tokio::select! {
                    res = flow.run_translation(&page, &task_settings, previous.as_deref()) => res,
                    _ = cancel_rx.wait_for(|cancelled| *cancelled) => {
                        Err(BatchError::Cancelled.into())
                    }
                }
            });

            self.abort_handles
                .lock()
                .insert(format!("translation:{}", page_id), handle.abort_handle());
            let outcome = handle.await;
            self.abort_handles
                .lock()
                .remove(&format!("translation:{}", page_id));

            match outcome {
                Ok(Ok(text)) => {
                    self.board
                        .update(page_id, |s| s.translation_status = StageStatus::Completed);
                    previous_translation = Some(text);
                    success += 1;
                }
                Ok(Err(e)) => {
                    if is_cancel(&e) {
                        self.mark_cancelled(page_id, Stage::Translation);
                    } else {
                        let message = stage_error_message(&e);
                        error!("[页面 {}] ❌ 翻译失败: {}", page_number, message);
                        self.record_stage_error(
                            page_id,
                            *page_number,
                            Stage::Translation,
                            message,
                            &errors,
                        );
                    }
                    previous_translation = None;
                }
                Err(join_err) if join_err.is_cancelled() => {
                    self.mark_cancelled(page_id, Stage::Translation);
                    previous_translation = None;
                }
                Err(join_err) => {
                    error!("[页面 {}] ❌ 翻译任务执行失败: {}", page_number, join_err);
                    self.record_stage_error(
                        page_id,
                        *page_number,
                        Stage::Translation,
                        join_err.to_string(),
                        &errors,
                    );
                    previous_translation = None;
                }
            }
        }

        logging::log_stage_complete("翻译", success, selected.len());
    }

    // ========== 状态记录辅助函数 ==========

    /// 记为阶段错误并追加到错误列表
    fn record_stage_error(
        &self,
        page_id: &str,
        page_number: u32,
        stage: Stage,
        message: String,
        errors: &Mutex<Vec<StageErrorEntry>>,
    ) {
        self.board.update(page_id, |s| match stage {
            Stage::Ocr => {
                s.ocr_status = StageStatus::Error;
                s.ocr_error = Some(message.clone());
            }
            Stage::Translation | Stage::System => {
                s.translation_status = StageStatus::Error;
                s.translation_error = Some(message.clone());
            }
        });
        errors.lock().push(StageErrorEntry {
            page_number,
            stage,
            message,
        });
    }

    /// 记为已取消（不进入错误列表）
    fn mark_cancelled(&self, page_id: &str, stage: Stage) {
        let message = BatchError::Cancelled.to_string();
        self.board.update(page_id, |s| match stage {
            Stage::Ocr => {
                s.ocr_status = StageStatus::Error;
                s.ocr_error = Some(message.clone());
            }
            Stage::Translation | Stage::System => {
                s.translation_status = StageStatus::Error;
                s.translation_error = Some(message.clone());
            }
        });
    }
}

/// 提取用于状态记录的错误消息
///
/// 批处理阶段错误使用其裸消息（与前端约定的固定文案），
/// 其余错误使用完整展示。
fn stage_error_message(err: &AppError) -> String {
    match err {
        AppError::Batch(batch_err) => batch_err.to_string(),
        other => other.to_string(),
    }
}

fn is_cancel(err: &AppError) -> bool {
    matches!(err, AppError::Batch(BatchError::Cancelled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// 记录调用情况的假处理流程
    struct FakeFlow {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        ocr_order: Mutex<Vec<u32>>,
        translation_calls: Mutex<Vec<(u32, Option<String>)>>,
        fail_ocr: Vec<u32>,
        fail_translation: Vec<u32>,
        delay: Duration,
    }

    impl FakeFlow {
        fn new(delay_ms: u64) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                ocr_order: Mutex::new(Vec::new()),
                translation_calls: Mutex::new(Vec::new()),
                fail_ocr: Vec::new(),
                fail_translation: Vec::new(),
                delay: Duration::from_millis(delay_ms),
            }
        }

        fn failing_ocr(mut self, pages: &[u32]) -> Self {
            self.fail_ocr = pages.to_vec();
            self
        }

        fn failing_translation(mut self, pages: &[u32]) -> Self {
            self.fail_translation = pages.to_vec();
            self
        }
    }

    #[async_trait]
    impl PageProcessor for FakeFlow {
        async fn run_ocr(&self, page: &Page, _settings: &BatchSettings) -> AppResult<String> {
            self.ocr_order.lock().push(page.page_number);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_ocr.contains(&page.page_number) {
                return Err(AppError::Other(format!("识别失败 {}", page.page_number)));
            }
            Ok(format!("ocr-{}", page.page_number))
        }

        async fn run_translation(
            &self,
            page: &Page,
            _settings: &BatchSettings,
            previous_translation: Option<&str>,
        ) -> AppResult<String> {
            self.translation_calls
                .lock()
                .push((page.page_number, previous_translation.map(str::to_string)));
            tokio::time::sleep(self.delay).await;

            if self.fail_translation.contains(&page.page_number) {
                return Err(AppError::Other(format!("翻译失败 {}", page.page_number)));
            }
            Ok(format!("t-{}", page.page_number))
        }
    }

    fn page(id: &str, number: u32) -> Page {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "book_id": "b-1",
            "page_number": number,
            "photo": "x",
        }))
        .expect("构造测试页面失败")
    }

    fn pages(n: u32) -> Vec<Page> {
        (1..=n).map(|i| page(&format!("p-{}", i), i)).collect()
    }

    fn ids(n: u32) -> Vec<String> {
        (1..=n).map(|i| format!("p-{}", i)).collect()
    }

    fn settings(ocr: bool, translation: bool) -> BatchSettings {
        BatchSettings {
            ocr_language: "Latin".to_string(),
            translation_language: "English".to_string(),
            process_ocr: ocr,
            process_translation: translation,
            ocr_model: "mistral".to_string(),
            translation_model: "gemini".to_string(),
        }
    }

    fn results(outcome: BatchOutcome) -> ProcessingResults {
        match outcome {
            BatchOutcome::Completed(results) => results,
            BatchOutcome::Cancelled => panic!("批处理不应被取消"),
        }
    }

    #[tokio::test]
    async fn rejects_empty_selection() {
        let processor = BatchProcessor::new(Arc::new(FakeFlow::new(0)), 3);
        let err = processor
            .run(&pages(2), &[], &settings(true, true))
            .await
            .expect_err("空选区应该被拒绝");
        assert!(matches!(
            err,
            AppError::Batch(BatchError::EmptySelection)
        ));
    }

    #[tokio::test]
    async fn rejects_when_no_stage_enabled() {
        let processor = BatchProcessor::new(Arc::new(FakeFlow::new(0)), 3);
        let err = processor
            .run(&pages(2), &ids(2), &settings(false, false))
            .await
            .expect_err("两个阶段都关闭时应该被拒绝");
        assert!(matches!(err, AppError::Batch(BatchError::NoStageEnabled)));
    }

    #[tokio::test]
    async fn ocr_concurrency_stays_within_limit() {
        let flow = Arc::new(FakeFlow::new(20));
        let processor = BatchProcessor::new(flow.clone(), 3);

        let outcome = processor
            .run(&pages(8), &ids(8), &settings(true, false))
            .await
            .expect("批处理应该成功");

        let results = results(outcome);
        assert_eq!(results.total_pages, 8);
        assert_eq!(results.completed_pages, 8);
        assert_eq!(results.error_pages, 0);
        assert!(flow.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn ocr_dispatch_follows_page_number_order() {
        let flow = Arc::new(FakeFlow::new(1));
        // 并发数 1 使派发顺序完全可观测
        let processor = BatchProcessor::new(flow.clone(), 1);

        let mut shuffled = pages(4);
        shuffled.swap(0, 3);
        shuffled.swap(1, 2);
        let selected = vec![
            "p-3".to_string(),
            "p-1".to_string(),
            "p-4".to_string(),
            "p-2".to_string(),
        ];

        processor
            .run(&shuffled, &selected, &settings(true, false))
            .await
            .expect("批处理应该成功");

        assert_eq!(*flow.ocr_order.lock(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn translations_chain_previous_context() {
        let flow = Arc::new(FakeFlow::new(1));
        let processor = BatchProcessor::new(flow.clone(), 3);

        processor
            .run(&pages(3), &ids(3), &settings(false, true))
            .await
            .expect("批处理应该成功");

        let calls = flow.translation_calls.lock().clone();
        assert_eq!(
            calls,
            vec![
                (1, None),
                (2, Some("t-1".to_string())),
                (3, Some("t-2".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn translation_failure_resets_context_chain() {
        let flow = Arc::new(FakeFlow::new(1).failing_translation(&[2]));
        let processor = BatchProcessor::new(flow.clone(), 3);

        let outcome = processor
            .run(&pages(3), &ids(3), &settings(false, true))
            .await
            .expect("批处理应该成功");

        let calls = flow.translation_calls.lock().clone();
        assert_eq!(
            calls,
            vec![(1, None), (2, Some("t-1".to_string())), (3, None)]
        );

        let results = results(outcome);
        assert_eq!(results.completed_pages, 2);
        assert_eq!(results.error_pages, 1);
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].page_number, 2);
        assert_eq!(results.errors[0].stage, Stage::Translation);
    }

    #[tokio::test]
    async fn ocr_failure_skips_translation_without_touching_context() {
        let flow = Arc::new(FakeFlow::new(1).failing_ocr(&[2]));
        let processor = BatchProcessor::new(flow.clone(), 3);
        let board = processor.board();

        let outcome = processor
            .run(&pages(3), &ids(3), &settings(true, true))
            .await
            .expect("批处理应该成功");

        // 第 2 页被跳过，第 3 页仍然拿到第 1 页的译文作为上下文
        let calls = flow.translation_calls.lock().clone();
        assert_eq!(
            calls,
            vec![(1, None), (3, Some("t-1".to_string()))]
        );

        let skipped = board.get("p-2").expect("页面应在状态板上");
        assert_eq!(skipped.translation_status, StageStatus::Error);
        assert_eq!(
            skipped.translation_error.as_deref(),
            Some("Skipped due to OCR failure.")
        );

        // 错误列表只有 OCR 失败本身，跳过不产生条目
        let results = results(outcome);
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].stage, Stage::Ocr);
        assert_eq!(results.completed_pages, 2);
        assert_eq!(results.error_pages, 1);
    }

    #[tokio::test]
    async fn unknown_selection_records_page_not_found() {
        let flow = Arc::new(FakeFlow::new(1));
        let processor = BatchProcessor::new(flow, 3);
        let board = processor.board();

        let selected = vec!["p-1".to_string(), "missing:9".to_string()];
        let outcome = processor
            .run(&pages(1), &selected, &settings(false, true))
            .await
            .expect("批处理应该成功");

        let missing = board.get("missing:9").expect("页面应在状态板上");
        assert_eq!(missing.page_number, 9);
        assert_eq!(missing.translation_status, StageStatus::Error);
        assert_eq!(missing.translation_error.as_deref(), Some("Page not found"));

        let results = results(outcome);
        assert_eq!(results.total_pages, 2);
        assert_eq!(results.completed_pages, 1);
        assert_eq!(results.error_pages, 1);
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].page_number, 9);
        assert_eq!(results.errors[0].message, "Page not found");
    }

    #[tokio::test]
    async fn cancel_all_discards_board_and_results() {
        let flow = Arc::new(FakeFlow::new(200));
        let processor = Arc::new(BatchProcessor::new(flow, 3));
        let handle = processor.handle();
        let board = processor.board();

        let runner = {
            let processor = processor.clone();
            tokio::spawn(async move {
                processor
                    .run(&pages(5), &ids(5), &settings(true, true))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.cancel_all();

        let outcome = runner
            .await
            .expect("运行任务不应崩溃")
            .expect("取消不是错误");
        assert!(matches!(outcome, BatchOutcome::Cancelled));
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn cancel_processing_only_resets_board_to_pending() {
        let flow = Arc::new(FakeFlow::new(200));
        let processor = Arc::new(BatchProcessor::new(flow, 3));
        let handle = processor.handle();
        let board = processor.board();

        let runner = {
            let processor = processor.clone();
            tokio::spawn(async move {
                processor
                    .run(&pages(4), &ids(4), &settings(false, true))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.cancel_processing_only();

        let outcome = runner
            .await
            .expect("运行任务不应崩溃")
            .expect("取消不是错误");
        assert!(matches!(outcome, BatchOutcome::Cancelled));

        // 页面列表保留，状态全部重置回初始值，可以重新运行
        assert_eq!(board.len(), 4);
        for status in board.snapshot() {
            assert_eq!(status.ocr_status, StageStatus::NotQueued);
            assert_eq!(status.translation_status, StageStatus::Pending);
            assert!(status.translation_error.is_none());
        }
    }
}
