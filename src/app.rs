//! 应用主结构 - 顶层入口
//!
//! 负责初始化（日志文件、API 客户端、租户校验、登录）和
//! 一次批处理的完整生命周期（加载任务 → 解析选区 → 运行 → 统计）。

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::batch::BatchProcessor;
use crate::client::ApiClient;
use crate::config::Config;
use crate::models::loaders::load_job_from_toml;
use crate::models::BatchOutcome;
use crate::services::LibraryService;
use crate::utils::logging;
use crate::workflow::PageFlow;

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<ApiClient>,
    library: LibraryService,
}

impl App {
    /// 初始化应用
    ///
    /// 校验租户标识；配置了凭据时登录，否则以游客身份运行
    /// （只读端点可用，OCR/翻译请求会被后端按权限拒绝）。
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(config.max_parallel_ocr);

        let client = Arc::new(ApiClient::new(&config)?);

        let branding = client.validate_tenant().await?;
        info!(
            "✓ 租户 \"{}\" 校验通过 ({})",
            config.tenant_slug, branding.heading_text
        );

        if config.username.is_empty() {
            warn!("⚠️ 未配置登录凭据，以游客身份运行");
        } else {
            client.login(&config.username, &config.password).await?;
            info!("✓ 已登录用户 {}", config.username);
        }

        let library = LibraryService::new(client.clone());

        Ok(Self {
            config,
            client,
            library,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载批处理任务
        info!("\n📁 正在读取任务文件 {}...", self.config.job_file);
        let job = load_job_from_toml(Path::new(&self.config.job_file)).await?;

        // 加载书籍并解析页面选区
        let details = self.library.book_details(&job.book_id).await?;
        let selected_ids = self
            .library
            .resolve_selection(&details.pages, job.pages.as_deref());
        let settings = job.settings(&self.config);

        // 组装处理器
        let flow = Arc::new(PageFlow::new(self.client.clone()));
        let processor = Arc::new(BatchProcessor::new(flow, self.config.max_parallel_ocr));

        // Ctrl+C 丢弃本次批处理
        let handle = processor.handle();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel_all();
            }
        });

        let outcome = processor
            .run(&details.pages, &selected_ids, &settings)
            .await?;
        ctrl_c.abort();

        match outcome {
            BatchOutcome::Completed(results) => {
                logging::print_final_stats(
                    results.completed_pages,
                    results.error_pages,
                    results.total_pages,
                );
                if !results.errors.is_empty() {
                    warn!("⚠️ 错误明细:");
                    for entry in &results.errors {
                        warn!(
                            "  - [页面 {}] {}: {}",
                            entry.page_number, entry.stage, entry.message
                        );
                    }
                }
            }
            BatchOutcome::Cancelled => {
                warn!("🛑 批处理已被取消，不生成统计");
            }
        }

        Ok(())
    }
}
