use std::sync::Arc;

use source_library_batch::batch::BatchProcessor;
use source_library_batch::client::ApiClient;
use source_library_batch::config::Config;
use source_library_batch::services::LibraryService;
use source_library_batch::utils::logging;
use source_library_batch::workflow::PageFlow;

#[tokio::test]
#[ignore] // 默认忽略，需要后端在运行时手动执行：cargo test -- --ignored
async fn test_tenant_validation_and_book_listing() {
    // 初始化日志
    logging::init(true);

    // 加载配置
    let config = Config::from_env();

    // 创建 API 客户端
    let client = Arc::new(ApiClient::new(&config).expect("创建客户端失败"));

    // 校验租户
    let branding = client.validate_tenant().await.expect("租户校验失败");
    assert!(!branding.heading_text.is_empty(), "租户应该有标题文案");

    // 列出书籍
    let books = client.get_all_books().await.expect("获取书籍列表失败");
    println!("共 {} 本书", books.len());
}

#[tokio::test]
#[ignore]
async fn test_login_and_permissions() {
    logging::init(true);
    let config = Config::from_env();

    let client = ApiClient::new(&config).expect("创建客户端失败");
    client
        .login(&config.username, &config.password)
        .await
        .expect("登录失败");
    assert!(client.is_authenticated().await, "登录后应该持有访问令牌");

    let permissions = client.get_user_permissions().await.expect("获取权限失败");
    println!("权限: {:?}", permissions);
}

#[tokio::test]
#[ignore]
async fn test_batch_process_single_book() {
    logging::init(true);

    let config = Config::from_env();
    let client = Arc::new(ApiClient::new(&config).expect("创建客户端失败"));
    client
        .login(&config.username, &config.password)
        .await
        .expect("登录失败");

    // 注意：请根据实际情况修改任务文件中的 book_id
    let job = source_library_batch::models::load_job_from_toml(std::path::Path::new(
        &config.job_file,
    ))
    .await
    .expect("加载任务文件失败");

    let library = LibraryService::new(client.clone());
    let details = library.book_details(&job.book_id).await.expect("获取书籍详情失败");
    let selected_ids = library.resolve_selection(&details.pages, job.pages.as_deref());
    let settings = job.settings(&config);

    let flow = Arc::new(PageFlow::new(client));
    let processor = BatchProcessor::new(flow, config.max_parallel_ocr);

    let outcome = processor
        .run(&details.pages, &selected_ids, &settings)
        .await
        .expect("批处理失败");

    match outcome {
        source_library_batch::models::BatchOutcome::Completed(results) => {
            println!(
                "完成 {}/{}，错误 {}",
                results.completed_pages, results.total_pages, results.error_pages
            );
            assert_eq!(
                results.completed_pages + results.error_pages,
                results.total_pages
            );
        }
        source_library_batch::models::BatchOutcome::Cancelled => {
            panic!("批处理不应被取消");
        }
    }
}
