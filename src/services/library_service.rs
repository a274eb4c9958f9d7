//! 书库服务 - 业务能力层
//!
//! 书籍/页面的查询与选区解析能力，供批处理入口使用。

use std::sync::Arc;

use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::AppResult;
use crate::models::{BookDetails, Page};

/// 书库服务
pub struct LibraryService {
    client: Arc<ApiClient>,
}

impl LibraryService {
    /// 创建新的书库服务
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 获取书籍详情（书 + 全部页面）
    pub async fn book_details(&self, book_id: &str) -> AppResult<BookDetails> {
        let details = self.client.get_book_details(book_id).await?;
        info!(
            "✓ 已加载书籍 \"{}\" ({} 页)",
            details.book.title,
            details.pages.len()
        );
        Ok(details)
    }

    /// 把页码选区解析为页面 ID 列表
    ///
    /// 不存在的页码会保留一个合成 ID（`missing:页码`），让批处理
    /// 编排器在调度时将其记录为"Page not found"错误而不是悄悄丢弃。
    pub fn resolve_selection(&self, pages: &[Page], selected_numbers: Option<&[u32]>) -> Vec<String> {
        match selected_numbers {
            None => pages.iter().map(|p| p.id.clone()).collect(),
            Some(numbers) => numbers
                .iter()
                .map(|number| {
                    match pages.iter().find(|p| p.page_number == *number) {
                        Some(page) => page.id.clone(),
                        None => {
                            warn!("⚠️ 书中没有第 {} 页，将记录为错误", number);
                            format!("missing:{}", number)
                        }
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn page(id: &str, number: u32) -> Page {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "book_id": "b-1",
            "page_number": number,
            "photo": "x",
        }))
        .expect("构造测试页面失败")
    }

    #[test]
    fn selection_defaults_to_all_pages() {
        let service = LibraryService::new(Arc::new(
            ApiClient::new(&Config::default()).expect("客户端应该能创建"),
        ));
        let pages = vec![page("p-1", 1), page("p-2", 2)];

        let all = service.resolve_selection(&pages, None);
        assert_eq!(all, vec!["p-1".to_string(), "p-2".to_string()]);
    }

    #[test]
    fn unknown_page_numbers_become_missing_markers() {
        let service = LibraryService::new(Arc::new(
            ApiClient::new(&Config::default()).expect("客户端应该能创建"),
        ));
        let pages = vec![page("p-1", 1)];

        let selected = service.resolve_selection(&pages, Some(&[1, 9]));
        assert_eq!(selected, vec!["p-1".to_string(), "missing:9".to_string()]);
    }
}
