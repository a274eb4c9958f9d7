//! Source Library API 客户端
//!
//! 封装所有与远端后端的交互。唯一持有 `reqwest::Client` 的模块：
//! 所有请求自动携带 X-Tenant-Slug 请求头和（登录后的）Bearer 令牌，
//! 收到 401 时刷新一次令牌并重试，仍失败才向上传播。
//! 刷新令牌保存在 HttpOnly Cookie 中，由 reqwest 的 cookie store 自动管理。

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{
    Book, BookDetails, Category, CategoryForm, EditRequest, EditRequestUpdate, FeaturedPage,
    NextPageNumber, Page, TenantBrandingConfig, TenantCreate, TenantSettings, TenantSummary,
    TenantUpdate, TokenResponse, UserCreate, UserPermissions, UserSummary, UserUpdate,
};

/// OCR 请求参数
#[derive(Debug, Clone)]
pub struct OcrRunParams {
    pub page_id: String,
    pub photo_url: String,
    pub language: String,
    pub ai_model: String,
    pub custom_prompt: Option<String>,
    /// 让后端直接保存结果到页面记录
    pub auto_save: bool,
}

/// 翻译请求参数
#[derive(Debug, Clone)]
pub struct TranslationRunParams {
    pub page_id: String,
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub ai_model: String,
    pub custom_prompt: Option<String>,
    pub auto_save: bool,
}

/// OCR 接口返回
#[derive(Debug, Clone, Deserialize)]
pub struct OcrResponse {
    pub ocr: String,
}

/// 翻译接口返回
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationResponse {
    pub translation: String,
}

/// 请求体
#[derive(Debug, Clone)]
enum Payload {
    None,
    Json(Value),
    Form(Vec<(&'static str, String)>),
}

/// Source Library API 客户端
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: RwLock<Option<String>>,
}

impl ApiClient {
    /// 创建新的 API 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        let slug = HeaderValue::from_str(&config.tenant_slug)
            .map_err(|e| AppError::Other(format!("租户标识不是合法的请求头值: {}", e)))?;
        headers.insert("X-Tenant-Slug", slug);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::Other(format!("无法构建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            access_token: RwLock::new(None),
        })
    }

    /// 当前是否已持有访问令牌
    pub async fn is_authenticated(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    // ========== 请求基础设施 ==========

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_request(
        &self,
        method: &Method,
        path: &str,
        payload: &Payload,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method.clone(), self.url(path));

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        match payload {
            Payload::None => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Form(fields) => builder.form(fields),
        }
    }

    /// 发送请求并处理 401 刷新重试
    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> AppResult<reqwest::Response> {
        let token = self.access_token.read().await.clone();
        let response = self
            .build_request(&method, path, &payload, token.as_deref())
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // 401：刷新一次令牌后重试原始请求，与前端拦截器保持一致
        debug!("收到 401 ({}), 尝试刷新令牌后重试", path);
        if self.refresh_token().await.is_err() {
            return Err(AppError::Api(ApiError::Unauthorized {
                endpoint: path.to_string(),
            }));
        }

        let token = self.access_token.read().await.clone();
        let retried = self
            .build_request(&method, path, &payload, token.as_deref())
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        if retried.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::Api(ApiError::Unauthorized {
                endpoint: path.to_string(),
            }));
        }

        Ok(retried)
    }

    /// 统一的响应处理：非 2xx 时取出后端的 detail 信息
    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();

        if !status.is_success() {
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str().map(String::from)))
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("API 错误 ({}): HTTP {}: {}", path, status.as_u16(), detail);
            return Err(AppError::Api(ApiError::BadResponse {
                endpoint: path.to_string(),
                status: status.as_u16(),
                detail,
            }));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> AppResult<T> {
        let response = self.execute(method, path, payload).await?;
        self.handle_response(path, response).await
    }

    /// 不关心响应体的请求（删除等）
    async fn request_unit(&self, method: Method, path: &str, payload: Payload) -> AppResult<()> {
        let response = self.execute(method, path, payload).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str().map(String::from)))
            .unwrap_or_else(|| "Unknown error".to_string());
        Err(AppError::Api(ApiError::BadResponse {
            endpoint: path.to_string(),
            status: status.as_u16(),
            detail,
        }))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.request(Method::GET, path, Payload::None).await
    }

    // ========== 认证 ==========

    /// 用户登录；成功后保存访问令牌（刷新令牌在 Cookie 中）
    pub async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let fields = vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
        ];
        let token: TokenResponse = self
            .request(Method::POST, "/auth/login", Payload::Form(fields))
            .await?;
        *self.access_token.write().await = Some(token.access_token);
        Ok(())
    }

    /// 登出并清除本地令牌
    pub async fn logout(&self) -> AppResult<()> {
        self.request_unit(Method::POST, "/auth/logout", Payload::None)
            .await?;
        *self.access_token.write().await = None;
        Ok(())
    }

    /// 刷新访问令牌（依赖 Cookie 中的刷新令牌）
    pub async fn refresh_token(&self) -> AppResult<()> {
        // 不走 execute，避免刷新失败时再次触发刷新
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .send()
            .await
            .map_err(|e| AppError::api_request_failed("/auth/refresh", e))?;
        let token: TokenResponse = self.handle_response("/auth/refresh", response).await?;
        *self.access_token.write().await = Some(token.access_token);
        Ok(())
    }

    /// 当前用户的资源权限
    pub async fn get_user_permissions(&self) -> AppResult<UserPermissions> {
        self.get("/permissions/me").await
    }

    // ========== 书籍操作 ==========

    pub async fn get_all_books(&self) -> AppResult<Vec<Book>> {
        self.get("/book/").await
    }

    pub async fn get_book(&self, book_id: &str) -> AppResult<Book> {
        self.get(&format!("/book/{}", book_id)).await
    }

    pub async fn get_book_details(&self, book_id: &str) -> AppResult<BookDetails> {
        self.get(&format!("/book/details/{}", book_id)).await
    }

    pub async fn create_book(&self, form: &crate::models::BookForm) -> AppResult<Book> {
        let fields = vec![
            ("title", form.title.clone()),
            ("author", form.author.clone()),
            ("language", form.language.clone()),
            ("published", form.published.clone()),
        ];
        self.request(Method::POST, "/book/", Payload::Form(fields))
            .await
    }

    pub async fn update_book(
        &self,
        book_id: &str,
        form: &crate::models::BookForm,
    ) -> AppResult<Book> {
        let fields = vec![
            ("title", form.title.clone()),
            ("author", form.author.clone()),
            ("language", form.language.clone()),
            ("published", form.published.clone()),
        ];
        self.request(
            Method::PUT,
            &format!("/book/{}", book_id),
            Payload::Form(fields),
        )
        .await
    }

    /// 删除整本书（需要口令哈希做二次确认）
    pub async fn delete_book(&self, book_id: &str, password_hash: &str) -> AppResult<()> {
        self.request_unit(
            Method::DELETE,
            &format!("/book/{}", book_id),
            Payload::Json(serde_json::json!({ "password": password_hash })),
        )
        .await
    }

    pub async fn get_next_page_number(&self, book_id: &str) -> AppResult<NextPageNumber> {
        self.get(&format!("/book/{}/next-page-number", book_id)).await
    }

    // ========== 页面操作 ==========

    pub async fn get_page(&self, page_id: &str) -> AppResult<Page> {
        self.get(&format!("/page/{}", page_id)).await
    }

    pub async fn create_page(&self, form: &crate::models::PageForm) -> AppResult<Page> {
        let fields = vec![
            ("book_id", form.book_id.clone()),
            ("page_number", form.page_number.to_string()),
            ("photo", form.photo.clone()),
        ];
        self.request(Method::POST, "/page/", Payload::Form(fields))
            .await
    }

    pub async fn update_page(&self, page_id: &str, form: &crate::models::PageForm) -> AppResult<Page> {
        let fields = vec![
            ("book_id", form.book_id.clone()),
            ("page_number", form.page_number.to_string()),
            ("photo", form.photo.clone()),
        ];
        self.request(
            Method::PUT,
            &format!("/page/{}", page_id),
            Payload::Form(fields),
        )
        .await
    }

    pub async fn delete_page(&self, page_id: &str) -> AppResult<()> {
        self.request_unit(Method::DELETE, &format!("/page/{}", page_id), Payload::None)
            .await
    }

    /// 图片代理地址（PDF 生成用）
    pub fn image_proxy_url(&self, image_url: &str) -> String {
        format!(
            "{}/pdf-create/?url={}",
            self.base_url,
            urlencoding::encode(image_url)
        )
    }

    // ========== OCR / 翻译 ==========

    /// 为单页执行 OCR
    pub async fn perform_ocr(&self, params: &OcrRunParams) -> AppResult<OcrResponse> {
        let mut fields = vec![
            ("page_id", params.page_id.clone()),
            ("photo_url", params.photo_url.clone()),
            ("language", params.language.clone()),
            ("ai_model", params.ai_model.clone()),
            ("auto_save", params.auto_save.to_string()),
        ];
        if let Some(prompt) = params.custom_prompt.as_ref().filter(|p| !p.is_empty()) {
            fields.push(("custom_prompt", prompt.clone()));
        }
        self.request(Method::POST, "/ocr/", Payload::Form(fields))
            .await
    }

    /// 为单页执行翻译
    pub async fn perform_translation(
        &self,
        params: &TranslationRunParams,
    ) -> AppResult<TranslationResponse> {
        let mut fields = vec![
            ("page_id", params.page_id.clone()),
            ("text", params.text.clone()),
            ("source_lang", params.source_lang.clone()),
            ("target_lang", params.target_lang.clone()),
            ("ai_model", params.ai_model.clone()),
            ("auto_save", params.auto_save.to_string()),
        ];
        if let Some(prompt) = params.custom_prompt.as_ref().filter(|p| !p.is_empty()) {
            fields.push(("custom_prompt", prompt.clone()));
        }
        self.request(Method::POST, "/translate/", Payload::Form(fields))
            .await
    }

    // ========== 租户操作 ==========

    /// 校验当前租户标识并获取品牌配置
    pub async fn validate_tenant(&self) -> AppResult<TenantBrandingConfig> {
        self.get("/tenant/validate").await
    }

    pub async fn get_all_tenants(&self) -> AppResult<Vec<TenantSummary>> {
        self.get("/tenant/").await
    }

    pub async fn get_tenant_info(&self, tenant_id: &str) -> AppResult<crate::models::Tenant> {
        self.get(&format!("/tenant/{}", tenant_id)).await
    }

    pub async fn create_tenant(&self, tenant: &TenantCreate) -> AppResult<crate::models::Tenant> {
        self.request(
            Method::POST,
            "/tenant/",
            Payload::Json(serde_json::to_value(tenant)?),
        )
        .await
    }

    /// 删除租户，后端会核对租户名称防止误删
    pub async fn delete_tenant(&self, tenant_id: &str, tenant_name: &str) -> AppResult<String> {
        self.request(
            Method::DELETE,
            &format!(
                "/tenant/{}?expected_tenant_name={}",
                tenant_id,
                urlencoding::encode(tenant_name)
            ),
            Payload::None,
        )
        .await
    }

    pub async fn update_tenant(
        &self,
        tenant_id: &str,
        update: &TenantUpdate,
    ) -> AppResult<crate::models::Tenant> {
        self.request(
            Method::PATCH,
            &format!("/tenant/{}", tenant_id),
            Payload::Json(serde_json::to_value(update)?),
        )
        .await
    }

    pub async fn get_tenant_settings(&self) -> AppResult<TenantSettings> {
        self.get("/tenant/settings").await
    }

    pub async fn update_tenant_settings(
        &self,
        settings: &TenantSettings,
    ) -> AppResult<TenantSettings> {
        self.request(
            Method::PATCH,
            "/tenant/settings",
            Payload::Json(serde_json::to_value(settings)?),
        )
        .await
    }

    // ========== 分类操作 ==========

    pub async fn get_all_categories(&self) -> AppResult<Vec<Category>> {
        self.get("/category/").await
    }

    pub async fn create_category(&self, form: &CategoryForm) -> AppResult<Category> {
        self.request(
            Method::POST,
            "/category/",
            Payload::Json(serde_json::to_value(form)?),
        )
        .await
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        form: &CategoryForm,
    ) -> AppResult<Category> {
        self.request(
            Method::PUT,
            &format!("/category/{}", category_id),
            Payload::Json(serde_json::to_value(form)?),
        )
        .await
    }

    pub async fn delete_category(&self, category_id: &str) -> AppResult<()> {
        self.request_unit(
            Method::DELETE,
            &format!("/category/{}", category_id),
            Payload::None,
        )
        .await
    }

    pub async fn assign_category_to_book(
        &self,
        book_id: &str,
        category_id: &str,
    ) -> AppResult<()> {
        self.request_unit(
            Method::POST,
            &format!("/category/assign/{}/{}", book_id, category_id),
            Payload::None,
        )
        .await
    }

    pub async fn unassign_category_from_book(
        &self,
        book_id: &str,
        category_id: &str,
    ) -> AppResult<()> {
        self.request_unit(
            Method::POST,
            &format!("/category/unassign/{}/{}", book_id, category_id),
            Payload::None,
        )
        .await
    }

    // ========== 编辑请求操作 ==========

    pub async fn get_all_edit_requests(&self) -> AppResult<Vec<EditRequest>> {
        self.get("/requests/").await
    }

    pub async fn create_edit_request(&self, request: &EditRequest) -> AppResult<EditRequest> {
        self.request(
            Method::POST,
            "/requests/",
            Payload::Json(serde_json::to_value(request)?),
        )
        .await
    }

    pub async fn update_edit_request(
        &self,
        request_id: &str,
        update: &EditRequestUpdate,
    ) -> AppResult<EditRequest> {
        self.request(
            Method::PUT,
            &format!("/requests/{}", request_id),
            Payload::Json(serde_json::to_value(update)?),
        )
        .await
    }

    /// 管理员批准后把新文本写回页面
    pub async fn update_page_by_request(
        &self,
        page_id: &str,
        request_type: crate::models::RequestType,
        new_text: &str,
    ) -> AppResult<Value> {
        self.request(
            Method::PUT,
            &format!("/page/request/{}", page_id),
            Payload::Json(serde_json::json!({
                "requestType": request_type,
                "newText": new_text,
            })),
        )
        .await
    }

    // ========== 发现页操作 ==========

    pub async fn get_random_pages(&self, page_count: usize) -> AppResult<Vec<FeaturedPage>> {
        self.get(&format!("/discover/random-pages?count={}", page_count))
            .await
    }

    pub async fn get_topic_content(&self, topic: &str) -> AppResult<Value> {
        self.get(&format!("/discover/topic/{}", urlencoding::encode(topic)))
            .await
    }

    pub async fn search_books(&self, query: &str) -> AppResult<Value> {
        self.get(&format!("/discover/search?q={}", urlencoding::encode(query)))
            .await
    }

    // ========== 用户操作 ==========

    pub async fn register_user(&self, user: &UserCreate) -> AppResult<UserSummary> {
        self.request(
            Method::POST,
            "/auth/register",
            Payload::Json(serde_json::to_value(user)?),
        )
        .await
    }

    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> AppResult<Value> {
        self.request(
            Method::PATCH,
            &format!("/user/{}", user_id),
            Payload::Json(serde_json::to_value(update)?),
        )
        .await
    }

    pub async fn delete_user(&self, user_id: &str) -> AppResult<String> {
        self.request(Method::DELETE, &format!("/user/{}", user_id), Payload::None)
            .await
    }

    pub async fn get_all_users(&self) -> AppResult<Vec<UserSummary>> {
        self.get("/user/all").await
    }
}
