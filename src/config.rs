/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// Source Library 后端地址
    pub api_base_url: String,
    /// 租户标识（X-Tenant-Slug 请求头）
    pub tenant_slug: String,
    /// 登录用户名（为空则以游客身份运行，只读端点可用）
    pub username: String,
    /// 登录密码
    pub password: String,
    /// 批处理任务文件（TOML）
    pub job_file: String,
    /// OCR 阶段最大并发请求数
    pub max_parallel_ocr: usize,
    /// 默认 OCR 语言
    pub default_ocr_language: String,
    /// 默认翻译目标语言
    pub default_translation_language: String,
    /// 默认 OCR 模型
    pub default_ocr_model: String,
    /// 默认翻译模型
    pub default_translation_model: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            tenant_slug: "root".to_string(),
            username: String::new(),
            password: String::new(),
            job_file: "batch_job.toml".to_string(),
            max_parallel_ocr: 3,
            default_ocr_language: "Latin".to_string(),
            default_translation_language: "English".to_string(),
            default_ocr_model: "mistral".to_string(),
            default_translation_model: "gemini".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            tenant_slug: std::env::var("TENANT_SLUG").unwrap_or(default.tenant_slug),
            username: std::env::var("SL_USERNAME").unwrap_or(default.username),
            password: std::env::var("SL_PASSWORD").unwrap_or(default.password),
            job_file: std::env::var("JOB_FILE").unwrap_or(default.job_file),
            max_parallel_ocr: std::env::var("MAX_PARALLEL_OCR").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_parallel_ocr),
            default_ocr_language: std::env::var("OCR_LANGUAGE").unwrap_or(default.default_ocr_language),
            default_translation_language: std::env::var("TRANSLATION_LANGUAGE").unwrap_or(default.default_translation_language),
            default_ocr_model: std::env::var("OCR_MODEL").unwrap_or(default.default_ocr_model),
            default_translation_model: std::env::var("TRANSLATION_MODEL").unwrap_or(default.default_translation_model),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_three_parallel_ocr_slots() {
        let config = Config::default();
        assert_eq!(config.max_parallel_ocr, 3);
        assert_eq!(config.tenant_slug, "root");
        assert_eq!(config.default_translation_language, "English");
    }
}
