use crate::models::ai_models::{is_known_model, OCR_MODELS, TRANSLATION_MODELS};
use crate::models::job::BatchJob;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载批处理任务
///
/// 除了反序列化，还校验 book_id 非空、模型覆盖项在已知模型表中。
pub async fn load_job_from_toml(job_file_path: &Path) -> Result<BatchJob> {
    let content = fs::read_to_string(job_file_path)
        .await
        .with_context(|| format!("无法读取任务文件: {}", job_file_path.display()))?;

    let job: BatchJob = toml::from_str(&content)
        .with_context(|| format!("无法解析任务文件: {}", job_file_path.display()))?;

    if job.book_id.trim().is_empty() {
        anyhow::bail!("任务文件缺少 book_id: {}", job_file_path.display());
    }

    if let Some(model) = job.ocr_model.as_deref() {
        if !is_known_model(OCR_MODELS, model) {
            anyhow::bail!("未知的 OCR 模型: {}", model);
        }
    }
    if let Some(model) = job.translation_model.as_deref() {
        if !is_known_model(TRANSLATION_MODELS, model) {
            anyhow::bail!("未知的翻译模型: {}", model);
        }
    }

    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_minimal_job_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("source_library_batch_job_test.toml");
        tokio::fs::write(&path, "book_id = \"b-1\"\npages = [3, 1]\n")
            .await
            .expect("写入临时任务文件失败");

        let job = load_job_from_toml(&path).await.expect("任务文件应该能加载");
        assert_eq!(job.book_id, "b-1");
        assert_eq!(job.pages, Some(vec![3, 1]));
        assert!(job.process_ocr);
        assert!(job.process_translation);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn rejects_job_without_book_id() {
        let dir = std::env::temp_dir();
        let path = dir.join("source_library_batch_job_empty.toml");
        tokio::fs::write(&path, "book_id = \"\"\n")
            .await
            .expect("写入临时任务文件失败");

        assert!(load_job_from_toml(&path).await.is_err());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn rejects_unknown_model_overrides() {
        let dir = std::env::temp_dir();

        // gemini 只支持翻译，不支持 OCR
        let path = dir.join("source_library_batch_job_bad_model.toml");
        tokio::fs::write(&path, "book_id = \"b-1\"\nocr_model = \"gemini\"\n")
            .await
            .expect("写入临时任务文件失败");
        let err = load_job_from_toml(&path).await.expect_err("未知模型应被拒绝");
        assert!(err.to_string().contains("未知的 OCR 模型"));
        let _ = tokio::fs::remove_file(&path).await;

        let path = dir.join("source_library_batch_job_bad_translation_model.toml");
        tokio::fs::write(&path, "book_id = \"b-1\"\ntranslation_model = \"gpt-4\"\n")
            .await
            .expect("写入临时任务文件失败");
        assert!(load_job_from_toml(&path).await.is_err());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn accepts_known_model_overrides() {
        let dir = std::env::temp_dir();
        let path = dir.join("source_library_batch_job_known_models.toml");
        tokio::fs::write(
            &path,
            "book_id = \"b-1\"\nocr_model = \"mistral\"\ntranslation_model = \"gemini\"\n",
        )
        .await
        .expect("写入临时任务文件失败");

        let job = load_job_from_toml(&path).await.expect("已知模型应被接受");
        assert_eq!(job.ocr_model.as_deref(), Some("mistral"));
        assert_eq!(job.translation_model.as_deref(), Some("gemini"));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
