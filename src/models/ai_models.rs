//! 可用的 AI 模型表
//!
//! OCR 和翻译本身都由后端委托给外部模型提供方，
//! 这里只维护前端可选的模型标识。

/// 模型标识 + 展示名称
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiModel {
    pub value: &'static str,
    pub label: &'static str,
}

/// 支持 OCR 的模型
pub const OCR_MODELS: &[AiModel] = &[AiModel {
    value: "mistral",
    label: "Mistral",
}];

/// 支持翻译的模型
pub const TRANSLATION_MODELS: &[AiModel] = &[
    AiModel {
        value: "gemini",
        label: "Gemini",
    },
    AiModel {
        value: "mistral",
        label: "Mistral",
    },
];

/// 检查模型标识是否在表中
pub fn is_known_model(table: &[AiModel], value: &str) -> bool {
    table.iter().any(|m| m.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_models_are_known() {
        assert!(is_known_model(OCR_MODELS, "mistral"));
        assert!(is_known_model(TRANSLATION_MODELS, "gemini"));
        assert!(!is_known_model(OCR_MODELS, "gemini"));
    }
}
