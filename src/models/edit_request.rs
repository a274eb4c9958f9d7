//! 编辑请求数据模型
//!
//! 普通用户对 OCR/翻译文本提出的修改建议，等待管理员审批。
//! 生命周期完全由后端管理，本客户端只负责创建和查询。

use serde::{Deserialize, Serialize};

/// 请求针对的文本类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Ocr,
    Translation,
}

/// 审批状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// 编辑请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub book_id: String,
    pub page_id: String,
    pub username: String,
    #[serde(rename = "oldText")]
    pub old_text: String,
    #[serde(rename = "newText")]
    pub new_text: String,
    #[serde(rename = "requestType")]
    pub request_type: RequestType,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

/// 管理员审批时的更新内容
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(rename = "newText", skip_serializing_if = "Option::is_none")]
    pub new_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_request_round_trips_camel_case_fields() {
        let json = r#"{
            "book_id": "b-1", "page_id": "p-1", "username": "scribe",
            "oldText": "teh", "newText": "the",
            "requestType": "ocr", "status": "pending"
        }"#;
        let request: EditRequest = serde_json::from_str(json).expect("编辑请求 JSON 应该能解析");
        assert_eq!(request.request_type, RequestType::Ocr);
        assert_eq!(request.status, RequestStatus::Pending);

        let out = serde_json::to_value(&request).expect("序列化失败");
        assert_eq!(out["newText"], "the");
        assert_eq!(out["requestType"], "ocr");
    }
}
