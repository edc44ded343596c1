//! 题目生成接口的数据结构

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// 题目生成请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub standard: String,
    pub query: String,
    pub count: u32,
}

/// 题目生成响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub status: String,
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
