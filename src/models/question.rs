use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::logging::truncate_text;

/// 答案选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub label: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// 待批改的题目
///
/// 字段名与批改 API 的 JSON 载荷保持一致（camelCase）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub standard: String,
    pub statement: String,
    #[serde(rename = "sourceId")]
    pub source_id: i64,
    pub question: String,
    pub answers: Vec<Answer>,
    pub difficulty: i64,
    #[serde(rename = "referenceText")]
    pub reference_text: String,
}

impl Question {
    /// 题干预览（用于日志显示，最多80个字符）
    pub fn stem_preview(&self) -> String {
        truncate_text(&self.question, 80)
    }
}

/// 评分卡维度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCardDimension {
    pub name: String,
    pub passed: bool,
    pub explanation: String,
}

/// 批改 API 返回的评分卡
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCard {
    pub dimensions: Vec<ScoreCardDimension>,
    pub overall_pass: bool,
}

/// 批改接口的完整响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResponse {
    pub status: String,
    pub scorecard: ScoreCard,
}

/// 带稳定标识的题目条目
///
/// 标识在题目进入列表时分配一次，之后所有结果路由都按标识进行，
/// 不按内容相等性（重复题目是合法输入，内容相等无法区分它们）。
#[derive(Debug, Clone)]
pub struct QuestionEntry {
    pub entry_id: Uuid,
    pub question: Question,
}

impl QuestionEntry {
    /// 为题目分配新的条目标识
    pub fn new(question: Question) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            question,
        }
    }

    /// 批量包装题目列表
    pub fn from_questions(questions: Vec<Question>) -> Vec<QuestionEntry> {
        questions.into_iter().map(QuestionEntry::new).collect()
    }
}

/// 单个题目的批改结果
///
/// 随批改进度原地更新：`is_loading` 为 true 当且仅当
/// `response` 和 `error` 都还未填充；二者不会同时存在。
#[derive(Debug, Clone)]
pub struct QuestionResult {
    pub entry_id: Uuid,
    pub question: Question,
    pub response: Option<GradeResponse>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl QuestionResult {
    /// 初始状态：等待批改
    pub fn loading(entry: &QuestionEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            question: entry.question.clone(),
            response: None,
            error: None,
            is_loading: true,
        }
    }

    /// 批改成功，写入评分卡
    pub fn settle_ok(&mut self, response: GradeResponse) {
        self.response = Some(response);
        self.is_loading = false;
    }

    /// 批改失败，写入错误信息
    pub fn settle_err(&mut self, message: String) {
        self.error = Some(message);
        self.is_loading = false;
    }

    /// 是否已有结果（成功或失败）
    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }

    /// 批改结论（尚未批改或失败时为 None）
    pub fn passed(&self) -> Option<bool> {
        self.response.as_ref().map(|r| r.scorecard.overall_pass)
    }
}

/// 对比模式下单个题目的结果
///
/// 标准接口与 compact 接口各占一组独立的槽位，
/// 每组槽位独立满足 `is_loading`/`response`/`error` 的互斥约束。
/// 耗时只在对应调用成功时记录（毫秒）。
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub entry_id: Uuid,
    pub question: Question,
    pub response: Option<GradeResponse>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub compact_response: Option<GradeResponse>,
    pub compact_error: Option<String>,
    pub is_compact_loading: bool,
    /// 标准接口耗时（毫秒）
    pub standard_response_time_ms: Option<u128>,
    /// compact 接口耗时（毫秒）
    pub compact_response_time_ms: Option<u128>,
}

impl ComparisonResult {
    /// 初始状态：两个接口都等待调用
    pub fn loading(entry: &QuestionEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            question: entry.question.clone(),
            response: None,
            error: None,
            is_loading: true,
            compact_response: None,
            compact_error: None,
            is_compact_loading: true,
            standard_response_time_ms: None,
            compact_response_time_ms: None,
        }
    }

    /// 标准接口调用成功
    pub fn settle_standard_ok(&mut self, response: GradeResponse, elapsed_ms: u128) {
        self.response = Some(response);
        self.standard_response_time_ms = Some(elapsed_ms);
        self.is_loading = false;
    }

    /// 标准接口调用失败
    pub fn settle_standard_err(&mut self, message: String) {
        self.error = Some(message);
        self.is_loading = false;
    }

    /// compact 接口调用成功
    pub fn settle_compact_ok(&mut self, response: GradeResponse, elapsed_ms: u128) {
        self.compact_response = Some(response);
        self.compact_response_time_ms = Some(elapsed_ms);
        self.is_compact_loading = false;
    }

    /// compact 接口调用失败
    pub fn settle_compact_err(&mut self, message: String) {
        self.compact_error = Some(message);
        self.is_compact_loading = false;
    }

    /// 两个接口是否都已有结果
    pub fn is_settled(&self) -> bool {
        !self.is_loading && !self.is_compact_loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            standard: "STD-1".to_string(),
            statement: "statement".to_string(),
            source_id: 7,
            question: "1 + 1 = ?".to_string(),
            answers: vec![
                Answer {
                    label: "2".to_string(),
                    is_correct: true,
                },
                Answer {
                    label: "3".to_string(),
                    is_correct: false,
                },
            ],
            difficulty: 1,
            reference_text: "ref".to_string(),
        }
    }

    #[test]
    fn question_serializes_with_api_field_names() {
        let json = serde_json::to_string(&sample_question()).unwrap();
        assert!(json.contains("\"sourceId\":7"));
        assert!(json.contains("\"isCorrect\":true"));
        assert!(json.contains("\"referenceText\":\"ref\""));
    }

    #[test]
    fn scorecard_uses_snake_case_overall_pass() {
        let json = r#"{
            "status": "ok",
            "scorecard": {
                "dimensions": [{"name": "clarity", "passed": true, "explanation": "clear"}],
                "overall_pass": true
            }
        }"#;
        let response: GradeResponse = serde_json::from_str(json).unwrap();
        assert!(response.scorecard.overall_pass);
        assert_eq!(response.scorecard.dimensions.len(), 1);
    }

    #[test]
    fn entry_ids_distinguish_duplicate_questions() {
        let entries =
            QuestionEntry::from_questions(vec![sample_question(), sample_question()]);
        assert_ne!(entries[0].entry_id, entries[1].entry_id);
    }
}
