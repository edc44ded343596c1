//! 题目导入服务
//!
//! 解析 JSON 题目列表，过滤不符合要求的题目（附带原因），
//! 并把合格题目在后台提交到题库。入库失败不阻塞批改流程。

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::GradingClient;
use crate::error::AppResult;
use crate::models::question::Question;
use crate::models::validation::{validate_question, ValidationError};

/// 被过滤掉的题目及原因
#[derive(Debug, Clone)]
pub struct FilteredQuestion {
    pub question: Question,
    pub reason: ValidationError,
}

/// 导入结果：合格题目 + 被过滤题目
#[derive(Debug)]
pub struct ImportOutcome {
    pub valid: Vec<Question>,
    pub filtered: Vec<FilteredQuestion>,
}

/// 题目导入服务
pub struct ImportService {
    client: Arc<GradingClient>,
}

impl ImportService {
    /// 创建新的导入服务
    pub fn new(client: Arc<GradingClient>) -> Self {
        Self { client }
    }

    /// 解析 JSON 字符串为题目列表
    pub fn parse_questions(json: &str) -> AppResult<Vec<Question>> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Ok(questions)
    }

    /// 校验并拆分题目列表
    pub fn split_valid(questions: Vec<Question>) -> ImportOutcome {
        let mut valid = Vec::new();
        let mut filtered = Vec::new();

        for question in questions {
            match validate_question(&question) {
                Ok(()) => valid.push(question),
                Err(reason) => {
                    warn!(
                        "⚠️ 题目被过滤: {} (原因: {})",
                        question.stem_preview(),
                        reason
                    );
                    filtered.push(FilteredQuestion { question, reason });
                }
            }
        }

        ImportOutcome { valid, filtered }
    }

    /// 导入一份 JSON 题目列表
    ///
    /// 合格题目会在后台提交到题库；提交失败只记日志
    pub fn import(&self, json: &str) -> AppResult<ImportOutcome> {
        let questions = Self::parse_questions(json)?;
        let outcome = Self::split_valid(questions);

        info!(
            "✓ 导入解析完成: 合格 {} 道, 过滤 {} 道",
            outcome.valid.len(),
            outcome.filtered.len()
        );

        self.submit_in_background(outcome.valid.clone());
        Ok(outcome)
    }

    /// 在后台提交题目到题库（不等待结果）
    pub fn submit_in_background(&self, questions: Vec<Question>) {
        if questions.is_empty() {
            return;
        }

        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            if let Err(e) = client.add_questions(&questions).await {
                warn!("⚠️ 题目入库失败（不影响批改）: {}", e);
            }
        });
    }
}
