//! 导入题目校验规则
//!
//! 不满足要求的题目在导入阶段被过滤掉，并附带具体原因

use thiserror::Error;

use crate::models::question::Question;

/// 选项内容中不允许出现的片段
const FORBIDDEN_ANSWER_FRAGMENTS: [&str; 4] = ["x-ck12-mathEditor", "x-ck12-mathjax", "{", "}"];

/// 题干内容中不允许出现的片段
const FORBIDDEN_QUESTION_FRAGMENTS: [&str; 4] = ["@@@", "{", "}", "}@$"];

/// 校验失败原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 选项数量不是 4
    #[error("题目必须恰好有 4 个选项")]
    WrongAnswerCount,
    /// 正确选项数量不是 1
    #[error("题目必须恰好有一个正确选项")]
    NotExactlyOneCorrect,
    /// 选项内容包含非法片段
    #[error("选项内容包含非法片段 \"{0}\"")]
    ForbiddenAnswerFragment(&'static str),
    /// 题干内容包含非法片段
    #[error("题干内容包含非法片段 \"{0}\"")]
    ForbiddenQuestionFragment(&'static str),
}

/// 校验单个题目是否满足导入要求
pub fn validate_question(question: &Question) -> Result<(), ValidationError> {
    if question.answers.len() != 4 {
        return Err(ValidationError::WrongAnswerCount);
    }

    let correct_count = question.answers.iter().filter(|a| a.is_correct).count();
    if correct_count != 1 {
        return Err(ValidationError::NotExactlyOneCorrect);
    }

    for fragment in FORBIDDEN_ANSWER_FRAGMENTS {
        if question.answers.iter().any(|a| a.label.contains(fragment)) {
            return Err(ValidationError::ForbiddenAnswerFragment(fragment));
        }
    }

    for fragment in FORBIDDEN_QUESTION_FRAGMENTS {
        if question.question.contains(fragment) {
            return Err(ValidationError::ForbiddenQuestionFragment(fragment));
        }
    }

    Ok(())
}
