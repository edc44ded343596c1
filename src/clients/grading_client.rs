/// 批改 API 客户端
///
/// 封装所有与批改 API 相关的调用逻辑
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::generate::{GenerateRequest, GenerateResponse};
use crate::models::question::{Answer, GradeResponse, Question, QuestionResult};

/// 批改能力抽象
///
/// 编排层只依赖该 trait，便于在测试中替换为本地实现。
/// 两个接口行为等价，compact 接口仅用于对比计时。
#[async_trait]
pub trait QuestionGrader: Send + Sync {
    /// 调用标准批改接口
    async fn grade(&self, question: &Question) -> Result<GradeResponse, ApiError>;

    /// 调用 compact 批改接口
    async fn grade_compact(&self, question: &Question) -> Result<GradeResponse, ApiError>;
}

/// 批改 API 客户端
///
/// 无内部重试、无内部超时：失败原样返回，由调用方决定重试策略
pub struct GradingClient {
    http: reqwest::Client,
    base_url: String,
}

impl GradingClient {
    /// 创建新的批改客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    /// 调用批改接口并解析评分卡
    async fn post_grade(
        &self,
        endpoint: &str,
        question: &Question,
    ) -> Result<GradeResponse, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("正在调用批改接口: {}", url);

        let response = self
            .http
            .post(&url)
            .json(question)
            .send()
            .await
            .map_err(|e| {
                warn!("批改接口调用失败 ({}): {}", endpoint, e);
                ApiError::RequestFailed {
                    endpoint: endpoint.to_string(),
                    source: e,
                }
            })?;

        if !response.status().is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: response.status(),
            });
        }

        let grade: GradeResponse =
            response
                .json()
                .await
                .map_err(|e| ApiError::ResponseParseFailed {
                    endpoint: endpoint.to_string(),
                    source: e,
                })?;

        debug!(
            "批改接口调用成功 ({}): overall_pass = {}",
            endpoint, grade.scorecard.overall_pass
        );

        Ok(grade)
    }

    /// 批量添加题目到题库
    ///
    /// 导入侧使用；响应内容不影响批改流程，只确认状态码
    pub async fn add_questions(&self, questions: &[Question]) -> Result<(), ApiError> {
        let endpoint = "questions/add";
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("正在提交 {} 道题目到题库", questions.len());

        let response = self
            .http
            .post(&url)
            .json(questions)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: response.status(),
            });
        }

        Ok(())
    }

    /// 拉取已有题目及其批改历史
    ///
    /// 每道题取最近一次批改记录作为当前结果；
    /// 没有批改记录的题目返回未批改状态（非加载中）
    pub async fn list_questions(&self) -> Result<Vec<QuestionResult>, ApiError> {
        let endpoint = "questions/list";
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("正在拉取题目列表: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: response.status(),
            });
        }

        let body: ListResponse =
            response
                .json()
                .await
                .map_err(|e| ApiError::ResponseParseFailed {
                    endpoint: endpoint.to_string(),
                    source: e,
                })?;

        if !body.success {
            return Err(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                message: body.message,
            });
        }

        let results = body
            .data
            .into_iter()
            .map(ListedQuestion::into_result)
            .collect();

        Ok(results)
    }

    /// 按课标与描述生成题目
    pub async fn generate_questions(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ApiError> {
        let endpoint = "questions/generate";
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("正在生成题目: 课标 {}, 数量 {}", request.standard, request.count);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: response.status(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ResponseParseFailed {
                endpoint: endpoint.to_string(),
                source: e,
            })
    }
}

#[async_trait]
impl QuestionGrader for GradingClient {
    async fn grade(&self, question: &Question) -> Result<GradeResponse, ApiError> {
        self.post_grade("questions/grade", question).await
    }

    async fn grade_compact(&self, question: &Question) -> Result<GradeResponse, ApiError> {
        self.post_grade("questions/grade/compact", question).await
    }
}

// ========== 列表接口的响应结构 ==========

/// 列表接口的响应包
#[derive(Debug, Deserialize)]
struct ListResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Vec<ListedQuestion>,
}

/// 列表接口返回的题目（带批改历史）
#[derive(Debug, Deserialize)]
struct ListedQuestion {
    standard: String,
    statement: String,
    #[serde(rename = "sourceId")]
    source_id: Option<i64>,
    question: String,
    answers: Vec<Answer>,
    difficulty: i64,
    #[serde(rename = "referenceText")]
    reference_text: Option<String>,
    #[serde(default)]
    gradings: Vec<ListedGrading>,
}

/// 一条批改历史记录
#[derive(Debug, Deserialize)]
struct ListedGrading {
    graded_at: String,
    api_response: GradeResponse,
}

impl ListedQuestion {
    /// 转换为结果条目，取最近一次批改记录
    fn into_result(self) -> QuestionResult {
        let question = Question {
            standard: self.standard,
            statement: self.statement,
            source_id: self.source_id.unwrap_or(0),
            question: self.question,
            answers: self.answers,
            difficulty: self.difficulty,
            reference_text: self.reference_text.unwrap_or_default(),
        };

        // 按批改时间取最近一条；时间无法解析的记录排在最后
        let latest = self
            .gradings
            .into_iter()
            .max_by_key(|g| chrono::DateTime::parse_from_rfc3339(&g.graded_at).ok());

        QuestionResult {
            entry_id: Uuid::new_v4(),
            question,
            response: latest.map(|g| g.api_response),
            error: None,
            is_loading: false,
        }
    }
}
