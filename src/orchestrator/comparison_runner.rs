//! 接口对比编排器 - 编排层
//!
//! ## 职责
//!
//! 对同一批题目依次调用标准接口与 compact 接口，测量两者的响应耗时。
//!
//! ## 串行约定
//!
//! 与批量批改不同，这里逐题严格串行：第 i 题的两次调用都落定之前，
//! 第 i+1 题不会发起任何请求。耗时对比只有在请求互不抢占时才有意义，
//! 这里用吞吐换测量有效性。
//!
//! 取消在每次调用前检查：运行被取消后剩余题目不再发起，
//! 已发出请求的迟到结果被静默丢弃，完成信号不再发出。

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::clients::QuestionGrader;
use crate::config::Config;
use crate::models::question::{ComparisonResult, QuestionEntry};
use crate::orchestrator::registry::{RequestRegistry, RunEvent, RunId};
use crate::orchestrator::extract_error_message;

/// 一次接口对比运行：运行标识 + 事件接收端
pub struct ComparisonRun {
    pub run_id: RunId,
    pub events: UnboundedReceiver<RunEvent<ComparisonResult>>,
}

/// 接口对比编排器
pub struct ComparisonRunner {
    grader: Arc<dyn QuestionGrader>,
    registry: Arc<RequestRegistry<ComparisonResult>>,
    question_limit: usize,
}

impl ComparisonRunner {
    /// 创建新的接口对比编排器
    pub fn new(grader: Arc<dyn QuestionGrader>, config: &Config) -> Self {
        Self {
            grader,
            registry: Arc::new(RequestRegistry::new()),
            question_limit: config.comparison_question_limit,
        }
    }

    /// 发起一次接口对比
    ///
    /// 超出数量上限的题目被截掉（控制 API 调用成本）；
    /// 空列表不创建运行，返回 None。
    pub fn start_comparison(&self, mut entries: Vec<QuestionEntry>) -> Option<ComparisonRun> {
        if entries.len() > self.question_limit {
            info!(
                "💡 对比模式单次最多处理 {} 道题目，已截取前 {} 道（共 {} 道）",
                self.question_limit,
                self.question_limit,
                entries.len()
            );
            entries.truncate(self.question_limit);
        }

        if entries.is_empty() {
            warn!("⚠️ 题目列表为空，不创建对比运行");
            return None;
        }

        let run_id = RunId::new_v4();
        info!("📦 发起接口对比: {} 道题目（逐题串行）", entries.len());

        let initial: Vec<ComparisonResult> =
            entries.iter().map(ComparisonResult::loading).collect();
        let events = self.registry.register(run_id, initial);

        // 初始快照：所有条目两个接口均为加载中
        self.registry.publish_update(run_id, |_| {});

        let grader = Arc::clone(&self.grader);
        let registry = Arc::clone(&self.registry);

        tokio::spawn(async move {
            for (index, entry) in entries.iter().enumerate() {
                // 每次调用前检查取消；取消后剩余题目不再发起
                if !registry.is_active(run_id) {
                    return;
                }

                // 标准接口（计时）
                let started = Instant::now();
                let outcome = grader.grade(&entry.question).await;
                let elapsed_ms = started.elapsed().as_millis();

                let published = registry.publish_update(run_id, |results| match outcome {
                    Ok(response) => results[index].settle_standard_ok(response, elapsed_ms),
                    Err(e) => results[index].settle_standard_err(extract_error_message(&e)),
                });
                if published.is_none() {
                    return;
                }

                if !registry.is_active(run_id) {
                    return;
                }

                // compact 接口（计时）——标准接口失败也照常对比
                let started = Instant::now();
                let outcome = grader.grade_compact(&entry.question).await;
                let elapsed_ms = started.elapsed().as_millis();

                let published = registry.publish_update(run_id, |results| match outcome {
                    Ok(response) => results[index].settle_compact_ok(response, elapsed_ms),
                    Err(e) => results[index].settle_compact_err(extract_error_message(&e)),
                });
                if published.is_none() {
                    return;
                }
            }

            if registry.complete(run_id) {
                info!("✅ 接口对比完成");
            }
        });

        Some(ComparisonRun { run_id, events })
    }

    /// 为正在进行的运行追加一个订阅者
    pub fn subscribe(
        &self,
        run_id: RunId,
    ) -> Option<UnboundedReceiver<RunEvent<ComparisonResult>>> {
        self.registry.subscribe(run_id)
    }

    /// 取消对比运行（未指定句柄时取消最近发起的运行）
    pub fn cancel(&self, run_id: Option<RunId>) {
        if self.registry.cancel(run_id) {
            info!("对比运行已取消");
        }
    }

    /// 是否有正在进行的对比运行
    pub fn is_processing(&self) -> bool {
        self.registry.is_processing()
    }
}
