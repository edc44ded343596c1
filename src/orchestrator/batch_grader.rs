//! 批量批改编排器 - 编排层
//!
//! ## 职责
//!
//! 管理一次批量批改运行的完整生命周期。
//!
//! ## 核心功能
//!
//! 1. **并发派发**：每道题一个独立请求，用 Semaphore 限制并发数量
//! 2. **进度聚合**：每道题落定后原位更新对应条目，并广播全量快照
//! 3. **取消闸门**：运行被取消后，迟到的结果被静默丢弃
//! 4. **完成信号**：所有请求落定且运行未被取消时，恰好发出一次
//! 5. **结果镜像**：每次快照按条目标识并入结果存储
//!
//! 各题的完成顺序不作任何保证；订阅者每次拿到的都是完整的当前状态，
//! 不是增量，因此消费慢也不会看到残缺的列表。

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::clients::QuestionGrader;
use crate::config::Config;
use crate::models::question::{QuestionEntry, QuestionResult};
use crate::orchestrator::registry::{RequestRegistry, RunEvent, RunId};
use crate::orchestrator::extract_error_message;
use crate::services::ResultStore;

/// 一次批量批改运行：运行标识 + 事件接收端
pub struct BatchRun {
    pub run_id: RunId,
    pub events: UnboundedReceiver<RunEvent<QuestionResult>>,
}

/// 批量批改编排器
pub struct BatchGrader {
    grader: Arc<dyn QuestionGrader>,
    store: Arc<ResultStore>,
    registry: Arc<RequestRegistry<QuestionResult>>,
    max_concurrent: usize,
}

impl BatchGrader {
    /// 创建新的批量批改编排器
    pub fn new(grader: Arc<dyn QuestionGrader>, store: Arc<ResultStore>, config: &Config) -> Self {
        Self {
            grader,
            store,
            registry: Arc::new(RequestRegistry::new()),
            max_concurrent: config.max_concurrent_gradings,
        }
    }

    /// 发起一次批量批改
    ///
    /// 空列表不创建运行，返回 None。
    /// 返回前会先广播一次全部为加载中的初始快照，
    /// 订阅者一定先看到加载状态，再看到任何单题结果。
    pub fn start_batch(&self, entries: Vec<QuestionEntry>) -> Option<BatchRun> {
        if entries.is_empty() {
            warn!("⚠️ 题目列表为空，不创建批改运行");
            return None;
        }

        let run_id = RunId::new_v4();
        let total = entries.len();
        info!(
            "📦 发起批量批改: {} 道题目 (并发上限 {})",
            total, self.max_concurrent
        );

        let initial: Vec<QuestionResult> = entries.iter().map(QuestionResult::loading).collect();
        let events = self.registry.register(run_id, initial);

        // 初始快照：所有条目均为加载中
        if let Some(snapshot) = self.registry.publish_update(run_id, |_| {}) {
            self.store.merge_results(&snapshot);
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(total);

        for (index, entry) in entries.into_iter().enumerate() {
            let grader = Arc::clone(&self.grader);
            let registry = Arc::clone(&self.registry);
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                // 运行已被取消则不再发起请求
                if !registry.is_active(run_id) {
                    return;
                }

                let outcome = grader.grade(&entry.question).await;

                // 应用更新前由注册表确认运行仍然活跃；已取消则静默丢弃
                let published = registry.publish_update(run_id, |results| match outcome {
                    Ok(response) => results[index].settle_ok(response),
                    Err(e) => results[index].settle_err(extract_error_message(&e)),
                });

                match published {
                    Some(snapshot) => store.merge_results(&snapshot),
                    None => debug!("运行 {} 已取消，丢弃第 {} 题的结果", run_id, index + 1),
                }
            }));
        }

        // 所有请求落定后结束运行（运行仍活跃时恰好发出一次完成信号）
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            join_all(handles).await;
            if registry.complete(run_id) {
                info!("✅ 批量批改完成: {} 道题目", total);
            }
        });

        Some(BatchRun { run_id, events })
    }

    /// 为正在进行的运行追加一个订阅者
    pub fn subscribe(&self, run_id: RunId) -> Option<UnboundedReceiver<RunEvent<QuestionResult>>> {
        self.registry.subscribe(run_id)
    }

    /// 取消批改运行（未指定句柄时取消最近发起的运行）
    ///
    /// 已发出的网络请求不会被中断，其结果到达后被丢弃
    pub fn cancel(&self, run_id: Option<RunId>) {
        if self.registry.cancel(run_id) {
            info!("批改运行已取消");
        }
    }

    /// 是否有正在进行的批改运行
    pub fn is_processing(&self) -> bool {
        self.registry.is_processing()
    }
}
