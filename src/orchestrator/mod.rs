//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批改运行的派发、进度聚合与取消，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_grader` - 批量批改编排器
//! - 每道题一个并发请求（Semaphore 控制并发上限）
//! - 单题落定即广播全量快照，完成顺序不作保证
//! - 快照按条目标识镜像到结果存储
//!
//! ### `comparison_runner` - 接口对比编排器
//! - 逐题严格串行：标准接口 → compact 接口，各自计时
//! - 耗时对比要求请求互不抢占，串行是正确性要求而非实现细节
//!
//! ### `registry` - 运行注册表
//! - 活跃运行集合 + 每个运行的订阅者列表
//! - 取消/丢弃的判定闸门：检查、更新、广播在同一把锁内完成
//!
//! ## 层次关系
//!
//! ```text
//! app (装配与消费事件)
//!     ↓
//! batch_grader / comparison_runner (派发与聚合)
//!     ↓
//! registry (活跃判定 + 快照广播)
//!     ↓
//! clients::QuestionGrader (单题批改能力)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单题失败是数据不是异常**：失败写入条目的 error 字段，批次照常继续
//! 2. **快照按值发布**：订阅者拿到的列表不会再被修改
//! 3. **取消是逻辑层面的**：不中断已发出的请求，只丢弃迟到的结果

pub mod batch_grader;
pub mod comparison_runner;
pub mod registry;

// 重新导出主要类型
pub use batch_grader::{BatchGrader, BatchRun};
pub use comparison_runner::{ComparisonRun, ComparisonRunner};
pub use registry::{RequestRegistry, RunEvent, RunId};

use crate::error::ApiError;

/// 批改失败且错误信息为空时的兜底文案
pub const GRADE_ERROR_FALLBACK: &str = "API 请求失败";

/// 从 API 错误提取单题错误文案
pub(crate) fn extract_error_message(error: &ApiError) -> String {
    let message = error.to_string();
    if message.is_empty() {
        GRADE_ERROR_FALLBACK.to_string()
    } else {
        message
    }
}
