//! # Batch Question Grader
//!
//! 一个批量批改选择题的 Rust 应用程序：导入题目、调用远程批改 API、
//! 汇总评分卡结果，并支持两个批改接口实现的耗时对比
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 题目、评分卡、结果条目等数据结构
//! - `models/validation` - 导入校验规则
//! - `models/loaders` - JSON 题目文件加载
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 批改 API 的 HTTP 封装
//! - `QuestionGrader` - 单题批改能力抽象（标准接口 + compact 接口）
//!
//! ### ③ 能力层（Services）
//! - `services/` - 描述"我能做什么"，不做调度
//! - `ResultStore` - 结果列表的持有与按标识并入
//! - `ImportService` - 导入解析、校验过滤、后台入库
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_grader` - 批量批改，并发派发与进度聚合
//! - `orchestrator/comparison_runner` - 接口对比，逐题严格串行
//! - `orchestrator/registry` - 活跃运行注册表，取消/丢弃的判定闸门
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::{GradingClient, QuestionGrader};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, FileError};
pub use models::question::{
    Answer, ComparisonResult, GradeResponse, Question, QuestionEntry, QuestionResult, ScoreCard,
    ScoreCardDimension,
};
pub use orchestrator::{
    BatchGrader, BatchRun, ComparisonRun, ComparisonRunner, RequestRegistry, RunEvent, RunId,
};
pub use services::{ImportService, ResultStore};
