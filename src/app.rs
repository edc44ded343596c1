//! 应用主结构 - 装配层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责装配各层组件并消费批改运行的事件。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、创建客户端与两个编排器
//! 2. **题目加载**：扫描并加载所有待批改的题目（JSON 文件）
//! 3. **导入校验**：过滤不合格的题目，合格题目后台入库
//! 4. **运行消费**：订阅批改运行的进度与完成事件
//! 5. **全局统计**：汇总通过/未通过/出错数量

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::clients::{GradingClient, QuestionGrader};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::load_all_json_files;
use crate::models::question::{Question, QuestionEntry, QuestionResult};
use crate::orchestrator::{BatchGrader, ComparisonRunner, RunEvent};
use crate::services::{load_ignored_dimensions, ImportService, ResultStore};
use crate::utils::logging::{init_log_file, log_questions_loaded, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<ResultStore>,
    importer: ImportService,
    batch: BatchGrader,
    comparison: ComparisonRunner,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.max_concurrent_gradings, config.comparison_mode);

        let client = Arc::new(GradingClient::new(&config));
        let store = Arc::new(ResultStore::new());

        let grader: Arc<dyn QuestionGrader> = client.clone();
        let batch = BatchGrader::new(Arc::clone(&grader), Arc::clone(&store), &config);
        let comparison = ComparisonRunner::new(grader, &config);
        let importer = ImportService::new(client);

        Ok(Self {
            config,
            store,
            importer,
            batch,
            comparison,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待批改的题目
        let questions = self.load_questions().await?;

        if questions.is_empty() {
            warn!("⚠️ 没有找到待批改的题目，程序结束");
            return Ok(());
        }

        log_questions_loaded(questions.len(), self.config.max_concurrent_gradings);

        // 导入校验：不合格的题目跳过，合格题目后台入库
        let outcome = ImportService::split_valid(questions);
        if !outcome.filtered.is_empty() {
            warn!(
                "⚠️ {} 道题目未通过导入校验，已跳过",
                outcome.filtered.len()
            );
        }
        if outcome.valid.is_empty() {
            warn!("⚠️ 所有题目均未通过校验，程序结束");
            return Ok(());
        }
        self.importer.submit_in_background(outcome.valid.clone());

        let entries = QuestionEntry::from_questions(outcome.valid);

        if self.config.comparison_mode {
            self.run_comparison(entries).await
        } else {
            self.run_grading(entries).await
        }
    }

    /// 加载题目
    async fn load_questions(&self) -> AppResult<Vec<Question>> {
        info!("\n📁 正在扫描待批改的题目文件...");
        load_all_json_files(&self.config.questions_folder).await
    }

    /// 批量批改模式
    async fn run_grading(&self, entries: Vec<QuestionEntry>) -> Result<()> {
        let total = entries.len();
        let mut run = match self.batch.start_batch(entries) {
            Some(run) => run,
            None => return Ok(()),
        };

        while let Some(event) = run.events.recv().await {
            match event {
                RunEvent::Progress(snapshot) => {
                    if self.config.verbose_logging {
                        let settled = snapshot.iter().filter(|r| r.is_settled()).count();
                        info!("📋 批改进度: {}/{}", settled, total);
                    }
                }
                RunEvent::Complete => break,
            }
        }

        // 汇总最终结果
        let results = self.store.get_results();
        let passed = results.iter().filter(|r| r.passed() == Some(true)).count();
        let failed = results.iter().filter(|r| r.passed() == Some(false)).count();
        let errored = results.iter().filter(|r| r.error.is_some()).count();
        print_final_stats(
            passed,
            failed,
            errored,
            results.len(),
            &self.config.output_log_file,
        );

        self.log_dimension_failures(&results);

        Ok(())
    }

    /// 统计未通过的评分维度（跳过忽略清单中的维度）
    fn log_dimension_failures(&self, results: &[QuestionResult]) {
        let ignored = load_ignored_dimensions(&self.config.ignored_dimensions_file);

        let mut failures: HashMap<String, usize> = HashMap::new();
        for result in results {
            if let Some(response) = &result.response {
                for dimension in &response.scorecard.dimensions {
                    if !dimension.passed && !ignored.contains(&dimension.name) {
                        *failures.entry(dimension.name.clone()).or_default() += 1;
                    }
                }
            }
        }

        if failures.is_empty() {
            return;
        }

        let mut items: Vec<(String, usize)> = failures.into_iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1));

        info!("\n📊 未通过维度统计:");
        for (name, count) in items {
            info!("  {} × {}", name, count);
        }
        if !ignored.is_empty() {
            info!("  (已忽略 {} 个维度)", ignored.len());
        }
    }

    /// 接口对比模式
    async fn run_comparison(&self, entries: Vec<QuestionEntry>) -> Result<()> {
        let mut run = match self.comparison.start_comparison(entries) {
            Some(run) => run,
            None => return Ok(()),
        };

        let mut final_snapshot = Vec::new();
        while let Some(event) = run.events.recv().await {
            match event {
                RunEvent::Progress(snapshot) => final_snapshot = snapshot,
                RunEvent::Complete => break,
            }
        }

        // 输出每道题的耗时对比
        info!("\n{}", "=".repeat(60));
        info!("📊 接口耗时对比");
        info!("{}", "=".repeat(60));
        for (index, result) in final_snapshot.iter().enumerate() {
            info!(
                "[题目 {}] 标准: {}, compact: {}",
                index + 1,
                format_response_time(result.standard_response_time_ms),
                format_response_time(result.compact_response_time_ms)
            );
        }

        let standard_avg = average_time(
            final_snapshot
                .iter()
                .map(|r| r.standard_response_time_ms),
        );
        let compact_avg = average_time(
            final_snapshot
                .iter()
                .map(|r| r.compact_response_time_ms),
        );
        info!("{}", "─".repeat(60));
        info!(
            "平均耗时: 标准 {}, compact {}",
            format_response_time(standard_avg),
            format_response_time(compact_avg)
        );
        info!("{}", "=".repeat(60));

        Ok(())
    }
}

/// 格式化耗时显示（调用失败时无耗时）
fn format_response_time(time_ms: Option<u128>) -> String {
    match time_ms {
        Some(ms) => format!("{}ms", ms),
        None => "失败".to_string(),
    }
}

/// 成功调用的平均耗时
fn average_time(times: impl Iterator<Item = Option<u128>>) -> Option<u128> {
    let measured: Vec<u128> = times.flatten().collect();
    if measured.is_empty() {
        None
    } else {
        Some(measured.iter().sum::<u128>() / measured.len() as u128)
    }
}
