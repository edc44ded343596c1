//! 结果存储
//!
//! 保存长期持有的批改结果列表，供查看与部分重试使用。
//! 列表只有编排层写入，读取方拿到的都是副本。
//! 另提供忽略维度列表的文件持久化（跨运行保留的查看偏好）。

use std::path::Path;
use std::sync::Mutex;

use tracing::{error, warn};

use crate::models::question::QuestionResult;

/// 内存结果存储
#[derive(Default)]
pub struct ResultStore {
    results: Mutex<Vec<QuestionResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以整份列表替换当前结果
    pub fn save_results(&self, results: Vec<QuestionResult>) {
        *self.results.lock().unwrap() = results;
    }

    /// 取出当前结果的副本
    pub fn get_results(&self) -> Vec<QuestionResult> {
        self.results.lock().unwrap().clone()
    }

    /// 清空结果
    pub fn clear_results(&self) {
        self.results.lock().unwrap().clear();
    }

    /// 将一次运行的快照按条目标识并入当前列表
    ///
    /// 已存在的条目原位替换（部分重试只覆盖对应条目，其余条目不动），
    /// 新条目追加到末尾。匹配只看条目标识，不看题目内容。
    pub fn merge_results(&self, snapshot: &[QuestionResult]) {
        let mut held = self.results.lock().unwrap();
        for incoming in snapshot {
            match held.iter_mut().find(|r| r.entry_id == incoming.entry_id) {
                Some(slot) => *slot = incoming.clone(),
                None => held.push(incoming.clone()),
            }
        }
    }
}

// ========== 忽略维度的持久化 ==========

/// 读取忽略的错误维度列表
///
/// 文件缺失或损坏时返回空列表（偏好丢失可接受，不中断主流程）
pub fn load_ignored_dimensions(path: &str) -> Vec<String> {
    if !Path::new(path).exists() {
        return Vec::new();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(dimensions) => dimensions,
            Err(e) => {
                warn!("忽略维度文件解析失败 ({}): {}", path, e);
                Vec::new()
            }
        },
        Err(e) => {
            warn!("忽略维度文件读取失败 ({}): {}", path, e);
            Vec::new()
        }
    }
}

/// 保存忽略的错误维度列表（失败只记日志，不影响主流程）
pub fn save_ignored_dimensions(path: &str, dimensions: &[String]) {
    match serde_json::to_string(dimensions) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                error!("忽略维度文件写入失败 ({}): {}", path, e);
            }
        }
        Err(e) => error!("忽略维度序列化失败: {}", e),
    }
}
