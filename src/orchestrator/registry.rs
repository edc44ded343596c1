//! 运行注册表
//!
//! ## 职责
//!
//! 记录当前活跃的批改运行，作为取消与丢弃的判定闸门：
//! 结果到达时运行已不在表中，该结果就被静默丢弃。
//!
//! ## 并发约定
//!
//! 检查、更新、广播在同一把锁内完成，因此取消生效之后
//! 不可能再有任何快照或完成信号发出（不存在"先检查后更新"的间隙）。
//! 每个运行的结果列表只有所属编排器写入；订阅者拿到的都是副本。

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// 运行标识（每次发起批改生成一个）
pub type RunId = Uuid;

/// 运行事件
#[derive(Debug, Clone)]
pub enum RunEvent<T> {
    /// 全量进度快照（每个单题状态变化后发布一次）
    Progress(Vec<T>),
    /// 完成信号（每个未被取消的运行恰好收到一次）
    Complete,
}

/// 单个运行的内部状态：结果列表 + 订阅者列表
struct RunState<T> {
    results: Vec<T>,
    subscribers: Vec<UnboundedSender<RunEvent<T>>>,
}

/// 活跃运行注册表
pub struct RequestRegistry<T> {
    runs: Mutex<HashMap<RunId, RunState<T>>>,
    last_started: Mutex<Option<RunId>>,
}

impl<T: Clone> RequestRegistry<T> {
    pub fn new() -> Self {
        Self {
            runs: Mutex::new(HashMap::new()),
            last_started: Mutex::new(None),
        }
    }

    /// 注册新的运行并返回首个订阅通道
    pub fn register(&self, run_id: RunId, initial_results: Vec<T>) -> UnboundedReceiver<RunEvent<T>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = RunState {
            results: initial_results,
            subscribers: vec![tx],
        };
        self.runs.lock().unwrap().insert(run_id, state);
        *self.last_started.lock().unwrap() = Some(run_id);
        rx
    }

    /// 为正在进行的运行追加一个订阅者
    ///
    /// 新订阅者从下一次快照开始接收事件，不影响已有订阅者。
    /// 运行不存在（已完成或已取消）时返回 None。
    pub fn subscribe(&self, run_id: RunId) -> Option<UnboundedReceiver<RunEvent<T>>> {
        let mut runs = self.runs.lock().unwrap();
        match runs.get_mut(&run_id) {
            Some(state) => {
                let (tx, rx) = mpsc::unbounded_channel();
                state.subscribers.push(tx);
                Some(rx)
            }
            None => None,
        }
    }

    /// 运行是否仍然活跃
    pub fn is_active(&self, run_id: RunId) -> bool {
        self.runs.lock().unwrap().contains_key(&run_id)
    }

    /// 是否存在任何活跃运行
    pub fn is_processing(&self) -> bool {
        !self.runs.lock().unwrap().is_empty()
    }

    /// 更新运行状态并向所有订阅者广播全量快照
    ///
    /// 运行已被注销时不应用更新、不广播，返回 None；
    /// 否则返回广播出去的快照副本。
    pub fn publish_update<F>(&self, run_id: RunId, update: F) -> Option<Vec<T>>
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut runs = self.runs.lock().unwrap();
        let state = runs.get_mut(&run_id)?;

        update(&mut state.results);

        // 广播的是新构造的副本，订阅者持有的快照不会再被修改
        let snapshot = state.results.clone();
        state
            .subscribers
            .retain(|tx| tx.send(RunEvent::Progress(snapshot.clone())).is_ok());

        Some(snapshot)
    }

    /// 结束运行：仍然活跃时注销并发出一次完成信号
    ///
    /// 运行已被取消时什么都不发生，返回 false（完成信号至多一次）
    pub fn complete(&self, run_id: RunId) -> bool {
        let state = self.runs.lock().unwrap().remove(&run_id);
        match state {
            Some(state) => {
                for tx in &state.subscribers {
                    let _ = tx.send(RunEvent::Complete);
                }
                true
            }
            None => false,
        }
    }

    /// 注销运行（不发任何信号）
    pub fn deregister(&self, run_id: RunId) -> bool {
        self.runs.lock().unwrap().remove(&run_id).is_some()
    }

    /// 取消运行（未指定时取消最近发起的运行）
    ///
    /// 只是注销：已发出的网络请求不会被中断，
    /// 其结果到达后由 `publish_update` 静默丢弃。
    pub fn cancel(&self, run_id: Option<RunId>) -> bool {
        let target = match run_id {
            Some(id) => Some(id),
            None => *self.last_started.lock().unwrap(),
        };
        match target {
            Some(id) => self.deregister(id),
            None => false,
        }
    }
}

impl<T: Clone> Default for RequestRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
