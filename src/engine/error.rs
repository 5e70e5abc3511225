// ==========================================
// 护理排班优化系统 - 优化错误类型
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 6. 错误分类
// 红线: 细化落位失败不是错误, 以 PlacementFailure 记录随报告返回
// ==========================================

use crate::domain::types::UnplacedReason;
use chrono::Weekday;
use thiserror::Error;

// ==========================================
// OptimizeError - 优化错误
// ==========================================
// 终止整次运行的致命错误; 可恢复情形 (单任务未落位) 不在此列
#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("输入为空: {0}")]
    EmptyInput(String),

    #[error("输入数据非法: {0}")]
    InvalidInput(String),

    #[error("配置非法: {0}")]
    InvalidConfig(String),

    #[error("存在无候选班次的任务: {task_ids:?}")]
    InfeasibleTasks { task_ids: Vec<String> },

    #[error("模型不可行: {0}")]
    ModelInfeasible(String),

    #[error("求解器失败: {0}")]
    SolverFailure(String),

    #[error("求解超时: 超过 {timeout_ms} 毫秒")]
    SolverTimeout { timeout_ms: u64 },

    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

// ==========================================
// PlacementFailure - 落位失败记录
// ==========================================
// 细化阶段单任务落位失败的可恢复记录, 不中断运行
#[derive(Debug, Clone)]
pub struct PlacementFailure {
    pub task_id: String,
    pub instance_id: String,
    pub weekday: Weekday,
    pub reason: UnplacedReason,
    pub detail: String,
}
