// ==========================================
// 护理排班优化系统 - 排班结果模型
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 4.5 结果汇总
// 职责: 承载最终报表的行结构, 不含任何计算逻辑
// ==========================================

use crate::domain::time::TimeWindow;
use crate::domain::types::UnplacedReason;
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// Placement - 细化落位
// ==========================================
// 一条任务在某班次实例内的具体执行时段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub task_id: String,
    pub instance_id: String,
    pub weekday: Weekday,
    pub realized_window: TimeWindow, // 实际执行时段 (起点对齐粒度)
    pub nurses_required: u32,
}

// ==========================================
// AssignmentRow - 指派明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub task_id: String,
    pub task_name: String,
    pub instance_id: String,
    pub shift_id: String,
    pub weekday: Weekday,
    pub requested_window: TimeWindow,          // 任务请求窗口
    pub realized_window: Option<TimeWindow>,   // 细化后的执行时段 (未落位为 None)
    pub nurses_required: u32,
    pub allocated_cost: f64, // 分摊到本行的人时成本
}

// ==========================================
// InstanceUsage - 班次实例用量
// ==========================================
// 粗/细两阶段人数对照与该实例的实际成本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceUsage {
    pub instance_id: String,
    pub shift_id: String,
    pub weekday: Weekday,
    pub coarse_headcount: u32, // 粗粒度求解认定的并发人数上界
    pub peak_headcount: u32,   // 细化后的实际峰值并发人数
    pub task_count: usize,     // 指派到本实例的任务数
    pub realized_cost: f64,    // peak_headcount × weight
}

// ==========================================
// DaySummary - 单日汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub weekday: Weekday,
    pub workers_assigned: u32, // 当日各实例峰值人数之和
    pub tasks_assigned: usize, // 当日落位任务数 (去重)
    pub day_cost: f64,         // 当日实例成本之和
}

// ==========================================
// UnplacedTask - 未安置任务
// ==========================================
// 细化阶段无法落位的任务记录, 供人工复核
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedTask {
    pub task_id: String,
    pub instance_id: String,
    pub weekday: Weekday,
    pub reason: UnplacedReason,
    pub detail: String, // 人类可读的失败描述
}

// ==========================================
// OptimizeStats - 优化统计
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeStats {
    pub task_count: usize,        // 输入任务数
    pub shift_count: usize,       // 参与排班的班次模板数 (有启用日)
    pub instance_count: usize,    // 展开的班次实例数
    pub pair_count: usize,        // 可行 (任务, 实例) 对数
    pub placed_task_count: usize, // 细化落位的任务-实例对数
    pub unplaced_count: usize,    // 未落位数
    pub objective_value: f64,     // 粗粒度求解目标值
    pub total_cost: f64,          // 细化后实际总成本
    pub feasibility_ms: u64,
    pub solve_ms: u64,
    pub refine_ms: u64,
    pub total_ms: u64,
}

// ==========================================
// OptimizeReport - 周排班优化报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeReport {
    pub run_id: String,             // 本次运行标识 (uuid)
    pub created_at: DateTime<Utc>,  // 生成时间
    pub rows: Vec<AssignmentRow>,   // 指派明细 (按星期/时段/任务号排序)
    pub instance_usages: Vec<InstanceUsage>,
    pub day_summaries: Vec<DaySummary>,
    pub unplaced: Vec<UnplacedTask>,
    pub stats: OptimizeStats,
}

impl OptimizeReport {
    /// 是否所有指派对均已落位
    pub fn is_fully_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// 指派明细中已落位行的成本合计
    pub fn placed_cost_sum(&self) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.realized_window.is_some())
            .map(|r| r.allocated_cost)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_cost_sum() {
        let report = OptimizeReport {
            run_id: "r1".to_string(),
            created_at: Utc::now(),
            rows: vec![
                AssignmentRow {
                    task_id: "T1".to_string(),
                    task_name: "a".to_string(),
                    instance_id: "S@MON".to_string(),
                    shift_id: "S".to_string(),
                    weekday: Weekday::Mon,
                    requested_window: TimeWindow::from_hm(9, 0, 11, 0),
                    realized_window: Some(TimeWindow::from_hm(9, 0, 10, 0)),
                    nurses_required: 1,
                    allocated_cost: 2.5,
                },
                AssignmentRow {
                    task_id: "T2".to_string(),
                    task_name: "b".to_string(),
                    instance_id: "S@MON".to_string(),
                    shift_id: "S".to_string(),
                    weekday: Weekday::Mon,
                    requested_window: TimeWindow::from_hm(9, 0, 11, 0),
                    realized_window: None,
                    nurses_required: 1,
                    allocated_cost: 0.0,
                },
            ],
            instance_usages: vec![],
            day_summaries: vec![],
            unplaced: vec![],
            stats: OptimizeStats::default(),
        };
        assert!((report.placed_cost_sum() - 2.5).abs() < 1e-9);
        assert!(report.is_fully_placed());
    }
}
