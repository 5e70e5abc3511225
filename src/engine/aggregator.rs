// ==========================================
// 护理排班优化系统 - 结果汇总引擎
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 4.5 结果汇总
// 红线: 每个选中对要么有落位行, 要么出现在未安置列表, 不得两头缺失
// ==========================================
// 职责: 将四个阶段的中间结果装配为最终报告
// ==========================================

use crate::domain::schedule::{
    AssignmentRow, DaySummary, InstanceUsage, OptimizeReport, OptimizeStats, UnplacedTask,
};
use crate::domain::shift::{weekday_index, WEEKDAYS};
use crate::domain::time::TimeWindow;
use crate::engine::allocator::AllocatedInstance;
use crate::engine::feasibility::FeasibilityGraph;
use crate::engine::refiner::RefinedInstance;
use crate::engine::solver::CoarseAssignment;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

// ==========================================
// ResultAggregator - 结果汇总引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn new() -> Self {
        ResultAggregator
    }

    /// 装配最终报告
    ///
    /// # 参数
    /// - `run_id`: 本次运行标识 (与事件共用)
    /// - `graph`: 可行图 (任务/实例字典)
    /// - `assignment`: 粗粒度指派
    /// - `refined`: 各使用实例的细化结果
    /// - `allocated`: 与 refined 对应的成本分摊
    ///
    /// # 返回
    /// - OptimizeReport: 明细行、实例用量、单日汇总、未安置列表与统计
    ///   (阶段耗时由调用方回填)
    pub fn aggregate(
        &self,
        run_id: &str,
        graph: &FeasibilityGraph,
        assignment: &CoarseAssignment,
        refined: &[RefinedInstance],
        allocated: &[AllocatedInstance],
    ) -> OptimizeReport {
        // === 步骤 1: 落位与成本索引 ===
        // (instance_id, task_id) → (执行时段, 分摊成本)
        let mut placement_map: HashMap<(String, String), (TimeWindow, f64)> = HashMap::new();
        for (inst, alloc) in refined.iter().zip(allocated.iter()) {
            for (placement, (task_id, cost)) in
                inst.placements.iter().zip(alloc.task_costs.iter())
            {
                placement_map.insert(
                    (inst.instance_id.clone(), task_id.clone()),
                    (placement.realized_window, *cost),
                );
            }
        }

        // === 步骤 2: 指派明细行 ===
        let mut rows: Vec<AssignmentRow> = assignment
            .committed_pairs
            .iter()
            .map(|pair| {
                let task = &graph.tasks[pair.task_idx];
                let instance = &graph.instances[pair.instance_idx];
                let key = (instance.instance_id.clone(), task.task_id.clone());
                let (realized_window, allocated_cost) = match placement_map.get(&key) {
                    Some((w, c)) => (Some(*w), *c),
                    None => (None, 0.0),
                };
                AssignmentRow {
                    task_id: task.task_id.clone(),
                    task_name: task.task_name.clone(),
                    instance_id: instance.instance_id.clone(),
                    shift_id: instance.shift_id.clone(),
                    weekday: instance.weekday,
                    requested_window: task.window,
                    realized_window,
                    nurses_required: task.nurses_required,
                    allocated_cost,
                }
            })
            .collect();
        // 排序: 星期 → 已落位优先 → 执行起点 → 任务编号
        rows.sort_by(|a, b| {
            weekday_index(a.weekday)
                .cmp(&weekday_index(b.weekday))
                .then(a.realized_window.is_none().cmp(&b.realized_window.is_none()))
                .then(
                    a.realized_window
                        .map(|w| w.start_min)
                        .cmp(&b.realized_window.map(|w| w.start_min)),
                )
                .then(a.task_id.cmp(&b.task_id))
        });

        // === 步骤 3: 实例用量 ===
        let cost_by_instance: HashMap<&str, f64> = allocated
            .iter()
            .map(|a| (a.instance_id.as_str(), a.realized_cost))
            .collect();
        let instance_index: HashMap<&str, usize> = graph
            .instances
            .iter()
            .enumerate()
            .map(|(idx, inst)| (inst.instance_id.as_str(), idx))
            .collect();
        let instance_usages: Vec<InstanceUsage> = refined
            .iter()
            .map(|r| {
                let idx = instance_index[r.instance_id.as_str()];
                let instance = &graph.instances[idx];
                InstanceUsage {
                    instance_id: r.instance_id.clone(),
                    shift_id: instance.shift_id.clone(),
                    weekday: r.weekday,
                    coarse_headcount: assignment.coarse_headcount[idx],
                    peak_headcount: r.peak_headcount,
                    task_count: r.placements.len() + r.failures.len(),
                    realized_cost: cost_by_instance
                        .get(r.instance_id.as_str())
                        .copied()
                        .unwrap_or(0.0),
                }
            })
            .collect();

        // === 步骤 4: 单日汇总 (仅含有落位的日) ===
        // 全部落位失败的实例不计入单日口径, 其用量仍见实例用量表
        let mut day_summaries: Vec<DaySummary> = Vec::new();
        for weekday in WEEKDAYS {
            let day_instances: Vec<&RefinedInstance> = refined
                .iter()
                .filter(|r| r.weekday == weekday && !r.placements.is_empty())
                .collect();
            if day_instances.is_empty() {
                continue;
            }
            let workers_assigned: u32 = day_instances.iter().map(|r| r.peak_headcount).sum();
            let placed_tasks: HashSet<&str> = day_instances
                .iter()
                .flat_map(|r| r.placements.iter().map(|p| p.task_id.as_str()))
                .collect();
            let day_cost: f64 = day_instances
                .iter()
                .map(|r| {
                    cost_by_instance
                        .get(r.instance_id.as_str())
                        .copied()
                        .unwrap_or(0.0)
                })
                .sum();
            day_summaries.push(DaySummary {
                weekday,
                workers_assigned,
                tasks_assigned: placed_tasks.len(),
                day_cost,
            });
        }

        // === 步骤 5: 未安置列表 ===
        let unplaced: Vec<UnplacedTask> = refined
            .iter()
            .flat_map(|r| r.failures.iter())
            .map(|f| UnplacedTask {
                task_id: f.task_id.clone(),
                instance_id: f.instance_id.clone(),
                weekday: f.weekday,
                reason: f.reason,
                detail: f.detail.clone(),
            })
            .collect();

        // === 步骤 6: 统计 ===
        let shift_ids: HashSet<&str> = graph
            .instances
            .iter()
            .map(|i| i.shift_id.as_str())
            .collect();
        let placed_task_count: usize = refined.iter().map(|r| r.placements.len()).sum();
        let total_cost: f64 = allocated.iter().map(|a| a.realized_cost).sum();
        let stats = OptimizeStats {
            task_count: graph.tasks.len(),
            shift_count: shift_ids.len(),
            instance_count: graph.instances.len(),
            pair_count: graph.pair_count(),
            placed_task_count,
            unplaced_count: unplaced.len(),
            objective_value: assignment.objective_value,
            total_cost,
            ..Default::default()
        };

        OptimizeReport {
            run_id: run_id.to_string(),
            created_at: Utc::now(),
            rows,
            instance_usages,
            day_summaries,
            unplaced,
            stats,
        }
    }
}
