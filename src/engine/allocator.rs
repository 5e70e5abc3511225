// ==========================================
// 护理排班优化系统 - 成本分摊引擎
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 4.4 成本分摊
// 红线: 实例分摊合计必须在舍入容差内还原 peak × weight
// 红线: 贡献分母为 0 时各任务成本记 0, 不产生 NaN
// ==========================================

use crate::engine::refiner::RefinedInstance;

// ==========================================
// AllocatedInstance - 实例成本分摊结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AllocatedInstance {
    pub instance_id: String,
    pub realized_cost: f64,            // peak_headcount × weight
    pub task_costs: Vec<(String, f64)>, // (task_id, 分摊成本), 与落位顺序一致
}

// ==========================================
// CostAllocator - 成本分摊引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CostAllocator;

impl CostAllocator {
    pub fn new() -> Self {
        CostAllocator
    }

    /// 将实例实际成本按人时贡献分摊到已落位任务
    ///
    /// # 规则
    /// - 实际成本 = peak_headcount × weight
    /// - 贡献(任务) = nurses_required × 执行时长(小时)
    /// - 任务成本 = 贡献 / 贡献合计 × 实际成本
    ///
    /// 未落位任务不参与分摊, 也不计入实例成本
    pub fn allocate(&self, refined: &RefinedInstance, weight: f64) -> AllocatedInstance {
        let realized_cost = refined.peak_headcount as f64 * weight;

        let contributions: Vec<f64> = refined
            .placements
            .iter()
            .map(|p| p.nurses_required as f64 * p.realized_window.duration_min() as f64 / 60.0)
            .collect();
        let total_contribution: f64 = contributions.iter().sum();

        let task_costs = refined
            .placements
            .iter()
            .zip(contributions.iter())
            .map(|(p, c)| {
                let cost = if total_contribution > 0.0 {
                    c / total_contribution * realized_cost
                } else {
                    0.0
                };
                (p.task_id.clone(), cost)
            })
            .collect();

        AllocatedInstance {
            instance_id: refined.instance_id.clone(),
            realized_cost,
            task_costs,
        }
    }
}
