// ==========================================
// 护理排班优化系统 - 粗粒度精确指派求解
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 4.2 精确指派求解
// 红线: 覆盖约束 >= 1, 允许任务拆分到多个班次实例
// 红线: 容量约束故意按不分时段的保守口径累加, 由细化阶段纠正
// 红线: 不可行必须显式报告并指明任务/约束, 不得返回降级结果
// ==========================================
// 职责: 混合整数规划建模、求解、指派提取
// 求解器: good_lp + microlp 后端 (纯 Rust 分支定界)
// ==========================================

use crate::config::resolved::OptimizerConfig;
use crate::domain::types::HeadcountDomain;
use crate::engine::error::OptimizeError;
use crate::engine::feasibility::{FeasibilityGraph, FeasiblePair};
use good_lp::{
    constraint, default_solver, variable, variables, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::instrument;

// ==========================================
// CoarseAssignment - 粗粒度指派结果
// ==========================================
// 求解器输出的不可变中间结果, 细化阶段只读
#[derive(Debug, Clone)]
pub struct CoarseAssignment {
    pub committed_pairs: Vec<FeasiblePair>, // 选中的 (任务, 实例) 对
    pub coarse_headcount: Vec<u32>,         // instance_idx → 保守并发人数上界
    pub objective_value: f64,               // Σ headcount × weight
}

impl CoarseAssignment {
    /// 按实例分组选中的任务下标 (保持求解提取顺序)
    pub fn tasks_by_instance(&self, instance_count: usize) -> Vec<Vec<usize>> {
        let mut grouped: Vec<Vec<usize>> = vec![Vec::new(); instance_count];
        for pair in &self.committed_pairs {
            grouped[pair.instance_idx].push(pair.task_idx);
        }
        grouped
    }
}

// ==========================================
// AssignmentSolver - 指派求解接口
// ==========================================
// 同步阻塞调用; 调用方负责放入阻塞线程并施加超时
pub trait AssignmentSolver: Send + Sync {
    fn solve(
        &self,
        graph: &FeasibilityGraph,
        config: &OptimizerConfig,
    ) -> Result<CoarseAssignment, OptimizeError>;
}

// ==========================================
// MipAssignmentSolver - MIP 指派求解器
// ==========================================
pub struct MipAssignmentSolver;

impl MipAssignmentSolver {
    pub fn new() -> Self {
        MipAssignmentSolver
    }

    /// 实例的人数上界 = 其全部候选任务 nurses_required 之和
    fn headcount_upper_bounds(graph: &FeasibilityGraph) -> Vec<u32> {
        graph
            .instance_pairs
            .iter()
            .map(|pair_idxs| {
                pair_idxs
                    .iter()
                    .map(|&p| graph.tasks[graph.pairs[p].task_idx].nurses_required)
                    .sum()
            })
            .collect()
    }
}

impl Default for MipAssignmentSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentSolver for MipAssignmentSolver {
    /// 求解覆盖-成本最小化指派
    ///
    /// # 模型
    /// - 变量: Assign(对) 0/1; Headcount(实例) >= 0 (整数或连续)
    /// - 目标: min Σ Headcount(实例) × weight(实例)
    /// - 覆盖: 每任务 Σ Assign >= 1
    /// - 容量: 每实例 Σ nurses_required × Assign <= Headcount
    ///
    /// # 返回
    /// - Ok(CoarseAssignment): 选中对与保守人数
    /// - Err(InfeasibleTasks/ModelInfeasible/SolverFailure)
    #[instrument(skip(self, graph, config), fields(
        pair_count = graph.pair_count(),
        instance_count = graph.instances.len(),
        headcount_domain = %config.headcount_domain
    ))]
    fn solve(
        &self,
        graph: &FeasibilityGraph,
        config: &OptimizerConfig,
    ) -> Result<CoarseAssignment, OptimizeError> {
        // === 步骤 1: 零候选任务前置检查 ===
        let infeasible = graph.infeasible_task_ids();
        if !infeasible.is_empty() {
            return Err(OptimizeError::InfeasibleTasks {
                task_ids: infeasible,
            });
        }

        // === 步骤 2: 变量构建 ===
        let mut vars = variables!();

        let assign_vars: Vec<Variable> = graph
            .pairs
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        let upper_bounds = Self::headcount_upper_bounds(graph);
        let head_vars: Vec<Variable> = upper_bounds
            .iter()
            .map(|&ub| {
                let def = variable().min(0.0).max(ub as f64);
                match config.headcount_domain {
                    HeadcountDomain::Integer => vars.add(def.integer()),
                    HeadcountDomain::Continuous => vars.add(def),
                }
            })
            .collect();

        // === 步骤 3: 目标函数 ===
        let objective = head_vars
            .iter()
            .zip(graph.instances.iter())
            .fold(Expression::from(0.0), |acc, (v, inst)| {
                acc + inst.weight * *v
            });

        let mut problem = vars.minimise(objective).using(default_solver);

        // === 步骤 4: 覆盖约束 (每任务 >= 1) ===
        for pair_idxs in &graph.task_pairs {
            let covered = pair_idxs
                .iter()
                .fold(Expression::from(0.0), |acc, &p| acc + assign_vars[p]);
            problem = problem.with(constraint!(covered >= 1));
        }

        // === 步骤 5: 容量约束 (每实例负载 <= 人数) ===
        for (instance_idx, pair_idxs) in graph.instance_pairs.iter().enumerate() {
            if pair_idxs.is_empty() {
                continue;
            }
            let load = pair_idxs.iter().fold(Expression::from(0.0), |acc, &p| {
                let nurses = graph.tasks[graph.pairs[p].task_idx].nurses_required;
                acc + nurses as f64 * assign_vars[p]
            });
            problem = problem.with(constraint!(load <= head_vars[instance_idx]));
        }

        // === 步骤 6: 求解 ===
        let solution = problem.solve().map_err(|e| match e {
            ResolutionError::Infeasible => OptimizeError::ModelInfeasible(
                "覆盖/容量约束无可行解".to_string(),
            ),
            other => OptimizeError::SolverFailure(other.to_string()),
        })?;

        // === 步骤 7: 指派提取 ===
        let committed_pairs: Vec<FeasiblePair> = graph
            .pairs
            .iter()
            .zip(assign_vars.iter())
            .filter(|(_, v)| solution.value(**v) > 0.5)
            .map(|(pair, _)| *pair)
            .collect();

        // 人数从选中负载重建, 不信任浮点变量值的整数性
        let mut coarse_headcount = vec![0u32; graph.instances.len()];
        for pair in &committed_pairs {
            coarse_headcount[pair.instance_idx] += graph.tasks[pair.task_idx].nurses_required;
        }
        let objective_value: f64 = coarse_headcount
            .iter()
            .zip(graph.instances.iter())
            .map(|(&h, inst)| h as f64 * inst.weight)
            .sum();

        tracing::debug!(
            committed = committed_pairs.len(),
            objective = objective_value,
            domain = %config.headcount_domain,
            "粗粒度指派求解完成"
        );

        Ok(CoarseAssignment {
            committed_pairs,
            coarse_headcount,
            objective_value,
        })
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shift::ShiftTemplate;
    use crate::domain::task::CareTask;
    use crate::domain::time::TimeWindow;
    use crate::engine::feasibility::FeasibilityEngine;
    use chrono::Weekday;

    fn task(id: &str, nurses: u32) -> CareTask {
        CareTask {
            task_id: id.to_string(),
            task_name: id.to_string(),
            weekday: Weekday::Mon,
            window: TimeWindow::from_hm(9, 0, 11, 0),
            duration_min: 60,
            nurses_required: nurses,
        }
    }

    fn shift(id: &str, weight: f64) -> ShiftTemplate {
        ShiftTemplate {
            shift_id: id.to_string(),
            shift_name: id.to_string(),
            window: TimeWindow::from_hm(7, 0, 15, 0),
            break_start_min: 0,
            break_duration_min: 0,
            weight,
            active_days: [true, false, false, false, false, false, false],
        }
    }

    fn solve(
        tasks: &[CareTask],
        shifts: &[ShiftTemplate],
    ) -> Result<(FeasibilityGraph, CoarseAssignment), OptimizeError> {
        let graph = FeasibilityEngine::new().build(tasks, shifts)?;
        let assignment = MipAssignmentSolver::new().solve(&graph, &OptimizerConfig::default())?;
        Ok((graph, assignment))
    }

    #[test]
    fn test_single_task_single_shift() {
        let (graph, assignment) = solve(&[task("T1", 2)], &[shift("S1", 100.0)]).unwrap();
        assert_eq!(assignment.committed_pairs.len(), 1);
        let inst_idx = assignment.committed_pairs[0].instance_idx;
        assert_eq!(graph.instances[inst_idx].instance_id, "S1@MON");
        assert_eq!(assignment.coarse_headcount[inst_idx], 2);
        assert!((assignment.objective_value - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_prefers_cheaper_shift() {
        let (graph, assignment) =
            solve(&[task("T1", 1)], &[shift("S-EXP", 5.0), shift("S-CHEAP", 1.0)]).unwrap();
        assert_eq!(assignment.committed_pairs.len(), 1);
        let inst_idx = assignment.committed_pairs[0].instance_idx;
        assert_eq!(graph.instances[inst_idx].shift_id, "S-CHEAP");
        assert!((assignment.objective_value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_capacity_overcounts_by_design() {
        // 两个不重叠时段的任务指到同一实例, 粗粒度人数仍为两者之和
        let mut t1 = task("T1", 1);
        t1.window = TimeWindow::from_hm(8, 0, 9, 0);
        let mut t2 = task("T2", 1);
        t2.window = TimeWindow::from_hm(13, 0, 14, 0);

        let (graph, assignment) = solve(&[t1, t2], &[shift("S1", 10.0)]).unwrap();
        assert_eq!(assignment.committed_pairs.len(), 2);
        let inst_idx = assignment.committed_pairs[0].instance_idx;
        assert_eq!(graph.instances[inst_idx].instance_id, "S1@MON");
        assert_eq!(assignment.coarse_headcount[inst_idx], 2);
    }

    #[test]
    fn test_infeasible_task_reported_before_solve() {
        let mut t = task("T-BAD", 1);
        t.weekday = Weekday::Sun; // 班次周日不启用
        let graph = FeasibilityEngine::new()
            .build(&[t], &[shift("S1", 1.0)])
            .unwrap();
        let result = MipAssignmentSolver::new().solve(&graph, &OptimizerConfig::default());
        match result {
            Err(OptimizeError::InfeasibleTasks { task_ids }) => {
                assert_eq!(task_ids, vec!["T-BAD".to_string()]);
            }
            other => panic!("期望 InfeasibleTasks, 实际 {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_continuous_domain_same_commitment() {
        let config = OptimizerConfig {
            headcount_domain: HeadcountDomain::Continuous,
            ..Default::default()
        };
        let graph = FeasibilityEngine::new()
            .build(&[task("T1", 3)], &[shift("S1", 2.0)])
            .unwrap();
        let assignment = MipAssignmentSolver::new().solve(&graph, &config).unwrap();
        assert_eq!(assignment.committed_pairs.len(), 1);
        assert_eq!(assignment.coarse_headcount[assignment.committed_pairs[0].instance_idx], 3);
        assert!((assignment.objective_value - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_tasks_by_instance_grouping() {
        let (graph, assignment) =
            solve(&[task("T1", 1), task("T2", 1)], &[shift("S1", 1.0)]).unwrap();
        let grouped = assignment.tasks_by_instance(graph.instances.len());
        let non_empty: Vec<&Vec<usize>> = grouped.iter().filter(|g| !g.is_empty()).collect();
        assert_eq!(non_empty.len(), 1);
        assert_eq!(non_empty[0].len(), 2);
    }
}
