// ==========================================
// 护理排班优化系统 - 引擎编排器
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 1.1 优化主流程
// 用途: 协调五大核心引擎的执行顺序
// 红线: 两阶段之间以不可变的粗粒度指派衔接, 求解与装箱不得交织
// ==========================================

use crate::config::resolved::OptimizerConfig;
use crate::config::OptimizerConfigReader;
use crate::domain::schedule::OptimizeReport;
use crate::domain::shift::ShiftTemplate;
use crate::domain::task::CareTask;
use crate::domain::types::OptimizePhase;
use crate::engine::allocator::{AllocatedInstance, CostAllocator};
use crate::engine::error::OptimizeError;
use crate::engine::events::{
    OptimizeEvent, OptimizeEventPublisher, OptimizeEventType, OptionalEventPublisher,
};
use crate::engine::feasibility::FeasibilityEngine;
use crate::engine::refiner::{PackingRefiner, RefinedInstance};
use crate::engine::solver::{AssignmentSolver, MipAssignmentSolver};
use crate::engine::ResultAggregator;
use crate::domain::schedule::Placement;
use crate::domain::time::TimeWindow;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

// ==========================================
// OptimizeOrchestrator - 引擎编排器
// ==========================================

pub struct OptimizeOrchestrator<C>
where
    C: OptimizerConfigReader,
{
    config: Arc<C>,
    feasibility: FeasibilityEngine,
    solver: Arc<dyn AssignmentSolver>,
    refiner: PackingRefiner,
    allocator: CostAllocator,
    aggregator: ResultAggregator,
    events: OptionalEventPublisher,
}

impl<C> OptimizeOrchestrator<C>
where
    C: OptimizerConfigReader,
{
    /// 创建新的编排器实例 (默认 MIP 求解器, 不发布事件)
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self::with_solver(config, Arc::new(MipAssignmentSolver::new()))
    }

    /// 创建带自定义求解器的编排器实例
    pub fn with_solver(config: Arc<C>, solver: Arc<dyn AssignmentSolver>) -> Self {
        Self {
            config,
            feasibility: FeasibilityEngine::new(),
            solver,
            refiner: PackingRefiner::new(),
            allocator: CostAllocator::new(),
            aggregator: ResultAggregator::new(),
            events: OptionalEventPublisher::none(),
        }
    }

    /// 注入事件发布者
    pub fn with_event_publisher(mut self, publisher: Arc<dyn OptimizeEventPublisher>) -> Self {
        self.events = OptionalEventPublisher::with_publisher(publisher);
        self
    }

    /// 发布阶段事件 (失败仅告警, 不中断优化)
    fn publish_event(
        &self,
        run_id: &str,
        event_type: OptimizeEventType,
        phase: OptimizePhase,
        summary: String,
    ) {
        let event = OptimizeEvent::new(run_id, event_type, phase, summary);
        if let Err(e) = self.events.publish(event) {
            warn!(run_id = %run_id, error = %e, "阶段事件发布失败");
        }
    }

    /// 执行完整周排班优化流程
    ///
    /// # 参数
    /// - tasks: 护理任务列表 (周内重复)
    /// - shifts: 班次模板列表
    ///
    /// # 返回
    /// - Ok(OptimizeReport): 明细、用量、汇总与未安置列表
    /// - Err(OptimizeError): 输入/配置/求解层面的致命错误
    #[instrument(skip(self, tasks, shifts), fields(
        task_count = tasks.len(),
        shift_count = shifts.len()
    ))]
    pub async fn execute_weekly_optimize(
        &self,
        tasks: Vec<CareTask>,
        shifts: Vec<ShiftTemplate>,
    ) -> Result<OptimizeReport, OptimizeError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let total_timer = Instant::now();

        // ==========================================
        // 步骤0: 配置解析
        // ==========================================
        let config = self.resolve_config().await?;
        config.validate().map_err(OptimizeError::InvalidConfig)?;

        info!(
            run_id = %run_id,
            task_count = tasks.len(),
            shift_count = shifts.len(),
            granularity_min = config.granularity_min,
            use_refinement = config.use_refinement,
            headcount_domain = %config.headcount_domain,
            "开始执行周排班优化"
        );

        // ==========================================
        // 步骤1: Feasibility Engine - 可行性建图
        // ==========================================
        debug!("步骤1: 执行可行性建图");
        let feasibility_timer = Instant::now();

        // 建图后只读, Arc 共享给求解线程与细化任务
        let graph = Arc::new(self.feasibility.build(&tasks, &shifts)?);
        for warning in &graph.warnings {
            warn!(run_id = %run_id, "{}", warning);
        }
        let infeasible = graph.infeasible_task_ids();
        if !infeasible.is_empty() {
            return Err(OptimizeError::InfeasibleTasks {
                task_ids: infeasible,
            });
        }
        let feasibility_ms = feasibility_timer.elapsed().as_millis() as u64;

        info!(
            instance_count = graph.instances.len(),
            pair_count = graph.pair_count(),
            "可行性建图完成"
        );
        self.publish_event(
            &run_id,
            OptimizeEventType::FeasibilityBuilt,
            OptimizePhase::Feasibility,
            format!(
                "{} 任务 / {} 实例 / {} 可行对",
                graph.tasks.len(),
                graph.instances.len(),
                graph.pair_count()
            ),
        );

        // ==========================================
        // 步骤2: Assignment Solver - 粗粒度精确求解
        // ==========================================
        debug!("步骤2: 执行粗粒度精确求解");
        let solve_timer = Instant::now();

        let solver = Arc::clone(&self.solver);
        let solve_graph = Arc::clone(&graph);
        let solve_config = config.clone();
        let handle =
            tokio::task::spawn_blocking(move || solver.solve(&solve_graph, &solve_config));

        let assignment =
            match tokio::time::timeout(Duration::from_millis(config.solver_timeout_ms), handle)
                .await
            {
                Err(_) => {
                    warn!(
                        run_id = %run_id,
                        timeout_ms = config.solver_timeout_ms,
                        "求解超时, 中止本次优化"
                    );
                    return Err(OptimizeError::SolverTimeout {
                        timeout_ms: config.solver_timeout_ms,
                    });
                }
                Ok(joined) => joined
                    .map_err(|e| OptimizeError::SolverFailure(format!("求解线程异常: {}", e)))??,
            };
        let solve_ms = solve_timer.elapsed().as_millis() as u64;

        info!(
            committed_pairs = assignment.committed_pairs.len(),
            objective_value = assignment.objective_value,
            "粗粒度精确求解完成"
        );
        self.publish_event(
            &run_id,
            OptimizeEventType::CoarseAssignmentSolved,
            OptimizePhase::CoarseSolve,
            format!(
                "{} 对指派, 目标值 {:.2}",
                assignment.committed_pairs.len(),
                assignment.objective_value
            ),
        );

        // ==========================================
        // 步骤3: Packing Refiner - 区间装箱细化
        // ==========================================
        debug!("步骤3: 执行区间装箱细化");
        let refine_timer = Instant::now();

        let grouped = assignment.tasks_by_instance(graph.instances.len());
        let refined = if config.use_refinement {
            self.refine_parallel(&graph, &grouped, config.granularity_min)
                .await?
        } else {
            Self::coarse_placements(&graph, &grouped, &assignment.coarse_headcount)
        };
        let refine_ms = refine_timer.elapsed().as_millis() as u64;

        let placed: usize = refined.iter().map(|r| r.placements.len()).sum();
        let failed: usize = refined.iter().map(|r| r.failures.len()).sum();
        info!(
            used_instances = refined.len(),
            placed_count = placed,
            failed_count = failed,
            "区间装箱细化完成"
        );
        self.publish_event(
            &run_id,
            OptimizeEventType::RefinementCompleted,
            OptimizePhase::Refinement,
            format!("{} 落位 / {} 未安置", placed, failed),
        );

        // ==========================================
        // 步骤4: Cost Allocator - 成本分摊
        // ==========================================
        debug!("步骤4: 执行成本分摊");

        let weight_of: std::collections::HashMap<&str, f64> = graph
            .instances
            .iter()
            .map(|i| (i.instance_id.as_str(), i.weight))
            .collect();
        let allocated: Vec<AllocatedInstance> = refined
            .iter()
            .map(|r| {
                self.allocator
                    .allocate(r, weight_of[r.instance_id.as_str()])
            })
            .collect();

        // ==========================================
        // 步骤5: Result Aggregator - 结果汇总
        // ==========================================
        debug!("步骤5: 执行结果汇总");

        let mut report =
            self.aggregator
                .aggregate(&run_id, &graph, &assignment, &refined, &allocated);
        report.stats.feasibility_ms = feasibility_ms;
        report.stats.solve_ms = solve_ms;
        report.stats.refine_ms = refine_ms;
        report.stats.total_ms = total_timer.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            total_cost = report.stats.total_cost,
            objective_value = report.stats.objective_value,
            unplaced_count = report.stats.unplaced_count,
            total_ms = report.stats.total_ms,
            "周排班优化完成"
        );
        self.publish_event(
            &run_id,
            OptimizeEventType::ReportReady,
            OptimizePhase::Reporting,
            format!(
                "总成本 {:.2}, 未安置 {}",
                report.stats.total_cost, report.stats.unplaced_count
            ),
        );

        Ok(report)
    }

    /// 从配置读取器解析运行期配置
    async fn resolve_config(&self) -> Result<OptimizerConfig, OptimizeError> {
        let reader = &*self.config;
        let granularity_min = reader
            .get_granularity_min()
            .await
            .map_err(|e| OptimizeError::Other(anyhow::anyhow!("读取 granularity_min 失败: {}", e)))?;
        let use_refinement = reader
            .get_use_refinement()
            .await
            .map_err(|e| OptimizeError::Other(anyhow::anyhow!("读取 use_refinement 失败: {}", e)))?;
        let headcount_domain = reader
            .get_headcount_domain()
            .await
            .map_err(|e| OptimizeError::Other(anyhow::anyhow!("读取 headcount_domain 失败: {}", e)))?;
        let solver_timeout_ms = reader
            .get_solver_timeout_ms()
            .await
            .map_err(|e| OptimizeError::Other(anyhow::anyhow!("读取 solver_timeout_ms 失败: {}", e)))?;
        Ok(OptimizerConfig {
            granularity_min,
            use_refinement,
            headcount_domain,
            solver_timeout_ms,
        })
    }

    /// 并行细化各使用实例 (实例间无共享可变状态, 实例内严格串行)
    async fn refine_parallel(
        &self,
        graph: &crate::engine::feasibility::FeasibilityGraph,
        grouped: &[Vec<usize>],
        granularity_min: u32,
    ) -> Result<Vec<RefinedInstance>, OptimizeError> {
        let handles: Vec<_> = grouped
            .iter()
            .enumerate()
            .filter(|(_, task_idxs)| !task_idxs.is_empty())
            .map(|(instance_idx, task_idxs)| {
                let refiner = self.refiner.clone();
                let instance = graph.instances[instance_idx].clone();
                let instance_tasks: Vec<CareTask> = task_idxs
                    .iter()
                    .map(|&i| graph.tasks[i].clone())
                    .collect();
                tokio::task::spawn_blocking(move || {
                    refiner.refine_instance(&instance, &instance_tasks, granularity_min)
                })
            })
            .collect();

        let mut refined = Vec::with_capacity(handles.len());
        for joined in join_all(handles).await {
            let r = joined
                .map_err(|e| OptimizeError::Other(anyhow::anyhow!("细化任务异常: {}", e)))?;
            refined.push(r);
        }
        Ok(refined)
    }

    /// 跳过细化时的落位: 按请求窗口起点执行, 人数取粗粒度上界
    fn coarse_placements(
        graph: &crate::engine::feasibility::FeasibilityGraph,
        grouped: &[Vec<usize>],
        coarse_headcount: &[u32],
    ) -> Vec<RefinedInstance> {
        grouped
            .iter()
            .enumerate()
            .filter(|(_, task_idxs)| !task_idxs.is_empty())
            .map(|(instance_idx, task_idxs)| {
                let instance = &graph.instances[instance_idx];
                let placements: Vec<Placement> = task_idxs
                    .iter()
                    .map(|&task_idx| {
                        let task = &graph.tasks[task_idx];
                        Placement {
                            task_id: task.task_id.clone(),
                            instance_id: instance.instance_id.clone(),
                            weekday: instance.weekday,
                            realized_window: TimeWindow::from_start_duration(
                                task.window.start_min,
                                task.duration_min,
                            ),
                            nurses_required: task.nurses_required,
                        }
                    })
                    .collect();
                RefinedInstance {
                    instance_id: instance.instance_id.clone(),
                    weekday: instance.weekday,
                    peak_headcount: coarse_headcount[instance_idx],
                    placements,
                    failures: vec![],
                }
            })
            .collect()
    }
}
