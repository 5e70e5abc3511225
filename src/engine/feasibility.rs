// ==========================================
// 护理排班优化系统 - 可行性建图引擎
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 4.1 模型构建
// 红线: 可行对 = 同星期 + 班次窗口包含任务窗口 (跨午夜两侧一致)
// 红线: 零候选任务必须显式告警, 不得静默丢弃
// ==========================================
// 职责: 输入校验、班次实例展开、稀疏可行图构建
// ==========================================

use crate::domain::shift::{ShiftInstance, ShiftTemplate};
use crate::domain::task::CareTask;
use crate::engine::error::OptimizeError;
use std::collections::HashSet;
use tracing::instrument;

// ==========================================
// FeasiblePair - 可行 (任务, 班次实例) 对
// ==========================================
// 下标指向 FeasibilityGraph 的 tasks / instances 向量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeasiblePair {
    pub task_idx: usize,
    pub instance_idx: usize,
}

// ==========================================
// FeasibilityGraph - 稀疏可行图
// ==========================================
// 构建完成后只读, 供求解器与细化阶段共享
#[derive(Debug, Clone)]
pub struct FeasibilityGraph {
    pub tasks: Vec<CareTask>,            // 校验后的任务 (输入顺序)
    pub instances: Vec<ShiftInstance>,   // 展开后的班次实例
    pub pairs: Vec<FeasiblePair>,        // 稀疏可行对
    pub task_pairs: Vec<Vec<usize>>,     // task_idx → pairs 下标
    pub instance_pairs: Vec<Vec<usize>>, // instance_idx → pairs 下标
    pub warnings: Vec<String>,           // 建图告警 (零候选任务等)
}

impl FeasibilityGraph {
    /// 无任何候选班次实例的任务编号列表
    pub fn infeasible_task_ids(&self) -> Vec<String> {
        self.task_pairs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_empty())
            .map(|(idx, _)| self.tasks[idx].task_id.clone())
            .collect()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }
}

// ==========================================
// FeasibilityEngine - 可行性建图引擎
// ==========================================
pub struct FeasibilityEngine;

impl FeasibilityEngine {
    pub fn new() -> Self {
        FeasibilityEngine
    }

    /// 构建可行图
    ///
    /// # 参数
    /// - `tasks`: 护理任务列表
    /// - `shifts`: 班次模板列表
    ///
    /// # 返回
    /// - Ok(FeasibilityGraph): 校验通过的稀疏可行图 (可能带告警)
    /// - Err(OptimizeError): 输入为空或字段非法
    #[instrument(skip(self, tasks, shifts), fields(
        task_count = tasks.len(),
        shift_count = shifts.len()
    ))]
    pub fn build(
        &self,
        tasks: &[CareTask],
        shifts: &[ShiftTemplate],
    ) -> Result<FeasibilityGraph, OptimizeError> {
        // === 步骤 1: 空输入检查 ===
        if tasks.is_empty() {
            return Err(OptimizeError::EmptyInput("任务列表为空".to_string()));
        }
        if shifts.is_empty() {
            return Err(OptimizeError::EmptyInput("班次模板列表为空".to_string()));
        }

        // === 步骤 2: 实体字段校验 ===
        for task in tasks {
            task.validate().map_err(OptimizeError::InvalidInput)?;
        }
        for shift in shifts {
            shift.validate().map_err(OptimizeError::InvalidInput)?;
        }

        // === 步骤 3: 编号唯一性校验 ===
        let mut seen_tasks: HashSet<&str> = HashSet::new();
        for task in tasks {
            if !seen_tasks.insert(task.task_id.as_str()) {
                return Err(OptimizeError::InvalidInput(format!(
                    "任务编号重复: {}",
                    task.task_id
                )));
            }
        }
        let mut seen_shifts: HashSet<&str> = HashSet::new();
        for shift in shifts {
            if !seen_shifts.insert(shift.shift_id.as_str()) {
                return Err(OptimizeError::InvalidInput(format!(
                    "班次编号重复: {}",
                    shift.shift_id
                )));
            }
        }

        // === 步骤 4: 班次实例展开 ===
        let instances: Vec<ShiftInstance> = shifts
            .iter()
            .flat_map(|s| s.expand_instances())
            .collect();
        if instances.is_empty() {
            return Err(OptimizeError::EmptyInput(
                "所有班次模板均未启用任何星期".to_string(),
            ));
        }

        // === 步骤 5: 稀疏可行对计算 ===
        let mut pairs: Vec<FeasiblePair> = Vec::new();
        let mut task_pairs: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        let mut instance_pairs: Vec<Vec<usize>> = vec![Vec::new(); instances.len()];

        for (task_idx, task) in tasks.iter().enumerate() {
            // 时长超过自身窗口的任务永远无法落位, 不产生任何可行对
            if !task.fits_own_window() {
                continue;
            }
            for (instance_idx, instance) in instances.iter().enumerate() {
                if instance.weekday != task.weekday {
                    continue;
                }
                if !instance.window.contains_window(&task.window) {
                    continue;
                }
                let pair_idx = pairs.len();
                pairs.push(FeasiblePair {
                    task_idx,
                    instance_idx,
                });
                task_pairs[task_idx].push(pair_idx);
                instance_pairs[instance_idx].push(pair_idx);
            }
        }

        // === 步骤 6: 零候选告警 ===
        let mut warnings: Vec<String> = Vec::new();
        for (task_idx, task) in tasks.iter().enumerate() {
            if !task_pairs[task_idx].is_empty() {
                continue;
            }
            let cause = if !task.fits_own_window() {
                format!(
                    "时长 {} 分钟超过自身窗口 {} ({} 分钟)",
                    task.duration_min,
                    task.window,
                    task.window.duration_min()
                )
            } else {
                format!("无同星期且窗口包含 {} 的班次实例", task.window)
            };
            warnings.push(format!("任务 {} 无候选班次: {}", task.task_id, cause));
        }

        tracing::debug!(
            task_count = tasks.len(),
            instance_count = instances.len(),
            pair_count = pairs.len(),
            warning_count = warnings.len(),
            "可行图构建完成"
        );

        Ok(FeasibilityGraph {
            tasks: tasks.to_vec(),
            instances,
            pairs,
            task_pairs,
            instance_pairs,
            warnings,
        })
    }
}

impl Default for FeasibilityEngine {
    fn default() -> Self {
        Self::new()
    }
}
