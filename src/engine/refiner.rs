// ==========================================
// 护理排班优化系统 - 区间装箱细化引擎
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 4.3 区间装箱细化
// 红线: 逐任务贪心, 峰值最小优先、同峰值取最早起点; 是启发式而非全局最优
// 红线: 落位失败记录原因后继续, 不中断整个实例
// 红线: 分钟需求表为每次调用新建的本地状态, 实例间互不共享
// ==========================================
// 职责: 将粗粒度指派细化为具体执行时段, 计算真实峰值并发人数
// ==========================================

use crate::domain::schedule::Placement;
use crate::domain::shift::ShiftInstance;
use crate::domain::task::CareTask;
use crate::domain::types::UnplacedReason;
use crate::engine::error::PlacementFailure;
use chrono::Weekday;
use tracing::instrument;

// ==========================================
// DemandTable - 分钟需求表
// ==========================================
// 以班次相对分钟为下标的并发护士数数组, 单实例细化期间独占可变
struct DemandTable {
    demand: Vec<u32>,
    global_peak: u32,
}

impl DemandTable {
    fn new(len_min: u32) -> Self {
        Self {
            demand: vec![0; len_min as usize],
            global_peak: 0,
        }
    }

    /// 假设在 [start, start+duration) 叠加 nurses 人后的全表峰值
    fn peak_if_added(&self, start: u32, duration: u32, nurses: u32) -> u32 {
        let inside_max = self.demand[start as usize..(start + duration) as usize]
            .iter()
            .max()
            .copied()
            .unwrap_or(0);
        self.global_peak.max(inside_max + nurses)
    }

    /// 提交落位, 更新需求与峰值
    fn commit(&mut self, start: u32, duration: u32, nurses: u32) {
        for slot in &mut self.demand[start as usize..(start + duration) as usize] {
            *slot += nurses;
            if *slot > self.global_peak {
                self.global_peak = *slot;
            }
        }
    }
}

// ==========================================
// RefinedInstance - 单实例细化结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RefinedInstance {
    pub instance_id: String,
    pub weekday: Weekday,
    pub peak_headcount: u32, // 细化后的真实峰值并发人数
    pub placements: Vec<Placement>,
    pub failures: Vec<PlacementFailure>,
}

// ==========================================
// PackingRefiner - 区间装箱细化引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PackingRefiner;

impl PackingRefiner {
    pub fn new() -> Self {
        PackingRefiner
    }

    /// 细化单个班次实例
    ///
    /// # 参数
    /// - `instance`: 班次实例 (自带窗口与休息段)
    /// - `tasks`: 指派到该实例的任务
    /// - `granularity_min`: 起点对齐粒度 (须整除 1440)
    ///
    /// # 返回
    /// - RefinedInstance: 落位、失败记录与峰值人数
    #[instrument(skip(self, instance, tasks), fields(
        instance_id = %instance.instance_id,
        task_count = tasks.len(),
        granularity_min = granularity_min
    ))]
    pub fn refine_instance(
        &self,
        instance: &ShiftInstance,
        tasks: &[CareTask],
        granularity_min: u32,
    ) -> RefinedInstance {
        let len = instance.duration_min();
        let periods = Self::usable_periods(instance);
        let mut table = DemandTable::new(len);
        let mut placements: Vec<Placement> = Vec::new();
        let mut failures: Vec<PlacementFailure> = Vec::new();

        // === 步骤 1: 确定性任务顺序 (窗口起点升序, 时长降序, 编号升序) ===
        let mut ordered: Vec<&CareTask> = tasks.iter().collect();
        ordered.sort_by(|a, b| {
            let ra = instance.window.offset_from_start(a.window.start_min);
            let rb = instance.window.offset_from_start(b.window.start_min);
            ra.cmp(&rb)
                .then(b.duration_min.cmp(&a.duration_min))
                .then(a.task_id.cmp(&b.task_id))
        });

        for task in ordered {
            let task_lo = instance.window.offset_from_start(task.window.start_min);
            let task_hi = task_lo.saturating_add(task.window.duration_min()).min(len);

            // === 步骤 2: 候选起点枚举 ===
            let candidates = Self::candidate_offsets(
                instance.window.start_min,
                granularity_min,
                &periods,
                task_lo,
                task_hi,
                task.duration_min,
            );

            if candidates.is_empty() {
                failures.push(Self::classify_failure(
                    instance,
                    task,
                    granularity_min,
                    task_lo,
                    task_hi,
                    len,
                ));
                continue;
            }

            // === 步骤 3: 峰值最小候选选择 (升序枚举, 同峰值保留最早) ===
            let mut best_offset = candidates[0];
            let mut best_peak =
                table.peak_if_added(candidates[0], task.duration_min, task.nurses_required);
            for &offset in &candidates[1..] {
                let peak = table.peak_if_added(offset, task.duration_min, task.nurses_required);
                if peak < best_peak {
                    best_peak = peak;
                    best_offset = offset;
                }
            }

            // === 步骤 4: 提交落位 ===
            table.commit(best_offset, task.duration_min, task.nurses_required);
            let realized = crate::domain::time::TimeWindow::from_start_duration(
                instance.window.minute_at_offset(best_offset),
                task.duration_min,
            );
            placements.push(Placement {
                task_id: task.task_id.clone(),
                instance_id: instance.instance_id.clone(),
                weekday: instance.weekday,
                realized_window: realized,
                nurses_required: task.nurses_required,
            });
        }

        tracing::debug!(
            instance_id = %instance.instance_id,
            placed = placements.len(),
            failed = failures.len(),
            peak = table.global_peak,
            "实例细化完成"
        );

        RefinedInstance {
            instance_id: instance.instance_id.clone(),
            weekday: instance.weekday,
            peak_headcount: table.global_peak,
            placements,
            failures,
        }
    }

    /// 班次窗口扣除休息段后的可用子时段 (班次相对坐标, 升序)
    fn usable_periods(instance: &ShiftInstance) -> Vec<(u32, u32)> {
        let len = instance.duration_min();
        match instance.break_window {
            None => vec![(0, len)],
            Some(brk) => {
                let b0 = instance.window.offset_from_start(brk.start_min);
                let b1 = b0 + brk.duration_min();
                let mut periods = Vec::with_capacity(2);
                if b0 > 0 {
                    periods.push((0, b0));
                }
                if b1 < len {
                    periods.push((b1, len));
                }
                periods
            }
        }
    }

    /// 枚举对齐候选起点 (班次相对坐标, 升序)
    ///
    /// 候选须同时满足: 对齐绝对粒度、落在任务自身窗口内、
    /// 完整落在某个可用子时段内 (即不与休息段相交)
    fn candidate_offsets(
        window_start_abs: u32,
        granularity: u32,
        periods: &[(u32, u32)],
        task_lo: u32,
        task_hi: u32,
        duration: u32,
    ) -> Vec<u32> {
        let mut out = Vec::new();
        for &(p0, p1) in periods {
            let lo = p0.max(task_lo);
            let hi = p1.min(task_hi);
            let limit = match hi.checked_sub(duration) {
                Some(l) if l >= lo => l,
                _ => continue,
            };
            // 对齐按绝对分钟取模; 粒度整除 1440, 跨午夜取模口径一致
            let rem = (window_start_abs + lo) % granularity;
            let mut offset = if rem == 0 { lo } else { lo + (granularity - rem) };
            while offset <= limit {
                out.push(offset);
                offset += granularity;
            }
        }
        out
    }

    /// 落位失败归因: 忽略休息段仍无候选 → 无对齐起点; 否则为休息段冲突
    fn classify_failure(
        instance: &ShiftInstance,
        task: &CareTask,
        granularity: u32,
        task_lo: u32,
        task_hi: u32,
        len: u32,
    ) -> PlacementFailure {
        let unrestricted = Self::candidate_offsets(
            instance.window.start_min,
            granularity,
            &[(0, len)],
            task_lo,
            task_hi,
            task.duration_min,
        );
        let (reason, detail) = if unrestricted.is_empty() {
            (
                UnplacedReason::NoAlignedStart,
                format!(
                    "窗口 {} 与班次 {} 交集内无满足 {} 分钟粒度的可行起点",
                    task.window, instance.window, granularity
                ),
            )
        } else {
            (
                UnplacedReason::BreakConflict,
                format!(
                    "全部 {} 个候选起点均与休息段 {} 冲突",
                    unrestricted.len(),
                    instance
                        .break_window
                        .map(|w| w.to_string())
                        .unwrap_or_default()
                ),
            )
        };
        PlacementFailure {
            task_id: task.task_id.clone(),
            instance_id: instance.instance_id.clone(),
            weekday: instance.weekday,
            reason,
            detail,
        }
    }
}
