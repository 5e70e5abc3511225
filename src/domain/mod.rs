// ==========================================
// 护理排班优化系统 - 领域模型层
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 3. 数据模型
// ==========================================
// 职责: 定义领域实体、时间窗口、结果行结构
// 红线: 不含求解逻辑,不含引擎逻辑
// ==========================================

pub mod schedule;
pub mod shift;
pub mod task;
pub mod time;
pub mod types;

// 重导出核心类型
pub use schedule::{
    AssignmentRow, DaySummary, InstanceUsage, OptimizeReport, OptimizeStats, Placement,
    UnplacedTask,
};
pub use shift::{weekday_code, weekday_index, ShiftInstance, ShiftTemplate, WEEKDAYS};
pub use task::CareTask;
pub use time::{format_minutes, TimeWindow, MINUTES_PER_DAY};
pub use types::{HeadcountDomain, OptimizePhase, UnplacedReason};
