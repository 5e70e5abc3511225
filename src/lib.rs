// ==========================================
// 护理排班优化系统 - 核心库
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 系统宪法
// 技术栈: Rust + good_lp (microlp)
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 两阶段优化
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{HeadcountDomain, OptimizePhase, UnplacedReason};

// 领域实体
pub use domain::{
    AssignmentRow, CareTask, DaySummary, InstanceUsage, OptimizeReport, OptimizeStats, Placement,
    ShiftInstance, ShiftTemplate, TimeWindow, UnplacedTask,
};

// 引擎
pub use engine::{
    AssignmentSolver, CostAllocator, FeasibilityEngine, MipAssignmentSolver, OptimizeError,
    OptimizeOrchestrator, PackingRefiner, ResultAggregator,
};

// 配置
pub use config::{ConfigManager, OptimizerConfig, OptimizerConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "护理排班优化系统";

// ==========================================
// 预编译检查
// ==========================================
