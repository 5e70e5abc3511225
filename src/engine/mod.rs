// ==========================================
// 护理排班优化系统 - 引擎层
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 1.2 模块拆分
// ==========================================
// 职责: 实现两阶段优化引擎, 不含输入/展示层逻辑
// 红线: 所有不可行与落位失败必须输出 reason
// ==========================================

pub mod aggregator;
pub mod allocator;
pub mod error;
pub mod events;
pub mod feasibility;
pub mod orchestrator;
pub mod refiner;
pub mod solver;

// 重导出核心引擎
pub use aggregator::ResultAggregator;
pub use allocator::{AllocatedInstance, CostAllocator};
pub use error::{OptimizeError, PlacementFailure};
pub use events::{
    NoOpEventPublisher, OptimizeEvent, OptimizeEventPublisher, OptimizeEventType,
    OptionalEventPublisher,
};
pub use feasibility::{FeasibilityEngine, FeasibilityGraph, FeasiblePair};
pub use orchestrator::OptimizeOrchestrator;
pub use refiner::{PackingRefiner, RefinedInstance};
pub use solver::{AssignmentSolver, CoarseAssignment, MipAssignmentSolver};
