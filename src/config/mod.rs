// ==========================================
// 护理排班优化系统 - 配置层
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 2. 求解配置
// ==========================================
// 职责: 系统配置管理
// 存储: 进程内 key-value 表
// ==========================================

pub mod config_manager;
pub mod optimizer_config_trait;
pub mod resolved;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use optimizer_config_trait::OptimizerConfigReader;
pub use resolved::OptimizerConfig;
