// ==========================================
// 护理排班优化系统 - 领域类型定义
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 2. 求解配置
// 依据: Roster_Engine_Specs_v1.0.md - 6. 未安置原因分类
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 人数变量域 (Headcount Domain)
// ==========================================
// 红线: Integer 为默认; Continuous 仅用于松弛估算, 结果需上取整解释
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeadcountDomain {
    Integer,    // 整数人数 (默认)
    Continuous, // 连续松弛
}

impl fmt::Display for HeadcountDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadcountDomain::Integer => write!(f, "INTEGER"),
            HeadcountDomain::Continuous => write!(f, "CONTINUOUS"),
        }
    }
}

impl HeadcountDomain {
    /// 从配置字符串解析, 未知值回退 Integer
    pub fn from_config_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "CONTINUOUS" => HeadcountDomain::Continuous,
            _ => HeadcountDomain::Integer,
        }
    }
}

// ==========================================
// 未安置原因 (Unplaced Reason)
// ==========================================
// 细化阶段任务无法落位时的原因分类, 用于报表与人工复核
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnplacedReason {
    NoAlignedStart, // 窗口与班次交集内无对齐的可行起点
    BreakConflict,  // 所有可行起点均与休息段冲突
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnplacedReason::NoAlignedStart => write!(f, "NO_ALIGNED_START"),
            UnplacedReason::BreakConflict => write!(f, "BREAK_CONFLICT"),
        }
    }
}

// ==========================================
// 优化阶段标识 (Optimize Phase)
// ==========================================
// 用于事件发布与阶段耗时统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizePhase {
    Feasibility, // 可行性建图
    CoarseSolve, // 粗粒度精确求解
    Refinement,  // 区间装箱细化
    Reporting,   // 成本分摊与汇总
}

impl fmt::Display for OptimizePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizePhase::Feasibility => write!(f, "FEASIBILITY"),
            OptimizePhase::CoarseSolve => write!(f, "COARSE_SOLVE"),
            OptimizePhase::Refinement => write!(f, "REFINEMENT"),
            OptimizePhase::Reporting => write!(f, "REPORTING"),
        }
    }
}
