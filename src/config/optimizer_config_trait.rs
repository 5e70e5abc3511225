// ==========================================
// 护理排班优化系统 - 优化配置读取接口
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 2. 求解配置
// ==========================================
// 职责: 定义优化引擎读取配置的抽象接口
// 用途: 解耦引擎与配置存储, 支持测试 Mock
// ==========================================

use crate::domain::types::HeadcountDomain;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// OptimizerConfigReader - 优化配置读取接口
// ==========================================
#[async_trait]
pub trait OptimizerConfigReader: Send + Sync {
    // ===== 时间粒度配置 =====

    /// 获取时间粒度 (分钟)
    ///
    /// # 返回
    /// - u32: 粗粒度建模与细化起点对齐共用的粒度 (默认 15)
    async fn get_granularity_min(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    // ===== 细化阶段配置 =====

    /// 是否启用区间装箱细化阶段
    async fn get_use_refinement(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    // ===== 求解器配置 =====

    /// 获取人数变量域 (整数 / 连续松弛)
    async fn get_headcount_domain(&self)
        -> Result<HeadcountDomain, Box<dyn Error + Send + Sync>>;

    /// 获取求解超时 (毫秒)
    async fn get_solver_timeout_ms(&self) -> Result<u64, Box<dyn Error + Send + Sync>>;
}
