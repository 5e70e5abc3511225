// ==========================================
// 护理排班优化系统 - 已解析优化配置
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 2. 求解配置
// ==========================================
// 职责: 引擎运行期使用的配置值对象 (一次解析, 多处只读)
// ==========================================

use crate::domain::time::MINUTES_PER_DAY;
use crate::domain::types::HeadcountDomain;
use serde::{Deserialize, Serialize};

// ==========================================
// OptimizerConfig - 已解析优化配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub granularity_min: u32,            // 时间粒度 (分钟), 须整除 1440
    pub use_refinement: bool,            // 是否执行细化阶段
    pub headcount_domain: HeadcountDomain, // 人数变量域
    pub solver_timeout_ms: u64,          // 求解超时 (毫秒)
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            granularity_min: 15,
            use_refinement: true,
            headcount_domain: HeadcountDomain::Integer,
            solver_timeout_ms: 30_000,
        }
    }
}

impl OptimizerConfig {
    /// 配置合法性校验
    ///
    /// # 返回
    /// - Err(String): 首个违规描述
    pub fn validate(&self) -> Result<(), String> {
        if self.granularity_min == 0 {
            return Err("granularity_min 必须 > 0".to_string());
        }
        if MINUTES_PER_DAY % self.granularity_min != 0 {
            return Err(format!(
                "granularity_min {} 必须整除 {}",
                self.granularity_min, MINUTES_PER_DAY
            ));
        }
        if self.solver_timeout_ms == 0 {
            return Err("solver_timeout_ms 必须 > 0".to_string());
        }
        Ok(())
    }
}
