// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use nurse_shift_aps::config::OptimizerConfigReader;
use nurse_shift_aps::domain::types::HeadcountDomain;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub granularity_min: u32,
    pub use_refinement: bool,
    pub headcount_domain: HeadcountDomain,
    pub solver_timeout_ms: u64,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            granularity_min: 15,
            use_refinement: true,
            headcount_domain: HeadcountDomain::Integer,
            solver_timeout_ms: 30_000,
        }
    }

    /// 创建指定粒度的配置
    pub fn with_granularity(granularity_min: u32) -> Self {
        let mut config = Self::default();
        config.granularity_min = granularity_min;
        config
    }

    /// 创建跳过细化阶段的配置
    pub fn coarse_only() -> Self {
        let mut config = Self::default();
        config.use_refinement = false;
        config
    }

    /// 创建短超时配置 (超时路径测试用)
    pub fn with_timeout_ms(solver_timeout_ms: u64) -> Self {
        let mut config = Self::default();
        config.solver_timeout_ms = solver_timeout_ms;
        config
    }
}

#[async_trait]
impl OptimizerConfigReader for MockConfig {
    async fn get_granularity_min(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.granularity_min)
    }

    async fn get_use_refinement(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(self.use_refinement)
    }

    async fn get_headcount_domain(
        &self,
    ) -> Result<HeadcountDomain, Box<dyn Error + Send + Sync>> {
        Ok(self.headcount_domain)
    }

    async fn get_solver_timeout_ms(&self) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.solver_timeout_ms)
    }
}
