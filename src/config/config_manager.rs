// ==========================================
// 护理排班优化系统 - 配置管理器
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 2. 求解配置
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 进程内 key-value 表 (科室级部署无持久化需求)
// ==========================================

use crate::config::optimizer_config_trait::OptimizerConfigReader;
use crate::config::resolved::OptimizerConfig;
use crate::domain::types::HeadcountDomain;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::Mutex;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    values: Mutex<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置管理器 (全部取默认值)
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }

    /// 从键值对创建配置管理器
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(map),
        }
    }

    /// 写入配置值 (覆盖同键旧值)
    pub fn set_config_value(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let values = self
            .values
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值, 带默认值
    fn get_config_or_default(
        &self,
        key: &str,
        default: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照 (JSON 格式)
    ///
    /// # 用途
    /// - 随报告记录本次运行的配置口径
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        let values = self
            .values
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        let map: HashMap<&String, &String> = values.iter().collect();
        Ok(serde_json::to_string(&json!(map))?)
    }

    /// 一次性解析全部优化配置
    ///
    /// # 返回
    /// - OptimizerConfig: 引擎运行期只读配置
    pub async fn resolve_optimizer_config(
        &self,
    ) -> Result<OptimizerConfig, Box<dyn Error + Send + Sync>> {
        Ok(OptimizerConfig {
            granularity_min: self.get_granularity_min().await?,
            use_refinement: self.get_use_refinement().await?,
            headcount_domain: self.get_headcount_domain().await?,
            solver_timeout_ms: self.get_solver_timeout_ms().await?,
        })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// OptimizerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl OptimizerConfigReader for ConfigManager {
    async fn get_granularity_min(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        let value = self.get_config_or_default(config_keys::GRANULARITY_MIN, "15")?;
        Ok(value.parse::<u32>().unwrap_or(15))
    }

    async fn get_use_refinement(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let value = self.get_config_or_default(config_keys::USE_REFINEMENT, "true")?;
        Ok(value.trim().eq_ignore_ascii_case("true"))
    }

    async fn get_headcount_domain(
        &self,
    ) -> Result<HeadcountDomain, Box<dyn Error + Send + Sync>> {
        let value = self.get_config_or_default(config_keys::HEADCOUNT_DOMAIN, "INTEGER")?;
        Ok(HeadcountDomain::from_config_str(&value))
    }

    async fn get_solver_timeout_ms(&self) -> Result<u64, Box<dyn Error + Send + Sync>> {
        let value = self.get_config_or_default(config_keys::SOLVER_TIMEOUT_MS, "30000")?;
        Ok(value.parse::<u64>().unwrap_or(30_000))
    }
}

// ==========================================
// 配置键常量 (依据 Roster_Engine_Specs 2)
// ==========================================
pub mod config_keys {
    // 时间粒度
    pub const GRANULARITY_MIN: &str = "granularity_min";

    // 细化阶段
    pub const USE_REFINEMENT: &str = "use_refinement";

    // 求解器
    pub const HEADCOUNT_DOMAIN: &str = "headcount_domain";
    pub const SOLVER_TIMEOUT_MS: &str = "solver_timeout_ms";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let mgr = ConfigManager::new();
        assert_eq!(mgr.get_granularity_min().await.unwrap(), 15);
        assert!(mgr.get_use_refinement().await.unwrap());
        assert_eq!(
            mgr.get_headcount_domain().await.unwrap(),
            HeadcountDomain::Integer
        );
        assert_eq!(mgr.get_solver_timeout_ms().await.unwrap(), 30_000);
    }

    #[tokio::test]
    async fn test_overrides() {
        let mgr = ConfigManager::from_pairs([
            (config_keys::GRANULARITY_MIN, "30"),
            (config_keys::USE_REFINEMENT, "false"),
            (config_keys::HEADCOUNT_DOMAIN, "continuous"),
            (config_keys::SOLVER_TIMEOUT_MS, "5000"),
        ]);
        let cfg = mgr.resolve_optimizer_config().await.unwrap();
        assert_eq!(cfg.granularity_min, 30);
        assert!(!cfg.use_refinement);
        assert_eq!(cfg.headcount_domain, HeadcountDomain::Continuous);
        assert_eq!(cfg.solver_timeout_ms, 5000);
    }

    #[tokio::test]
    async fn test_invalid_value_falls_back() {
        let mgr = ConfigManager::from_pairs([(config_keys::GRANULARITY_MIN, "abc")]);
        assert_eq!(mgr.get_granularity_min().await.unwrap(), 15);
    }

    #[test]
    fn test_snapshot_contains_values() {
        let mgr = ConfigManager::from_pairs([(config_keys::GRANULARITY_MIN, "30")]);
        let snapshot = mgr.get_config_snapshot().unwrap();
        assert!(snapshot.contains("granularity_min"));
        assert!(snapshot.contains("30"));
    }
}
