// ==========================================
// 护理排班优化系统 - 引擎层事件发布
// ==========================================
// 职责: 定义优化事件发布 trait，实现依赖倒置
// 说明: Engine 层定义 trait，外层系统实现适配器
// ==========================================

use crate::domain::types::OptimizePhase;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 优化事件类型
// ==========================================

/// 优化事件触发类型
///
/// Engine 层定义的事件类型，用于通知下游系统 (看板、通知服务)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizeEventType {
    /// 可行性建图完成
    FeasibilityBuilt,
    /// 粗粒度指派求解完成
    CoarseAssignmentSolved,
    /// 区间装箱细化完成
    RefinementCompleted,
    /// 报告生成完成
    ReportReady,
}

impl OptimizeEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            OptimizeEventType::FeasibilityBuilt => "FeasibilityBuilt",
            OptimizeEventType::CoarseAssignmentSolved => "CoarseAssignmentSolved",
            OptimizeEventType::RefinementCompleted => "RefinementCompleted",
            OptimizeEventType::ReportReady => "ReportReady",
        }
    }
}

/// 优化事件
///
/// Engine 层发布的事件，包含运行 ID、触发类型与阶段摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeEvent {
    /// 本次运行 ID
    pub run_id: String,
    /// 事件类型
    pub event_type: OptimizeEventType,
    /// 所处阶段
    pub phase: OptimizePhase,
    /// 阶段摘要 (人类可读)
    pub summary: String,
}

impl OptimizeEvent {
    pub fn new(
        run_id: impl Into<String>,
        event_type: OptimizeEventType,
        phase: OptimizePhase,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            event_type,
            phase,
            summary: summary.into(),
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 优化事件发布者 Trait
///
/// Engine 层定义，外层系统实现
/// 通过 trait 实现依赖倒置，Engine 不依赖任何下游通道
pub trait OptimizeEventPublisher: Send + Sync {
    /// 发布优化事件
    ///
    /// # 参数
    /// - `event`: 优化事件
    ///
    /// # 返回
    /// - `Ok(message_id)`: 消息 ID（如果通道支持）或空字符串
    /// - `Err`: 发布失败
    fn publish(&self, event: OptimizeEvent) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
///
/// 用于不需要事件发布的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl OptimizeEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: OptimizeEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - run_id={}, event_type={}",
            event.run_id,
            event.event_type.as_str()
        );
        Ok(String::new())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn OptimizeEventPublisher>> 的使用
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn OptimizeEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn OptimizeEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）
    pub fn publish(&self, event: OptimizeEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => {
                tracing::debug!(
                    "OptionalEventPublisher: 未配置发布者，跳过事件 - run_id={}, event_type={}",
                    event.run_id,
                    event.event_type.as_str()
                );
                Ok(String::new())
            }
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
