// ==========================================
// 护理排班优化系统 - 班次模板与班次实例
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 3.2 班次模板
// 红线: 休息段必须完整落在班次窗口内, 否则模板非法
// 红线: 实例编号格式 "{shift_id}@{MON..SUN}", 全程唯一键
// ==========================================

use crate::domain::time::{TimeWindow, MINUTES_PER_DAY};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// 星期编码 (实例编号与报表使用, 周一为一周起点)
pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

/// 周一起算的星期序 (0=周一 .. 6=周日)
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// 按周一起算的顺序遍历一周
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ==========================================
// ShiftTemplate - 班次模板
// ==========================================
// 周内重复的护士班次定义: 时间窗、无人可用的休息段、
// 启用星期与人时成本权重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub shift_id: String,       // 班次编号 (唯一)
    pub shift_name: String,     // 班次名称 (展示用)
    pub window: TimeWindow,     // 班次时间窗 (可跨午夜)
    pub break_start_min: u32,   // 休息段起始分钟 (break_duration_min=0 时忽略)
    pub break_duration_min: u32, // 休息段时长 (0 表示无休息段)
    pub weight: f64,            // 人时成本权重 (>= 0)
    pub active_days: [bool; 7], // 启用星期 (周一起算)
}

impl ShiftTemplate {
    /// 休息段窗口, 无休息段返回 None
    pub fn break_window(&self) -> Option<TimeWindow> {
        if self.break_duration_min == 0 {
            None
        } else {
            Some(TimeWindow::from_start_duration(
                self.break_start_min,
                self.break_duration_min,
            ))
        }
    }

    /// 字段合法性校验, 返回首个违规描述
    pub fn validate(&self) -> Result<(), String> {
        if self.shift_id.trim().is_empty() {
            return Err("shift_id 为空".to_string());
        }
        if !self.window.in_valid_range() {
            return Err(format!(
                "班次 {} 窗口越界: start_min {} (须 < 1440), end_min {} (须 <= 1440)",
                self.shift_id, self.window.start_min, self.window.end_min
            ));
        }
        if self.window.is_empty() {
            return Err(format!("班次 {} 时间窗为空", self.shift_id));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!(
                "班次 {} weight {} 必须为非负有限值",
                self.shift_id, self.weight
            ));
        }
        if self.break_duration_min > 0 {
            if self.break_start_min >= MINUTES_PER_DAY {
                return Err(format!(
                    "班次 {} break_start_min {} 越界 (须 < 1440)",
                    self.shift_id, self.break_start_min
                ));
            }
            if self.break_duration_min >= MINUTES_PER_DAY {
                return Err(format!(
                    "班次 {} break_duration_min {} 越界 (须 < 1440)",
                    self.shift_id, self.break_duration_min
                ));
            }
        }
        if let Some(brk) = self.break_window() {
            if !self.window.contains_window(&brk) {
                return Err(format!(
                    "班次 {} 休息段 {} 未完整落在班次窗口 {} 内",
                    self.shift_id, brk, self.window
                ));
            }
        }
        Ok(())
    }

    /// 按启用星期展开为班次实例
    ///
    /// # 返回
    /// 周一至周日顺序的实例列表, 仅含启用日
    pub fn expand_instances(&self) -> Vec<ShiftInstance> {
        WEEKDAYS
            .iter()
            .filter(|wd| self.active_days[weekday_index(**wd)])
            .map(|wd| ShiftInstance {
                instance_id: format!("{}@{}", self.shift_id, weekday_code(*wd)),
                shift_id: self.shift_id.clone(),
                weekday: *wd,
                window: self.window,
                break_window: self.break_window(),
                weight: self.weight,
            })
            .collect()
    }
}

// ==========================================
// ShiftInstance - 班次实例
// ==========================================
// 模板在某个启用星期上的具体化, 自带细化所需的全部字段,
// 可独立送入并行细化任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftInstance {
    pub instance_id: String,              // "{shift_id}@{MON..SUN}"
    pub shift_id: String,                 // 所属模板编号
    pub weekday: Weekday,                 // 实例星期
    pub window: TimeWindow,               // 班次时间窗
    pub break_window: Option<TimeWindow>, // 休息段 (无则 None)
    pub weight: f64,                      // 人时成本权重
}

impl ShiftInstance {
    /// 班次时长 (分钟)
    pub fn duration_min(&self) -> u32 {
        self.window.duration_min()
    }
}
