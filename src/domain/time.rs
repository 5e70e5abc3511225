// ==========================================
// 护理排班优化系统 - 周内时间窗模型
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 3. 数据模型 (时间表示)
// 红线: 跨午夜窗口 (end < start) 必须在任务侧与班次侧一致处理
// ==========================================
// 表示: 一天内的分钟数, 半开区间 [start, end)
// 约定: start ∈ [0, 1440), end ∈ [0, 1440]; end < start 表示跨午夜
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 一天的分钟总数
pub const MINUTES_PER_DAY: u32 = 1440;

// ==========================================
// TimeWindow - 日内时间窗
// ==========================================
// 半开区间 [start_min, end_min), 以分钟计
// end_min < start_min 表示窗口跨越午夜 (例如 22:00-06:00)
// end_min == start_min 表示空窗口 (由校验层拒绝)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_min: u32, // 起始分钟 (含)
    pub end_min: u32,   // 结束分钟 (不含); 允许 1440 表示整点午夜结束
}

impl TimeWindow {
    /// 创建时间窗
    ///
    /// # 参数
    /// - `start_min`: 起始分钟, 将被归一化到 [0, 1440)
    /// - `end_min`: 结束分钟, 1440 保留为午夜整点结束, 其余归一化到 [0, 1440)
    pub fn new(start_min: u32, end_min: u32) -> Self {
        let start = start_min % MINUTES_PER_DAY;
        let end = if end_min == MINUTES_PER_DAY {
            MINUTES_PER_DAY
        } else {
            end_min % MINUTES_PER_DAY
        };
        Self {
            start_min: start,
            end_min: end,
        }
    }

    /// 从 时:分 创建时间窗 (测试与示例数据常用)
    pub fn from_hm(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Self {
        Self::new(start_h * 60 + start_m, end_h * 60 + end_m)
    }

    /// 字段是否在约定范围内 (start ∈ [0, 1440), end ∈ [0, 1440])
    ///
    /// 反序列化与字面量构造不经 `new` 归一化; 环形算术仅对范围内
    /// 字段有定义, 越界输入由校验层拒绝
    pub fn in_valid_range(&self) -> bool {
        self.start_min < MINUTES_PER_DAY && self.end_min <= MINUTES_PER_DAY
    }

    /// 是否为空窗口
    pub fn is_empty(&self) -> bool {
        self.start_min == self.end_min
    }

    /// 是否跨越午夜
    pub fn wraps_midnight(&self) -> bool {
        self.end_min < self.start_min
    }

    /// 窗口时长 (分钟)
    ///
    /// 跨午夜窗口按环形计算: 22:00-06:00 → 480 分钟
    pub fn duration_min(&self) -> u32 {
        if self.end_min >= self.start_min {
            self.end_min - self.start_min
        } else {
            MINUTES_PER_DAY - self.start_min + self.end_min
        }
    }

    /// 某时刻相对窗口起点的环形偏移 (分钟)
    ///
    /// # 参数
    /// - `t_min`: 一天内的分钟数 [0, 1440)
    ///
    /// # 返回
    /// (t_min - start_min) mod 1440, 始终非负
    pub fn offset_from_start(&self, t_min: u32) -> u32 {
        (t_min % MINUTES_PER_DAY + MINUTES_PER_DAY - self.start_min) % MINUTES_PER_DAY
    }

    /// 窗口起点偏移 offset 分钟后的绝对分钟数 (环形)
    pub fn minute_at_offset(&self, offset: u32) -> u32 {
        (self.start_min + offset) % MINUTES_PER_DAY
    }

    /// 判断某时刻是否落在窗口内
    pub fn contains_instant(&self, t_min: u32) -> bool {
        !self.is_empty() && self.offset_from_start(t_min) < self.duration_min()
    }

    /// 跨午夜感知的窗口包含判定
    ///
    /// 判定 `other` 是否完整落在本窗口内。两侧窗口均可跨午夜:
    /// 将 other 的起点映射到本窗口的相对坐标后, 要求
    /// offset(other.start) + other.duration <= self.duration。
    ///
    /// # 返回
    /// - `true`: other 完整包含于本窗口
    pub fn contains_window(&self, other: &TimeWindow) -> bool {
        if other.is_empty() {
            return false;
        }
        let offset = self.offset_from_start(other.start_min);
        // u64 防止 offset + duration 溢出 (理论上限 1440+1440)
        (offset as u64) + (other.duration_min() as u64) <= self.duration_min() as u64
    }

    /// 跨午夜感知的窗口相交判定
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.offset_from_start(other.start_min) < self.duration_min()
            || other.offset_from_start(self.start_min) < other.duration_min()
    }

    /// 给定起点与时长构造窗口 (终点环形归一化)
    pub fn from_start_duration(start_min: u32, duration_min: u32) -> Self {
        let start = start_min % MINUTES_PER_DAY;
        let raw_end = start + duration_min;
        let end = if raw_end == MINUTES_PER_DAY {
            MINUTES_PER_DAY
        } else {
            raw_end % MINUTES_PER_DAY
        };
        Self {
            start_min: start,
            end_min: end,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            format_minutes(self.start_min),
            format_minutes(self.end_min)
        )
    }
}

/// 分钟数格式化为 HH:MM (1440 显示为 24:00)
pub fn format_minutes(t_min: u32) -> String {
    format!("{:02}:{:02}", t_min / 60, t_min % 60)
}
