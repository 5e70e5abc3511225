// ==========================================
// 护理排班优化系统 - 护理任务实体
// ==========================================
// 依据: Roster_Engine_Specs_v1.0.md - 3.1 护理任务
// ==========================================

use crate::domain::time::{TimeWindow, MINUTES_PER_DAY};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

// ==========================================
// CareTask - 护理任务
// ==========================================
// 一条周内重复的护理需求: 指定星期、执行时间窗、时长与所需护士数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareTask {
    pub task_id: String,    // 任务编号 (周内唯一)
    pub task_name: String,  // 任务名称 (展示用)
    pub weekday: Weekday,   // 执行星期
    pub window: TimeWindow, // 请求执行窗口 (可跨午夜)
    pub duration_min: u32,  // 执行时长 (分钟, > 0)
    pub nurses_required: u32, // 所需护士数 (> 0)
}

impl CareTask {
    /// 任务是否可在自身请求窗口内完整执行
    ///
    /// 时长超过窗口长度的任务在可行性阶段即判不可行
    pub fn fits_own_window(&self) -> bool {
        self.duration_min <= self.window.duration_min()
    }

    /// 字段合法性校验, 返回首个违规描述
    pub fn validate(&self) -> Result<(), String> {
        if self.task_id.trim().is_empty() {
            return Err("task_id 为空".to_string());
        }
        if self.duration_min == 0 {
            return Err(format!("任务 {} duration_min 必须 > 0", self.task_id));
        }
        if self.duration_min > MINUTES_PER_DAY {
            return Err(format!(
                "任务 {} duration_min {} 超过一天上限 {}",
                self.task_id, self.duration_min, MINUTES_PER_DAY
            ));
        }
        if self.nurses_required == 0 {
            return Err(format!("任务 {} nurses_required 必须 > 0", self.task_id));
        }
        if !self.window.in_valid_range() {
            return Err(format!(
                "任务 {} 窗口越界: start_min {} (须 < 1440), end_min {} (须 <= 1440)",
                self.task_id, self.window.start_min, self.window.end_min
            ));
        }
        if self.window.is_empty() {
            return Err(format!("任务 {} 执行窗口为空", self.task_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> CareTask {
        CareTask {
            task_id: "T001".to_string(),
            task_name: "晨间查房".to_string(),
            weekday: Weekday::Mon,
            window: TimeWindow::from_hm(9, 0, 11, 0),
            duration_min: 60,
            nurses_required: 2,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_task().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_duration() {
        let mut t = sample_task();
        t.duration_min = 0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_validate_zero_nurses() {
        let mut t = sample_task();
        t.nurses_required = 0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_validate_out_of_range_window() {
        let mut t = sample_task();
        t.window = TimeWindow {
            start_min: 2000,
            end_min: 100,
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_raw_json_out_of_range_window_rejected() {
        // 反序列化不经 TimeWindow::new 归一化, 越界字段由校验层拦截
        let raw = r#"{
            "task_id": "T-RAW",
            "task_name": "越界窗口",
            "weekday": "Mon",
            "window": { "start_min": 2000, "end_min": 100 },
            "duration_min": 30,
            "nurses_required": 1
        }"#;
        let t: CareTask = serde_json::from_str(raw).unwrap();
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_fits_own_window() {
        let mut t = sample_task();
        assert!(t.fits_own_window());
        t.duration_min = 121; // 窗口仅 120 分钟
        assert!(!t.fits_own_window());
    }

    #[test]
    fn test_fits_overnight_window() {
        let mut t = sample_task();
        t.window = TimeWindow::from_hm(23, 30, 0, 30);
        t.duration_min = 60;
        assert!(t.fits_own_window());
        t.duration_min = 61;
        assert!(!t.fits_own_window());
    }
}
