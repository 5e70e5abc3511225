// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::Weekday;
use nurse_shift_aps::domain::shift::ShiftTemplate;
use nurse_shift_aps::domain::task::CareTask;
use nurse_shift_aps::domain::time::TimeWindow;

// ==========================================
// CareTask 构建器
// ==========================================

pub struct TaskBuilder {
    task_id: String,
    task_name: String,
    weekday: Weekday,
    window: TimeWindow,
    duration_min: u32,
    nurses_required: u32,
}

impl TaskBuilder {
    pub fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            task_name: format!("任务{}", task_id),
            weekday: Weekday::Mon,
            window: TimeWindow::from_hm(9, 0, 11, 0),
            duration_min: 60,
            nurses_required: 1,
        }
    }

    pub fn weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = weekday;
        self
    }

    pub fn window(mut self, start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Self {
        self.window = TimeWindow::from_hm(start_h, start_m, end_h, end_m);
        self
    }

    pub fn duration(mut self, duration_min: u32) -> Self {
        self.duration_min = duration_min;
        self
    }

    pub fn nurses(mut self, nurses_required: u32) -> Self {
        self.nurses_required = nurses_required;
        self
    }

    pub fn build(self) -> CareTask {
        CareTask {
            task_id: self.task_id,
            task_name: self.task_name,
            weekday: self.weekday,
            window: self.window,
            duration_min: self.duration_min,
            nurses_required: self.nurses_required,
        }
    }
}

// ==========================================
// ShiftTemplate 构建器
// ==========================================

pub struct ShiftBuilder {
    shift_id: String,
    shift_name: String,
    window: TimeWindow,
    break_start_min: u32,
    break_duration_min: u32,
    weight: f64,
    active_days: [bool; 7],
}

impl ShiftBuilder {
    pub fn new(shift_id: &str) -> Self {
        Self {
            shift_id: shift_id.to_string(),
            shift_name: format!("班次{}", shift_id),
            window: TimeWindow::from_hm(7, 0, 15, 0),
            break_start_min: 0,
            break_duration_min: 0,
            weight: 100.0,
            active_days: [true; 7],
        }
    }

    pub fn window(mut self, start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Self {
        self.window = TimeWindow::from_hm(start_h, start_m, end_h, end_m);
        self
    }

    pub fn break_at(mut self, start_h: u32, start_m: u32, duration_min: u32) -> Self {
        self.break_start_min = start_h * 60 + start_m;
        self.break_duration_min = duration_min;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn active_days(mut self, active_days: [bool; 7]) -> Self {
        self.active_days = active_days;
        self
    }

    pub fn only_on(mut self, weekday: Weekday) -> Self {
        let mut days = [false; 7];
        days[weekday.num_days_from_monday() as usize] = true;
        self.active_days = days;
        self
    }

    pub fn build(self) -> ShiftTemplate {
        ShiftTemplate {
            shift_id: self.shift_id,
            shift_name: self.shift_name,
            window: self.window,
            break_start_min: self.break_start_min,
            break_duration_min: self.break_duration_min,
            weight: self.weight,
            active_days: self.active_days,
        }
    }
}
