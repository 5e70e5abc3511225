// Small dev utility: run the weekly optimizer on a built-in sample ward week.
//
// Usage:
//   cargo run --bin optimize_sample_week -- [granularity_min]
//
// This is intentionally lightweight and prints the report tables to stdout.

use chrono::Weekday;
use nurse_shift_aps::config::{config_keys, ConfigManager};
use nurse_shift_aps::domain::{weekday_code, CareTask, ShiftTemplate, TimeWindow};
use nurse_shift_aps::engine::OptimizeOrchestrator;
use nurse_shift_aps::logging;
use std::sync::Arc;

fn sample_tasks() -> Vec<CareTask> {
    let everyday = [
        ("T-ROUND", "晨间查房", 8 * 60, 10 * 60, 60, 2),
        ("T-MED-AM", "上午给药", 9 * 60, 11 * 60, 30, 1),
        ("T-MED-PM", "下午给药", 15 * 60, 17 * 60, 30, 1),
        ("T-VITALS", "生命体征巡查", 19 * 60, 21 * 60, 45, 1),
    ];
    let mut tasks: Vec<CareTask> = Vec::new();
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        for (id, name, start, end, duration, nurses) in everyday {
            tasks.push(CareTask {
                task_id: format!("{}@{}", id, weekday_code(weekday)),
                task_name: name.to_string(),
                weekday,
                window: TimeWindow::new(start, end),
                duration_min: duration,
                nurses_required: nurses,
            });
        }
    }
    // 跨午夜巡查: 周五 23:30-00:30
    tasks.push(CareTask {
        task_id: "T-NIGHT-CHECK@FRI".to_string(),
        task_name: "午夜重症巡查".to_string(),
        weekday: Weekday::Fri,
        window: TimeWindow::from_hm(23, 30, 0, 30),
        duration_min: 60,
        nurses_required: 1,
    });
    tasks
}

fn sample_shifts() -> Vec<ShiftTemplate> {
    vec![
        ShiftTemplate {
            shift_id: "S-DAY".to_string(),
            shift_name: "白班".to_string(),
            window: TimeWindow::from_hm(7, 0, 15, 0),
            break_start_min: 11 * 60 + 30,
            break_duration_min: 30,
            weight: 100.0,
            active_days: [true; 7],
        },
        ShiftTemplate {
            shift_id: "S-EVE".to_string(),
            shift_name: "小夜班".to_string(),
            window: TimeWindow::from_hm(14, 0, 22, 0),
            break_start_min: 18 * 60,
            break_duration_min: 30,
            weight: 110.0,
            active_days: [true; 7],
        },
        ShiftTemplate {
            shift_id: "S-NIGHT".to_string(),
            shift_name: "大夜班".to_string(),
            window: TimeWindow::from_hm(22, 0, 6, 0),
            break_start_min: 2 * 60,
            break_duration_min: 30,
            weight: 130.0,
            active_days: [true; 7],
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init();

    let config = Arc::new(ConfigManager::new());
    if let Some(granularity) = std::env::args().nth(1) {
        config.set_config_value(config_keys::GRANULARITY_MIN, granularity.trim())?;
    }

    let orchestrator = OptimizeOrchestrator::new(config);
    let report = orchestrator
        .execute_weekly_optimize(sample_tasks(), sample_shifts())
        .await?;

    println!("run_id={}", report.run_id);
    println!();
    println!("== 指派明细 ==");
    for row in &report.rows {
        let realized = row
            .realized_window
            .map(|w| w.to_string())
            .unwrap_or_else(|| "未安置".to_string());
        println!(
            "{} {:24} {:10} 请求 {} 执行 {} 护士 {} 成本 {:.2}",
            weekday_code(row.weekday),
            row.task_id,
            row.instance_id,
            row.requested_window,
            realized,
            row.nurses_required,
            row.allocated_cost
        );
    }

    println!();
    println!("== 实例用量 ==");
    for usage in &report.instance_usages {
        println!(
            "{:12} 粗粒度 {} 人 → 细化 {} 人, 成本 {:.2}",
            usage.instance_id, usage.coarse_headcount, usage.peak_headcount, usage.realized_cost
        );
    }

    println!();
    println!("== 单日汇总 ==");
    for day in &report.day_summaries {
        println!(
            "{} 任务 {} 项, 在岗 {} 人, 成本 {:.2}",
            weekday_code(day.weekday),
            day.tasks_assigned,
            day.workers_assigned,
            day.day_cost
        );
    }

    if !report.unplaced.is_empty() {
        println!();
        println!("== 未安置任务 ==");
        for u in &report.unplaced {
            println!("{} @ {}: {} ({})", u.task_id, u.instance_id, u.reason, u.detail);
        }
    }

    println!();
    println!(
        "总成本 {:.2} (粗粒度目标值 {:.2}), 总耗时 {} ms (求解 {} ms, 细化 {} ms)",
        report.stats.total_cost,
        report.stats.objective_value,
        report.stats.total_ms,
        report.stats.solve_ms,
        report.stats.refine_ms
    );
    Ok(())
}
