use anyhow::Result;
use std::sync::Arc;

use taskdash::repository::{Repository, storage::Storage};
use taskdash::services::{TaskService, stats};

fn format_days(value: Option<f64>) -> String {
    match value {
        Some(days) => format!("{days:.1} d"),
        None => "n/a".to_string(),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let path = std::env::var("TASKDASH_DB").unwrap_or_else(|_| "taskdash.json".to_string());
    let storage = Storage::open(&path)?;
    let repository = Arc::new(Repository::new(storage));
    let service = TaskService::new(repository);

    let tasks = service.list_all()?;
    let kpis = stats::compute_kpis_now(&tasks);

    println!("taskdash ({path})");
    println!();
    println!(
        "Tasks: {} total | {} open ({} overdue, {} on track) | {} completed | {} canceled",
        kpis.total,
        kpis.open,
        kpis.open_overdue,
        kpis.open_on_track,
        kpis.completed,
        kpis.canceled,
    );
    println!(
        "On-time rate: {}% ({} of {} estimated completions)",
        kpis.on_time_rate_pct, kpis.closed_on_time, kpis.closed_with_estimate,
    );
    println!(
        "Averages: cycle {} | lead {} | schedule variance {}",
        format_days(kpis.avg_cycle_days),
        format_days(kpis.avg_lead_days),
        format_days(kpis.avg_schedule_variance_days),
    );

    let monthly = stats::done_by_month_now(&tasks, 6);
    println!();
    println!("Completions by month:");
    for (label, count) in monthly.labels.iter().zip(&monthly.counts) {
        println!("  {label:<9} {count}");
    }

    let by_category = stats::cycle_by_category(&tasks);
    if !by_category.labels.is_empty() {
        println!();
        println!("Average cycle time by category:");
        for (label, value) in by_category.labels.iter().zip(&by_category.values) {
            println!("  {label:<20} {value:.1} d");
        }
    }

    Ok(())
}
