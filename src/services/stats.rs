//! Schedule-adherence statistics over a task snapshot.
//!
//! Everything here is a pure function of the supplied tasks plus an
//! explicit reference date, so results are reproducible under test and
//! safe to recompute from any number of callers. Malformed or missing
//! dates exclude a task from the affected metric and nothing else.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Utc};

use crate::domain::kpi::{CategorySeries, Kpis, MonthlySeries};
use crate::domain::task::{Task, TaskStatus};

/// Bucket label for tasks without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Lenient day-level parse: RFC 3339, `YYYY-MM-DDTHH:MM:SS`, or plain
/// `YYYY-MM-DD`. Anything else is `None`, never an error.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    raw.parse::<NaiveDate>().ok()
}

fn parse_opt_day(raw: Option<&String>) -> Option<NaiveDate> {
    raw.and_then(|s| parse_day(s))
}

/// Signed whole days from `a` to `b`, positive when `b` is later.
fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Mean rounded half-away-from-zero to one decimal; `None` for an
/// empty sample.
fn average(sample: &[i64]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }
    let mean = sample.iter().sum::<i64>() as f64 / sample.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}

/// Computes the KPI record for a task snapshot.
///
/// `today` is the day-level reference for overdue classification; pass
/// a fixed date in tests, or use [`compute_kpis_now`].
pub fn compute_kpis(tasks: &[Task], today: NaiveDate) -> Kpis {
    let mut kpis = Kpis {
        total: tasks.len(),
        ..Default::default()
    };

    let mut cycle_days: Vec<i64> = Vec::new();
    let mut lead_days: Vec<i64> = Vec::new();
    let mut variance_days: Vec<i64> = Vec::new();

    for task in tasks {
        let created = parse_day(&task.created_at);
        let start = parse_day(&task.start_date);
        let estimated = parse_day(&task.estimated_end_date);
        let real = parse_opt_day(task.real_end_date.as_ref());

        if estimated.is_some() {
            kpis.with_estimate += 1;
        }

        match task.status {
            TaskStatus::Completed => {
                kpis.completed += 1;
                if let (Some(estimated), Some(real)) = (estimated, real) {
                    kpis.closed_with_estimate += 1;
                    if real <= estimated {
                        kpis.closed_on_time += 1;
                    } else {
                        kpis.closed_late += 1;
                    }
                    // positive when finished early or on the estimate
                    variance_days.push(days_between(real, estimated));
                }
                if let (Some(start), Some(real)) = (start, real) {
                    cycle_days.push(days_between(start, real));
                }
                if let (Some(created), Some(real)) = (created, real) {
                    lead_days.push(days_between(created, real));
                }
            }
            TaskStatus::Canceled => {
                kpis.canceled += 1;
            }
            TaskStatus::Pending | TaskStatus::InProgress => {
                // no estimate means nothing to be overdue against
                match estimated {
                    Some(estimated) if estimated < today => kpis.open_overdue += 1,
                    _ => kpis.open_on_track += 1,
                }
            }
        }
    }

    kpis.open = kpis.total - kpis.completed - kpis.canceled;
    kpis.on_time_rate_pct = if kpis.closed_with_estimate > 0 {
        let rate = 100.0 * kpis.closed_on_time as f64 / kpis.closed_with_estimate as f64;
        rate.round() as u32
    } else {
        0
    };
    kpis.avg_cycle_days = average(&cycle_days);
    kpis.avg_lead_days = average(&lead_days);
    kpis.avg_schedule_variance_days = average(&variance_days);
    kpis
}

pub fn compute_kpis_now(tasks: &[Task]) -> Kpis {
    compute_kpis(tasks, Utc::now().date_naive())
}

/// Completed-task counts for the `months_back` calendar months ending
/// at `today`'s month, oldest first. Completions outside the window are
/// silently dropped.
pub fn done_by_month(tasks: &[Task], months_back: usize, today: NaiveDate) -> MonthlySeries {
    let current = start_of_month(today);

    let mut months: Vec<NaiveDate> = Vec::with_capacity(months_back);
    let mut labels: Vec<String> = Vec::with_capacity(months_back);
    for i in (0..months_back).rev() {
        let month = current
            .checked_sub_months(Months::new(i as u32))
            .unwrap_or(current);
        labels.push(month_label(month));
        months.push(month);
    }

    let mut counts = vec![0usize; months_back];
    for task in tasks.iter().filter(|t| t.status == TaskStatus::Completed) {
        let Some(real) = parse_opt_day(task.real_end_date.as_ref()) else {
            continue;
        };
        if let Some(idx) = months.iter().position(|&m| m == start_of_month(real)) {
            counts[idx] += 1;
        }
    }

    MonthlySeries { labels, counts }
}

pub fn done_by_month_now(tasks: &[Task], months_back: usize) -> MonthlySeries {
    done_by_month(tasks, months_back, Utc::now().date_naive())
}

/// Average cycle time of completed tasks grouped by category, labels in
/// first-encountered order. Tasks missing a parseable start or real end
/// date are skipped; empty groups are omitted rather than zero-filled.
pub fn cycle_by_category(tasks: &[Task]) -> CategorySeries {
    let mut groups: Vec<(String, Vec<i64>)> = Vec::new();

    for task in tasks.iter().filter(|t| t.status == TaskStatus::Completed) {
        let (Some(start), Some(real)) = (
            parse_day(&task.start_date),
            parse_opt_day(task.real_end_date.as_ref()),
        ) else {
            continue;
        };

        let label = if task.category.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            task.category.clone()
        };
        let days = days_between(start, real);
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, sample)) => sample.push(days),
            None => groups.push((label, vec![days])),
        }
    }

    let mut series = CategorySeries::default();
    for (label, sample) in groups {
        if let Some(avg) = average(&sample) {
            series.labels.push(label);
            series.values.push(avg);
        }
    }
    series
}
