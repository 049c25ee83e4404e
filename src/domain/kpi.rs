use serde::{Deserialize, Serialize};

/// Schedule-adherence metrics derived from a task snapshot.
///
/// Counts are disjoint: `completed + canceled + open == total` and
/// `open_overdue + open_on_track == open`. The averages are `None`
/// whenever their sample set is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Kpis {
    pub total: usize,
    pub completed: usize,
    pub canceled: usize,
    pub open: usize,
    pub open_overdue: usize,
    pub open_on_track: usize,
    /// Completed on or before the estimate, among `closed_with_estimate`.
    pub closed_on_time: usize,
    pub closed_late: usize,
    /// Tasks whose estimated end date parses, regardless of status.
    pub with_estimate: usize,
    /// Completed tasks with both an estimate and a real end date.
    pub closed_with_estimate: usize,
    /// `closed_on_time / closed_with_estimate`, or 0 with no denominator.
    pub on_time_rate_pct: u32,
    /// Mean days from start to real end, one decimal.
    pub avg_cycle_days: Option<f64>,
    /// Mean days from creation to real end, one decimal.
    pub avg_lead_days: Option<f64>,
    /// Mean of (estimated - real) in days; positive = finished early.
    pub avg_schedule_variance_days: Option<f64>,
}

/// Completed-task counts per calendar month, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

/// Average cycle time per category, in first-encountered order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategorySeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}
