//! Dashboard aggregates, recomputed from the full log list on every request.
//!
//! Nothing here is persisted. Input is the owner's logs newest first, which
//! is also the order that decides ties for the top impact category.

use std::collections::HashSet;

use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::model::{ImpactType, WorkLog};

const RECENT_LIMIT: usize = 3;
const SECONDS_PER_DAY: f64 = 86_400.0;
const ACTIVE_WINDOW_DAYS: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactShare {
    pub impact: ImpactType,
    pub count: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentLog {
    pub id: Uuid,
    pub title: String,
    pub impact_type: ImpactType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub active_last_7_days: bool,
    pub active_days_this_week: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_logs: usize,
    /// `YYYY-MM-DD` (UTC) of the newest log.
    pub last_log_date: Option<String>,
    pub top_impact: Option<ImpactType>,
    pub impact_breakdown: Vec<ImpactShare>,
    pub recent: Vec<RecentLog>,
    pub streak: Streak,
}

/// Build dashboard statistics from `logs` (newest first) as of `now`.
#[must_use]
pub fn compute_stats(logs: &[WorkLog], now: OffsetDateTime) -> DashboardStats {
    let impact_breakdown = impact_breakdown(logs);

    let mut top: Option<&ImpactShare> = None;
    for share in &impact_breakdown {
        if top.is_none_or(|t| share.count > t.count) {
            top = Some(share);
        }
    }

    DashboardStats {
        total_logs: logs.len(),
        last_log_date: logs.first().map(|l| utc_date(l.created_at).to_string()),
        top_impact: top.map(|s| s.impact),
        recent: logs
            .iter()
            .take(RECENT_LIMIT)
            .map(|l| RecentLog { id: l.id, title: l.title.clone(), impact_type: l.impact_type, created_at: l.created_at })
            .collect(),
        streak: streak(logs, now),
        impact_breakdown,
    }
}

/// Per-impact counts in first-seen order.
fn impact_breakdown(logs: &[WorkLog]) -> Vec<ImpactShare> {
    let mut shares: Vec<ImpactShare> = Vec::new();
    for log in logs {
        match shares.iter_mut().find(|s| s.impact == log.impact_type) {
            Some(share) => share.count += 1,
            None => shares.push(ImpactShare { impact: log.impact_type, count: 1, percent: 0 }),
        }
    }

    let total = logs.len();
    for share in &mut shares {
        share.percent = rounded_percent(share.count, total);
    }
    shares
}

/// `round(count / total * 100)` with halves rounded up.
pub(crate) fn rounded_percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (count * 200 + total) / (2 * total);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn streak(logs: &[WorkLog], now: OffsetDateTime) -> Streak {
    let week_window = f64::from(now.weekday().number_days_from_sunday()) + 1.0;

    let mut last_7_days: HashSet<Date> = HashSet::new();
    let mut this_week: HashSet<Date> = HashSet::new();

    for log in logs {
        let day = utc_date(log.created_at);
        let diff_days = (now - log.created_at).as_seconds_f64() / SECONDS_PER_DAY;

        if diff_days <= ACTIVE_WINDOW_DAYS {
            last_7_days.insert(day);
        }
        if diff_days <= week_window {
            this_week.insert(day);
        }
    }

    Streak { active_last_7_days: !last_7_days.is_empty(), active_days_this_week: this_week.len() }
}

fn utc_date(at: OffsetDateTime) -> Date {
    at.to_offset(time::UtcOffset::UTC).date()
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
