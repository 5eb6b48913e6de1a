//! Presentation helpers.
//!
//! Evaluation compares UTC instants only. Human output renders them in a
//! fixed local offset, Asia/Bangkok (UTC+7) unless the dataset says
//! otherwise.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::config::schema::DEFAULT_DISPLAY_OFFSET_HOURS;
use crate::gate::Decision;
use crate::resolver::DeadlineStatus;

/// Fixed-offset renderer for UTC instants.
#[derive(Debug, Clone, Copy)]
pub struct LocalDisplay {
    offset: FixedOffset,
}

impl Default for LocalDisplay {
    fn default() -> Self {
        Self::bangkok()
    }
}

impl LocalDisplay {
    /// UTC+7.
    #[must_use]
    pub fn bangkok() -> Self {
        Self::from_hours(DEFAULT_DISPLAY_OFFSET_HOURS)
    }

    /// Renderer for a whole-hour offset. Out-of-range offsets fall back to
    /// UTC+7.
    #[must_use]
    pub fn from_hours(hours: i32) -> Self {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .or_else(|| FixedOffset::east_opt(DEFAULT_DISPLAY_OFFSET_HOURS * 3600))
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    /// `2024-08-01 23:59 (UTC+07:00)`.
    #[must_use]
    pub fn datetime(&self, at: DateTime<Utc>) -> String {
        format!(
            "{} (UTC{})",
            at.with_timezone(&self.offset).format("%Y-%m-%d %H:%M"),
            self.offset
        )
    }

    /// Calendar date in the display offset.
    #[must_use]
    pub fn date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format("%Y-%m-%d").to_string()
    }

    /// One-line description of a status.
    #[must_use]
    pub fn status(&self, status: &DeadlineStatus) -> String {
        match status {
            DeadlineStatus::WindowNotOpen { opens_at } => {
                format!("window not open, opens {}", self.datetime(*opens_at))
            }
            DeadlineStatus::WindowClosed { closed_at } => {
                format!("window closed at {}", self.datetime(*closed_at))
            }
            DeadlineStatus::Locked {
                effective_deadline,
                minutes_late,
            } => format!(
                "locked, {} late (deadline {})",
                minutes(*minutes_late),
                self.datetime(*effective_deadline)
            ),
            DeadlineStatus::LateAllowed { minutes_late } => {
                format!("late but allowed, {} late", minutes(*minutes_late))
            }
            DeadlineStatus::OnTime { effective_deadline } => {
                format!("on time, due {}", self.datetime(*effective_deadline))
            }
            DeadlineStatus::NoDeadlineDefined => "no deadline defined".to_string(),
        }
    }

    /// Multi-line description of a gate decision.
    #[must_use]
    pub fn decision(&self, decision: &Decision) -> String {
        let mut lines = vec![format!(
            "decision: {}",
            if decision.allow { "allow" } else { "deny" }
        )];
        if let Some(status) = &decision.status {
            lines.push(format!("status:   {}", self.status(status)));
        }
        if let Some(d) = &decision.diagnostics {
            lines.push(format!("reason:   {}", d.reason.as_str()));
            if let Some(code) = d.code {
                lines.push(format!("code:     {}", code.as_str()));
            }
            if let Some(name) = &d.deadline_name {
                lines.push(format!("deadline: {name}"));
            }
        }
        lines.join("\n")
    }
}

/// `"1 minute"`, `"90 minutes"`, `"2 days 3 hours"`.
#[must_use]
pub fn minutes(total: i64) -> String {
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("{n} {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };
    if total < 60 * 24 {
        return plural(total, "minute");
    }
    let days = total / (60 * 24);
    let hours = (total % (60 * 24)) / 60;
    if hours == 0 {
        plural(days, "day")
    } else {
        format!("{} {}", plural(days, "day"), plural(hours, "hour"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn renders_in_bangkok_time() {
        let display = LocalDisplay::bangkok();
        assert_eq!(
            display.datetime(utc("2024-08-01T16:59:59Z")),
            "2024-08-01 23:59 (UTC+07:00)"
        );
    }

    #[test]
    fn date_rolls_over_in_local_time() {
        let display = LocalDisplay::default();
        assert_eq!(display.date(utc("2024-08-01T17:00:00Z")), "2024-08-02");
    }

    #[test]
    fn invalid_offset_falls_back() {
        let display = LocalDisplay::from_hours(99);
        assert_eq!(
            display.datetime(utc("2024-08-01T00:00:00Z")),
            "2024-08-01 07:00 (UTC+07:00)"
        );
    }

    #[test]
    fn minute_formatting() {
        assert_eq!(minutes(1), "1 minute");
        assert_eq!(minutes(90), "90 minutes");
        assert_eq!(minutes(60 * 24), "1 day");
        assert_eq!(minutes(60 * 24 * 2 + 180), "2 days 3 hours");
    }

    #[test]
    fn status_lines() {
        let display = LocalDisplay::bangkok();
        assert_eq!(
            display.status(&DeadlineStatus::LateAllowed { minutes_late: 90 }),
            "late but allowed, 90 minutes late"
        );
        assert_eq!(
            display.status(&DeadlineStatus::NoDeadlineDefined),
            "no deadline defined"
        );
    }
}
