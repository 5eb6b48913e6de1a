//! Deadline evaluation outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of evaluating a deadline record at an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeadlineStatus {
    /// The submission window has not opened yet.
    WindowNotOpen {
        /// When the window opens.
        opens_at: DateTime<Utc>,
    },
    /// The submission window has closed. Overrides any grace period.
    WindowClosed {
        /// When the window closed.
        closed_at: DateTime<Utc>,
    },
    /// Past the effective deadline and late action is not permitted.
    Locked {
        /// Deadline plus grace.
        effective_deadline: DateTime<Utc>,
        /// Whole minutes past the effective deadline.
        minutes_late: i64,
    },
    /// Past the effective deadline, permitted but flagged late.
    LateAllowed {
        /// Whole minutes past the effective deadline.
        minutes_late: i64,
    },
    /// At or before the effective deadline.
    OnTime {
        /// Deadline plus grace.
        effective_deadline: DateTime<Utc>,
    },
    /// No deadline record applies.
    NoDeadlineDefined,
}

/// Fieldless discriminant of [`DeadlineStatus`], used for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    WindowNotOpen,
    WindowClosed,
    Locked,
    LateAllowed,
    OnTime,
    NoDeadlineDefined,
}

impl StatusKind {
    /// Snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindowNotOpen => "window_not_open",
            Self::WindowClosed => "window_closed",
            Self::Locked => "locked",
            Self::LateAllowed => "late_allowed",
            Self::OnTime => "on_time",
            Self::NoDeadlineDefined => "no_deadline_defined",
        }
    }
}

impl DeadlineStatus {
    /// Discriminant without payload.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::WindowNotOpen { .. } => StatusKind::WindowNotOpen,
            Self::WindowClosed { .. } => StatusKind::WindowClosed,
            Self::Locked { .. } => StatusKind::Locked,
            Self::LateAllowed { .. } => StatusKind::LateAllowed,
            Self::OnTime { .. } => StatusKind::OnTime,
            Self::NoDeadlineDefined => StatusKind::NoDeadlineDefined,
        }
    }

    /// Whether the action may proceed under this status.
    #[must_use]
    pub const fn permits_action(&self) -> bool {
        matches!(
            self,
            Self::OnTime { .. } | Self::LateAllowed { .. } | Self::NoDeadlineDefined
        )
    }

    /// Past the effective deadline, regardless of lock policy.
    #[must_use]
    pub const fn is_past_deadline(&self) -> bool {
        matches!(self, Self::Locked { .. } | Self::LateAllowed { .. })
    }

    /// Minutes late, when past the effective deadline.
    #[must_use]
    pub const fn minutes_late(&self) -> Option<i64> {
        match self {
            Self::Locked { minutes_late, .. } | Self::LateAllowed { minutes_late } => {
                Some(*minutes_late)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_status_tag() {
        let status = DeadlineStatus::LateAllowed { minutes_late: 90 };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "late_allowed");
        assert_eq!(json["minutes_late"], 90);
    }

    #[test]
    fn unit_variant_serializes_with_tag_only() {
        let json = serde_json::to_value(DeadlineStatus::NoDeadlineDefined).unwrap();
        assert_eq!(json, serde_json::json!({"status": "no_deadline_defined"}));
    }

    #[test]
    fn permits_action_partition() {
        let now = Utc::now();
        assert!(DeadlineStatus::NoDeadlineDefined.permits_action());
        assert!(DeadlineStatus::OnTime { effective_deadline: now }.permits_action());
        assert!(DeadlineStatus::LateAllowed { minutes_late: 1 }.permits_action());
        assert!(!DeadlineStatus::WindowClosed { closed_at: now }.permits_action());
        assert!(!DeadlineStatus::WindowNotOpen { opens_at: now }.permits_action());
        assert!(
            !DeadlineStatus::Locked {
                effective_deadline: now,
                minutes_late: 1
            }
            .permits_action()
        );
    }

    #[test]
    fn past_deadline_ignores_window_states() {
        let now = Utc::now();
        assert!(!DeadlineStatus::WindowClosed { closed_at: now }.is_past_deadline());
        assert!(DeadlineStatus::LateAllowed { minutes_late: 0 }.is_past_deadline());
    }

    #[test]
    fn display_uses_kind_label() {
        assert_eq!(
            DeadlineStatus::NoDeadlineDefined.to_string(),
            "no_deadline_defined"
        );
    }
}
