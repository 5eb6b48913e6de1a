//! Deadline resolver
//!
//! Pure evaluation of one deadline record at one instant. The caller always
//! supplies `now`; nothing here reads a clock, logs, or touches shared
//! state, so [`evaluate`] is safe to call from any number of threads.
//!
//! Rules, first match wins:
//!
//! 1. no record → [`DeadlineStatus::NoDeadlineDefined`]
//! 2. `now < window_start_at` → [`DeadlineStatus::WindowNotOpen`]
//! 3. `now > window_end_at` → [`DeadlineStatus::WindowClosed`]
//! 4. `now <= deadline_at + grace` → [`DeadlineStatus::OnTime`]
//! 5. past the effective deadline: `lock_after_deadline` or `!allow_late`
//!    → [`DeadlineStatus::Locked`], otherwise
//!    [`DeadlineStatus::LateAllowed`]

pub mod record;
pub mod status;

pub use record::{DeadlineDraft, DeadlineRecord};
pub use status::{DeadlineStatus, StatusKind};

use chrono::{DateTime, Utc};

/// Evaluates `record` at `now`.
///
/// Total: every input maps to exactly one status and nothing panics.
#[must_use]
pub fn evaluate(record: Option<&DeadlineRecord>, now: DateTime<Utc>) -> DeadlineStatus {
    let Some(record) = record else {
        return DeadlineStatus::NoDeadlineDefined;
    };

    if let Some(opens_at) = record.window_start_at {
        if now < opens_at {
            return DeadlineStatus::WindowNotOpen { opens_at };
        }
    }

    // Window close is terminal; grace never reopens it.
    if let Some(closed_at) = record.window_end_at {
        if now > closed_at {
            return DeadlineStatus::WindowClosed { closed_at };
        }
    }

    let effective_deadline = record.effective_deadline();
    if now <= effective_deadline {
        return DeadlineStatus::OnTime { effective_deadline };
    }

    let minutes_late = (now - effective_deadline).num_minutes().max(0);

    if record.lock_after_deadline || !record.allow_late {
        DeadlineStatus::Locked {
            effective_deadline,
            minutes_late,
        }
    } else {
        DeadlineStatus::LateAllowed { minutes_late }
    }
}
