//! Compact context summary handed to line providers.
//!
//! The summary is a single line of `key=value` pairs:
//!
//! ```text
//! type=workout phase=main elapsed=300 remaining=300 round=2 goal=strength streak=4 hr=152 trigger=MIDWAY
//! ```
//!
//! Session fields always appear; user and performance fields only when
//! present; `trigger=` is always last.  The orchestrator itself never
//! parses it back.

use crate::session::{RecentPerformance, SessionState, UserContext};

/// Build the summary for a tick-driven line.
pub fn context_summary(
    trigger_name: &str,
    state: &SessionState,
    user: &UserContext,
    performance: Option<&RecentPerformance>,
) -> String {
    let mut parts: Vec<String> = vec![
        format!("type={}", state.session_type.label()),
        format!("phase={}", state.phase.label()),
        format!("elapsed={}", state.elapsed_secs),
        format!("remaining={}", state.remaining_secs),
        format!("round={}", state.round),
    ];

    push_user(&mut parts, user);

    if let Some(perf) = performance {
        if let Some(hr) = perf.heart_rate {
            parts.push(format!("hr={hr}"));
        }
        if let Some(reps) = perf.reps {
            parts.push(format!("reps={reps}"));
        }
        if let Some(effort) = non_blank(perf.effort.as_deref()) {
            parts.push(format!("effort={effort}"));
        }
    }

    parts.push(format!("trigger={trigger_name}"));
    parts.join(" ")
}

/// Summary for out-of-band requests with no session snapshot.
pub fn user_summary(trigger_name: &str, user: &UserContext) -> String {
    let mut parts = Vec::new();
    push_user(&mut parts, user);
    parts.push(format!("trigger={trigger_name}"));
    parts.join(" ")
}

fn push_user(parts: &mut Vec<String>, user: &UserContext) {
    if let Some(goal) = non_blank(user.goal.as_deref()) {
        parts.push(format!("goal={}", goal.replace(' ', "_")));
    }
    if let Some(streak) = user.streak_days {
        parts.push(format!("streak={streak}"));
    }
    if let Some(steps) = user.steps_today {
        parts.push(format!("steps={steps}"));
    }
    if let Some(date) = non_blank(user.last_workout_date.as_deref()) {
        parts.push(format!("last_workout={date}"));
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
