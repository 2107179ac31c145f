use crate::engine::{Trigger, WalkOutcome};

/// Formats engine walks into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Explains why a walk started, which blocks it visited and how it ended.
    pub fn format_walk(trigger: &Trigger, path: &[String], outcome: &WalkOutcome) -> String {
        let mut result = Self::format_trigger(trigger);
        if !path.is_empty() {
            result.push_str(&format!(", visited {}", Self::format_path(path)));
        }
        result.push_str(&format!(", {}", Self::format_outcome(outcome)));
        result
    }

    fn format_trigger(trigger: &Trigger) -> String {
        match trigger {
            Trigger::Matched { block_id } => format!("matched '{}'", block_id),
            Trigger::QuickReply { block_id, index } => {
                format!("quick reply #{} on '{}'", index, block_id)
            }
            Trigger::Fallback => "no block matched".to_string(),
        }
    }

    /// Joins block ids with arrows, e.g. `a -> b -> c`.
    pub fn format_path(path: &[String]) -> String {
        path.join(" -> ")
    }

    fn format_outcome(outcome: &WalkOutcome) -> String {
        match outcome {
            WalkOutcome::Completed => "completed".to_string(),
            WalkOutcome::DanglingSuccessor { from, missing } => {
                format!("stopped: '{}' points at missing block '{}'", from, missing)
            }
            WalkOutcome::Cycle { block_id } => {
                format!("stopped: cycle back to '{}'", block_id)
            }
            WalkOutcome::StepLimit { steps } => format!("stopped after {} steps", steps),
            WalkOutcome::NoMatch => "sent fallback".to_string(),
            WalkOutcome::NoBranch { block_id, index } => {
                format!("sent fallback: no branch for quick reply #{} on '{}'", index, block_id)
            }
        }
    }
}
