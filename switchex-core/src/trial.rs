use crate::condition::{DesignType, InitialLightStatus, TaskType};
use crate::layout::RoomId;
use crate::survey::SurveyScores;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic per-session trial number; the key survey data is attached by
pub type TrialId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Success,
    Failure,
}

impl Outcome {
    pub fn from_success(success: bool) -> Self {
        if success {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    TurnedOn,
    TurnedOff,
}

impl ActionKind {
    /// The action produced by flipping a light that was `was_on`
    pub fn from_previous(was_on: bool) -> Self {
        if was_on {
            ActionKind::TurnedOff
        } else {
            ActionKind::TurnedOn
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::TurnedOn => "turned ON",
            ActionKind::TurnedOff => "turned OFF",
        })
    }
}

/// One accepted switch press.
///
/// Only turning a light on can be an error, and only when the room is not a
/// turn-on target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub room_id: RoomId,
    pub timestamp_ms: i64,
    pub relative_seconds: f64,
    pub action: ActionKind,
    pub was_target: bool,
    pub is_error: bool,
}

impl ActionEvent {
    /// `kitchen:turned ON:OK:1.25s`
    pub fn log_entry(&self) -> String {
        format!(
            "{}:{}:{}:{:.2}s",
            self.room_id,
            self.action,
            if self.is_error { "ERROR" } else { "OK" },
            self.relative_seconds
        )
    }
}

/// Participant identity as entered by the moderator, e.g. `A3` in group `A`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub group: String,
}

/// A finished trial. Built once when the outcome is marked; only the survey
/// fields are filled in later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_id: TrialId,
    pub participant_id: String,
    pub group: String,
    pub design_type: DesignType,
    pub lights_status: InitialLightStatus,
    pub task_type: TaskType,
    pub num_rooms: usize,
    pub room_variation: usize,
    pub target_areas: Vec<RoomId>,
    pub lights_to_turn_off: Vec<RoomId>,
    pub completion_time_secs: f64,
    pub errors: u32,
    pub events: Vec<ActionEvent>,
    pub success: bool,
    pub survey: Option<SurveyScores>,
    /// RFC 3339 creation time
    pub timestamp: String,
}

impl TrialRecord {
    /// Event log flattened into a single field, entries separated by `; `
    pub fn error_log(&self) -> String {
        self.events
            .iter()
            .map(ActionEvent::log_entry)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(room: &str, action: ActionKind, is_error: bool, secs: f64) -> ActionEvent {
        ActionEvent {
            room_id: RoomId::from(room),
            timestamp_ms: 0,
            relative_seconds: secs,
            action,
            was_target: !is_error,
            is_error,
        }
    }

    #[test]
    fn log_entry_format() {
        let e = event("meeting room", ActionKind::TurnedOn, true, 3.456);
        assert_eq!(e.log_entry(), "meeting room:turned ON:ERROR:3.46s");
        let e = event("storage", ActionKind::TurnedOff, false, 0.5);
        assert_eq!(e.log_entry(), "storage:turned OFF:OK:0.50s");
    }

    #[test]
    fn action_from_previous_state() {
        assert_eq!(ActionKind::from_previous(false), ActionKind::TurnedOn);
        assert_eq!(ActionKind::from_previous(true), ActionKind::TurnedOff);
        assert_eq!(Outcome::from_success(false), Outcome::Failure);
        assert!(Outcome::default().is_pending());
    }
}
