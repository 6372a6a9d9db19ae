use switchex_core::{RoomId, TrialId};
use thiserror::Error;

/// A request the engine or session declined. Nothing was changed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrialError {
    #[error("a trial is already active")]
    TrialActive,
    #[error("no trial is active")]
    NoActiveTrial,
    #[error("the trial outcome has already been recorded")]
    AlreadyRecorded,
    #[error("room {0} is not part of the current layout")]
    UnknownRoom(RoomId),
    #[error("set a participant id and group before starting")]
    NoParticipant,
    #[error("no trial has been recorded yet")]
    NoRecords,
    #[error("no record with trial id {0}")]
    UnknownRecord(TrialId),
}
