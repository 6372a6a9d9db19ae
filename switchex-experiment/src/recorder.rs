//! Finished trial records and their export.

use super::error::TrialError;
use std::borrow::Cow;
use switchex_core::{RoomId, SurveyScores, TrialId, TrialRecord};
use tracing::{info, warn};

pub const CSV_HEADERS: [&str; 16] = [
    "participant_id",
    "group",
    "design_type",
    "lights_status",
    "task_type",
    "num_rooms",
    "room_variation",
    "target_areas",
    "lights_to_turn_off",
    "completion_time",
    "errors",
    "error_log",
    "success",
    "nasa_tlx",
    "confidence",
    "timestamp",
];

/// Every finalized trial of the session, in the order they finished
#[derive(Debug, Default)]
pub struct SessionRecorder {
    records: Vec<TrialRecord>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a finished trial. A second record with the same trial id is
    /// refused.
    pub fn append(&mut self, record: TrialRecord) -> Result<TrialId, TrialError> {
        if self.find(record.trial_id).is_some() {
            return Err(TrialError::AlreadyRecorded);
        }
        let id = record.trial_id;
        self.records.push(record);
        info!(trial = id, total = self.records.len(), "record stored");
        Ok(id)
    }

    /// Fills in the survey fields of an existing record
    pub fn attach_survey(&mut self, trial_id: TrialId, survey: SurveyScores) -> Result<(), TrialError> {
        match self.records.iter_mut().find(|r| r.trial_id == trial_id) {
            Some(record) => {
                record.survey = Some(survey);
                info!(trial = trial_id, nasa_tlx = survey.nasa_tlx, "survey attached");
                Ok(())
            }
            None => {
                warn!(trial = trial_id, "survey for unknown trial dropped");
                Err(TrialError::UnknownRecord(trial_id))
            }
        }
    }

    pub fn latest(&self) -> Option<&TrialRecord> {
        self.records.last()
    }

    pub fn find(&self, trial_id: TrialId) -> Option<&TrialRecord> {
        self.records.iter().find(|r| r.trial_id == trial_id)
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header row plus one row per record. Rows are separated by `\n`, with no
    /// trailing newline.
    pub fn export_csv(&self) -> String {
        std::iter::once(CSV_HEADERS.join(","))
            .chain(self.records.iter().map(csv_row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }
}

/// `experiment_data_A3_2026-03-01.csv`; `export` stands in for a missing id
pub fn export_file_name(participant_id: &str, date: &str) -> String {
    let id = participant_id.trim();
    let id = if id.is_empty() { "export" } else { id };
    format!("experiment_data_{id}_{date}.csv")
}

fn join_rooms(rooms: &[RoomId]) -> String {
    rooms
        .iter()
        .map(RoomId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_row(record: &TrialRecord) -> String {
    let fields: [String; 16] = [
        record.participant_id.clone(),
        record.group.clone(),
        record.design_type.to_string(),
        record.lights_status.to_string(),
        record.task_type.to_string(),
        record.num_rooms.to_string(),
        record.room_variation.to_string(),
        join_rooms(&record.target_areas),
        join_rooms(&record.lights_to_turn_off),
        record.completion_time_secs.to_string(),
        record.errors.to_string(),
        record.error_log(),
        record.success.to_string(),
        record
            .survey
            .map(|s| format!("{:.2}", s.nasa_tlx))
            .unwrap_or_default(),
        record
            .survey
            .map(|s| s.confidence.to_string())
            .unwrap_or_default(),
        record.timestamp.clone(),
    ];
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quotes a field that contains a comma, quote or line break
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
