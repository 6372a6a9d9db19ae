use super::config::ExperimentConfig;
use super::error::TrialError;
use super::layout::LayoutGenerator;
use super::trial::TrialState;
use rand::Rng;
use std::collections::HashMap;
use switchex_core::{
    ActionEvent, Condition, EnginePhase, Outcome, Participant, RoomId, TrialId, TrialRecord,
};
use switchex_timing::Clock;
use tracing::{debug, info};

/// What happened to an accepted switch press
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Recorded(ActionEvent),
    /// Same room pressed again inside the debounce window; nothing changed
    Debounced,
    /// Light flipped, but an identical event was already logged
    Replayed,
}

/// Drives one trial at a time: start, switch presses, and the moderator's
/// success/failure call. Reused across all trials of a session.
pub struct TrialEngine<C, R>
where
    C: Clock,
    R: Rng,
{
    clock: C,
    rng: R,
    config: ExperimentConfig,
    layouts: LayoutGenerator,
    phase: EnginePhase,
    current: Option<TrialState>,
    next_trial_id: TrialId,
    recorded: bool,
    elapsed_secs: u64,
    ticking: bool,
    last_accepted: HashMap<RoomId, i64>,
}

impl<C, R> TrialEngine<C, R>
where
    C: Clock,
    R: Rng,
{
    pub fn new(config: ExperimentConfig, clock: C, rng: R) -> Self {
        Self {
            layouts: LayoutGenerator::new(config.room_count),
            clock,
            rng,
            config,
            phase: EnginePhase::Idle,
            current: None,
            next_trial_id: 1,
            recorded: false,
            elapsed_secs: 0,
            ticking: false,
            last_accepted: HashMap::new(),
        }
    }

    pub fn with_layout_generator(mut self, layouts: LayoutGenerator) -> Self {
        self.layouts = layouts;
        self
    }

    pub fn start(&mut self, condition: Condition) -> Result<&TrialState, TrialError> {
        if self.phase.is_active() {
            debug!("start rejected: trial already active");
            return Err(TrialError::TrialActive);
        }

        let layout = self.layouts.generate(&mut self.rng);
        let mut trial = TrialState::prepare(condition, layout, &mut self.rng);
        let now = self.clock.now_ms();
        trial.started_at = Some(now);

        self.phase = EnginePhase::Active;
        self.recorded = false;
        self.elapsed_secs = 0;
        self.ticking = true;
        self.last_accepted.clear();

        info!(
            trial = self.next_trial_id,
            design = %condition.design_type,
            lights = %condition.initial_light_status,
            task = %condition.task_type,
            variation = trial.layout.variation_index,
            targets = ?trial.targets_to_turn_on,
            "trial started"
        );
        Ok(self.current.insert(trial))
    }

    /// Handles a press on the switch for `room`
    pub fn record_action(&mut self, room: &RoomId) -> Result<ActionOutcome, TrialError> {
        if !self.phase.allows_input() {
            return Err(TrialError::NoActiveTrial);
        }
        let Some(trial) = self.current.as_mut() else {
            return Err(TrialError::NoActiveTrial);
        };
        if !trial.layout.contains(room) {
            debug!(room = %room, "press on unknown room ignored");
            return Err(TrialError::UnknownRoom(room.clone()));
        }

        let now = self.clock.now_ms();
        if let Some(&last) = self.last_accepted.get(room) {
            if now - last < self.config.debounce_ms {
                debug!(room = %room, since_ms = now - last, "press debounced");
                return Ok(ActionOutcome::Debounced);
            }
        }
        self.last_accepted.insert(room.clone(), now);

        match trial.toggle(room, now, self.config.replay_window_ms) {
            Some(event) => {
                debug!(
                    room = %room,
                    action = %event.action,
                    target = event.was_target,
                    error = event.is_error,
                    errors = trial.error_count,
                    "action recorded"
                );
                Ok(ActionOutcome::Recorded(event))
            }
            None => {
                debug!(room = %room, "replayed action suppressed");
                Ok(ActionOutcome::Replayed)
            }
        }
    }

    /// Marks the running trial as a success or failure and builds its record.
    ///
    /// Only the first call after `start` produces a record.
    pub fn finalize(
        &mut self,
        success: bool,
        participant: &Participant,
    ) -> Result<TrialRecord, TrialError> {
        if self.recorded {
            return Err(TrialError::AlreadyRecorded);
        }
        if !self.phase.is_active() {
            return Err(TrialError::NoActiveTrial);
        }
        let Some(trial) = self.current.as_mut() else {
            return Err(TrialError::NoActiveTrial);
        };

        let now = self.clock.now_ms();
        trial.outcome = Outcome::from_success(success);
        trial.ended_at = Some(now);
        self.ticking = false;
        self.phase = EnginePhase::Idle;
        self.recorded = true;

        let completion_time_secs = trial
            .duration_secs()
            .unwrap_or(self.elapsed_secs as f64);
        let trial_id = self.next_trial_id;
        self.next_trial_id += 1;

        let record = TrialRecord {
            trial_id,
            participant_id: participant.id.clone(),
            group: participant.group.clone(),
            design_type: trial.condition.design_type,
            lights_status: trial.condition.initial_light_status,
            task_type: trial.condition.task_type,
            num_rooms: trial.layout.room_count,
            room_variation: trial.layout.variation_index,
            target_areas: trial.targets_to_turn_on.clone(),
            lights_to_turn_off: trial.targets_to_turn_off.clone(),
            completion_time_secs,
            errors: trial.error_count,
            events: trial.event_log.clone(),
            success,
            survey: None,
            timestamp: self.clock.iso_timestamp(),
        };

        info!(
            trial = trial_id,
            success,
            errors = record.errors,
            seconds = completion_time_secs,
            "trial finalized"
        );
        Ok(record)
    }

    /// Clears the per-trial display state between conditions. The layout,
    /// condition and turn-on targets stay visible.
    pub fn reset_for_next(&mut self) -> Result<(), TrialError> {
        if self.phase.is_active() {
            return Err(TrialError::TrialActive);
        }
        self.elapsed_secs = 0;
        self.ticking = false;
        self.last_accepted.clear();
        if let Some(trial) = self.current.as_mut() {
            trial.error_count = 0;
            trial.outcome = Outcome::Pending;
            trial.event_log.clear();
            trial.light_state.clear();
            trial.targets_to_turn_off.clear();
            trial.started_at = None;
            trial.ended_at = None;
        }
        Ok(())
    }

    /// Shows what the next condition will look like without starting it
    pub fn preview_condition(&mut self, condition: Condition) -> Result<&TrialState, TrialError> {
        if self.phase.is_active() {
            return Err(TrialError::TrialActive);
        }
        let layout = self.layouts.generate(&mut self.rng);
        let trial = TrialState::prepare(condition, layout, &mut self.rng);
        debug!(design = %condition.design_type, "condition previewed");
        Ok(self.current.insert(trial))
    }

    /// One tick of the elapsed-time counter. Returns whether it counted.
    pub fn tick(&mut self) -> bool {
        if self.ticking && self.phase.is_active() {
            self.elapsed_secs += 1;
            true
        } else {
            false
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn current(&self) -> Option<&TrialState> {
        self.current.as_ref()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn error_count(&self) -> u32 {
        self.current.as_ref().map_or(0, |t| t.error_count)
    }

    pub fn outcome(&self) -> Outcome {
        self.current.as_ref().map_or(Outcome::Pending, |t| t.outcome)
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of trials that produced a record so far
    pub fn trials_recorded(&self) -> u64 {
        self.next_trial_id - 1
    }
}
