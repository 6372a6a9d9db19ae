use super::config::ExperimentConfig;
use super::counterbalance::{group_of, order_for};
use super::error::TrialError;
use super::recorder::{SessionRecorder, export_file_name};
use super::state::{ActionOutcome, TrialEngine};
use super::trial::TrialState;
use rand::Rng;
use switchex_core::{Condition, Participant, RoomId, SurveyScores, TrialId};
use switchex_timing::Clock;
use tracing::{info, warn};

/// One participant sitting: the counterbalanced condition list, the trial
/// engine and the records collected so far.
pub struct Session<C, R>
where
    C: Clock,
    R: Rng,
{
    participant: Participant,
    order: [usize; 3],
    condition_index: usize,
    floor_plan_orientation: u16,
    engine: TrialEngine<C, R>,
    recorder: SessionRecorder,
}

impl<C, R> Session<C, R>
where
    C: Clock,
    R: Rng,
{
    pub fn new(config: ExperimentConfig, clock: C, rng: R) -> Self {
        Self::with_engine(TrialEngine::new(config, clock, rng))
    }

    /// Wraps an engine and previews the first condition, unless the engine
    /// already runs a trial
    pub fn with_engine(engine: TrialEngine<C, R>) -> Self {
        let mut session = Self {
            participant: Participant::default(),
            order: order_for(""),
            condition_index: 0,
            floor_plan_orientation: 0,
            engine,
            recorder: SessionRecorder::new(),
        };
        if !session.engine.is_active() {
            if let Err(error) = session.preview_current() {
                warn!(%error, "initial preview refused");
            }
        }
        session
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    /// Switches to another participant: new condition order starting at the
    /// first condition, group taken from the id when it has one.
    pub fn set_participant(&mut self, id: &str) -> Result<(), TrialError> {
        if self.engine.is_active() {
            return Err(TrialError::TrialActive);
        }
        let id = id.trim().to_string();
        let group = group_of(&id);
        if !group.is_empty() {
            self.participant.group = group;
        }
        self.order = order_for(&id);
        self.participant.id = id;
        self.condition_index = 0;

        info!(
            participant = %self.participant.id,
            group = %self.participant.group,
            order = ?self.order,
            "participant set"
        );
        self.engine.reset_for_next()?;
        self.preview_current()?;
        Ok(())
    }

    /// Sets the group letter. An id shaped like `A3` follows the group, so
    /// `group B` turns it into `B3` with that participant's order.
    pub fn set_group(&mut self, group: &str) -> Result<(), TrialError> {
        if self.engine.is_active() {
            return Err(TrialError::TrialActive);
        }
        let group = group.trim().to_uppercase();
        if let Some(number) = sequence_suffix(&self.participant.id) {
            let id = format!("{group}{number}");
            return self.set_participant(&id);
        }
        self.participant.group = group;
        Ok(())
    }

    /// The catalog conditions in this participant's order
    pub fn conditions(&self) -> Vec<Condition> {
        self.order.iter().map(|&i| Condition::CATALOG[i]).collect()
    }

    pub fn condition_index(&self) -> usize {
        self.condition_index
    }

    pub fn current_condition(&self) -> Condition {
        Condition::CATALOG[self.order[self.condition_index]]
    }

    /// Starts the current condition. Needs both a participant id and a group.
    pub fn start_trial(&mut self) -> Result<&TrialState, TrialError> {
        if self.participant.id.is_empty() || self.participant.group.is_empty() {
            return Err(TrialError::NoParticipant);
        }
        let condition = self.current_condition();
        self.engine.start(condition)
    }

    pub fn press(&mut self, room: &RoomId) -> Result<ActionOutcome, TrialError> {
        self.engine.record_action(room)
    }

    /// Moderator verdict on the running trial; stores the finished record
    pub fn mark_result(&mut self, success: bool) -> Result<TrialId, TrialError> {
        let record = self.engine.finalize(success, &self.participant)?;
        self.recorder.append(record)
    }

    /// Attaches questionnaire scores to the most recently finished trial
    pub fn submit_survey(&mut self, survey: SurveyScores) -> Result<TrialId, TrialError> {
        let Some(trial_id) = self.recorder.latest().map(|r| r.trial_id) else {
            return Err(TrialError::NoRecords);
        };
        self.recorder.attach_survey(trial_id, survey)?;
        Ok(trial_id)
    }

    /// Moves on to the next condition in the participant's order, wrapping
    /// back to the first after the last
    pub fn next_condition(&mut self) -> Result<Condition, TrialError> {
        if self.engine.is_active() {
            return Err(TrialError::TrialActive);
        }
        self.condition_index = (self.condition_index + 1) % self.order.len();
        self.engine.reset_for_next()?;
        self.preview_current()?;
        Ok(self.current_condition())
    }

    pub fn reset_for_next(&mut self) -> Result<(), TrialError> {
        self.engine.reset_for_next()
    }

    pub fn tick(&mut self) -> bool {
        self.engine.tick()
    }

    fn preview_current(&mut self) -> Result<&TrialState, TrialError> {
        let condition = self.current_condition();
        self.engine.preview_condition(condition)
    }

    /// Floor-plan rotation for the floorplan design, 0..=180 degrees. Belongs
    /// to the moderator, so trial resets leave it alone.
    pub fn set_floor_plan_orientation(&mut self, degrees: u16) {
        self.floor_plan_orientation = degrees.min(180);
    }

    pub fn floor_plan_orientation(&self) -> u16 {
        self.floor_plan_orientation
    }

    pub fn engine(&self) -> &TrialEngine<C, R> {
        &self.engine
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn export_csv(&self) -> String {
        self.recorder.export_csv()
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(&self.participant.id, &self.engine.clock().date_stamp())
    }
}

/// Digits of a `<letter><digits>` id, e.g. `"12"` for `a12`
fn sequence_suffix(id: &str) -> Option<&str> {
    let mut chars = id.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    let shaped = first.is_ascii_alphabetic()
        && !rest.is_empty()
        && rest.bytes().all(|b| b.is_ascii_digit());
    shaped.then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counterbalance::ordered_conditions;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use switchex_core::DesignType;
    use switchex_timing::ManualClock;

    fn session() -> (Session<ManualClock, StdRng>, ManualClock) {
        let clock = ManualClock::new(1_767_225_600_000);
        let session = Session::new(
            ExperimentConfig::default(),
            clock.clone(),
            StdRng::seed_from_u64(8),
        );
        (session, clock)
    }

    #[test]
    fn new_session_previews_first_condition() {
        let (session, _) = session();
        let preview = session.engine().current().unwrap();
        assert_eq!(preview.condition, Condition::CATALOG[0]);
        assert!(preview.started_at.is_none());
        assert!(!session.engine().is_active());
    }

    #[test]
    fn participant_sets_order_and_group() {
        let (mut session, _) = session();
        session.set_participant("c2").unwrap();
        assert_eq!(session.participant().group, "C");
        assert_eq!(session.current_condition().design_type, DesignType::Floorplan);
        assert_eq!(
            session.engine().current().unwrap().condition.design_type,
            DesignType::Floorplan
        );

        session.set_participant("7").unwrap();
        assert_eq!(session.participant().group, "C");
        session.set_group("b").unwrap();
        assert_eq!(session.participant().group, "B");
        assert_eq!(session.participant().id, "7");
    }

    #[test]
    fn group_change_rewrites_shaped_id() {
        let (mut session, _) = session();
        session.set_participant("A3").unwrap();
        session.next_condition().unwrap();

        session.set_group("b").unwrap();
        assert_eq!(session.participant().id, "B3");
        assert_eq!(session.participant().group, "B");
        assert_eq!(session.condition_index(), 0);
        assert_eq!(session.conditions(), ordered_conditions("B3"));

        session.start_trial().unwrap();
        assert_eq!(session.set_group("c"), Err(TrialError::TrialActive));
        assert_eq!(session.participant().id, "B3");
    }

    #[test]
    fn start_needs_participant_and_group() {
        let (mut session, _) = session();
        assert_eq!(session.start_trial().err(), Some(TrialError::NoParticipant));
        assert!(!session.engine().is_active());
        assert_eq!(session.mark_result(true), Err(TrialError::NoActiveTrial));
        assert!(session.recorder().is_empty());

        // an id without a leading letter leaves the group unset
        session.set_participant("12").unwrap();
        assert_eq!(session.start_trial().err(), Some(TrialError::NoParticipant));
        session.set_group("a").unwrap();
        assert!(session.start_trial().is_ok());
    }

    #[test]
    fn participant_cannot_change_mid_trial() {
        let (mut session, _) = session();
        session.set_participant("A1").unwrap();
        session.start_trial().unwrap();
        assert_eq!(session.set_participant("A2"), Err(TrialError::TrialActive));
        assert_eq!(session.participant().id, "A1");
    }

    #[test]
    fn walks_through_all_conditions_and_wraps() {
        let (mut session, clock) = session();
        session.set_participant("A2").unwrap();
        let expected = session.conditions();

        for (i, condition) in expected.iter().enumerate() {
            let trial = session.start_trial().unwrap();
            assert_eq!(&trial.condition, condition);
            clock.advance(2_000);
            assert_eq!(session.mark_result(true), Ok(i as u64 + 1));
            let next = &expected[(i + 1) % expected.len()];
            assert_eq!(session.next_condition().as_ref(), Ok(next));
        }
        assert_eq!(session.condition_index(), 0);
        assert_eq!(session.current_condition(), expected[0]);
        let preview = session.engine().current().unwrap();
        assert_eq!(preview.condition, expected[0]);
        assert!(preview.started_at.is_none());
        assert_eq!(session.recorder().len(), 3);
    }

    #[test]
    fn next_condition_is_refused_mid_trial() {
        let (mut session, _) = session();
        session.set_participant("A1").unwrap();
        session.start_trial().unwrap();
        assert_eq!(session.next_condition(), Err(TrialError::TrialActive));
        assert_eq!(session.condition_index(), 0);
    }

    #[test]
    fn wrapping_an_active_engine_keeps_its_trial() {
        let clock = ManualClock::new(1_767_225_600_000);
        let mut engine = TrialEngine::new(
            ExperimentConfig::default(),
            clock,
            StdRng::seed_from_u64(8),
        );
        let running = engine.start(Condition::CATALOG[2]).unwrap().clone();
        let session = Session::with_engine(engine);
        assert!(session.engine().is_active());
        assert_eq!(session.engine().current(), Some(&running));
    }

    #[test]
    fn survey_goes_to_latest_record() {
        let (mut session, clock) = session();
        let survey = SurveyScores::from_subscales([5, 5, 5, 5, 5, 5], 6).unwrap();
        assert_eq!(session.submit_survey(survey), Err(TrialError::NoRecords));

        session.set_participant("B4").unwrap();
        session.start_trial().unwrap();
        clock.advance(1_000);
        let first = session.mark_result(true).unwrap();
        session.next_condition().unwrap();
        session.start_trial().unwrap();
        clock.advance(1_000);
        let second = session.mark_result(false).unwrap();

        assert_eq!(session.submit_survey(survey), Ok(second));
        assert_eq!(session.recorder().find(first).unwrap().survey, None);
        assert_eq!(session.recorder().find(second).unwrap().survey, Some(survey));
    }

    #[test]
    fn orientation_survives_resets() {
        let (mut session, _) = session();
        session.set_floor_plan_orientation(270);
        assert_eq!(session.floor_plan_orientation(), 180);
        session.set_floor_plan_orientation(90);
        session.reset_for_next().unwrap();
        session.set_participant("B1").unwrap();
        assert_eq!(session.floor_plan_orientation(), 90);
    }

    #[test]
    fn export_file_name_uses_clock_date() {
        let (mut session, _) = session();
        session.set_participant("A4").unwrap();
        assert_eq!(session.export_file_name(), "experiment_data_A4_2026-01-01.csv");
    }
}
