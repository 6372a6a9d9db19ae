use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::BTreeMap;
use switchex_core::{
    ActionEvent, ActionKind, Condition, InitialLightStatus, Outcome, RoomId, RoomLayout, TaskType,
};

/// Mutable state of the trial currently shown to the participant
#[derive(Debug, Clone, PartialEq)]
pub struct TrialState {
    pub condition: Condition,
    pub layout: RoomLayout,
    pub light_state: BTreeMap<RoomId, bool>,
    pub targets_to_turn_on: Vec<RoomId>,
    pub targets_to_turn_off: Vec<RoomId>,
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub error_count: u32,
    pub outcome: Outcome,
    pub event_log: Vec<ActionEvent>,
}

impl TrialState {
    /// Sets up lights and targets for `condition` on `layout`. Timestamps stay
    /// empty until the engine starts the trial.
    pub fn prepare<R: Rng>(condition: Condition, layout: RoomLayout, rng: &mut R) -> Self {
        let ids: Vec<RoomId> = layout.room_ids().cloned().collect();
        let light_state = initial_lights(condition.initial_light_status, &ids, rng);
        let (targets_to_turn_on, targets_to_turn_off) =
            pick_targets(condition.task_type, &ids, &light_state, rng);

        Self {
            condition,
            layout,
            light_state,
            targets_to_turn_on,
            targets_to_turn_off,
            started_at: None,
            ended_at: None,
            error_count: 0,
            outcome: Outcome::Pending,
            event_log: Vec::new(),
        }
    }

    pub fn is_on(&self, room: &RoomId) -> bool {
        self.light_state.get(room).copied().unwrap_or(false)
    }

    pub fn is_turn_on_target(&self, room: &RoomId) -> bool {
        self.targets_to_turn_on.contains(room)
    }

    pub fn is_turn_off_target(&self, room: &RoomId) -> bool {
        self.targets_to_turn_off.contains(room)
    }

    /// Rooms currently lit, in layout order
    pub fn lit_rooms(&self) -> Vec<&RoomId> {
        self.layout.room_ids().filter(|id| self.is_on(id)).collect()
    }

    /// True once every on-target is lit and every off-target is dark. The
    /// moderator still decides the outcome; this is only a hint for views.
    pub fn goal_reached(&self) -> bool {
        self.targets_to_turn_on.iter().all(|id| self.is_on(id))
            && self.targets_to_turn_off.iter().all(|id| !self.is_on(id))
    }

    pub fn duration_secs(&self) -> Option<f64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some((end - start).max(0) as f64 / 1000.0),
            _ => None,
        }
    }

    /// Flips `room` and logs the press in one step.
    ///
    /// Returns the logged event, or `None` when an identical event (same room
    /// and action) already sits within `replay_window_ms` of `now_ms`. The
    /// light flips either way.
    pub(crate) fn toggle(
        &mut self,
        room: &RoomId,
        now_ms: i64,
        replay_window_ms: i64,
    ) -> Option<ActionEvent> {
        let was_on = self.is_on(room);
        let action = ActionKind::from_previous(was_on);
        let was_target = self.is_turn_on_target(room);
        let is_error = action == ActionKind::TurnedOn && !was_target;
        self.light_state.insert(room.clone(), !was_on);

        let replayed = self.event_log.iter().any(|e| {
            &e.room_id == room
                && e.action == action
                && (e.timestamp_ms - now_ms).abs() < replay_window_ms
        });
        if replayed {
            return None;
        }

        let relative_seconds = self
            .started_at
            .map(|start| (now_ms - start) as f64 / 1000.0)
            .unwrap_or(0.0);
        let event = ActionEvent {
            room_id: room.clone(),
            timestamp_ms: now_ms,
            relative_seconds,
            action,
            was_target,
            is_error,
        };
        if is_error {
            self.error_count += 1;
        }
        self.event_log.push(event.clone());
        Some(event)
    }
}

fn initial_lights<R: Rng>(
    status: InitialLightStatus,
    ids: &[RoomId],
    rng: &mut R,
) -> BTreeMap<RoomId, bool> {
    let mut lights: BTreeMap<RoomId, bool> = ids.iter().map(|id| (id.clone(), false)).collect();
    match status {
        InitialLightStatus::AllOff => {}
        InitialLightStatus::AllOn => lights.values_mut().for_each(|on| *on = true),
        InitialLightStatus::Mixed => {
            let mut shuffled = ids.to_vec();
            shuffled.shuffle(rng);
            for id in shuffled.into_iter().take(2) {
                lights.insert(id, true);
            }
        }
    }
    lights
}

/// Returns (turn-on targets, turn-off targets).
fn pick_targets<R: Rng>(
    task: TaskType,
    ids: &[RoomId],
    lights: &BTreeMap<RoomId, bool>,
    rng: &mut R,
) -> (Vec<RoomId>, Vec<RoomId>) {
    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);

    match task {
        TaskType::TurnOn2 => (shuffled.into_iter().take(2).collect(), Vec::new()),
        TaskType::TurnOn1Off1 => {
            let (on, off): (Vec<&RoomId>, Vec<&RoomId>) =
                ids.iter().partition(|id| lights.get(*id).copied().unwrap_or(false));
            if let (Some(&turn_on), Some(&turn_off)) = (off.choose(rng), on.choose(rng)) {
                return (vec![turn_on.clone()], vec![turn_off.clone()]);
            }
            // every room shares one state: take the first two of the shuffle
            // as-is, even though one of them may already be in its goal state
            match shuffled.as_slice() {
                [] => (Vec::new(), Vec::new()),
                [only] => (vec![only.clone()], vec![only.clone()]),
                [first, second, ..] => (vec![first.clone()], vec![second.clone()]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_variation;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use switchex_core::DesignType;

    fn condition(lights: InitialLightStatus, task: TaskType) -> Condition {
        Condition::new(DesignType::Buttons, lights, task)
    }

    #[test]
    fn mixed_start_lights_exactly_two_rooms() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let state = TrialState::prepare(
                condition(InitialLightStatus::Mixed, TaskType::TurnOn2),
                layout_variation(6, 0),
                &mut rng,
            );
            assert_eq!(state.lit_rooms().len(), 2);
            assert_eq!(state.light_state.len(), 6);
        }
    }

    #[test]
    fn all_on_start() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = TrialState::prepare(
            condition(InitialLightStatus::AllOn, TaskType::TurnOn2),
            layout_variation(5, 1),
            &mut rng,
        );
        assert_eq!(state.lit_rooms().len(), 5);
    }

    #[test]
    fn one_on_one_off_targets_respect_current_lights() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..30 {
            let state = TrialState::prepare(
                condition(InitialLightStatus::Mixed, TaskType::TurnOn1Off1),
                layout_variation(6, 3),
                &mut rng,
            );
            assert_eq!(state.targets_to_turn_on.len(), 1);
            assert_eq!(state.targets_to_turn_off.len(), 1);
            let on = &state.targets_to_turn_on[0];
            let off = &state.targets_to_turn_off[0];
            assert_ne!(on, off);
            assert!(!state.is_on(on));
            assert!(state.is_on(off));
        }
    }

    #[test]
    fn goal_tracks_both_target_lists() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut state = TrialState::prepare(
            condition(InitialLightStatus::Mixed, TaskType::TurnOn1Off1),
            layout_variation(6, 2),
            &mut rng,
        );
        state.started_at = Some(0);
        let on = state.targets_to_turn_on[0].clone();
        let off = state.targets_to_turn_off[0].clone();
        assert!(state.is_turn_off_target(&off));
        assert!(!state.is_turn_off_target(&on));
        assert!(!state.goal_reached());

        state.toggle(&on, 1_000, 200).unwrap();
        assert!(!state.goal_reached());
        state.toggle(&off, 2_000, 200).unwrap();
        assert!(state.goal_reached());
        assert_eq!(state.error_count, 0);
    }

    #[test]
    fn degenerate_layout_uses_shuffled_fallback() {
        let mut rng = StdRng::seed_from_u64(5);
        let state = TrialState::prepare(
            condition(InitialLightStatus::AllOff, TaskType::TurnOn1Off1),
            layout_variation(6, 0),
            &mut rng,
        );
        assert_eq!(state.targets_to_turn_on.len(), 1);
        assert_eq!(state.targets_to_turn_off.len(), 1);
        assert_ne!(state.targets_to_turn_on, state.targets_to_turn_off);
        // the off-target is already dark; the fallback keeps it anyway
        assert!(!state.is_on(&state.targets_to_turn_off[0]));
    }

    #[test]
    fn toggle_classifies_and_suppresses_replays() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = TrialState::prepare(
            condition(InitialLightStatus::AllOff, TaskType::TurnOn2),
            layout_variation(6, 0),
            &mut rng,
        );
        state.started_at = Some(10_000);
        let target = state.targets_to_turn_on[0].clone();
        let other = state
            .layout
            .room_ids()
            .find(|id| !state.is_turn_on_target(id))
            .cloned()
            .unwrap();

        let ok = state.toggle(&target, 11_000, 200).unwrap();
        assert!(!ok.is_error && ok.was_target);
        assert_eq!(ok.relative_seconds, 1.0);

        let wrong = state.toggle(&other, 12_000, 200).unwrap();
        assert!(wrong.is_error);
        assert_eq!(state.error_count, 1);

        let undo = state.toggle(&other, 12_050, 200).unwrap();
        assert_eq!(undo.action, ActionKind::TurnedOff);
        assert!(!undo.is_error);

        // a replayed "turned ON" right after the first one is dropped
        assert!(state.toggle(&other, 12_100, 200).is_none());
        assert_eq!(state.error_count, 1);
        assert_eq!(state.event_log.len(), 3);
        assert!(state.is_on(&other));
    }
}
