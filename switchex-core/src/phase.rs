/// Lifecycle of the trial engine.
///
/// Finalizing a trial happens inside a single call, so it never shows up as a
/// resting phase: the engine goes straight from `Active` back to `Idle`.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum EnginePhase {
    #[default]
    Idle,
    Active,
}

impl EnginePhase {
    /// Switch presses are only meaningful while a trial runs
    pub fn allows_input(&self) -> bool {
        matches!(self, EnginePhase::Active)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EnginePhase::Active)
    }
}
