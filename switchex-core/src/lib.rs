pub mod condition;
pub mod layout;
pub mod phase;
pub mod survey;
pub mod trial;

pub use condition::{Condition, DesignType, InitialLightStatus, TaskType};
pub use layout::{CANVAS_HEIGHT, CANVAS_WIDTH, Room, RoomId, RoomKind, RoomLayout};
pub use phase::EnginePhase;
pub use survey::{SurveyError, SurveyScores};
pub use trial::{ActionEvent, ActionKind, Outcome, Participant, TrialId, TrialRecord};
