use serde::{Deserialize, Serialize};
use std::fmt;

/// Switch interface shown to the participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesignType {
    Traditional,
    Buttons,
    Floorplan,
}

/// Light configuration at the moment a trial starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialLightStatus {
    AllOff,
    AllOn,
    Mixed,
}

/// What the participant is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    /// Turn on two target rooms
    TurnOn2,
    /// Turn one room on and another off
    TurnOn1Off1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub design_type: DesignType,
    pub initial_light_status: InitialLightStatus,
    pub task_type: TaskType,
}

impl DesignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignType::Traditional => "traditional",
            DesignType::Buttons => "buttons",
            DesignType::Floorplan => "floorplan",
        }
    }

    /// Letter the study protocol uses for the design (A, B, C)
    pub fn letter(&self) -> char {
        match self {
            DesignType::Traditional => 'A',
            DesignType::Buttons => 'B',
            DesignType::Floorplan => 'C',
        }
    }
}

impl InitialLightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitialLightStatus::AllOff => "allOff",
            InitialLightStatus::AllOn => "allOn",
            InitialLightStatus::Mixed => "mixed",
        }
    }
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::TurnOn2 => "turnOn2",
            TaskType::TurnOn1Off1 => "turnOn1Off1",
        }
    }
}

impl Condition {
    pub const fn new(
        design_type: DesignType,
        initial_light_status: InitialLightStatus,
        task_type: TaskType,
    ) -> Self {
        Self {
            design_type,
            initial_light_status,
            task_type,
        }
    }

    /// The three base conditions, in catalog order (design A, B, C).
    ///
    /// Every condition starts with all lights off and asks for two lights on;
    /// only the interface differs.
    pub const CATALOG: [Condition; 3] = [
        Condition::new(
            DesignType::Traditional,
            InitialLightStatus::AllOff,
            TaskType::TurnOn2,
        ),
        Condition::new(
            DesignType::Buttons,
            InitialLightStatus::AllOff,
            TaskType::TurnOn2,
        ),
        Condition::new(
            DesignType::Floorplan,
            InitialLightStatus::AllOff,
            TaskType::TurnOn2,
        ),
    ];

    pub fn label(&self) -> String {
        let lights = match self.initial_light_status {
            InitialLightStatus::AllOff => "All Off",
            InitialLightStatus::AllOn => "All On",
            InitialLightStatus::Mixed => "Mixed",
        };
        let task = match self.task_type {
            TaskType::TurnOn2 => "Turn ON 2",
            TaskType::TurnOn1Off1 => "Turn ON 1, OFF 1",
        };
        format!("Design {}, {}, {}", self.design_type.letter(), lights, task)
    }
}

impl fmt::Display for DesignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InitialLightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_each_design_once() {
        let designs: Vec<_> = Condition::CATALOG.iter().map(|c| c.design_type).collect();
        assert_eq!(
            designs,
            vec![DesignType::Traditional, DesignType::Buttons, DesignType::Floorplan]
        );
        assert!(Condition::CATALOG.iter().all(|c| {
            c.initial_light_status == InitialLightStatus::AllOff && c.task_type == TaskType::TurnOn2
        }));
    }

    #[test]
    fn labels_follow_protocol_wording() {
        assert_eq!(Condition::CATALOG[1].label(), "Design B, All Off, Turn ON 2");
    }

    #[test]
    fn serde_names_match_export_strings() {
        let json = serde_json::to_string(&Condition::CATALOG[0]).unwrap();
        assert_eq!(
            json,
            r#"{"designType":"traditional","initialLightStatus":"allOff","taskType":"turnOn2"}"#
        );
        let task: TaskType = serde_json::from_str(r#""turnOn1Off1""#).unwrap();
        assert_eq!(task.as_str(), "turnOn1Off1");
    }
}
