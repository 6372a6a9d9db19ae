use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the virtual floor-plan canvas all room geometry is expressed in
pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Identifier of a room, unique within one layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human readable name, e.g. "meeting room" -> "Meeting Room"
    pub fn display_name(&self) -> String {
        self.0
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    pub fn kind(&self) -> RoomKind {
        RoomKind::classify(&self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Coarse room category used by views to pick icons and colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Office,
    Kitchen,
    Bathroom,
    Conference,
    Storage,
    Changeroom,
}

impl RoomKind {
    pub fn classify(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("office") {
            RoomKind::Office
        } else if name.contains("kitchen") || name.contains("break") {
            RoomKind::Kitchen
        } else if ["bathroom", "restroom", "washroom"]
            .iter()
            .any(|k| name.contains(k))
        {
            RoomKind::Bathroom
        } else if name.contains("conference") || name.contains("meeting") {
            RoomKind::Conference
        } else if name.contains("storage") {
            RoomKind::Storage
        } else if name.contains("changer") {
            RoomKind::Changeroom
        } else {
            RoomKind::Office
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A floor plan for a single trial. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub room_count: usize,
    pub variation_index: usize,
    pub rooms: Vec<Room>,
}

impl RoomLayout {
    pub fn room_ids(&self) -> impl Iterator<Item = &RoomId> {
        self.rooms.iter().map(|r| &r.id)
    }

    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms.iter().any(|r| &r.id == id)
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == id)
    }
}
