//! Floor-plan catalogs and the per-trial layout draw.
//!
//! Each supported room count (4..=8) has four hand-drawn arrangements. Rooms
//! are stored as fractions of the canvas and scaled on construction.

use rand::Rng;
use switchex_core::{CANVAS_HEIGHT, CANVAS_WIDTH, Room, RoomId, RoomLayout};

pub const VARIATIONS: usize = 4;
pub const DEFAULT_ROOM_COUNT: usize = 6;

/// Room names used by the six-room plans
pub const COMMERCIAL_ROOMS: [&str; 6] = [
    "kitchen",
    "bathroom",
    "meeting room",
    "reception",
    "break room",
    "storage",
];

const LETTERS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// (left, top, width, height) as canvas fractions
type Frame = (f32, f32, f32, f32);

const FOUR: [&[Frame]; VARIATIONS] = [
    // 2x2 grid
    &[(0.0, 0.0, 0.5, 0.5), (0.5, 0.0, 0.5, 0.5), (0.0, 0.5, 0.5, 0.5), (0.5, 0.5, 0.5, 0.5)],
    // L-shape
    &[(0.0, 0.0, 0.6, 0.5), (0.6, 0.0, 0.4, 0.5), (0.0, 0.5, 0.4, 0.5), (0.4, 0.5, 0.6, 0.5)],
    &[(0.0, 0.0, 0.3, 1.0), (0.3, 0.0, 0.35, 0.5), (0.65, 0.0, 0.35, 0.5), (0.3, 0.5, 0.7, 0.5)],
    &[(0.0, 0.0, 0.5, 0.3), (0.5, 0.0, 0.5, 0.3), (0.0, 0.3, 0.35, 0.7), (0.35, 0.3, 0.65, 0.7)],
];

const FIVE: [&[Frame]; VARIATIONS] = [
    &[
        (0.0, 0.0, 0.4, 0.4),
        (0.4, 0.0, 0.6, 0.4),
        (0.0, 0.4, 0.3, 0.6),
        (0.3, 0.4, 0.35, 0.3),
        (0.65, 0.4, 0.35, 0.6),
    ],
    &[
        (0.0, 0.0, 0.5, 0.3),
        (0.5, 0.0, 0.5, 0.3),
        (0.0, 0.3, 0.33, 0.7),
        (0.33, 0.3, 0.33, 0.35),
        (0.66, 0.3, 0.34, 0.7),
    ],
    &[
        (0.0, 0.0, 0.25, 1.0),
        (0.25, 0.0, 0.25, 0.5),
        (0.5, 0.0, 0.5, 0.4),
        (0.25, 0.5, 0.375, 0.5),
        (0.625, 0.4, 0.375, 0.6),
    ],
    &[
        (0.0, 0.0, 0.4, 0.5),
        (0.4, 0.0, 0.3, 0.5),
        (0.7, 0.0, 0.3, 0.5),
        (0.0, 0.5, 0.5, 0.5),
        (0.5, 0.5, 0.5, 0.5),
    ],
];

const SIX: [&[Frame]; VARIATIONS] = [
    &[
        (0.0, 0.0, 0.33, 0.33),
        (0.33, 0.0, 0.33, 0.33),
        (0.66, 0.0, 0.34, 0.33),
        (0.0, 0.33, 0.33, 0.33),
        (0.33, 0.33, 0.33, 0.33),
        (0.66, 0.33, 0.34, 0.67),
    ],
    &[
        (0.0, 0.0, 0.5, 0.25),
        (0.5, 0.0, 0.5, 0.25),
        (0.0, 0.25, 0.25, 0.75),
        (0.25, 0.25, 0.375, 0.375),
        (0.625, 0.25, 0.375, 0.375),
        (0.25, 0.625, 0.75, 0.375),
    ],
    &[
        (0.0, 0.0, 0.3, 0.4),
        (0.3, 0.0, 0.35, 0.4),
        (0.65, 0.0, 0.35, 0.4),
        (0.0, 0.4, 0.2, 0.6),
        (0.2, 0.4, 0.4, 0.3),
        (0.6, 0.4, 0.4, 0.6),
    ],
    &[
        (0.0, 0.0, 0.4, 0.5),
        (0.4, 0.0, 0.3, 0.5),
        (0.7, 0.0, 0.3, 0.5),
        (0.0, 0.5, 0.33, 0.5),
        (0.33, 0.5, 0.33, 0.5),
        (0.66, 0.5, 0.34, 0.5),
    ],
];

const SEVEN: [&[Frame]; VARIATIONS] = [
    &[
        (0.0, 0.0, 0.25, 0.33),
        (0.25, 0.0, 0.25, 0.33),
        (0.5, 0.0, 0.25, 0.33),
        (0.75, 0.0, 0.25, 0.33),
        (0.0, 0.33, 0.33, 0.33),
        (0.33, 0.33, 0.33, 0.33),
        (0.66, 0.33, 0.34, 0.67),
    ],
    &[
        (0.0, 0.0, 0.3, 0.3),
        (0.3, 0.0, 0.35, 0.3),
        (0.65, 0.0, 0.35, 0.3),
        (0.0, 0.3, 0.2, 0.7),
        (0.2, 0.3, 0.27, 0.35),
        (0.47, 0.3, 0.26, 0.35),
        (0.73, 0.3, 0.27, 0.7),
    ],
    &[
        (0.0, 0.0, 0.4, 0.4),
        (0.4, 0.0, 0.3, 0.4),
        (0.7, 0.0, 0.3, 0.4),
        (0.0, 0.4, 0.25, 0.6),
        (0.25, 0.4, 0.25, 0.3),
        (0.5, 0.4, 0.25, 0.3),
        (0.75, 0.4, 0.25, 0.6),
    ],
    &[
        (0.0, 0.0, 0.33, 0.5),
        (0.33, 0.0, 0.33, 0.25),
        (0.66, 0.0, 0.34, 0.25),
        (0.33, 0.25, 0.22, 0.25),
        (0.55, 0.25, 0.22, 0.25),
        (0.77, 0.25, 0.23, 0.75),
        (0.0, 0.5, 0.77, 0.5),
    ],
];

const EIGHT: [&[Frame]; VARIATIONS] = [
    &[
        (0.0, 0.0, 0.25, 0.25),
        (0.25, 0.0, 0.25, 0.25),
        (0.5, 0.0, 0.25, 0.25),
        (0.75, 0.0, 0.25, 0.25),
        (0.0, 0.25, 0.25, 0.25),
        (0.25, 0.25, 0.25, 0.25),
        (0.5, 0.25, 0.25, 0.25),
        (0.75, 0.25, 0.25, 0.75),
    ],
    &[
        (0.0, 0.0, 0.3, 0.3),
        (0.3, 0.0, 0.23, 0.3),
        (0.53, 0.0, 0.23, 0.3),
        (0.76, 0.0, 0.24, 0.3),
        (0.0, 0.3, 0.2, 0.7),
        (0.2, 0.3, 0.27, 0.35),
        (0.47, 0.3, 0.26, 0.35),
        (0.73, 0.3, 0.27, 0.7),
    ],
    &[
        (0.0, 0.0, 0.4, 0.4),
        (0.4, 0.0, 0.2, 0.4),
        (0.6, 0.0, 0.2, 0.4),
        (0.8, 0.0, 0.2, 0.4),
        (0.0, 0.4, 0.25, 0.6),
        (0.25, 0.4, 0.25, 0.3),
        (0.5, 0.4, 0.25, 0.3),
        (0.75, 0.4, 0.25, 0.6),
    ],
    &[
        (0.0, 0.0, 0.33, 0.5),
        (0.33, 0.0, 0.22, 0.25),
        (0.55, 0.0, 0.22, 0.25),
        (0.77, 0.0, 0.23, 0.25),
        (0.33, 0.25, 0.22, 0.25),
        (0.55, 0.25, 0.22, 0.25),
        (0.77, 0.25, 0.23, 0.75),
        (0.0, 0.5, 0.77, 0.5),
    ],
];

/// Room ids for a plan of `room_count` rooms
pub fn room_ids(room_count: usize) -> Vec<RoomId> {
    if room_count == DEFAULT_ROOM_COUNT {
        COMMERCIAL_ROOMS.iter().map(|&id| RoomId::from(id)).collect()
    } else {
        LETTERS
            .iter()
            .take(room_count)
            .map(|&id| RoomId::from(id))
            .collect()
    }
}

/// Builds one catalog arrangement. Unsupported room counts fall back to the
/// first four-room plan and out-of-range variations to variation 0.
pub fn layout_variation(room_count: usize, variation: usize) -> RoomLayout {
    let (room_count, catalog) = match room_count {
        4 => (4, &FOUR),
        5 => (5, &FIVE),
        6 => (6, &SIX),
        7 => (7, &SEVEN),
        8 => (8, &EIGHT),
        _ => return layout_variation(4, 0),
    };
    let variation_index = if variation < VARIATIONS { variation } else { 0 };

    let rooms = room_ids(room_count)
        .into_iter()
        .zip(catalog[variation_index].iter())
        .map(|(id, &(left, top, width, height))| Room {
            id,
            left: left * CANVAS_WIDTH,
            top: top * CANVAS_HEIGHT,
            width: width * CANVAS_WIDTH,
            height: height * CANVAS_HEIGHT,
        })
        .collect();

    RoomLayout {
        room_count,
        variation_index,
        rooms,
    }
}

/// A fresh six-room layout with a uniformly drawn arrangement
pub fn generate_layout<R: Rng>(rng: &mut R) -> RoomLayout {
    LayoutGenerator::default().generate(rng)
}

/// Draws the floor plan for each trial.
///
/// `fixed` pins the arrangement so a test (or a pilot run) can force a
/// specific variation without touching the RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGenerator {
    room_count: usize,
    forced_variation: Option<usize>,
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_COUNT)
    }
}

impl LayoutGenerator {
    pub fn new(room_count: usize) -> Self {
        Self {
            room_count,
            forced_variation: None,
        }
    }

    pub fn fixed(room_count: usize, variation: usize) -> Self {
        Self {
            room_count,
            forced_variation: Some(variation),
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> RoomLayout {
        let variation = match self.forced_variation {
            Some(v) => v,
            None => rng.random_range(0..VARIATIONS),
        };
        layout_variation(self.room_count, variation)
    }
}
