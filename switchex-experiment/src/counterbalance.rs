//! Latin-square ordering of the three interface conditions.
//!
//! Participants are named `<group letter><sequence>` (e.g. `B4`). The sequence
//! number picks one of six orders; the group letter does not affect the order.

use switchex_core::Condition;

/// Condition order per sequence number 1..=6
const LATIN_SQUARE: [[usize; 3]; 6] = [
    [0, 1, 2],
    [2, 0, 1],
    [1, 2, 0],
    [0, 2, 1],
    [1, 0, 2],
    [2, 1, 0],
];

/// Sequence number from the trailing digits of a participant id, 1 if absent
fn sequence_number(participant_id: &str) -> usize {
    let id = participant_id.trim();
    let digits_start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    match digits_start {
        Some(start) => id[start..].parse().unwrap_or(1),
        None => 1,
    }
}

/// Order in which the catalog conditions are run for this participant
pub fn order_for(participant_id: &str) -> [usize; 3] {
    match sequence_number(participant_id) {
        n @ 1..=6 => LATIN_SQUARE[n - 1],
        _ => LATIN_SQUARE[0],
    }
}

/// Leading group letter, uppercased; empty when the id does not start with one
pub fn group_of(participant_id: &str) -> String {
    participant_id
        .trim()
        .chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

/// Accepts a bare group letter (`"B"`, treated as `"B1"`) or a full id
pub fn order_for_group(group: &str) -> [usize; 3] {
    let group = group.trim();
    let mut chars = group.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => order_for(&format!("{c}1")),
        _ => order_for(group),
    }
}

/// The catalog conditions arranged in this participant's order
pub fn ordered_conditions(participant_id: &str) -> Vec<Condition> {
    order_for(participant_id)
        .iter()
        .map(|&i| Condition::CATALOG[i])
        .collect()
}
