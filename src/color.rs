//! Display encodings for distances and haplogroups.

use crate::config::Number;
use serde::Serialize;
use std::fmt;

/// Hue of a zero distance (green). Distances at or past the scale maximum map to 0 (red).
pub const NEAR_HUE: Number = 120.0;

pub const NEUTRAL_COLOR: &str = "#9e9e9e";

/// Keyed on the first two characters of a haplogroup code.
const HAPLOGROUP_COLORS: &[(&str, &str)] = &[
    ("R1", "#e6194b"),
    ("R2", "#f58231"),
    ("I1", "#4363d8"),
    ("I2", "#42d4f4"),
    ("J1", "#3cb44b"),
    ("J2", "#bfef45"),
    ("E1", "#ffe119"),
    ("G1", "#dcbeff"),
    ("G2", "#911eb4"),
    ("N1", "#f032e6"),
    ("Q1", "#9a6324"),
    ("C1", "#800000"),
    ("C2", "#aaffc3"),
    ("T1", "#808000"),
    ("L1", "#469990"),
    ("H1", "#000075"),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub hue: Number,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.0}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Maps a distance onto a green→red hue, saturating at `scale_max`.
///
/// Negative distances clamp to green; `NaN` distances and anything past
/// `scale_max` are red. A non-positive or non-finite scale treats every
/// positive distance as saturated.
pub fn distance_to_color(distance: Number, scale_max: Number) -> Hsl {
    let ratio = distance_ratio(distance, scale_max);
    Hsl {
        hue: (1.0 - ratio) * NEAR_HUE,
        saturation: 80,
        lightness: 50,
    }
}

fn distance_ratio(distance: Number, scale_max: Number) -> Number {
    if distance.is_nan() {
        return 1.0;
    }
    if distance <= 0.0 {
        return 0.0;
    }
    if !(scale_max.is_finite() && scale_max > 0.0) {
        return 1.0;
    }
    (distance / scale_max).min(1.0)
}

/// Looks a haplogroup up by its first two characters, e.g. `R1b1a2` resolves via `R1`.
pub fn haplogroup_color(code: &str) -> &'static str {
    haplogroup_prefix(code)
        .and_then(|prefix| {
            HAPLOGROUP_COLORS
                .iter()
                .find(|(key, _)| *key == prefix)
                .map(|(_, color)| *color)
        })
        .unwrap_or(NEUTRAL_COLOR)
}

fn haplogroup_prefix(code: &str) -> Option<&str> {
    let code = code.trim();
    let end = code.char_indices().nth(2).map(|(i, _)| i).unwrap_or(code.len());
    if code[..end].chars().count() < 2 {
        return None;
    }
    Some(&code[..end])
}
