use crate::config::Number;
use serde::{Deserialize, Serialize};

/// One `label,c1,c2,...` row of a G25 panel.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LabeledVector {
    pub label: String,
    pub coordinates: Vec<Number>,
}

impl LabeledVector {
    pub fn new(label: impl Into<String>, coordinates: Vec<Number>) -> Self {
        Self {
            label: label.into(),
            coordinates,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.coordinates.len()
    }

    pub fn has_nan(&self) -> bool {
        self.coordinates.iter().any(|c| c.is_nan())
    }

    /// First two components, missing ones read as zero.
    pub fn planar(&self) -> (Number, Number) {
        let x = self.coordinates.first().copied().unwrap_or(0.0);
        let y = self.coordinates.get(1).copied().unwrap_or(0.0);
        (x, y)
    }
}
