use crate::color::{distance_to_color, Hsl};
use crate::config::{Number, State};
use crate::parser::parse;
use crate::vector_entry::LabeledVector;
use crate::vector_ops::{euclidean_distance, round_distance};
use anyhow::Result;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Fraction of the largest observed distance used as the color-scale saturation point.
pub const PLOT_SCALE_FRACTION: Number = 0.2;

/// A distance held at 5-decimal display precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance(Number);

impl Distance {
    pub fn new(raw: Number) -> Self {
        Self(round_distance(raw))
    }

    pub fn value(self) -> Number {
        self.0
    }

    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }

    /// Total order with `NaN` ranked as `+∞`.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        let key = |d: Number| if d.is_nan() { Number::INFINITY } else { d };
        key(self.0).total_cmp(&key(other.0))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}", self.0)
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatch {
    pub label: String,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetResult {
    pub target: String,
    pub matches: Vec<DistanceMatch>,
}

/// Ranks every source against every target in `target_text`, keeping `limit` per target.
pub fn compare_all(source_text: &str, target_text: &str, limit: usize) -> Vec<TargetResult> {
    let sources = parse(source_text);
    let targets = parse(target_text);
    compare_vectors(&sources, &targets, limit)
}

pub fn compare_vectors(
    sources: &[LabeledVector],
    targets: &[LabeledVector],
    limit: usize,
) -> Vec<TargetResult> {
    debug!(
        sources = sources.len(),
        targets = targets.len(),
        nan_sources = sources.iter().filter(|s| s.has_nan()).count(),
        limit,
        "comparing panels"
    );
    targets
        .par_iter()
        .map(|target| TargetResult {
            target: target.label.clone(),
            matches: rank_sources(target, sources, limit),
        })
        .collect()
}

pub fn rank_sources(
    target: &LabeledVector,
    sources: &[LabeledVector],
    limit: usize,
) -> Vec<DistanceMatch> {
    let matches = sources
        .iter()
        .map(|source| DistanceMatch {
            label: source.label.clone(),
            distance: distance_between(target, source),
        })
        .collect();
    sort_and_limit_results(matches, limit)
}

fn distance_between(target: &LabeledVector, source: &LabeledVector) -> Distance {
    Distance::new(euclidean_distance(&target.coordinates, &source.coordinates))
}

fn sort_and_limit_results(mut results: Vec<DistanceMatch>, limit: usize) -> Vec<DistanceMatch> {
    // Stable, so equal distances keep source order.
    results.sort_by(|a, b| a.distance.rank_cmp(&b.distance));
    results.truncate(limit);
    results
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotTarget {
    pub label: String,
    pub x: Number,
    pub y: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub label: String,
    pub x: Number,
    pub y: Number,
    pub distance: Distance,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotView {
    pub target: Option<PlotTarget>,
    /// Saturation point of this view's color scale.
    pub scale_max: Number,
    pub points: Vec<PlotPoint>,
}

/// Single-target view: every source's first two components, its distance to the
/// first target vector, and a color normalized to this call's distance range.
pub fn plot(source_text: &str, target_text: &str) -> PlotView {
    let sources = parse(source_text);
    let target = parse(target_text).into_iter().next();
    plot_vectors(&sources, target.as_ref())
}

pub fn plot_vectors(sources: &[LabeledVector], target: Option<&LabeledVector>) -> PlotView {
    let Some(target) = target else {
        return PlotView {
            target: None,
            scale_max: 0.0,
            points: Vec::new(),
        };
    };

    let distances: Vec<Distance> = sources
        .iter()
        .map(|source| distance_between(target, source))
        .collect();

    let max_distance = distances
        .iter()
        .map(|d| d.value())
        .filter(|d| d.is_finite())
        .fold(0.0, Number::max);
    let scale_max = max_distance * PLOT_SCALE_FRACTION;
    debug!(
        sources = sources.len(),
        max_distance,
        scale_max,
        "plotting target"
    );

    let points = sources
        .iter()
        .zip(distances)
        .map(|(source, distance)| {
            let (x, y) = source.planar();
            let color: Hsl = distance_to_color(distance.value(), scale_max);
            PlotPoint {
                label: source.label.clone(),
                x,
                y,
                distance,
                color: color.to_string(),
            }
        })
        .collect();

    let (x, y) = target.planar();
    PlotView {
        target: Some(PlotTarget {
            label: target.label.clone(),
            x,
            y,
        }),
        scale_max,
        points,
    }
}

/// Caller-side caps that bound the O(sources × targets) comparison cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLimits {
    pub max_bytes: usize,
    pub max_vectors: usize,
}

impl PanelLimits {
    pub fn from_state(state: &State) -> Self {
        Self {
            max_bytes: state.max_panel_bytes,
            max_vectors: state.max_vectors,
        }
    }

    /// Parses `text` if it fits within the limits.
    pub fn parse_bounded(&self, name: &str, text: &str) -> Result<Vec<LabeledVector>> {
        if text.len() > self.max_bytes {
            anyhow::bail!(
                "{} panel is {} bytes, over the {} byte limit",
                name,
                text.len(),
                self.max_bytes
            );
        }
        let vectors = parse(text);
        if vectors.len() > self.max_vectors {
            anyhow::bail!(
                "{} panel has {} vectors, over the {} vector limit",
                name,
                vectors.len(),
                self.max_vectors
            );
        }
        Ok(vectors)
    }
}
